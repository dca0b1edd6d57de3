// Execution request for command execution against any target

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default timeout applied when a request does not set one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A command to run, with environment overrides, timeout, and an optional
/// cooperative cancellation token
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub command: String,
    pub environment: HashMap<String, String>,
    pub working_directory: Option<PathBuf>,
    pub timeout: Duration,
    pub cancellation: Option<CancellationToken>,
}

impl ExecutionRequest {
    /// Create a new request for the given command line
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            environment: HashMap::new(),
            working_directory: None,
            timeout: DEFAULT_TIMEOUT,
            cancellation: None,
        }
    }

    /// Set environment overrides; entries are added to or replace the child's
    /// inherited environment, never clear it
    pub fn with_environment(mut self, env: HashMap<String, String>) -> Self {
        self.environment = env;
        self
    }

    /// Add a single environment override
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Set the working directory
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Set the timeout budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach a cancellation token, checked once per poll interval
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// True when the attached token, if any, has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|t| t.is_cancelled())
            .unwrap_or(false)
    }
}
