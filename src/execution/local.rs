// Local command execution
//
// Runs a command line as a child process on the local machine, polling for
// completion at a fixed interval until the process exits, the timeout budget
// runs out, or cancellation is observed. Timeout and cancellation are normal
// outcomes carried in the returned output, never errors.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::execution::{
    error::{CommandError, CommandResult},
    output::ExecutionOutput,
    request::ExecutionRequest,
    tokenizer,
};
use crate::platform::os::OperatingSystem;

/// Fixed interval between exit-status checks
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default directory executables are resolved against on macOS
pub const DEFAULT_MAC_BIN_DIR: &str = "/usr/local/bin/";

/// Environment variable overriding the macOS executable directory
pub const ENV_PATH_OVERRIDE: &str = "HASHI_ENV_PATH";

/// Executor for commands run as local child processes
pub struct LocalExecutor {
    os: OperatingSystem,
    mac_bin_dir: String,
}

impl LocalExecutor {
    /// Create an executor for the host operating system
    pub fn new() -> Self {
        Self::with_os(OperatingSystem::host())
    }

    /// Create an executor that treats the target as the given operating system
    pub fn with_os(os: OperatingSystem) -> Self {
        let mac_bin_dir = std::env::var(ENV_PATH_OVERRIDE)
            .unwrap_or_else(|_| DEFAULT_MAC_BIN_DIR.to_string());
        Self {
            os,
            mac_bin_dir: normalize_dir(mac_bin_dir),
        }
    }

    /// Override the macOS executable directory
    pub fn with_mac_bin_dir(mut self, dir: impl Into<String>) -> Self {
        self.mac_bin_dir = normalize_dir(dir.into());
        self
    }

    /// Execute the request and capture its output
    ///
    /// Spawn failure (e.g. command not found) is returned as an error; a
    /// process that started always produces an [`ExecutionOutput`], whatever
    /// its exit code or the way it ended.
    pub async fn execute(&self, request: ExecutionRequest) -> CommandResult<ExecutionOutput> {
        let start = Instant::now();
        let (command_line, environment) = self.prepare(&request);

        let tokens = tokenizer::tokenize(&command_line);
        if tokens.is_empty() {
            return Err(CommandError::EmptyCommand);
        }

        let mut cmd = Command::new(&tokens[0]);
        cmd.args(&tokens[1..]);
        for (key, value) in &environment {
            cmd.env(key, value);
        }
        if let Some(ref dir) = request.working_directory {
            cmd.current_dir(dir);
        }
        // stderr stays separate from stdout
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| CommandError::spawn_failed(&tokens[0], e))?;

        let stdout_task = drain_pipe(child.stdout.take());
        let stderr_task = drain_pipe(child.stderr.take());

        let max_polls = (request.timeout.as_millis() / POLL_INTERVAL.as_millis()).max(1);

        let mut exit_code = None;
        let mut cancelled = false;
        for _ in 0..max_polls {
            if let Some(status) = child.try_wait()? {
                exit_code = Some(status.code().unwrap_or(-1));
                break;
            }
            if request.is_cancelled() {
                cancelled = true;
                break;
            }
            sleep(POLL_INTERVAL).await;
        }

        if exit_code.is_none() {
            // Timed out or cancelled; kill and reap so the readers hit EOF
            if let Err(e) = child.kill().await {
                log::warn!("failed to kill child process: {}", e);
            }
        }

        let stdout = collect(stdout_task).await;
        let stderr = collect(stderr_task).await;
        let execution_time = start.elapsed();

        log::debug!(
            "executed {:?} in {:?} (exit: {:?}, cancelled: {})",
            tokens[0],
            execution_time,
            exit_code,
            cancelled
        );

        Ok(match exit_code {
            Some(code) => ExecutionOutput::completed(code, stdout, stderr, execution_time),
            None if cancelled => ExecutionOutput::cancelled(stdout, stderr, execution_time),
            None => ExecutionOutput::timed_out(stdout, stderr, execution_time),
        })
    }

    /// Apply the macOS PATH workaround: child processes do not inherit the
    /// interactive shell's PATH there, so the executable is resolved against
    /// the configured directory and the child's PATH is forced to it.
    fn prepare(&self, request: &ExecutionRequest) -> (String, HashMap<String, String>) {
        let mut environment = request.environment.clone();
        let command_line = if self.os == OperatingSystem::Mac {
            environment.insert("PATH".to_string(), self.mac_bin_dir.clone());
            format!("{}{}", self.mac_bin_dir, request.command)
        } else {
            request.command.clone()
        };
        (command_line, environment)
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a child pipe to EOF on a separate task so the poll loop never blocks
/// on a full pipe buffer
fn drain_pipe<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf).await {
                log::warn!("failed to read child output: {}", e);
            }
        }
        buf
    })
}

async fn collect(task: JoinHandle<Vec<u8>>) -> String {
    match task.await {
        Ok(buf) => String::from_utf8_lossy(&buf).to_string(),
        Err(e) => {
            log::warn!("output reader task failed: {}", e);
            String::new()
        }
    }
}

fn normalize_dir(dir: String) -> String {
    if dir.ends_with('/') {
        dir
    } else {
        format!("{}/", dir)
    }
}

// Killing leaves the child reaped via kill(); a kill failure can orphan the
// process. That risk is logged above rather than retried.
