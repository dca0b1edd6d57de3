// Platform handler trait: the uniform contract over execution targets

use async_trait::async_trait;

use crate::execution::{ExecutionOutput, ExecutionRequest};
use crate::platform::{error::HandlerResult, os::OperatingSystem};

/// Uniform contract for command execution and file operations against a
/// target, whether local, reached over SSH, or inside a Docker container
///
/// Implementations must treat "does not exist" as a normal `false` result on
/// the existence checks and reserve errors for genuine IO or connection
/// failure. `delete_file` is best effort: failures are logged, not escalated,
/// so a cleanup hiccup never blocks the larger workflow.
#[async_trait]
pub trait PlatformHandler: Send + Sync {
    /// Short tag identifying the handler family ("local", "docker", ...)
    fn kind(&self) -> &'static str;

    /// Acquire any connection state; a no-op for local targets
    async fn start_session(&mut self) -> HandlerResult<()>;

    /// Release any connection state; a no-op for local targets
    async fn end_session(&mut self) -> HandlerResult<()>;

    async fn directory_exists(&self, path: &str) -> HandlerResult<bool>;

    async fn file_exists(&self, path: &str) -> HandlerResult<bool>;

    /// Create the directory and all missing ancestors; idempotent
    async fn create_directory(&self, path: &str) -> HandlerResult<()>;

    /// Copy a file from the caller's side to the target
    async fn upload_file(&self, src: &str, dst: &str) -> HandlerResult<()>;

    /// Copy a file from the target to the caller's side
    async fn download_file(&self, src: &str, dst: &str) -> HandlerResult<()>;

    /// Best-effort delete; logs and swallows failure
    async fn delete_file(&self, path: &str) -> HandlerResult<()>;

    /// Run a command on the target with the request's environment, timeout,
    /// and cancellation settings
    async fn execute(&self, request: ExecutionRequest) -> HandlerResult<ExecutionOutput>;

    /// Run a bare command line with default settings
    async fn execute_command(&self, command: &str) -> HandlerResult<ExecutionOutput> {
        self.execute(ExecutionRequest::new(command)).await
    }

    /// Look up an environment variable in the target's context
    async fn env_value(&self, key: &str) -> HandlerResult<Option<String>>;

    /// The target's temp directory, always ending with the path separator
    async fn temp_dir(&self) -> HandlerResult<String>;

    /// The target's operating system
    async fn os(&self) -> HandlerResult<OperatingSystem>;
}

impl std::fmt::Debug for dyn PlatformHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformHandler")
            .field("kind", &self.kind())
            .finish()
    }
}
