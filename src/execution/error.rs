use std::io;
use thiserror::Error;

/// Result type for command execution operations
pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Errors that can occur while executing a command
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command line contained no tokens
    #[error("Empty command line")]
    EmptyCommand,

    /// The child process could not be started (e.g. command not found)
    #[error("Failed to start {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Command execution failed after the process was started
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl CommandError {
    /// Create a new execution error
    pub fn execution_error(reason: impl Into<String>) -> Self {
        Self::ExecutionError(reason.into())
    }

    /// Create a new spawn failure error
    pub fn spawn_failed(command: impl Into<String>, source: io::Error) -> Self {
        Self::SpawnFailed {
            command: command.into(),
            source,
        }
    }
}
