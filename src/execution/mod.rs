// Command Execution Module
//
// Tokenizes command lines, runs them as local child processes, and captures
// exit code and output with timeout and cooperative-cancellation semantics.

pub mod error;
pub mod local;
pub mod output;
pub mod request;
pub mod tokenizer;

// Re-export main types
pub use error::{CommandError, CommandResult};
pub use local::{LocalExecutor, DEFAULT_MAC_BIN_DIR, ENV_PATH_OVERRIDE, POLL_INTERVAL};
pub use output::{CompletionStatus, ExecutionOutput, KILLED_RETURN_CODE};
pub use request::{ExecutionRequest, DEFAULT_TIMEOUT};
pub use tokenizer::tokenize;
