// Captured result of a single command execution

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Return code reported when a process was killed before it could exit
pub const KILLED_RETURN_CODE: i32 = -1;

/// How an execution reached its end
///
/// Timeout and cancellation are expected outcomes, not errors. Callers that
/// need to tell "ran and failed" apart from "did not finish" inspect this
/// status rather than the return code alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    /// The process exited on its own; the return code is the real exit code
    Completed,
    /// The timeout budget ran out and the process was killed
    TimedOut,
    /// Cancellation was observed and the process was killed
    Cancelled,
}

/// Immutable result of a completed (or forcibly ended) command execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutput {
    return_code: i32,
    stdout: String,
    stderr: String,
    status: CompletionStatus,
    execution_time: Duration,
}

impl ExecutionOutput {
    /// Create an output for a process that exited on its own
    pub fn completed(
        return_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self {
            return_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: CompletionStatus::Completed,
            execution_time,
        }
    }

    /// Create an output for a process killed after the timeout elapsed
    pub fn timed_out(
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self {
            return_code: KILLED_RETURN_CODE,
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: CompletionStatus::TimedOut,
            execution_time,
        }
    }

    /// Create an output for a process killed after cancellation was observed
    pub fn cancelled(
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self {
            return_code: KILLED_RETURN_CODE,
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: CompletionStatus::Cancelled,
            execution_time,
        }
    }

    /// Process exit status, or [`KILLED_RETURN_CODE`] if the process was killed
    pub fn return_code(&self) -> i32 {
        self.return_code
    }

    /// Captured standard output, never absent (empty when the process wrote nothing)
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured standard error, never absent
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// How the execution ended
    pub fn status(&self) -> CompletionStatus {
        self.status
    }

    /// Wall-clock time the execution took
    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    /// True when the process exited on its own with code zero
    pub fn success(&self) -> bool {
        self.status == CompletionStatus::Completed && self.return_code == 0
    }

    /// True when the execution ended because the timeout elapsed
    pub fn is_timed_out(&self) -> bool {
        self.status == CompletionStatus::TimedOut
    }

    /// True when the execution ended because it was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.status == CompletionStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_output() {
        let output = ExecutionOutput::completed(0, "out", "err", Duration::from_millis(5));
        assert!(output.success());
        assert_eq!(output.return_code(), 0);
        assert_eq!(output.stdout(), "out");
        assert_eq!(output.stderr(), "err");
        assert!(!output.is_timed_out());
        assert!(!output.is_cancelled());
    }

    #[test]
    fn test_nonzero_exit_is_not_success() {
        let output = ExecutionOutput::completed(3, "", "", Duration::ZERO);
        assert!(!output.success());
        assert_eq!(output.status(), CompletionStatus::Completed);
    }

    #[test]
    fn test_timed_out_and_cancelled_are_distinct() {
        let timed_out = ExecutionOutput::timed_out("", "", Duration::from_secs(1));
        let cancelled = ExecutionOutput::cancelled("", "", Duration::from_secs(1));

        assert!(timed_out.is_timed_out());
        assert!(!timed_out.is_cancelled());
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_timed_out());
        assert_eq!(timed_out.return_code(), KILLED_RETURN_CODE);
        assert_eq!(cancelled.return_code(), KILLED_RETURN_CODE);
    }

    #[test]
    fn test_output_strings_never_absent() {
        let output = ExecutionOutput::completed(0, String::new(), String::new(), Duration::ZERO);
        assert_eq!(output.stdout(), "");
        assert_eq!(output.stderr(), "");
    }
}
