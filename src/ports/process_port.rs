//! Port for running the external loader binary.

use crate::domain::errors::Result;
use std::time::Duration;

/// Captured outcome of one `sqlldr` invocation.
///
/// A `None` exit code means the process did not terminate normally
/// (killed on timeout or by a signal).
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn successful(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn failed(&self) -> bool {
        !self.successful()
    }
}

/// Contract for synchronous external command execution.
///
/// Implementations must return rather than hang when the timeout elapses;
/// a timed-out run reports as unsuccessful, not as `Err`.
pub trait ProcessPort: Send + Sync {
    fn run(&self, command: &str, timeout: Duration) -> Result<ProcessOutput>;
}
