//! Installation outcome types.
//!
//! Every executor invocation produces exactly one [`InstallOutcome`], whether
//! the installer succeeded, failed, or never started. The executor converts
//! all subprocess-boundary faults into a failed outcome rather than letting
//! them escape as errors.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Why an installation never ran to completion normally.
///
/// Absent for the ordinary failure mode, a nonzero installer exit, which is
/// a fully formed outcome with diagnostics in
/// [`standard_error`](InstallOutcome::standard_error).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FailureReason {
    /// The child process could not be started at all, or a precondition for
    /// starting it was not met (missing interpreter, permission denied,
    /// nonexistent target directory).
    Launch {
        /// Description of the launch failure.
        message: String,
    },

    /// The install was cancelled and the child process terminated.
    Cancelled,

    /// The deadline in [`ExecuteOptions::timeout`](crate::ExecuteOptions)
    /// expired and the child process was terminated.
    TimedOut {
        /// The deadline that expired.
        limit: Duration,
    },

    /// Another install into the same target directory was already in flight,
    /// so this one was refused without spawning anything.
    TargetBusy {
        /// The contested target directory.
        directory: PathBuf,
    },
}

/// The result of one installation request, produced exactly once.
///
/// # Terminal states
///
/// - installer exited 0: `succeeded == true`, `failure_reason` absent
/// - installer exited nonzero: `succeeded == false`, `failure_reason`
///   absent, diagnostics captured in `standard_error`
/// - installer never ran to completion: `succeeded == false`,
///   `failure_reason` says why (launch failure, cancellation, deadline,
///   target-directory collision)
///
/// # Example
///
/// ```rust,no_run
/// use pylibcopy_core::{execute, validate, ExecuteOptions};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let request = validate("requests", Some("/tmp/libs".as_ref()), "").unwrap();
///     let outcome = execute(request, ExecuteOptions::default(), |_| {}).await;
///     if outcome.succeeded {
///         println!("installed:\n{}", outcome.standard_output);
///     } else {
///         eprintln!("failed: {}", outcome.summary());
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOutcome {
    /// True iff the installer process exited with status code 0.
    pub succeeded: bool,

    /// Captured standard output, possibly empty.
    pub standard_output: String,

    /// Captured standard error, possibly empty.
    pub standard_error: String,

    /// Present only when the process never ran to completion normally.
    pub failure_reason: Option<FailureReason>,
}

impl InstallOutcome {
    pub(crate) fn from_exit(success: bool, stdout: String, stderr: String) -> Self {
        Self {
            succeeded: success,
            standard_output: stdout,
            standard_error: stderr,
            failure_reason: None,
        }
    }

    pub(crate) fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            standard_output: String::new(),
            standard_error: String::new(),
            failure_reason: Some(FailureReason::Launch {
                message: message.into(),
            }),
        }
    }

    pub(crate) fn aborted(reason: FailureReason, stdout: String, stderr: String) -> Self {
        Self {
            succeeded: false,
            standard_output: stdout,
            standard_error: stderr,
            failure_reason: Some(reason),
        }
    }

    /// Whether the installer process never started.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self.failure_reason, Some(FailureReason::Launch { .. }))
    }

    /// Whether the install was cancelled via a
    /// [`CancelToken`](crate::CancelToken).
    pub fn is_cancelled(&self) -> bool {
        matches!(self.failure_reason, Some(FailureReason::Cancelled))
    }

    /// One-line description of the terminal state, suitable for a status
    /// bar or dialog title. Every terminal state maps to a distinct message.
    pub fn summary(&self) -> String {
        match &self.failure_reason {
            None if self.succeeded => "installation succeeded".to_string(),
            None => "installer reported an error".to_string(),
            Some(FailureReason::Launch { message }) => {
                format!("installer could not be started: {message}")
            }
            Some(FailureReason::Cancelled) => "installation cancelled".to_string(),
            Some(FailureReason::TimedOut { limit }) => {
                format!("installation timed out after {limit:?}")
            }
            Some(FailureReason::TargetBusy { directory }) => {
                format!("another install into {} is already running", directory.display())
            }
        }
    }
}
