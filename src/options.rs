//! Execution options configuration.
//!
//! This module provides the [`ExecuteOptions`] struct for configuring how an
//! install (or query) subprocess is run: which interpreter and package
//! manager module to invoke, which progress strategy to use, an optional
//! deadline, and an optional cancellation token.

use crate::install::CancelToken;
use std::path::PathBuf;
use std::time::Duration;

/// How the executor reports liveness while the installer runs.
///
/// The installer gives no structured progress, so there is no honest
/// percentage to display. These two strategies are the legitimate choices;
/// a fabricated percentage ramp is deliberately not one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStrategy {
    /// Emit one [`OutputLine`](crate::InstallProgress::OutputLine)
    /// notification per line of installer stdout as it becomes available.
    PerLine,

    /// Emit a single busy notification and nothing else until the terminal
    /// outcome. Suitable for an indeterminate spinner.
    #[default]
    Indeterminate,
}

/// Configuration options for running the package manager.
///
/// # Default Behavior
///
/// With `interpreter: None` the executor looks up `python3`, then `python`,
/// on the PATH. The package manager module defaults to `pip`, the progress
/// strategy to [`ProgressStrategy::Indeterminate`], and there is no deadline
/// and no cancellation token.
///
/// # Example
///
/// ```rust
/// use pylibcopy_core::{ExecuteOptions, ProgressStrategy};
/// use std::time::Duration;
///
/// // Defaults: discovered python, pip, indeterminate progress, no deadline
/// let options = ExecuteOptions::default();
///
/// // Line-by-line output with a 10 minute deadline
/// let options = ExecuteOptions {
///     progress: ProgressStrategy::PerLine,
///     timeout: Some(Duration::from_secs(600)),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Interpreter used to run the package manager module.
    ///
    /// `None` means discover one on the PATH (`python3`, then `python`).
    /// Set this explicitly to target a specific interpreter, e.g. the one
    /// inside a virtual environment.
    pub interpreter: Option<PathBuf>,

    /// Package manager module invoked as `<interpreter> -m <module>`.
    ///
    /// An empty string means the default, `pip`.
    pub package_manager: String,

    /// Liveness reporting strategy while the installer runs.
    pub progress: ProgressStrategy,

    /// Optional deadline for the whole installation.
    ///
    /// `None` (the default) waits indefinitely, which is what the front-ends
    /// historically did. When set, an expired deadline kills the child and
    /// the outcome carries [`FailureReason::TimedOut`](crate::FailureReason).
    pub timeout: Option<Duration>,

    /// Optional cancellation token for the in-flight install.
    pub cancel: Option<CancelToken>,
}

impl ExecuteOptions {
    /// The package manager module name, with the default applied.
    pub(crate) fn module(&self) -> &str {
        if self.package_manager.is_empty() {
            "pip"
        } else {
            &self.package_manager
        }
    }

    /// Resolve the interpreter to invoke.
    ///
    /// An explicit interpreter is taken as-is (a bad path surfaces as a
    /// spawn error later); otherwise the PATH is searched.
    pub(crate) fn resolve_interpreter(&self) -> Result<PathBuf, String> {
        if let Some(path) = &self.interpreter {
            return Ok(path.clone());
        }
        for name in ["python3", "python"] {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }
        Err("no python interpreter found on PATH".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExecuteOptions::default();
        assert!(options.interpreter.is_none());
        assert_eq!(options.module(), "pip");
        assert_eq!(options.progress, ProgressStrategy::Indeterminate);
        assert!(options.timeout.is_none());
        assert!(options.cancel.is_none());
    }

    #[test]
    fn test_module_default_applied_for_empty_string() {
        let options = ExecuteOptions::default();
        assert_eq!(options.module(), "pip");
    }

    #[test]
    fn test_module_override() {
        let options = ExecuteOptions {
            package_manager: "uv".to_string(),
            ..Default::default()
        };
        assert_eq!(options.module(), "uv");
    }

    #[test]
    fn test_explicit_interpreter_taken_as_is() {
        let options = ExecuteOptions {
            interpreter: Some(PathBuf::from("/opt/venv/bin/python")),
            ..Default::default()
        };
        assert_eq!(
            options.resolve_interpreter().unwrap(),
            PathBuf::from("/opt/venv/bin/python")
        );
    }

    #[test]
    fn test_clone_keeps_settings() {
        let options = ExecuteOptions {
            progress: ProgressStrategy::PerLine,
            timeout: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        let cloned = options.clone();
        assert_eq!(cloned.progress, ProgressStrategy::PerLine);
        assert_eq!(cloned.timeout, Some(Duration::from_secs(60)));
    }
}
