//! Progress reporting types for installation operations.
//!
//! Progress is delivered through the callback passed to
//! [`execute`](crate::execute). Notifications arrive in the order the
//! installer produced its output, and the terminal outcome is always
//! produced after the last notification, exactly once per request.

/// A liveness notification emitted while the installer runs.
///
/// Which variants appear depends on the
/// [`ProgressStrategy`](crate::ProgressStrategy) in effect:
/// [`Started`](Self::Started) is always first; `Indeterminate` follows it
/// with a single [`Running`](Self::Running); `PerLine` follows it with one
/// [`OutputLine`](Self::OutputLine) per line of installer stdout.
///
/// There is no percentage variant. The installer reports no structured
/// progress, so a percentage would have to be fabricated.
///
/// # Example
///
/// ```rust
/// use pylibcopy_core::InstallProgress;
///
/// fn on_progress(progress: InstallProgress) {
///     match &progress {
///         InstallProgress::Started { package } => {
///             println!("Installing {package}...");
///         }
///         InstallProgress::Running => {
///             println!("Working...");
///         }
///         InstallProgress::OutputLine { line } => {
///             println!("{line}");
///         }
///         _ => {}
///     }
/// }
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum InstallProgress {
    /// The installer process is about to be spawned.
    Started {
        /// The package token being installed, including any version pin.
        package: String,
    },

    /// The installer is running; no finer-grained signal is available.
    ///
    /// Emitted once under
    /// [`ProgressStrategy::Indeterminate`](crate::ProgressStrategy).
    Running,

    /// One line of installer stdout, as it became available.
    ///
    /// Emitted under [`ProgressStrategy::PerLine`](crate::ProgressStrategy),
    /// in output order.
    OutputLine {
        /// The line, without its trailing newline.
        line: String,
    },
}

impl InstallProgress {
    /// Short human-readable label for the current stage.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Started { .. } => "Starting installation",
            Self::Running => "Installing",
            Self::OutputLine { .. } => "Installing",
        }
    }
}
