//! Installation execution.
//!
//! This module provides [`execute`], the async function that turns a
//! validated [`InstallRequest`] into exactly one [`InstallOutcome`]: it
//! builds the installer command line, spawns the child process with both
//! output streams captured, reports liveness through a callback, and
//! converts every fault at the subprocess boundary into a failed outcome
//! instead of an error.

use crate::install::command::{display_command, install_args};
use crate::install::{CancelToken, FailureReason, InstallOutcome, InstallProgress};
use crate::{ExecuteOptions, InstallRequest, ProgressStrategy};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Mutex, OnceLock};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};

/// Process-wide registry of target directories with an install in flight.
///
/// Two concurrent installs into the same directory would race inside the
/// installer itself, so the second one is refused before spawning.
static IN_FLIGHT: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();

/// RAII claim on a target directory; released on drop, on every exit path.
struct TargetClaim {
    key: PathBuf,
}

impl TargetClaim {
    fn acquire(directory: &Path) -> Option<Self> {
        // Canonicalize so two spellings of the same directory collide; fall
        // back to the raw path if the directory cannot be resolved.
        let key = directory
            .canonicalize()
            .unwrap_or_else(|_| directory.to_path_buf());
        let registry = IN_FLIGHT.get_or_init(|| Mutex::new(HashSet::new()));
        let mut in_flight = registry.lock().unwrap_or_else(|e| e.into_inner());
        if in_flight.insert(key.clone()) {
            Some(Self { key })
        } else {
            None
        }
    }
}

impl Drop for TargetClaim {
    fn drop(&mut self) {
        if let Some(registry) = IN_FLIGHT.get() {
            registry
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&self.key);
        }
    }
}

/// Run the installer for one request and report the outcome.
///
/// The command line is
/// `<interpreter> -m <package_manager> install <package> --target <dir>
/// [extra_arguments...]`, with stdout and stderr captured rather than
/// inherited. The call suspends only while waiting for the child (and, under
/// [`ProgressStrategy::PerLine`], for the next line of output); spawn it off
/// the UI task and it will never block the caller's responsiveness.
///
/// This function does not return an error. A nonzero installer exit is a
/// normal failed outcome with diagnostics in `standard_error`; a process
/// that could not be started, was cancelled, timed out, or lost the
/// target-directory claim is a failed outcome with a
/// [`FailureReason`]. One request yields exactly one subprocess invocation
/// and one outcome; there are no retries.
///
/// # Arguments
///
/// - `request`: validated request, consumed by this invocation
/// - `options`: interpreter, package manager, progress strategy, optional
///   deadline and cancellation token
/// - `on_progress`: callback receiving [`InstallProgress`] notifications in
///   output order, always before the outcome is produced
///
/// # Example
///
/// ```rust,no_run
/// use pylibcopy_core::{execute, validate, ExecuteOptions, InstallProgress};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let request = validate("requests", Some("/tmp/libs".as_ref()), "--no-deps").unwrap();
///     let outcome = execute(request, ExecuteOptions::default(), |progress| {
///         println!("{}", progress.description());
///     })
///     .await;
///     println!("{}", outcome.summary());
/// }
/// ```
pub async fn execute<F>(
    request: InstallRequest,
    options: ExecuteOptions,
    on_progress: F,
) -> InstallOutcome
where
    F: Fn(InstallProgress) + Send + Sync,
{
    let directory = request.target_directory().to_path_buf();

    let _claim = match TargetClaim::acquire(&directory) {
        Some(claim) => claim,
        None => {
            tracing::warn!(directory = %directory.display(), "target directory already has an install in flight");
            return InstallOutcome::aborted(
                FailureReason::TargetBusy { directory },
                String::new(),
                String::new(),
            );
        }
    };

    if !directory.is_dir() {
        return InstallOutcome::launch_failure(format!(
            "target directory {} does not exist",
            directory.display()
        ));
    }

    let interpreter = match options.resolve_interpreter() {
        Ok(path) => path,
        Err(message) => return InstallOutcome::launch_failure(message),
    };

    let args = install_args(&request, options.module());
    tracing::debug!(command = %display_command(&interpreter, &args), "spawning installer");

    on_progress(InstallProgress::Started {
        package: request.package_name().to_string(),
    });

    let mut child = match Command::new(&interpreter)
        .args(&args)
        .kill_on_drop(true)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(error = %e, "installer could not be started");
            return InstallOutcome::launch_failure(e.to_string());
        }
    };

    if options.progress == ProgressStrategy::Indeterminate {
        on_progress(InstallProgress::Running);
    }

    // Drain both pipes concurrently; reading only one can deadlock once the
    // other fills its pipe buffer.
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let collect = futures::future::join(
        drain_stdout(stdout_pipe, options.progress, &on_progress),
        read_all(stderr_pipe),
    );

    let deadline = options.timeout;
    tokio::select! {
        (stdout, stderr) = collect => {
            match child.wait().await {
                Ok(status) => {
                    tracing::debug!(code = ?status.code(), "installer exited");
                    InstallOutcome::from_exit(status.success(), stdout, stderr)
                }
                Err(e) => InstallOutcome::aborted(
                    FailureReason::Launch {
                        message: format!("failed to collect installer exit status: {e}"),
                    },
                    stdout,
                    stderr,
                ),
            }
        }
        _ = wait_for_cancel(options.cancel.as_ref()) => {
            tracing::debug!("install cancelled, terminating installer");
            kill_child(&mut child).await;
            InstallOutcome::aborted(FailureReason::Cancelled, String::new(), String::new())
        }
        _ = tokio::time::sleep(deadline.unwrap_or_default()), if deadline.is_some() => {
            let limit = deadline.unwrap_or_default();
            tracing::warn!(?limit, "install deadline expired, terminating installer");
            kill_child(&mut child).await;
            InstallOutcome::aborted(FailureReason::TimedOut { limit }, String::new(), String::new())
        }
    }
}

/// Read installer stdout, emitting per-line progress when asked to.
///
/// Captured text reconstructs the stream with `\n` line endings under
/// [`ProgressStrategy::PerLine`]; the indeterminate path captures the raw
/// bytes unchanged.
async fn drain_stdout<F>(
    pipe: Option<ChildStdout>,
    strategy: ProgressStrategy,
    on_progress: &F,
) -> String
where
    F: Fn(InstallProgress) + Send + Sync,
{
    let Some(pipe) = pipe else {
        return String::new();
    };
    match strategy {
        ProgressStrategy::PerLine => {
            let mut captured = String::new();
            let mut lines = BufReader::new(pipe).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                on_progress(InstallProgress::OutputLine { line: line.clone() });
                captured.push_str(&line);
                captured.push('\n');
            }
            captured
        }
        ProgressStrategy::Indeterminate => read_all(Some(pipe)).await,
    }
}

/// Read a pipe to the end, lossily decoding as UTF-8. Read errors end the
/// capture with whatever arrived so far.
async fn read_all<R>(pipe: Option<R>) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(e) = pipe.read_to_end(&mut buf).await {
        tracing::warn!(error = %e, "error reading installer output");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn wait_for_cancel(token: Option<&CancelToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

async fn kill_child(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "failed to terminate installer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_claim_blocks_second_acquire() {
        let dir = Path::new("/nonexistent/pylibcopy-claim-test");
        let first = TargetClaim::acquire(dir);
        assert!(first.is_some());
        assert!(TargetClaim::acquire(dir).is_none());
    }

    #[test]
    fn test_target_claim_released_on_drop() {
        let dir = Path::new("/nonexistent/pylibcopy-claim-drop-test");
        drop(TargetClaim::acquire(dir));
        assert!(TargetClaim::acquire(dir).is_some());
    }

    #[test]
    fn test_distinct_directories_do_not_collide() {
        let a = TargetClaim::acquire(Path::new("/nonexistent/pylibcopy-claim-a"));
        let b = TargetClaim::acquire(Path::new("/nonexistent/pylibcopy-claim-b"));
        assert!(a.is_some());
        assert!(b.is_some());
    }

    #[tokio::test]
    async fn test_missing_target_directory_is_launch_failure() {
        let request = crate::validate(
            "requests",
            Some(Path::new("/nonexistent/pylibcopy-no-such-dir")),
            "",
        )
        .unwrap();
        let outcome = execute(request, ExecuteOptions::default(), |_| {}).await;
        assert!(!outcome.succeeded);
        assert!(outcome.is_launch_failure());
        assert!(outcome.summary().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_read_all_handles_missing_pipe() {
        let captured = read_all::<ChildStdout>(None).await;
        assert!(captured.is_empty());
    }
}
