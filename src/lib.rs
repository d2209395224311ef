//! # pylibcopy-core
//!
//! Headless package installation workflow for PyLibCopy front-ends.
//!
//! This crate is the UI-independent core behind the PyLibCopy desktop
//! front-ends: it validates user input into an [`InstallRequest`], runs the
//! package manager (`<interpreter> -m pip install <package> --target <dir>`)
//! as a child process with both output streams captured, and reports exactly
//! one structured [`InstallOutcome`] per request. Any front-end — GUI or
//! CLI — supplies the request fields, receives [`InstallProgress`]
//! notifications, and renders the outcome; all dialogs, styling, and window
//! management stay on the presentation side.
//!
//! ## Features
//!
//! - [`validate`]: pure validation of raw user input, no side effects
//! - [`execute`]: async subprocess execution with per-line or indeterminate
//!   progress, cancellation, an optional deadline, and a guard against
//!   concurrent installs into the same target directory
//! - [`describe`] / [`purge_cache`]: read-only inspection and maintenance
//!   queries, independent of the install transaction
//!
//! ## Example
//!
//! ```rust,no_run
//! use pylibcopy_core::{execute, validate, ExecuteOptions, InstallProgress};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let request = match validate("requests", Some("/tmp/libs".as_ref()), "--no-deps") {
//!         Ok(request) => request,
//!         Err(e) => {
//!             eprintln!("{e}");
//!             return;
//!         }
//!     };
//!
//!     let outcome = execute(request, ExecuteOptions::default(), |progress| {
//!         if let InstallProgress::OutputLine { line } = progress {
//!             println!("{line}");
//!         }
//!     })
//!     .await;
//!
//!     println!("{}", outcome.summary());
//! }
//! ```

mod describe;
mod install;
mod options;
mod request;

pub use describe::{describe, purge_cache, PackageMetadata, QueryError};
pub use install::{execute, CancelToken, FailureReason, InstallOutcome, InstallProgress};
pub use options::{ExecuteOptions, ProgressStrategy};
pub use request::{validate, InstallRequest, ValidationError};
