//! Read-only package manager queries.
//!
//! Independent of the install transaction: [`describe`] wraps the package
//! manager's `show` subcommand for post-install inspection, and
//! [`purge_cache`] wraps `cache purge` as an opt-in maintenance step. Both
//! run the same `<interpreter> -m <module> <subcommand>` shape as the
//! executor, bounded by a short timeout since these are interactive queries,
//! not installs.

use crate::ExecuteOptions;
use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Output;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Deadline for query subcommands; these do not download anything.
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from [`describe`] and [`purge_cache`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QueryError {
    /// The package manager does not know the package.
    #[error("package {package:?} is not installed")]
    NotFound {
        /// The package that was looked up.
        package: String,
        /// Diagnostic text from the package manager, possibly empty.
        stderr: String,
    },

    /// The query subcommand ran and exited nonzero.
    #[error("{command} exited with status {code:?}")]
    CommandFailed {
        /// The subcommand that failed, e.g. `pip cache purge`.
        command: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// The query process could not be started.
    #[error("could not run the package manager: {message}")]
    Launch {
        /// Description of the launch failure.
        message: String,
    },

    /// The query did not complete within its internal deadline.
    #[error("query timed out")]
    Timeout,
}

/// Metadata for an installed package, from the package manager's `show`
/// subcommand.
///
/// `raw` always holds the full text; the parsed fields are best-effort,
/// since the output format is the installer's to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// The full `show` output, verbatim.
    pub raw: String,

    /// Canonical package name, if the output carried a `Name:` line.
    pub name: Option<String>,

    /// Installed version, if present and parseable as semver.
    pub version: Option<Version>,

    /// Install location, if the output carried a `Location:` line.
    pub location: Option<PathBuf>,
}

fn field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(Name|Version|Location):[ \t]*(.+?)[ \t]*$").expect("invalid field regex")
    })
}

fn parse_metadata(raw: &str) -> PackageMetadata {
    let mut meta = PackageMetadata {
        raw: raw.to_string(),
        name: None,
        version: None,
        location: None,
    };
    for caps in field_regex().captures_iter(raw) {
        let value = &caps[2];
        match &caps[1] {
            "Name" => meta.name = Some(value.to_string()),
            "Version" => meta.version = Version::parse(value).ok(),
            "Location" => meta.location = Some(PathBuf::from(value)),
            _ => {}
        }
    }
    meta
}

async fn run_query(options: &ExecuteOptions, subcommand: &[&str]) -> Result<Output, QueryError> {
    let interpreter = options
        .resolve_interpreter()
        .map_err(|message| QueryError::Launch { message })?;

    let mut command = Command::new(&interpreter);
    command
        .arg("-m")
        .arg(options.module())
        .args(subcommand)
        .kill_on_drop(true);

    timeout(QUERY_TIMEOUT, command.output())
        .await
        .map_err(|_| QueryError::Timeout)?
        .map_err(|e| QueryError::Launch {
            message: e.to_string(),
        })
}

/// Show metadata for an installed package.
///
/// Runs `<interpreter> -m <package_manager> show <package>`. A zero exit
/// yields the metadata text plus best-effort parsed fields; a nonzero exit
/// means the package manager does not know the package.
///
/// # Errors
///
/// - [`QueryError::NotFound`] when the package is not installed
/// - [`QueryError::Launch`] when the process could not be started
/// - [`QueryError::Timeout`] when the query ran too long
///
/// # Example
///
/// ```rust,no_run
/// use pylibcopy_core::{describe, ExecuteOptions};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     match describe("requests", &ExecuteOptions::default()).await {
///         Ok(meta) => println!("{}", meta.raw),
///         Err(e) => eprintln!("{e}"),
///     }
/// }
/// ```
pub async fn describe(
    package: &str,
    options: &ExecuteOptions,
) -> Result<PackageMetadata, QueryError> {
    let output = run_query(options, &["show", package]).await?;
    if !output.status.success() {
        return Err(QueryError::NotFound {
            package: package.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    let raw = String::from_utf8_lossy(&output.stdout);
    tracing::debug!(package, "described installed package");
    Ok(parse_metadata(&raw))
}

/// Purge the package manager's download cache.
///
/// Runs `<interpreter> -m <package_manager> cache purge` and returns the
/// command's output text. This is a separate maintenance operation; the
/// executor never runs it implicitly.
///
/// # Errors
///
/// - [`QueryError::CommandFailed`] when the purge exits nonzero
/// - [`QueryError::Launch`] when the process could not be started
/// - [`QueryError::Timeout`] when the purge ran too long
pub async fn purge_cache(options: &ExecuteOptions) -> Result<String, QueryError> {
    let output = run_query(options, &["cache", "purge"]).await?;
    if !output.status.success() {
        return Err(QueryError::CommandFailed {
            command: format!("{} cache purge", options.module()),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_OUTPUT: &str = "Name: requests\n\
        Version: 2.31.0\n\
        Summary: Python HTTP for Humans.\n\
        Location: /tmp/libs\n\
        Requires: certifi, charset-normalizer, idna, urllib3\n";

    #[test]
    fn test_parse_metadata_fields() {
        let meta = parse_metadata(SHOW_OUTPUT);
        assert_eq!(meta.name.as_deref(), Some("requests"));
        assert_eq!(meta.version, Some(Version::parse("2.31.0").unwrap()));
        assert_eq!(meta.location, Some(PathBuf::from("/tmp/libs")));
        assert_eq!(meta.raw, SHOW_OUTPUT);
    }

    #[test]
    fn test_parse_metadata_tolerates_missing_fields() {
        let meta = parse_metadata("Summary: something else entirely\n");
        assert!(meta.name.is_none());
        assert!(meta.version.is_none());
        assert!(meta.location.is_none());
    }

    #[test]
    fn test_parse_metadata_ignores_unparseable_version() {
        let meta = parse_metadata("Name: legacy\nVersion: not.a.version\n");
        assert_eq!(meta.name.as_deref(), Some("legacy"));
        assert!(meta.version.is_none());
    }

    #[test]
    fn test_parse_metadata_trims_trailing_whitespace() {
        let meta = parse_metadata("Name: requests \nVersion: 1.0.0\t\n");
        assert_eq!(meta.name.as_deref(), Some("requests"));
        assert_eq!(meta.version, Some(Version::parse("1.0.0").unwrap()));
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError::NotFound {
            package: "requests".to_string(),
            stderr: String::new(),
        };
        assert!(err.to_string().contains("requests"));
        assert!(err.to_string().contains("not installed"));
    }

    #[tokio::test]
    async fn test_describe_launch_failure_for_missing_interpreter() {
        let options = ExecuteOptions {
            interpreter: Some(PathBuf::from("/nonexistent/python")),
            ..Default::default()
        };
        let err = describe("requests", &options).await.unwrap_err();
        assert!(matches!(err, QueryError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_purge_cache_launch_failure_for_missing_interpreter() {
        let options = ExecuteOptions {
            interpreter: Some(PathBuf::from("/nonexistent/python")),
            ..Default::default()
        };
        let err = purge_cache(&options).await.unwrap_err();
        assert!(matches!(err, QueryError::Launch { .. }));
    }
}
