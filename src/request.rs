//! Install request validation.
//!
//! This module provides [`validate`], the pure function that turns raw user
//! input (package name, target directory, extra options string) into an
//! [`InstallRequest`], or rejects it with a [`ValidationError`] before any
//! subprocess is spawned.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced by [`validate`].
///
/// These are the only errors surfaced to the caller before work begins; all
/// later failures are reported through the install outcome instead. Every
/// variant is recoverable locally by re-prompting the user.
///
/// # Example
///
/// ```rust
/// use pylibcopy_core::{validate, ValidationError};
///
/// let err = validate("  ", Some("/tmp/libs".as_ref()), "").unwrap_err();
/// assert_eq!(err, ValidationError::EmptyPackageName);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ValidationError {
    /// The trimmed package name is empty.
    #[error("package name is empty")]
    EmptyPackageName,

    /// No target directory was supplied or selected.
    #[error("no target directory selected")]
    NoTargetDirectory,

    /// The package name contains embedded whitespace.
    ///
    /// The name must be a single token; a version pin belongs in
    /// [`InstallRequest::pin_version`], and installer flags belong in the
    /// extra options string.
    #[error("package name must be a single token, got {name:?}")]
    WhitespaceInPackageName {
        /// The offending trimmed name.
        name: String,
    },
}

/// A validated, immutable installation request.
///
/// Produced by [`validate`] and consumed by exactly one
/// [`execute`](crate::execute) invocation. Neither this request nor the
/// resulting [`InstallOutcome`](crate::InstallOutcome) is mutated after
/// creation, and nothing is persisted between operations.
///
/// # Example
///
/// ```rust
/// use pylibcopy_core::validate;
///
/// let request = validate("requests", Some("/tmp/libs".as_ref()), "--no-deps")
///     .unwrap()
///     .pin_version("2.31.0");
/// assert_eq!(request.package_name(), "requests==2.31.0");
/// assert_eq!(request.extra_arguments(), ["--no-deps"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRequest {
    package_name: String,
    target_directory: PathBuf,
    extra_arguments: Vec<String>,
}

impl InstallRequest {
    /// The package token passed to the installer, including any version pin.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The directory the installer is pointed at with the target flag.
    pub fn target_directory(&self) -> &Path {
        &self.target_directory
    }

    /// Extra tokens appended verbatim after the target flag, in order.
    pub fn extra_arguments(&self) -> &[String] {
        &self.extra_arguments
    }

    /// Pin the request to a specific version.
    ///
    /// Appends `==<version>` to the package token, matching the installer's
    /// version-pin syntax. A blank version leaves the request unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pylibcopy_core::validate;
    ///
    /// let request = validate("numpy", Some("/tmp/libs".as_ref()), "")
    ///     .unwrap()
    ///     .pin_version("1.26.4");
    /// assert_eq!(request.package_name(), "numpy==1.26.4");
    /// ```
    #[must_use]
    pub fn pin_version(mut self, version: &str) -> Self {
        let version = version.trim();
        if !version.is_empty() {
            self.package_name = format!("{}=={}", self.package_name, version);
        }
        self
    }
}

/// Validate raw user input into an [`InstallRequest`].
///
/// Pure function, no side effects: it does not touch the filesystem and does
/// not check any remote registry for the package. Whether the package exists
/// is the installer's own job and shows up in the install outcome.
///
/// # Arguments
///
/// - `raw_name`: package name as typed; leading/trailing whitespace trimmed
/// - `raw_directory`: selected target directory, `None` if nothing was picked
/// - `raw_extra_args`: free-form options string, split on whitespace (an
///   empty or blank string yields no tokens)
///
/// # Errors
///
/// - [`ValidationError::EmptyPackageName`] for an empty or blank name
/// - [`ValidationError::NoTargetDirectory`] for a missing or empty directory
/// - [`ValidationError::WhitespaceInPackageName`] for a multi-token name
///
/// # Example
///
/// ```rust
/// use pylibcopy_core::validate;
///
/// let request = validate("requests", Some("/tmp/libs".as_ref()), "--no-deps --pre").unwrap();
/// assert_eq!(request.package_name(), "requests");
/// assert_eq!(request.extra_arguments(), ["--no-deps", "--pre"]);
/// ```
pub fn validate(
    raw_name: &str,
    raw_directory: Option<&Path>,
    raw_extra_args: &str,
) -> Result<InstallRequest, ValidationError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyPackageName);
    }
    if name.split_whitespace().nth(1).is_some() {
        return Err(ValidationError::WhitespaceInPackageName {
            name: name.to_string(),
        });
    }

    let target_directory = match raw_directory {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => return Err(ValidationError::NoTargetDirectory),
    };

    let extra_arguments = raw_extra_args
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Ok(InstallRequest {
        package_name: name.to_string(),
        target_directory,
        extra_arguments,
    })
}
