use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no issues left after filtering, or issues are not gating
    Success = 0,
    /// `--fail-on-issues` was given and the filtered tree still carries issues
    IssuesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (listing failure, file I/O error, bad config, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::IssuesDetected => write!(f, "Issues Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors raised while reading listings, manifests and output targets.
#[derive(Debug, Error)]
pub enum TreeScanError {
    #[error("Dependency listing not found: {path}\n\n💡 Hint: {suggestion}")]
    ListingNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse dependency listing: {path}\nDetails: {details}\n\n💡 Hint: The listing must be the JSON output of `npm ls --json --all`")]
    ListingParseError { path: PathBuf, details: String },

    #[error("Malformed dependency listing for {app_dir}\nReason: {reason}")]
    MalformedListing { app_dir: PathBuf, reason: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a directory that contains a package.json")]
    InvalidProjectPath { path: PathBuf, reason: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    /// Validation error for filters and configuration values
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Failure of one project's scan.
///
/// Carries the top-level message and the message of the root cause so the
/// caller can report both without holding on to the original error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Scan of project '{project}' failed: {message} (cause: {cause})")]
pub struct ScanFailure {
    pub project: String,
    pub message: String,
    pub cause: String,
}

impl ScanFailure {
    pub fn new(project: impl Into<String>, message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            message: message.into(),
            cause: cause.into(),
        }
    }

    /// Builds a failure from any error chain, keeping the outermost and innermost messages.
    pub fn from_error(project: impl Into<String>, error: &anyhow::Error) -> Self {
        Self::new(project, error.to_string(), error.root_cause().to_string())
    }
}
