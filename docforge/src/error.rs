//! Error types for `docforge`
//!
//! The top-level error aggregates the per-layer errors and maps each to a
//! process exit code.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use docforge_core::error::{ConfigError, Severity, ValidationIssue};
pub use docforge_docs::error::DocsError;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `docforge` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// A consistency check failed (files changed, invalid pages)
    pub const CHECK_FAILED: i32 = 4;

    /// The external formatter could not be run at all
    pub const FORMATTER_UNAVAILABLE: i32 = 5;

    /// Usage error (invalid arguments)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `docforge` operations.
#[derive(Debug, Error)]
pub enum DocforgeError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Document transformation error
    #[error(transparent)]
    Docs(#[from] DocsError),

    /// A document could not be transformed
    #[error("{path}: {source}")]
    Document {
        /// Document being processed
        path: PathBuf,
        /// Underlying error
        source: DocsError,
    },

    /// External formatter error that affects every block
    #[error(transparent)]
    Formatter(#[from] FormatterError),

    /// Registered notebooks that do not exist
    #[error("{} registered notebook(s) not found: {}", .0.len(), join_paths(.0))]
    MissingNotebooks(Vec<PathBuf>),

    /// A consistency check found problems
    #[error("check failed: {0}")]
    CheckFailed(String),

    /// A path argument does not name a usable file or directory
    #[error("invalid path {path}: {reason}")]
    InvalidPath {
        /// Offending path
        path: PathBuf,
        /// Why it cannot be used
        reason: String,
    },

    /// Invalid command-line usage
    #[error("{0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocforgeError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Docs(_) | Self::Document { .. } | Self::Json(_) => ExitCode::ERROR,
            Self::Formatter(_) => ExitCode::FORMATTER_UNAVAILABLE,
            Self::CheckFailed(_) => ExitCode::CHECK_FAILED,
            Self::InvalidPath { .. } | Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) | Self::MissingNotebooks(_) => ExitCode::IO_ERROR,
        }
    }

    /// Wraps an I/O error with the path it concerns.
    pub fn io_at(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {err}", path.display()),
        ))
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Formatter Errors
// ============================================================================

/// Errors from running the external code formatter.
#[derive(Debug, Error)]
pub enum FormatterError {
    /// No command configured
    #[error("formatter command is empty")]
    EmptyCommand,

    /// Command line could not be split into words
    #[error("invalid formatter command: {0}")]
    InvalidCommand(String),

    /// Process could not be started
    #[error("failed to start formatter '{program}': {message}")]
    SpawnFailed {
        /// Program name
        program: String,
        /// OS error text
        message: String,
    },

    /// Process did not finish in time
    #[error("formatter timed out after {0:?}")]
    Timeout(Duration),

    /// Process rejected the input
    #[error("formatter exited with status {}: {stderr}", code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    NonZeroExit {
        /// Exit status, if the process exited normally
        code: Option<i32>,
        /// Captured stderr
        stderr: String,
    },

    /// Output was not UTF-8
    #[error("formatter produced non-UTF-8 output")]
    InvalidOutput,

    /// Pipe I/O failed
    #[error("formatter I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatterError {
    /// Returns `true` if the error would recur for every block.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EmptyCommand | Self::InvalidCommand(_) | Self::SpawnFailed { .. }
        )
    }
}

/// Result type alias for `docforge` operations.
pub type Result<T> = std::result::Result<T, DocforgeError>;
