//! Error types for `docforge` document transformations.

use thiserror::Error;

/// Errors raised while restoring protected shell-magic lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MagicError {
    /// The formatter output contains a placeholder that was never issued.
    #[error("unknown magic placeholder #{0} in formatter output")]
    UnknownPlaceholder(usize),

    /// The formatter output contains the same placeholder twice.
    #[error("magic placeholder #{0} appears more than once in formatter output")]
    DuplicatePlaceholder(usize),

    /// The formatter dropped placeholders.
    #[error("formatter output lost magic line(s) {0:?}")]
    MissingPlaceholders(Vec<usize>),
}

/// Errors that can occur while transforming documents.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Shell-magic restoration failed.
    #[error(transparent)]
    Magic(#[from] MagicError),

    /// Frontmatter block is malformed.
    #[error("frontmatter error: {0}")]
    Frontmatter(String),

    /// Notebook content is unusable.
    #[error("notebook error: {0}")]
    Notebook(String),

    /// Registry or author database is malformed.
    #[error("registry error: {0}")]
    Registry(String),

    /// Pattern could not be compiled.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
