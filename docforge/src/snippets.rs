//! Snippet reformatting for MDX pages.
//!
//! Every fenced block of the configured language goes through
//! protect → format → restore → render. A block the formatter rejects is
//! reported and left byte-identical; the rest of the file is still
//! processed. Files are rewritten only when their content changed.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use docforge_core::config::FormatterConfig;
use docforge_docs::mdx::codeblock::{CodeBlockScanner, splice};
use docforge_docs::mdx::magic;

use crate::error::{DocforgeError, FormatterError};
use crate::formatter::SnippetFormatter;
use crate::walk::{WalkOptions, discover};

/// A code block that could not be reformatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockFailure {
    /// Line of the opening fence.
    pub line: usize,
    /// Why formatting failed.
    pub message: String,
}

/// Result of reformatting one document.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// New document content.
    pub content: String,
    /// Whether `content` differs from the input.
    pub changed: bool,
    /// Blocks that went through the formatter successfully.
    pub blocks_formatted: usize,
    /// Blocks left untouched because formatting failed.
    pub failures: Vec<BlockFailure>,
}

/// A block failure located in a file.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// File containing the block.
    pub path: PathBuf,
    /// The failure.
    #[serde(flatten)]
    pub failure: BlockFailure,
}

/// Summary of a reformatting run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormatReport {
    /// Documents visited.
    pub files_scanned: usize,
    /// Documents rewritten.
    pub files_changed: Vec<PathBuf>,
    /// Blocks formatted successfully.
    pub blocks_formatted: usize,
    /// Blocks left untouched.
    pub failures: Vec<FileFailure>,
}

/// Reformats fenced code blocks with a [`SnippetFormatter`].
pub struct Reformatter {
    scanner: CodeBlockScanner,
    magic_markers: Vec<String>,
    formatter: Box<dyn SnippetFormatter>,
}

impl std::fmt::Debug for Reformatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reformatter")
            .field("language", &self.scanner.language())
            .field("magic_markers", &self.magic_markers)
            .finish_non_exhaustive()
    }
}

impl Reformatter {
    /// Creates a reformatter for blocks tagged `language`.
    ///
    /// # Errors
    ///
    /// Returns `DocforgeError::Docs` if the block pattern cannot be built.
    pub fn new(
        language: &str,
        magic_markers: Vec<String>,
        formatter: Box<dyn SnippetFormatter>,
    ) -> Result<Self, DocforgeError> {
        Ok(Self {
            scanner: CodeBlockScanner::new(language)?,
            magic_markers,
            formatter,
        })
    }

    /// Creates a reformatter from configuration.
    ///
    /// # Errors
    ///
    /// See [`Reformatter::new`].
    pub fn from_config(
        config: &FormatterConfig,
        formatter: Box<dyn SnippetFormatter>,
    ) -> Result<Self, DocforgeError> {
        Self::new(&config.language, config.magic_markers.clone(), formatter)
    }

    /// Reformats every block in `content`.
    ///
    /// # Errors
    ///
    /// Returns `FormatterError` only when the formatter cannot run at all;
    /// per-block failures are recorded in the outcome.
    pub async fn format_content(&self, content: &str) -> Result<FileOutcome, FormatterError> {
        let mut replacements = Vec::new();
        let mut blocks_formatted = 0;
        let mut failures = Vec::new();

        for block in self.scanner.find(content) {
            match self.format_block(block.body(content)).await {
                Ok(code) => {
                    blocks_formatted += 1;
                    let rendered = self.scanner.render(&code);
                    if rendered != block.text(content) {
                        replacements.push((block.span.clone(), rendered));
                    }
                }
                Err(BlockError::Fatal(e)) => return Err(e),
                Err(BlockError::Skipped(message)) => {
                    failures.push(BlockFailure {
                        line: block.line,
                        message,
                    });
                }
            }
        }

        let changed = !replacements.is_empty();
        let content = if changed {
            splice(content, &replacements)
        } else {
            content.to_string()
        };

        Ok(FileOutcome {
            content,
            changed,
            blocks_formatted,
            failures,
        })
    }

    async fn format_block(&self, code: &str) -> Result<String, BlockError> {
        let protected = magic::protect(code, &self.magic_markers);
        let formatted = self.formatter.format(&protected.code).await.map_err(|e| {
            if e.is_fatal() {
                BlockError::Fatal(e)
            } else {
                BlockError::Skipped(e.to_string())
            }
        })?;
        magic::restore(&formatted, &protected).map_err(|e| BlockError::Skipped(e.to_string()))
    }

    /// Reformats one file, rewriting it if anything changed.
    ///
    /// # Errors
    ///
    /// Returns `DocforgeError` if the file cannot be read or written, or the
    /// formatter cannot run.
    pub async fn format_file(&self, path: &Path) -> Result<FileOutcome, DocforgeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DocforgeError::io_at(path, &e))?;
        let outcome = self.format_content(&content).await?;

        for failure in &outcome.failures {
            warn!(
                path = %path.display(),
                line = failure.line,
                error = %failure.message,
                "leaving code block unformatted"
            );
        }

        if outcome.changed {
            std::fs::write(path, &outcome.content).map_err(|e| DocforgeError::io_at(path, &e))?;
            info!(path = %path.display(), "reformatted");
        } else {
            debug!(path = %path.display(), "unchanged");
        }

        Ok(outcome)
    }

    /// Reformats every matching document under `root`.
    ///
    /// # Errors
    ///
    /// Returns `DocforgeError` if `root` is invalid, a file cannot be read or
    /// written, or the formatter cannot run.
    pub async fn format_tree(
        &self,
        root: &Path,
        options: &WalkOptions,
    ) -> Result<FormatReport, DocforgeError> {
        let mut report = FormatReport::default();

        for path in discover(root, options)? {
            let outcome = self.format_file(&path).await?;
            report.files_scanned += 1;
            report.blocks_formatted += outcome.blocks_formatted;
            report
                .failures
                .extend(outcome.failures.into_iter().map(|failure| FileFailure {
                    path: path.clone(),
                    failure,
                }));
            if outcome.changed {
                report.files_changed.push(path);
            }
        }

        Ok(report)
    }
}

enum BlockError {
    Fatal(FormatterError),
    Skipped(String),
}
