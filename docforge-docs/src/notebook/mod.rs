//! Notebook (nbformat v4) model.
//!
//! Only the parts needed to publish an executed notebook are modeled;
//! unknown fields are ignored.

pub mod export;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::DocsError;

pub use export::{ExportResources, ImageResource, export_markdown};

/// Oldest nbformat major version that can be exported.
pub const MIN_NBFORMAT: u32 = 4;

/// A parsed notebook.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    /// Cells in document order.
    pub cells: Vec<Cell>,

    /// Notebook-level metadata.
    #[serde(default)]
    pub metadata: NotebookMetadata,

    /// Major format version.
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
}

const fn default_nbformat() -> u32 {
    MIN_NBFORMAT
}

impl Notebook {
    /// Language of code cells, as declared by the kernel.
    #[must_use]
    pub fn language(&self) -> &str {
        self.metadata
            .kernelspec
            .as_ref()
            .and_then(|k| k.language.as_deref())
            .or_else(|| self.metadata.language_info.as_ref().map(|l| l.name.as_str()))
            .filter(|l| !l.is_empty())
            .unwrap_or("python")
    }
}

/// Notebook-level metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookMetadata {
    /// Kernel description.
    #[serde(default)]
    pub kernelspec: Option<KernelSpec>,

    /// Language description.
    #[serde(default)]
    pub language_info: Option<LanguageInfo>,
}

/// Kernel description.
#[derive(Debug, Clone, Deserialize)]
pub struct KernelSpec {
    /// Kernel language.
    #[serde(default)]
    pub language: Option<String>,
}

/// Language description.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageInfo {
    /// Language name.
    pub name: String,
}

/// Text stored either as a single string or as a list of lines.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MultilineText {
    /// Whole text.
    Single(String),
    /// Lines, each keeping its trailing newline.
    Lines(Vec<String>),
}

impl Default for MultilineText {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl MultilineText {
    /// Joined text.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }
}

/// A notebook cell.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    /// Markdown prose.
    Markdown {
        /// Cell source.
        #[serde(default)]
        source: MultilineText,
    },
    /// Executable code and its recorded outputs.
    Code {
        /// Cell source.
        #[serde(default)]
        source: MultilineText,
        /// Recorded outputs.
        #[serde(default)]
        outputs: Vec<Output>,
    },
    /// Raw text passed through unchanged.
    Raw {
        /// Cell source.
        #[serde(default)]
        source: MultilineText,
    },
}

/// Mime type → payload map of a rich output.
pub type MimeBundle = IndexMap<String, serde_json::Value>;

/// A recorded cell output.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Text written to stdout or stderr.
    Stream {
        /// Stream name.
        #[serde(default)]
        name: String,
        /// Written text.
        #[serde(default)]
        text: MultilineText,
    },
    /// Value of the last expression in the cell.
    ExecuteResult {
        /// Available representations.
        #[serde(default)]
        data: MimeBundle,
    },
    /// Explicitly displayed value.
    DisplayData {
        /// Available representations.
        #[serde(default)]
        data: MimeBundle,
    },
    /// Raised exception.
    Error {
        /// Exception class name.
        #[serde(default)]
        ename: String,
        /// Exception message.
        #[serde(default)]
        evalue: String,
        /// Formatted traceback lines, possibly with ANSI colors.
        #[serde(default)]
        traceback: Vec<String>,
    },
}

/// Parses notebook JSON.
///
/// # Errors
///
/// Returns `DocsError::Json` for malformed documents and
/// `DocsError::Notebook` for unsupported format versions.
pub fn parse_notebook(text: &str) -> Result<Notebook, DocsError> {
    let notebook: Notebook = serde_json::from_str(text)?;
    if notebook.nbformat < MIN_NBFORMAT {
        return Err(DocsError::Notebook(format!(
            "nbformat {} is not supported (need {MIN_NBFORMAT} or later)",
            notebook.nbformat
        )));
    }
    Ok(notebook)
}
