//! Configuration schema types
//!
//! This module defines the `docforge.yaml` project configuration. Every
//! field has a default, so an empty file (or no file at all) describes the
//! standard documentation repository layout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Placeholder substituted with the configured line length in formatter commands.
pub const LINE_LENGTH_PLACEHOLDER: &str = "{line_length}";

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a documentation repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory holding the published MDX pages.
    pub pages_dir: PathBuf,

    /// Snippet formatter settings.
    pub formatter: FormatterConfig,

    /// Frontmatter length rules.
    pub frontmatter: FrontmatterRules,

    /// Cookbook build settings.
    pub cookbooks: CookbookConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            pages_dir: PathBuf::from("fern/pages"),
            formatter: FormatterConfig::default(),
            frontmatter: FrontmatterRules::default(),
            cookbooks: CookbookConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Parses a configuration document.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the document is malformed or contains
    /// unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// Settings for reformatting fenced code blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatterConfig {
    /// Command line of the external formatter. It reads code on stdin and
    /// writes the formatted code to stdout. `{line_length}` is substituted.
    pub command: String,

    /// Info-string of the fenced blocks to reformat.
    pub language: String,

    /// Maximum line length passed to the formatter.
    pub line_length: usize,

    /// Line prefixes (after indentation) marking shell-magic lines.
    pub magic_markers: Vec<String>,

    /// Per-block formatter timeout.
    #[serde(with = "duration_str")]
    pub timeout: Duration,

    /// File name pattern of documents to process.
    pub file_pattern: String,

    /// Directories (relative to the walked root, glob patterns allowed)
    /// that are never reformatted.
    pub exclude: Vec<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            command: format!("black --quiet --line-length {LINE_LENGTH_PLACEHOLDER} -"),
            language: "python".to_string(),
            line_length: 70,
            magic_markers: vec!["!".to_string(), "%".to_string()],
            timeout: Duration::from_secs(30),
            file_pattern: "*.mdx".to_string(),
            exclude: Vec::new(),
        }
    }
}

impl FormatterConfig {
    /// Returns the formatter command with the line length substituted.
    #[must_use]
    pub fn resolved_command(&self) -> String {
        self.command
            .replace(LINE_LENGTH_PLACEHOLDER, &self.line_length.to_string())
    }
}

// ============================================================================
// Frontmatter
// ============================================================================

/// Rules enforced on page frontmatter. Lengths are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontmatterRules {
    /// Minimum description length.
    pub description_min: usize,
    /// Maximum description length.
    pub description_max: usize,
    /// Minimum title length (violations are warnings).
    pub title_min: usize,
    /// Maximum title length (violations are warnings).
    pub title_max: usize,
    /// Layout pages at the pages root that need no title.
    pub layout_pages: Vec<String>,
    /// Directories (relative to the pages root, glob patterns allowed)
    /// that are never checked.
    pub exclude: Vec<String>,
}

impl Default for FrontmatterRules {
    fn default() -> Self {
        Self {
            description_min: 50,
            description_max: 160,
            title_min: 30,
            title_max: 60,
            layout_pages: vec!["index.mdx".to_string(), "cookbooks.mdx".to_string()],
            exclude: vec![
                "-ARCHIVE-".to_string(),
                "api-reference".to_string(),
                "llm-university".to_string(),
            ],
        }
    }
}

// ============================================================================
// Cookbooks
// ============================================================================

/// Locations used when publishing notebooks as cookbook pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CookbookConfig {
    /// Registry of notebooks to publish.
    pub registry: PathBuf,
    /// Author database keyed by email.
    pub authors: PathBuf,
    /// Directory receiving `<slug>.mdx` pages.
    pub output_dir: PathBuf,
    /// Base URL that notebook paths are appended to for the source link.
    pub source_url: String,
    /// URL prefix of published cookbook pages.
    pub slug_prefix: String,
}

impl Default for CookbookConfig {
    fn default() -> Self {
        Self {
            registry: PathBuf::from("scripts/build-cookbooks/registry.yaml"),
            authors: PathBuf::from("scripts/build-cookbooks/authors.yaml"),
            output_dir: PathBuf::from("fern/pages/cookbooks"),
            source_url: "https://github.com/cohere-ai/notebooks/blob/main".to_string(),
            slug_prefix: "/page".to_string(),
        }
    }
}

/// Human-readable durations (`"30s"`, `"1m 30s"`) via `humantime`.
mod duration_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
