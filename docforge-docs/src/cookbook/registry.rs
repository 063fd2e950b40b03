//! Cookbook registry and author database parsing.
//!
//! The registry (`registry.yaml`) lists, in order, the notebooks published
//! as cookbook pages. The author database (`authors.yaml`) maps author
//! emails to display names and avatars.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::DocsError;

/// A notebook listed in the registry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegistryEntry {
    /// Notebook path relative to the repository root.
    pub path: PathBuf,

    /// Output page slug (file stem and URL segment).
    pub slug: String,

    /// Page title.
    #[serde(default)]
    pub title: Option<String>,

    /// Page description.
    #[serde(default)]
    pub description: Option<String>,

    /// Social preview image.
    #[serde(default)]
    pub image: Option<String>,

    /// Keywords, as a string or a list.
    #[serde(default)]
    pub keywords: Option<Value>,

    /// Author emails.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Unpublished entries are skipped.
    #[serde(default = "default_publish")]
    pub publish: bool,
}

const fn default_publish() -> bool {
    true
}

impl RegistryEntry {
    /// Keywords as a comma-separated string.
    #[must_use]
    pub fn keywords_text(&self) -> Option<String> {
        match self.keywords.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Sequence(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}

/// Author profile.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub img: String,
}

/// Author profiles keyed by email, in file order.
pub type AuthorDb = IndexMap<String, Author>;

/// Author resolved for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAuthor {
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub img: String,
    /// Email key.
    pub email: String,
}

/// Email listed in the registry but absent from the author database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAuthor {
    /// Email as written in the registry.
    pub email: String,
    /// Closest known email, if any is close.
    pub suggestion: Option<String>,
}

/// Parse a registry YAML document.
///
/// # Errors
///
/// Returns `DocsError::Yaml` if the document cannot be parsed.
pub fn parse_registry(content: &str) -> Result<Vec<RegistryEntry>, DocsError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Parse an author database YAML document.
///
/// # Errors
///
/// Returns `DocsError::Yaml` if the document cannot be parsed.
pub fn parse_authors(content: &str) -> Result<AuthorDb, DocsError> {
    if content.trim().is_empty() {
        return Ok(AuthorDb::new());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Resolve registry emails against the author database.
///
/// Known authors keep registry order; unknown emails are returned
/// separately with a spelling suggestion.
#[must_use]
pub fn resolve_authors(
    emails: &[String],
    authors: &AuthorDb,
) -> (Vec<ResolvedAuthor>, Vec<UnknownAuthor>) {
    let mut resolved = Vec::new();
    let mut unknown = Vec::new();

    for email in emails {
        if let Some(author) = authors.get(email) {
            resolved.push(ResolvedAuthor {
                name: author.name.clone(),
                img: author.img.clone(),
                email: email.clone(),
            });
        } else {
            unknown.push(UnknownAuthor {
                email: email.clone(),
                suggestion: suggest_author(email, authors),
            });
        }
    }

    (resolved, unknown)
}

/// Returns the known email closest to `input`, if within edit distance 3.
#[must_use]
pub fn suggest_author(input: &str, authors: &AuthorDb) -> Option<String> {
    authors
        .keys()
        .map(|email| (email, strsim::damerau_levenshtein(input, email)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(email, _)| email.clone())
}

/// Result of registry validation.
#[derive(Debug, Default)]
pub struct RegistryValidation {
    /// Notebooks referenced in the registry but not found on disk.
    pub missing_notebooks: Vec<PathBuf>,

    /// Slugs used by more than one entry.
    pub duplicate_slugs: Vec<String>,
}

/// Validate published registry entries against the filesystem.
///
/// `base_dir` is the directory notebook paths are resolved against.
#[must_use]
pub fn validate_registry(entries: &[RegistryEntry], base_dir: &Path) -> RegistryValidation {
    let mut validation = RegistryValidation::default();
    let mut slugs = HashSet::new();

    for entry in entries.iter().filter(|e| e.publish) {
        if !base_dir.join(&entry.path).is_file() {
            validation.missing_notebooks.push(entry.path.clone());
        }
        if !slugs.insert(entry.slug.as_str()) && !validation.duplicate_slugs.contains(&entry.slug)
        {
            validation.duplicate_slugs.push(entry.slug.clone());
        }
    }

    validation
}
