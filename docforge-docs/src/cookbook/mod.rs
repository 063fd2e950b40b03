//! Cookbook publishing: executed notebooks → MDX pages.

pub mod page;
pub mod registry;

use docforge_core::config::CookbookConfig;

use crate::error::DocsError;
use crate::mdx::frontmatter::parse_frontmatter;
use crate::notebook::{export_markdown, parse_notebook};

pub use page::{PageMetadata, post_process, render_cookbook_page, resolve_metadata};
pub use registry::{
    AuthorDb, RegistryEntry, ResolvedAuthor, UnknownAuthor, parse_authors, parse_registry,
    resolve_authors,
};

/// A rendered cookbook page.
#[derive(Debug, Clone)]
pub struct BuiltPage {
    /// Full MDX content.
    pub content: String,
    /// Resolved frontmatter values.
    pub metadata: PageMetadata,
    /// Registry emails missing from the author database.
    pub unknown_authors: Vec<UnknownAuthor>,
}

/// Render the page for one registry entry.
///
/// `existing_page` is the current content of the output file, if any; its
/// frontmatter supplies values the registry leaves out.
///
/// # Errors
///
/// Returns `DocsError` if the notebook or the existing page cannot be parsed.
pub fn build_page(
    entry: &RegistryEntry,
    notebook_json: &str,
    existing_page: Option<&str>,
    authors: &AuthorDb,
    config: &CookbookConfig,
) -> Result<BuiltPage, DocsError> {
    let notebook = parse_notebook(notebook_json)?;
    let (markdown, resources) = export_markdown(&notebook)?;
    let body = post_process(&markdown, &resources);

    let existing = existing_page.map(parse_frontmatter).transpose()?;
    let metadata = resolve_metadata(entry, existing.as_ref(), &config.slug_prefix);

    let (resolved, unknown_authors) = resolve_authors(&entry.authors, authors);
    let notebook_path = entry.path.to_string_lossy();
    let content = render_cookbook_page(
        &metadata,
        &resolved,
        &notebook_path,
        &config.source_url,
        &body,
    );

    Ok(BuiltPage {
        content,
        metadata,
        unknown_authors,
    })
}
