//! Cookbook MDX page generation.
//!
//! Cleans up exported notebook Markdown and assembles frontmatter, author
//! credits, a link to the source notebook, and the body into a page.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::json;

use crate::cookbook::registry::{RegistryEntry, ResolvedAuthor};
use crate::mdx::frontmatter::{Frontmatter, render_frontmatter};
use crate::notebook::ExportResources;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t].*(?:\n|$)").expect("valid regex"));

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script.*?</script>").expect("valid regex"));

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("valid regex"));

/// Title used when neither the registry nor an existing page has one.
pub const DEFAULT_TITLE: &str = "Default Title";

/// Frontmatter values of a cookbook page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    /// Page title.
    pub title: String,
    /// Published URL path, e.g. `/page/basic-rag`.
    pub slug: String,
    /// Page description.
    pub description: String,
    /// Social preview image.
    pub image: String,
    /// Comma-separated keywords.
    pub keywords: String,
}

/// Resolve page metadata for a registry entry.
///
/// Registry values win over the frontmatter of a previously generated
/// page, which wins over defaults.
#[must_use]
pub fn resolve_metadata(
    entry: &RegistryEntry,
    existing: Option<&Frontmatter>,
    slug_prefix: &str,
) -> PageMetadata {
    let fallback = |field: fn(&Frontmatter) -> Option<&String>| {
        existing.and_then(field).cloned()
    };

    PageMetadata {
        title: entry
            .title
            .clone()
            .or_else(|| fallback(|f| f.title.as_ref()))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        slug: format!("{}/{}", slug_prefix.trim_end_matches('/'), entry.slug),
        description: entry
            .description
            .clone()
            .or_else(|| fallback(|f| f.description.as_ref()))
            .unwrap_or_default(),
        image: entry
            .image
            .clone()
            .or_else(|| fallback(|f| f.image.as_ref()))
            .unwrap_or_default(),
        keywords: entry
            .keywords_text()
            .or_else(|| fallback(|f| f.keywords.as_ref()))
            .unwrap_or_default(),
    }
}

/// Transform exported notebook Markdown into a page body.
///
/// - drops the first level-1 heading (the page title renders it)
/// - drops `<script>` elements
/// - inlines image resources as `data:` URIs
/// - turns Markdown images into `<img>` tags
#[must_use]
pub fn post_process(body: &str, resources: &ExportResources) -> String {
    let body = TITLE_RE.replace(body, "");
    let mut body = SCRIPT_RE.replace_all(&body, "").into_owned();

    for (name, image) in &resources.outputs {
        body = body.replace(name.as_str(), &image.data_uri());
    }

    IMAGE_RE
        .replace_all(&body, |caps: &Captures<'_>| {
            format!(
                "<img src=\"{}\" alt=\"{}\"/>",
                &caps[2],
                caps[1].replace('"', "&quot;")
            )
        })
        .into_owned()
}

/// Assemble a complete cookbook page.
///
/// `source_url` is the base URL the notebook path is appended to for the
/// "view source" link.
#[must_use]
pub fn render_cookbook_page(
    metadata: &PageMetadata,
    authors: &[ResolvedAuthor],
    notebook_path: &str,
    source_url: &str,
    body: &str,
) -> String {
    let mut sections = Vec::new();

    sections.push(render_frontmatter(&[
        ("title", metadata.title.as_str()),
        ("slug", metadata.slug.as_str()),
        ("description", metadata.description.as_str()),
        ("image", metadata.image.as_str()),
        ("keywords", metadata.keywords.as_str()),
    ]));
    sections.push(String::new());

    sections.push(
        "import { AuthorsContainer } from \"../../components/authors-container\";".to_string(),
    );
    sections.push(
        "import { CookbookHeader } from \"../../components/cookbook-header\";".to_string(),
    );
    sections.push(String::new());

    if !authors.is_empty() {
        let authors_json: Vec<_> = authors
            .iter()
            .map(|a| json!({ "name": a.name, "imgSrc": a.img }))
            .collect();
        let literal = serde_json::to_string_pretty(&authors_json).unwrap_or_default();
        sections.push(format!("<AuthorsContainer\n  authors={{{literal}}}\n/>"));
        sections.push(String::new());
    }

    sections.push(format!(
        "<CookbookHeader href=\"{}/{}\"/>",
        source_url.trim_end_matches('/'),
        notebook_path.trim_start_matches('/')
    ));
    sections.push(String::new());

    sections.push(body.trim().to_string());

    let mut page = sections.join("\n");
    page.push('\n');
    page
}
