//! Frontmatter validation for published pages.
//!
//! Checks that each page carries a title and a description whose lengths
//! suit search-engine snippets, and detects pages claiming the same slug.

use std::collections::HashMap;
use std::path::Path;

use docforge_core::config::FrontmatterRules;
use docforge_core::error::ValidationIssue;

use crate::mdx::frontmatter::Frontmatter;

/// Validate a single page's frontmatter.
///
/// `rel_path` is the page path relative to the pages root; layout pages are
/// recognized only at that root. Returns the issues found; an empty list
/// means valid. Length problems with the title are warnings, every other
/// problem is an error.
#[must_use]
pub fn validate_page(
    rel_path: &Path,
    frontmatter: &Frontmatter,
    rules: &FrontmatterRules,
) -> Vec<ValidationIssue> {
    let path_str = rel_path.display().to_string();
    let mut issues = Vec::new();

    match frontmatter.description.as_deref() {
        None | Some("") => {
            issues.push(ValidationIssue::error(&path_str, "missing a description"));
        }
        Some(description) => {
            let len = description.chars().count();
            if len < rules.description_min || len > rules.description_max {
                issues.push(ValidationIssue::error(
                    &path_str,
                    format!(
                        "invalid description length: {len} characters, expected {}-{}",
                        rules.description_min, rules.description_max
                    ),
                ));
            }
        }
    }

    match frontmatter.title.as_deref() {
        None | Some("") => {
            if !is_layout_page(rel_path, rules) {
                issues.push(ValidationIssue::error(&path_str, "missing a title"));
            }
        }
        Some(title) => {
            let len = title.chars().count();
            if len < rules.title_min || len > rules.title_max {
                issues.push(ValidationIssue::warning(
                    &path_str,
                    format!(
                        "invalid title length: {len} characters, expected {}-{}",
                        rules.title_min, rules.title_max
                    ),
                ));
            }
        }
    }

    issues
}

fn is_layout_page(rel_path: &Path, rules: &FrontmatterRules) -> bool {
    rules
        .layout_pages
        .iter()
        .any(|layout| rel_path == Path::new(layout))
}

/// Detect pages that declare the same slug.
///
/// Pages without a slug are ignored.
#[must_use]
pub fn detect_duplicate_slugs(pages: &[(String, Frontmatter)]) -> Vec<ValidationIssue> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    let mut issues = Vec::new();

    for (path, frontmatter) in pages {
        let Some(slug) = frontmatter.slug.as_deref() else {
            continue;
        };
        if let Some(first_path) = seen.get(slug) {
            issues.push(ValidationIssue::error(
                path,
                format!("duplicate slug \"{slug}\", first seen in {first_path}"),
            ));
        } else {
            seen.insert(slug, path);
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_core::error::Severity;

    fn page(title: Option<&str>, description: Option<&str>) -> Frontmatter {
        Frontmatter {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            ..Frontmatter::default()
        }
    }

    const GOOD_TITLE: &str = "Retrieval Augmented Generation (RAG)";
    const GOOD_DESCRIPTION: &str =
        "This page describes how to build retrieval augmented generation apps with Cohere models.";

    #[test]
    fn test_valid_page() {
        let issues = validate_page(
            Path::new("text-generation/rag.mdx"),
            &page(Some(GOOD_TITLE), Some(GOOD_DESCRIPTION)),
            &FrontmatterRules::default(),
        );
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_missing_description_is_error() {
        let issues = validate_page(
            Path::new("a.mdx"),
            &page(Some(GOOD_TITLE), None),
            &FrontmatterRules::default(),
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("description"));
    }

    #[test]
    fn test_short_description_is_error() {
        let issues = validate_page(
            Path::new("a.mdx"),
            &page(Some(GOOD_TITLE), Some("Too short.")),
            &FrontmatterRules::default(),
        );
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert!(issues[0].message.contains("10 characters"));
    }

    #[test]
    fn test_long_description_is_error() {
        let long = "x".repeat(161);
        let issues = validate_page(
            Path::new("a.mdx"),
            &page(Some(GOOD_TITLE), Some(&long)),
            &FrontmatterRules::default(),
        );
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_description_bounds_inclusive() {
        let rules = FrontmatterRules::default();
        for len in [50, 160] {
            let text = "d".repeat(len);
            let issues = validate_page(Path::new("a.mdx"), &page(Some(GOOD_TITLE), Some(&text)), &rules);
            assert!(issues.is_empty(), "length {len} should be valid");
        }
    }

    #[test]
    fn test_description_counts_characters_not_bytes() {
        let text = "é".repeat(60);
        let issues = validate_page(
            Path::new("a.mdx"),
            &page(Some(GOOD_TITLE), Some(&text)),
            &FrontmatterRules::default(),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_title_length_is_warning() {
        let issues = validate_page(
            Path::new("a.mdx"),
            &page(Some("Short"), Some(GOOD_DESCRIPTION)),
            &FrontmatterRules::default(),
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_missing_title_is_error() {
        let issues = validate_page(
            Path::new("guides/index.mdx"),
            &page(None, Some(GOOD_DESCRIPTION)),
            &FrontmatterRules::default(),
        );
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_root_layout_page_needs_no_title() {
        let issues = validate_page(
            Path::new("cookbooks.mdx"),
            &page(None, Some(GOOD_DESCRIPTION)),
            &FrontmatterRules::default(),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_duplicate_slugs() {
        let mut first = page(Some(GOOD_TITLE), Some(GOOD_DESCRIPTION));
        first.slug = Some("/page/rag".to_string());
        let second = first.clone();
        let mut third = first.clone();
        third.slug = None;

        let issues = detect_duplicate_slugs(&[
            ("a.mdx".to_string(), first),
            ("b.mdx".to_string(), second),
            ("c.mdx".to_string(), third),
        ]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "b.mdx");
        assert!(issues[0].message.contains("first seen in a.mdx"));
    }
}
