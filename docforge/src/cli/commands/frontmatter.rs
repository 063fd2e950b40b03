//! `check-frontmatter` command handler.
//!
//! Every page under the pages directory (minus excluded folders) must carry
//! a description of acceptable length and, layout pages aside, a title.
//! Title length problems are warnings unless `--strict` is given. Pages
//! marked `hidden: true` are skipped.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use docforge_core::config::FrontmatterRules;
use docforge_docs::mdx::frontmatter::{Frontmatter, parse_frontmatter};
use docforge_docs::validate::{detect_duplicate_slugs, validate_page};

use crate::cli::args::{CheckFrontmatterArgs, OutputFormat};
use crate::cli::commands::GlobalOptions;
use crate::config::load_config;
use crate::error::{DocforgeError, Severity, ValidationIssue};
use crate::walk::{WalkOptions, discover};

/// Outcome of checking a pages directory.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// Pages checked (hidden pages excluded).
    pub checked: usize,
    /// Pages skipped because they are hidden.
    pub hidden: usize,
    /// Pages with at least one error.
    pub invalid: Vec<PageReport>,
    /// Pages with warnings only.
    pub warned: Vec<PageReport>,
}

impl CheckReport {
    /// Pages without errors.
    #[must_use]
    pub fn valid(&self) -> usize {
        self.checked - self.invalid.len()
    }
}

/// Issues found on one page.
#[derive(Debug, Serialize)]
pub struct PageReport {
    /// Path relative to the pages directory.
    pub path: String,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
}

/// Check frontmatter of every page.
///
/// # Errors
///
/// Returns `DocforgeError::CheckFailed` if any page is invalid, and other
/// errors when configuration or I/O fail.
pub fn run(args: &CheckFrontmatterArgs, global: &GlobalOptions) -> Result<(), DocforgeError> {
    let loaded = load_config(global.config.as_deref())?;
    let pages_root = loaded.resolve(&loaded.config.pages_dir);
    let root = args.path.clone().unwrap_or_else(|| pages_root.clone());
    let options = WalkOptions::new(
        &loaded.config.formatter.file_pattern,
        &loaded.config.frontmatter.exclude,
    )?;

    info!(root = %root.display(), "checking frontmatter");
    let report = check_pages(
        &root,
        &pages_root,
        &options,
        &loaded.config.frontmatter,
        args.strict,
    )?;

    if !global.quiet || args.format == OutputFormat::Json {
        print_report(&report, args.format)?;
    }

    if report.invalid.is_empty() {
        Ok(())
    } else {
        Err(DocforgeError::CheckFailed(format!(
            "{} of {} page(s) have invalid frontmatter",
            report.invalid.len(),
            report.checked
        )))
    }
}

/// Checks every page under `root`.
///
/// Page paths are reported relative to `pages_root` when they lie beneath
/// it, so layout pages are only recognized at the real pages root even
/// when `root` is a sub-directory or a single file.
///
/// # Errors
///
/// Returns `DocforgeError` if `root` is invalid or a page cannot be read.
pub fn check_pages(
    root: &Path,
    pages_root: &Path,
    options: &WalkOptions,
    rules: &FrontmatterRules,
    strict: bool,
) -> Result<CheckReport, DocforgeError> {
    let mut report = CheckReport::default();
    let mut issues: Vec<(String, Vec<ValidationIssue>)> = Vec::new();
    let mut pages: Vec<(String, Frontmatter)> = Vec::new();

    let canonical_pages_root = std::fs::canonicalize(pages_root).ok();
    for path in discover(root, options)? {
        let relative = relative_path(canonical_pages_root.as_deref(), root, &path);
        let shown = relative.to_string_lossy().replace('\\', "/");
        let content =
            std::fs::read_to_string(&path).map_err(|e| DocforgeError::io_at(&path, &e))?;

        let page_issues = match parse_frontmatter(&content) {
            Ok(frontmatter) if frontmatter.hidden => {
                debug!(path = %shown, "skipping hidden page");
                report.hidden += 1;
                continue;
            }
            Ok(frontmatter) => {
                let page_issues = validate_page(&relative, &frontmatter, rules);
                pages.push((shown.clone(), frontmatter));
                page_issues
            }
            Err(e) => vec![ValidationIssue::error(&shown, e.to_string())],
        };

        report.checked += 1;
        issues.push((shown, page_issues));
    }

    for duplicate in detect_duplicate_slugs(&pages) {
        if let Some((_, page_issues)) = issues.iter_mut().find(|(p, _)| *p == duplicate.path) {
            page_issues.push(duplicate);
        }
    }

    for (path, page_issues) in issues {
        let (mut errors, mut warnings) = (Vec::new(), Vec::new());
        for issue in page_issues {
            match issue.severity {
                Severity::Warning if !strict => warnings.push(issue.message),
                _ => errors.push(issue.message),
            }
        }
        let page = PageReport {
            path,
            errors,
            warnings,
        };
        if !page.errors.is_empty() {
            report.invalid.push(page);
        } else if !page.warnings.is_empty() {
            report.warned.push(page);
        }
    }

    Ok(report)
}

/// Path of a page relative to the pages root, falling back to the walked
/// directory and then to the path as given.
fn relative_path(pages_root: Option<&Path>, root: &Path, path: &Path) -> PathBuf {
    let beneath = |base: &Path, path: &Path| {
        path.strip_prefix(base)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    };

    pages_root
        .zip(std::fs::canonicalize(path).ok())
        .and_then(|(base, full)| beneath(base, &full))
        .or_else(|| root.is_dir().then(|| beneath(root, path)).flatten())
        .unwrap_or_else(|| path.to_path_buf())
}

fn print_report(report: &CheckReport, format: OutputFormat) -> Result<(), DocforgeError> {
    match format {
        OutputFormat::Human => {
            for page in &report.warned {
                for warning in &page.warnings {
                    eprintln!("warning: {}: {warning}", page.path);
                }
            }
            for page in &report.invalid {
                for error in &page.errors {
                    eprintln!("error: {}: {error}", page.path);
                }
                for warning in &page.warnings {
                    eprintln!("warning: {}: {warning}", page.path);
                }
            }
            eprintln!(
                "{} page(s) checked, {} valid, {} invalid, {} hidden",
                report.checked,
                report.valid(),
                report.invalid.len(),
                report.hidden
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GOOD_DESCRIPTION: &str =
        "A walkthrough of retrieval-augmented generation with the Chat API.";
    const GOOD_TITLE: &str = "Retrieval-Augmented Generation Basics";

    fn page(title: Option<&str>, description: Option<&str>, extra: &str) -> String {
        let mut out = String::from("---\n");
        if let Some(t) = title {
            out.push_str(&format!("title: {t}\n"));
        }
        if let Some(d) = description {
            out.push_str(&format!("description: {d}\n"));
        }
        out.push_str(extra);
        out.push_str("---\n\nBody\n");
        out
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn check(root: &Path, strict: bool) -> CheckReport {
        let options = WalkOptions::new(
            "*.mdx",
            &["-ARCHIVE-".to_string(), "api-reference".to_string()],
        )
        .unwrap();
        check_pages(root, root, &options, &FrontmatterRules::default(), strict).unwrap()
    }

    #[test]
    fn test_report_classifies_pages() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "good.mdx", &page(Some(GOOD_TITLE), Some(GOOD_DESCRIPTION), ""));
        write(root, "short-title.mdx", &page(Some("RAG"), Some(GOOD_DESCRIPTION), ""));
        write(root, "guides/no-description.mdx", &page(Some(GOOD_TITLE), None, ""));
        write(root, "index.mdx", &page(None, Some(GOOD_DESCRIPTION), ""));
        write(root, "hidden.mdx", &page(None, None, "hidden: true\n"));
        write(root, "-ARCHIVE-/old.mdx", &page(None, None, ""));
        write(root, "api-reference/chat.mdx", &page(None, None, ""));

        let report = check(root, false);
        assert_eq!(report.checked, 4);
        assert_eq!(report.hidden, 1);
        assert_eq!(report.valid(), 3);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].path, "guides/no-description.mdx");
        assert_eq!(report.warned.len(), 1);
        assert_eq!(report.warned[0].path, "short-title.mdx");
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.mdx", &page(Some("RAG"), Some(GOOD_DESCRIPTION), ""));
        let report = check(dir.path(), true);
        assert_eq!(report.invalid.len(), 1);
        assert!(report.warned.is_empty());
    }

    #[test]
    fn test_nested_layout_page_needs_title() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "guides/index.mdx", &page(None, Some(GOOD_DESCRIPTION), ""));
        let report = check(dir.path(), false);
        assert_eq!(report.invalid.len(), 1);
        assert!(report.invalid[0].errors[0].contains("title"));
    }

    #[test]
    fn test_nested_layout_page_passed_directly_needs_title() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "guides/index.mdx", &page(None, Some(GOOD_DESCRIPTION), ""));
        write(root, "index.mdx", &page(None, Some(GOOD_DESCRIPTION), ""));
        let options = WalkOptions::new("*.mdx", &[]).unwrap();
        let rules = FrontmatterRules::default();

        let nested = root.join("guides/index.mdx");
        let report = check_pages(&nested, root, &options, &rules, false).unwrap();
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].path, "guides/index.mdx");

        let report = check_pages(&root.join("guides"), root, &options, &rules, false).unwrap();
        assert_eq!(report.invalid.len(), 1);

        let report = check_pages(&root.join("index.mdx"), root, &options, &rules, false).unwrap();
        assert!(report.invalid.is_empty());
    }

    #[test]
    fn test_malformed_frontmatter_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.mdx", "---\n- just\n- a list\n---\n");
        let report = check(dir.path(), false);
        assert_eq!(report.invalid.len(), 1);
        assert!(report.invalid[0].errors[0].contains("frontmatter"));
    }

    #[test]
    fn test_duplicate_slugs_reported() {
        let dir = tempfile::tempdir().unwrap();
        let extra = "slug: /page/rag\n";
        write(dir.path(), "a.mdx", &page(Some(GOOD_TITLE), Some(GOOD_DESCRIPTION), extra));
        write(dir.path(), "b.mdx", &page(Some(GOOD_TITLE), Some(GOOD_DESCRIPTION), extra));
        let report = check(dir.path(), false);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].path, "b.mdx");
        assert!(report.invalid[0].errors[0].contains("duplicate slug"));
    }
}
