//! `build-cookbooks` command handler.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use docforge_core::config::CookbookConfig;
use docforge_docs::cookbook::registry::{RegistryEntry, validate_registry};
use docforge_docs::cookbook::{AuthorDb, build_page, parse_authors, parse_registry};

use crate::cli::args::BuildCookbooksArgs;
use crate::cli::commands::GlobalOptions;
use crate::config::load_config;
use crate::error::DocforgeError;

/// Outcome of a cookbook build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Entries rendered.
    pub built: usize,
    /// Pages whose content changed (written, or would be in check mode).
    pub changed: Vec<PathBuf>,
    /// Entries skipped because `publish` is false.
    pub unpublished: usize,
}

/// Where cookbook inputs are read from and pages written to.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// Registry file.
    pub registry: PathBuf,
    /// Author database file.
    pub authors: PathBuf,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Directory registry notebook paths are relative to.
    pub notebook_root: PathBuf,
    /// Page rendering settings.
    pub config: CookbookConfig,
}

/// Build cookbook pages from the notebook registry.
///
/// # Errors
///
/// Returns `DocforgeError::CheckFailed` in check mode when a page would
/// change, `DocforgeError::Usage` for an unknown `--only` slug, and other
/// errors when inputs cannot be read or parsed.
pub fn run(args: &BuildCookbooksArgs, global: &GlobalOptions) -> Result<(), DocforgeError> {
    let loaded = load_config(global.config.as_deref())?;
    let cookbooks = &loaded.config.cookbooks;

    let plan = BuildPlan {
        registry: args
            .registry
            .clone()
            .unwrap_or_else(|| loaded.resolve(&cookbooks.registry)),
        authors: args
            .authors
            .clone()
            .unwrap_or_else(|| loaded.resolve(&cookbooks.authors)),
        output_dir: args
            .output
            .clone()
            .unwrap_or_else(|| loaded.resolve(&cookbooks.output_dir)),
        notebook_root: loaded.base_dir.clone(),
        config: cookbooks.clone(),
    };

    let report = build_cookbooks(&plan, args.only.as_deref(), args.check)?;

    if !global.quiet {
        let verb = if args.check { "would change" } else { "written" };
        for path in &report.changed {
            eprintln!("{verb}: {}", path.display());
        }
        eprintln!(
            "{} page(s) built, {} {verb}, {} unpublished",
            report.built,
            report.changed.len(),
            report.unpublished
        );
    }

    if args.check && !report.changed.is_empty() {
        return Err(DocforgeError::CheckFailed(format!(
            "{} cookbook page(s) are out of date",
            report.changed.len()
        )));
    }

    Ok(())
}

/// Renders every selected registry entry.
///
/// With `check` set nothing is written; changed pages are only reported.
///
/// # Errors
///
/// Returns `DocforgeError::MissingNotebooks` listing every selected
/// notebook absent from disk, before any page is written. Other errors
/// mean an input cannot be read or parsed, a page cannot be written, or
/// `only` names no registry entry.
pub fn build_cookbooks(
    plan: &BuildPlan,
    only: Option<&str>,
    check: bool,
) -> Result<BuildReport, DocforgeError> {
    let entries = parse_registry(&read(&plan.registry)?)?;
    let authors = parse_authors(&read(&plan.authors)?)?;

    let selected = select_entries(&entries, only)?;

    let validation = validate_registry(&entries, &plan.notebook_root);
    for slug in &validation.duplicate_slugs {
        warn!(slug = %slug, "slug used by more than one registry entry");
    }
    let missing: Vec<_> = validation
        .missing_notebooks
        .into_iter()
        .filter(|path| selected.iter().any(|e| e.publish && e.path == *path))
        .collect();
    if !missing.is_empty() {
        return Err(DocforgeError::MissingNotebooks(missing));
    }

    let mut report = BuildReport {
        unpublished: selected.iter().filter(|e| !e.publish).count(),
        ..BuildReport::default()
    };

    for entry in selected.into_iter().filter(|e| e.publish) {
        let output = plan.output_dir.join(format!("{}.mdx", entry.slug));
        if build_entry(plan, entry, &authors, &output, check)? {
            report.changed.push(output);
        }
        report.built += 1;
    }

    info!(built = report.built, changed = report.changed.len(), "cookbook build finished");
    Ok(report)
}

/// Renders one entry, returning whether the page content changed.
fn build_entry(
    plan: &BuildPlan,
    entry: &RegistryEntry,
    authors: &AuthorDb,
    output: &Path,
    check: bool,
) -> Result<bool, DocforgeError> {
    let notebook_path = plan.notebook_root.join(&entry.path);
    debug!(slug = %entry.slug, notebook = %notebook_path.display(), "building cookbook");

    let notebook = read(&notebook_path)?;
    let existing = if output.is_file() {
        Some(read(output)?)
    } else {
        None
    };

    let page = build_page(entry, &notebook, existing.as_deref(), authors, &plan.config).map_err(
        |source| DocforgeError::Document {
            path: notebook_path.clone(),
            source,
        },
    )?;

    for unknown in &page.unknown_authors {
        match &unknown.suggestion {
            Some(suggestion) => warn!(
                slug = %entry.slug,
                email = %unknown.email,
                "unknown author, did you mean '{suggestion}'?"
            ),
            None => warn!(slug = %entry.slug, email = %unknown.email, "unknown author"),
        }
    }

    if existing.as_deref() == Some(page.content.as_str()) {
        debug!(path = %output.display(), "unchanged");
        return Ok(false);
    }

    if !check {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocforgeError::io_at(parent, &e))?;
        }
        std::fs::write(output, &page.content).map_err(|e| DocforgeError::io_at(output, &e))?;
        info!(path = %output.display(), "wrote cookbook page");
    }

    Ok(true)
}

fn select_entries<'a>(
    entries: &'a [RegistryEntry],
    only: Option<&str>,
) -> Result<Vec<&'a RegistryEntry>, DocforgeError> {
    let Some(slug) = only else {
        return Ok(entries.iter().collect());
    };

    let selected: Vec<_> = entries.iter().filter(|e| e.slug == slug).collect();
    if selected.is_empty() {
        let hint = entries
            .iter()
            .map(|e| (e.slug.as_str(), strsim::jaro_winkler(slug, &e.slug)))
            .filter(|(_, score)| *score > 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, _)| format!(", did you mean '{s}'?"))
            .unwrap_or_default();
        return Err(DocforgeError::Usage(format!(
            "no registry entry with slug '{slug}'{hint}"
        )));
    }
    Ok(selected)
}

fn read(path: &Path) -> Result<String, DocforgeError> {
    std::fs::read_to_string(path).map_err(|e| DocforgeError::io_at(path, &e))
}
