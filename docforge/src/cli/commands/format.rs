//! `format` command handler.

use serde_json::json;
use tracing::info;

use docforge_core::config::FormatterConfig;

use crate::cli::args::{FormatArgs, OutputFormat};
use crate::cli::commands::GlobalOptions;
use crate::config::load_config;
use crate::error::DocforgeError;
use crate::formatter::ExternalFormatter;
use crate::snippets::{FormatReport, Reformatter};
use crate::walk::WalkOptions;

/// Reformat code blocks under the requested path.
///
/// # Errors
///
/// Returns `DocforgeError::CheckFailed` in check mode when a file changed,
/// and other errors when configuration, I/O or the formatter fail.
pub async fn run(args: &FormatArgs, global: &GlobalOptions) -> Result<(), DocforgeError> {
    let loaded = load_config(global.config.as_deref())?;
    let settings = apply_overrides(&loaded.config.formatter, args)?;

    let root = args
        .path
        .clone()
        .unwrap_or_else(|| loaded.resolve(&loaded.config.pages_dir));
    let options = WalkOptions::new(&settings.file_pattern, &settings.exclude)?;

    let formatter = ExternalFormatter::from_config(&settings)?;
    info!(
        root = %root.display(),
        formatter = %settings.resolved_command(),
        language = %settings.language,
        "formatting code blocks"
    );

    let reformatter = Reformatter::from_config(&settings, Box::new(formatter))?;
    let report = reformatter.format_tree(&root, &options).await?;

    if !global.quiet || args.format == OutputFormat::Json {
        print_report(&report, args.format);
    }

    if (args.check || ci_enabled()) && !report.files_changed.is_empty() {
        let files = report
            .files_changed
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(DocforgeError::CheckFailed(format!(
            "{} file(s) were reformatted: {files}",
            report.files_changed.len()
        )));
    }

    Ok(())
}

/// Applies CLI flags on top of the configured formatter settings.
fn apply_overrides(
    config: &FormatterConfig,
    args: &FormatArgs,
) -> Result<FormatterConfig, DocforgeError> {
    let mut settings = config.clone();

    if let Some(line_length) = args.line_length {
        if line_length == 0 {
            return Err(DocforgeError::Usage(
                "--line-length must be greater than 0".to_string(),
            ));
        }
        settings.line_length = line_length;
    }
    if let Some(command) = &args.formatter {
        settings.command.clone_from(command);
    }
    if let Some(language) = &args.language {
        if language.trim().is_empty() {
            return Err(DocforgeError::Usage("--language must not be empty".to_string()));
        }
        settings.language.clone_from(language);
    }
    if let Some(timeout) = args.timeout {
        settings.timeout = timeout;
    }
    settings.exclude.extend(args.exclude.iter().cloned());

    Ok(settings)
}

/// Check mode is implied on CI runners.
fn ci_enabled() -> bool {
    std::env::var("CI").is_ok_and(|v| v.eq_ignore_ascii_case("true"))
}

fn print_report(report: &FormatReport, format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            for path in &report.files_changed {
                eprintln!("reformatted {}", path.display());
            }
            for failure in &report.failures {
                eprintln!(
                    "failed {}:{}: {}",
                    failure.path.display(),
                    failure.failure.line,
                    failure.failure.message
                );
            }
            eprintln!(
                "{} file(s) scanned, {} changed, {} block(s) formatted, {} block(s) failed",
                report.files_scanned,
                report.files_changed.len(),
                report.blocks_formatted,
                report.failures.len()
            );
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "files_scanned": report.files_scanned,
                    "files_changed": report.files_changed,
                    "blocks_formatted": report.blocks_formatted,
                    "failures": report.failures,
                })
            );
        }
    }
}
