//! CLI argument definitions
//!
//! All Clap derive structs for `docforge` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Maintenance tooling for an MDX documentation corpus.
#[derive(Parser, Debug)]
#[command(name = "docforge", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "DOCFORGE_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "DOCFORGE_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Path to the project configuration (default: ./docforge.yaml if present).
    #[arg(short, long, global = true, env = "DOCFORGE_CONFIG")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reformat fenced code blocks in MDX pages.
    Format(FormatArgs),

    /// Publish registered notebooks as cookbook pages.
    BuildCookbooks(BuildCookbooksArgs),

    /// Check title and description lengths in page frontmatter.
    CheckFrontmatter(CheckFrontmatterArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for `format`.
#[derive(Args, Debug, Default)]
pub struct FormatArgs {
    /// Directory or single file to process (default: configured pages dir).
    pub path: Option<PathBuf>,

    /// Maximum line length passed to the formatter.
    #[arg(long)]
    pub line_length: Option<usize>,

    /// Fail if any file changed (also enabled by `CI=true`).
    #[arg(long)]
    pub check: bool,

    /// Formatter command line; `{line_length}` is substituted.
    #[arg(long)]
    pub formatter: Option<String>,

    /// Language tag of the blocks to reformat.
    #[arg(long)]
    pub language: Option<String>,

    /// Directory to skip, relative to PATH (repeatable, glob allowed).
    #[arg(long = "exclude", value_name = "DIR")]
    pub exclude: Vec<String>,

    /// Per-block formatter timeout (e.g. `30s`).
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Report format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `build-cookbooks`.
#[derive(Args, Debug, Default)]
pub struct BuildCookbooksArgs {
    /// Notebook registry file.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Author database file.
    #[arg(long)]
    pub authors: Option<PathBuf>,

    /// Output directory for generated pages.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Build only the entry with this slug.
    #[arg(long, value_name = "SLUG")]
    pub only: Option<String>,

    /// Report pages that would change and fail without writing.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for `check-frontmatter`.
#[derive(Args, Debug, Default)]
pub struct CheckFrontmatterArgs {
    /// Pages directory to check (default: configured pages dir).
    pub path: Option<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,

    /// Report format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}
