//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod cookbooks;
pub mod format;
pub mod frontmatter;
pub mod version;

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands};
use crate::error::DocforgeError;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), DocforgeError> {
    let global = GlobalOptions {
        config: cli.config,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Format(args) => format::run(&args, &global).await,
        Commands::BuildCookbooks(args) => cookbooks::run(&args, &global),
        Commands::CheckFrontmatter(args) => frontmatter::run(&args, &global),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
