//! External code formatter.
//!
//! Code is written to the formatter's stdin and the formatted code is read
//! from its stdout. The default command is `black --quiet --line-length N -`.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use docforge_core::config::FormatterConfig;

use crate::error::FormatterError;

/// Something that reformats a snippet of source code.
#[async_trait]
pub trait SnippetFormatter: Send + Sync {
    /// Returns the formatted version of `code`.
    ///
    /// # Errors
    ///
    /// Returns `FormatterError` if the code cannot be formatted.
    async fn format(&self, code: &str) -> Result<String, FormatterError>;
}

/// Formatter backed by a child process.
#[derive(Debug, Clone)]
pub struct ExternalFormatter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalFormatter {
    /// Builds a formatter from a shell-quoted command line.
    ///
    /// # Errors
    ///
    /// Returns `FormatterError::InvalidCommand` if the quoting is broken and
    /// `FormatterError::EmptyCommand` if no program is named.
    pub fn from_command_line(command: &str, timeout: Duration) -> Result<Self, FormatterError> {
        let mut words = shlex::split(command)
            .ok_or_else(|| FormatterError::InvalidCommand(command.to_string()))?
            .into_iter();
        let program = words.next().ok_or(FormatterError::EmptyCommand)?;

        Ok(Self {
            program,
            args: words.collect(),
            timeout,
        })
    }

    /// Builds a formatter from configuration, substituting the line length.
    ///
    /// # Errors
    ///
    /// See [`ExternalFormatter::from_command_line`].
    pub fn from_config(config: &FormatterConfig) -> Result<Self, FormatterError> {
        Self::from_command_line(&config.resolved_command(), config.timeout)
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Program arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl SnippetFormatter for ExternalFormatter {
    async fn format(&self, code: &str) -> Result<String, FormatterError> {
        debug!(program = %self.program, bytes = code.len(), "running formatter");

        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FormatterError::SpawnFailed {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        // Feed stdin while stdout drains so large snippets cannot fill both pipes.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(code.as_bytes()).await {
                    // The formatter may exit without reading all input; its status decides.
                    Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };
        let run = async { tokio::try_join!(feed, child.wait_with_output()) };

        let (_, output) = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| FormatterError::Timeout(self.timeout))??;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(FormatterError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        if !stderr.is_empty() {
            warn!(program = %self.program, stderr = %stderr, "formatter produced stderr output");
        }

        String::from_utf8(output.stdout).map_err(|_| FormatterError::InvalidOutput)
    }
}
