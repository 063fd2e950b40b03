//! Configuration loader
//!
//! Loading runs in four stages:
//! 1. Environment variable expansion (pre-parse, on raw text)
//! 2. YAML parsing into `ProjectConfig`
//! 3. Validation
//! 4. Relative paths resolved against the config file's directory

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use docforge_core::config::ProjectConfig;

use crate::config::validation::Validator;
use crate::error::ConfigError;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "docforge.yaml";

// ============================================================================
// Public API
// ============================================================================

/// A validated configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The configuration.
    pub config: ProjectConfig,
    /// File it was read from, `None` for built-in defaults.
    pub source: Option<PathBuf>,
    /// Directory relative paths are resolved against.
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    /// Built-in defaults rooted at the working directory.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            config: ProjectConfig::default(),
            source: None,
            base_dir: PathBuf::from("."),
        }
    }

    /// Resolves a configured path against the config file's directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Loads the project configuration.
///
/// An explicit path must exist. Without one, `docforge.yaml` in the working
/// directory is used if present, and the defaults otherwise.
///
/// # Errors
///
/// Returns `ConfigError` if the file is missing (explicit path only),
/// unreadable, malformed, references an unset environment variable, or
/// fails validation.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    match explicit {
        Some(path) => load_config_from(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                load_config_from(path)
            } else {
                debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                Ok(LoadedConfig::defaults())
            }
        }
    }
}

/// Loads and validates the configuration at `path`.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from(path: &Path) -> Result<LoadedConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: None,
        message: e.to_string(),
    })?;
    let config = parse_config(&raw, path)?;

    debug!(path = %path.display(), "loaded configuration");

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    Ok(LoadedConfig {
        config,
        source: Some(path.to_path_buf()),
        base_dir,
    })
}

/// Parses and validates configuration text read from `path`.
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(raw: &str, path: &Path) -> Result<ProjectConfig, ConfigError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    // Stage 1: environment expansion
    let substituted = EnvSubstitution::new(path).substitute(raw)?;

    // Stage 2: YAML parsing
    let config = ProjectConfig::from_yaml(&substituted).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;

    // Stage 3: validation
    let result = Validator::new().validate(&config);
    for issue in &result.warnings {
        warn!(path = %issue.path, "{}", issue.message);
    }
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: path.display().to_string(),
            errors: result.errors,
        });
    }

    Ok(config)
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Expands environment variable references in raw configuration text.
struct EnvSubstitution<'a> {
    source_path: &'a Path,
}

impl<'a> EnvSubstitution<'a> {
    const fn new(source_path: &'a Path) -> Self {
        Self { source_path }
    }

    /// Substitutes environment variables in raw YAML text.
    ///
    /// Supports:
    /// - `${VAR}` - expand to value, error if unset
    /// - `${VAR:-default}` - expand to default if unset
    /// - `$$` - literal `$`
    fn substitute(&self, raw: &str) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();
        let mut line = 1usize;

        while let Some(c) = chars.next() {
            if c == '\n' {
                line += 1;
            }
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let (var_name, default) = self.parse_var_spec(&mut chars, line)?;
                    match (std::env::var(&var_name), default) {
                        (Ok(value), _) => result.push_str(&value),
                        (Err(_), Some(default)) => result.push_str(&default),
                        (Err(_), None) => {
                            return Err(ConfigError::EnvVarNotSet {
                                var: var_name,
                                location: format!("{} line {line}", self.source_path.display()),
                            });
                        }
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    /// Parses the inside of `${...}`, returning the name and optional default.
    fn parse_var_spec(
        &self,
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
        line: usize,
    ) -> Result<(String, Option<String>), ConfigError> {
        let mut var_name = String::new();

        while let Some(c) = chars.next() {
            match c {
                '}' => return Ok((self.checked_name(var_name, line)?, None)),
                ':' if chars.peek() == Some(&'-') => {
                    chars.next();
                    let default = self.read_until_close(chars, line)?;
                    return Ok((self.checked_name(var_name, line)?, Some(default)));
                }
                _ => var_name.push(c),
            }
        }

        Err(self.unclosed(&var_name, line))
    }

    /// Reads content until the closing `}`, handling nested braces.
    fn read_until_close(
        &self,
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
        line: usize,
    ) -> Result<String, ConfigError> {
        let mut value = String::new();
        let mut depth = 1;

        for c in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(c);
        }

        Err(self.unclosed(&value, line))
    }

    fn checked_name(&self, name: String, line: usize) -> Result<String, ConfigError> {
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(name)
        } else {
            Err(ConfigError::ParseError {
                path: self.source_path.to_path_buf(),
                line: Some(line),
                message: format!("invalid environment variable name '{name}'"),
            })
        }
    }

    fn unclosed(&self, fragment: &str, line: usize) -> ConfigError {
        ConfigError::ParseError {
            path: self.source_path.to_path_buf(),
            line: Some(line),
            message: format!("unclosed environment variable reference: ${{{fragment}"),
        }
    }
}
