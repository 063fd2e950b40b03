//! Configuration validation
//!
//! Semantic checks on a parsed `ProjectConfig`. Validation collects every
//! issue rather than stopping at the first.

use docforge_core::config::{
    FormatterConfig, FrontmatterRules, LINE_LENGTH_PLACEHOLDER, ProjectConfig,
};

use crate::error::ValidationIssue;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    pub fn validate(&mut self, config: &ProjectConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_formatter(&config.formatter);
        self.validate_frontmatter(&config.frontmatter);

        if config.cookbooks.slug_prefix.is_empty() {
            self.warn("cookbooks.slug_prefix", "empty prefix publishes pages at the site root");
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_formatter(&mut self, formatter: &FormatterConfig) {
        if formatter.line_length == 0 {
            self.error("formatter.line_length", "must be greater than 0");
        }
        if formatter.command.trim().is_empty() {
            self.error("formatter.command", "must not be empty");
        } else if !formatter.command.contains(LINE_LENGTH_PLACEHOLDER) {
            self.warn(
                "formatter.command",
                &format!("does not contain {LINE_LENGTH_PLACEHOLDER}, line_length is ignored"),
            );
        }
        if formatter.language.trim().is_empty() {
            self.error("formatter.language", "must not be empty");
        }
        if formatter.timeout.is_zero() {
            self.error("formatter.timeout", "must be greater than 0");
        }
        if let Err(e) = glob::Pattern::new(&formatter.file_pattern) {
            self.error("formatter.file_pattern", &format!("invalid pattern: {e}"));
        }
        self.validate_patterns("formatter.exclude", &formatter.exclude);
    }

    fn validate_frontmatter(&mut self, rules: &FrontmatterRules) {
        if rules.description_min > rules.description_max {
            self.error(
                "frontmatter.description_min",
                &format!(
                    "{} is greater than description_max {}",
                    rules.description_min, rules.description_max
                ),
            );
        }
        if rules.title_min > rules.title_max {
            self.error(
                "frontmatter.title_min",
                &format!(
                    "{} is greater than title_max {}",
                    rules.title_min, rules.title_max
                ),
            );
        }
        self.validate_patterns("frontmatter.exclude", &rules.exclude);
    }

    fn validate_patterns(&mut self, path: &str, patterns: &[String]) {
        for (i, pattern) in patterns.iter().enumerate() {
            if let Err(e) = glob::Pattern::new(pattern) {
                self.error(&format!("{path}[{i}]"), &format!("invalid pattern: {e}"));
            }
        }
    }

    fn error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue::error(path, message));
    }

    fn warn(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue::warning(path, message));
    }
}
