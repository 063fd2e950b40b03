//! Shell-magic line protection.
//!
//! Notebook-style snippets contain lines such as `!pip install cohere` or
//! `%matplotlib inline` that are not valid Python. Before a block goes to
//! the formatter each such line is swapped for a numbered placeholder
//! comment; afterwards the placeholders are swapped back for the original
//! lines, byte-for-byte. The placeholder prefix is chosen so that it does
//! not already occur in the block.

use crate::error::MagicError;

/// Comment text that stands in for a protected line.
pub const PLACEHOLDER_PREFIX: &str = "# DOCFORGE_MAGIC ";

const PLACEHOLDER_TAG: &str = "# DOCFORGE_MAGIC";

/// Code with its shell-magic lines replaced by placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedCode {
    /// Code handed to the formatter.
    pub code: String,
    /// Original magic lines, indexed by placeholder number.
    pub lines: Vec<String>,
    /// Prefix the placeholders were written with.
    pub prefix: String,
}

impl ProtectedCode {
    /// Returns `true` if no line needed protecting.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Returns `true` if `line` starts (after indentation) with one of `markers`.
#[must_use]
pub fn is_magic_line(line: &str, markers: &[String]) -> bool {
    let trimmed = line.trim_start();
    markers
        .iter()
        .any(|marker| !marker.is_empty() && trimmed.starts_with(marker.as_str()))
}

/// Replaces each magic line with an indented placeholder comment.
#[must_use]
pub fn protect(code: &str, markers: &[String]) -> ProtectedCode {
    let prefix = unused_prefix(code);
    let mut lines = Vec::new();
    let protected: Vec<String> = code
        .split('\n')
        .map(|line| {
            if is_magic_line(line, markers) {
                let indent = &line[..line.len() - line.trim_start().len()];
                let placeholder = format!("{indent}{prefix}{}", lines.len());
                lines.push(line.to_string());
                placeholder
            } else {
                line.to_string()
            }
        })
        .collect();

    ProtectedCode {
        code: protected.join("\n"),
        lines,
        prefix,
    }
}

/// Returns `PLACEHOLDER_PREFIX`, or a numbered variant of it when the code
/// already contains that text.
fn unused_prefix(code: &str) -> String {
    if !code.contains(PLACEHOLDER_PREFIX) {
        return PLACEHOLDER_PREFIX.to_string();
    }
    (1..)
        .map(|n| format!("{PLACEHOLDER_TAG}_{n} "))
        .find(|candidate| !code.contains(candidate.as_str()))
        .unwrap_or_else(|| PLACEHOLDER_PREFIX.to_string())
}

/// Puts the original magic lines back in place of their placeholders.
///
/// The formatter may re-indent a placeholder; the original line replaces
/// the whole placeholder line regardless.
///
/// # Errors
///
/// Returns `MagicError` if a placeholder is unknown, duplicated, or missing
/// from `formatted`.
pub fn restore(formatted: &str, protected: &ProtectedCode) -> Result<String, MagicError> {
    if protected.is_untouched() {
        return Ok(formatted.to_string());
    }

    let mut seen = vec![false; protected.lines.len()];
    let mut out = Vec::new();

    for line in formatted.split('\n') {
        match placeholder_index(line, &protected.prefix) {
            Some(index) => {
                let original = protected
                    .lines
                    .get(index)
                    .ok_or(MagicError::UnknownPlaceholder(index))?;
                if std::mem::replace(&mut seen[index], true) {
                    return Err(MagicError::DuplicatePlaceholder(index));
                }
                out.push(original.as_str());
            }
            None => out.push(line),
        }
    }

    let missing: Vec<usize> = seen
        .iter()
        .enumerate()
        .filter(|(_, found)| !**found)
        .map(|(index, _)| index)
        .collect();
    if !missing.is_empty() {
        return Err(MagicError::MissingPlaceholders(missing));
    }

    Ok(out.join("\n"))
}

fn placeholder_index(line: &str, prefix: &str) -> Option<usize> {
    line.trim()
        .strip_prefix(prefix)
        .and_then(|rest| rest.parse().ok())
}
