//! YAML frontmatter parsing and generation for MDX pages.

use serde_yaml::{Mapping, Value};

use crate::error::DocsError;

/// Frontmatter fields docforge reads or writes.
///
/// Scalar values of other YAML types (numbers, booleans) are read as their
/// textual form. `keywords` given as a list are joined with `", "`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// Page title.
    pub title: Option<String>,
    /// Page description used for SEO.
    pub description: Option<String>,
    /// Published slug.
    pub slug: Option<String>,
    /// Social preview image.
    pub image: Option<String>,
    /// Comma-separated keywords.
    pub keywords: Option<String>,
    /// Hidden pages are not published.
    pub hidden: bool,
    /// The full parsed mapping, including keys not listed above.
    pub raw: Mapping,
}

/// Splits a leading `---` delimited block from `content`.
///
/// Returns the YAML text and the remaining body, or `None` if the document
/// has no frontmatter.
#[must_use]
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parses the frontmatter of an MDX document.
///
/// A document without frontmatter yields an empty `Frontmatter`.
///
/// # Errors
///
/// Returns `DocsError::Frontmatter` if the block is not a YAML mapping.
pub fn parse_frontmatter(content: &str) -> Result<Frontmatter, DocsError> {
    let Some((yaml, _)) = split_frontmatter(content) else {
        return Ok(Frontmatter::default());
    };
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    let raw = match serde_yaml::from_str::<Value>(yaml)
        .map_err(|e| DocsError::Frontmatter(e.to_string()))?
    {
        Value::Mapping(map) => map,
        Value::Null => Mapping::new(),
        other => {
            return Err(DocsError::Frontmatter(format!(
                "expected a mapping, found {}",
                type_name(&other)
            )));
        }
    };

    Ok(Frontmatter {
        title: text_field(&raw, "title"),
        description: text_field(&raw, "description"),
        slug: text_field(&raw, "slug"),
        image: text_field(&raw, "image"),
        keywords: keywords_field(&raw),
        hidden: matches!(raw.get("hidden"), Some(Value::Bool(true)))
            || matches!(raw.get("hidden"), Some(Value::String(s)) if s == "true"),
        raw,
    })
}

fn text_field(map: &Mapping, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn keywords_field(map: &Mapping) -> Option<String> {
    match map.get("keywords")? {
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => text_field(map, "keywords"),
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Generates a YAML frontmatter block from ordered key/value pairs.
#[must_use]
pub fn render_frontmatter(fields: &[(&str, &str)]) -> String {
    let mut lines = Vec::with_capacity(fields.len() + 2);
    lines.push("---".to_string());
    for (key, value) in fields {
        lines.push(format!("{key}: {}", quote_yaml_string(value)));
    }
    lines.push("---".to_string());
    lines.join("\n")
}

/// Quote a YAML string value if it would not read back as the same string.
fn quote_yaml_string(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.contains(": ")
        || s.contains(" #")
        || s.contains('"')
        || s.contains('\n')
        || s.ends_with(':')
        || s.starts_with(|c: char| c.is_whitespace() || "-?:,[]{}#&*!|>'\"%@`".contains(c))
        || s.ends_with(char::is_whitespace)
        || looks_like_non_string(s);

    if needs_quotes {
        let escaped = s
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        format!("\"{escaped}\"")
    } else {
        s.to_string()
    }
}

fn looks_like_non_string(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "null" | "~"
    ) || s.parse::<f64>().is_ok()
}
