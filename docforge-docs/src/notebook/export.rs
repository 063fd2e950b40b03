//! Notebook → Markdown export.
//!
//! Markdown and raw cells pass through unchanged. Code cells become fenced
//! blocks followed by their outputs:
//! - stream and `text/plain` output indented by four spaces
//! - `text/html` and `text/markdown` output inlined
//! - images referenced as `![png](output_<cell>_<n>.png)` with the payload
//!   kept in [`ExportResources`]
//! - tracebacks indented, with ANSI escapes stripped

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use super::{Cell, MimeBundle, Notebook, Output};
use crate::error::DocsError;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid regex"));

/// Rich output representations in order of preference.
const DISPLAY_PRIORITY: &[&str] = &[
    "text/html",
    "text/markdown",
    "image/png",
    "image/jpeg",
    "text/plain",
];

/// An image extracted from cell outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    /// Image mime type.
    pub mime: String,
    /// Base64 payload on a single line.
    pub data: String,
}

impl ImageResource {
    /// Renders the image as a `data:` URI.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }
}

/// Side products of an export.
#[derive(Debug, Clone, Default)]
pub struct ExportResources {
    /// Images keyed by the file name referenced from the Markdown.
    pub outputs: IndexMap<String, ImageResource>,
}

/// Exports a notebook to Markdown.
///
/// # Errors
///
/// Returns `DocsError::Notebook` if an image payload is not valid base64.
pub fn export_markdown(notebook: &Notebook) -> Result<(String, ExportResources), DocsError> {
    let language = notebook.language();
    let mut resources = ExportResources::default();
    let mut chunks = Vec::new();

    for (cell_index, cell) in notebook.cells.iter().enumerate() {
        match cell {
            Cell::Markdown { source } | Cell::Raw { source } => {
                chunks.push(source.text().trim_end().to_string());
            }
            Cell::Code { source, outputs } => {
                chunks.push(format!("```{language}\n{}\n```", source.text().trim_end()));
                for (output_index, output) in outputs.iter().enumerate() {
                    if let Some(rendered) =
                        render_output(output, cell_index, output_index, &mut resources)?
                    {
                        chunks.push(rendered);
                    }
                }
            }
        }
    }

    let mut markdown = chunks
        .into_iter()
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    markdown.push('\n');
    Ok((markdown, resources))
}

fn render_output(
    output: &Output,
    cell_index: usize,
    output_index: usize,
    resources: &mut ExportResources,
) -> Result<Option<String>, DocsError> {
    match output {
        Output::Stream { text, .. } => Ok(Some(indent(text.text().trim_end()))),
        Output::ExecuteResult { data } | Output::DisplayData { data } => {
            render_bundle(data, cell_index, output_index, resources)
        }
        Output::Error {
            ename,
            evalue,
            traceback,
        } => {
            let text = if traceback.is_empty() {
                format!("{ename}: {evalue}")
            } else {
                traceback.join("\n")
            };
            Ok(Some(indent(ANSI_ESCAPE.replace_all(&text, "").trim_end())))
        }
    }
}

fn render_bundle(
    data: &MimeBundle,
    cell_index: usize,
    output_index: usize,
    resources: &mut ExportResources,
) -> Result<Option<String>, DocsError> {
    let Some((mime, payload)) = DISPLAY_PRIORITY
        .iter()
        .find_map(|mime| data.get(*mime).map(|payload| (*mime, payload)))
    else {
        return Ok(None);
    };

    let text = bundle_text(payload);
    let rendered = match mime {
        "text/html" | "text/markdown" => text.trim().to_string(),
        "image/png" | "image/jpeg" => {
            let ext = if mime == "image/png" { "png" } else { "jpg" };
            let name = format!("output_{cell_index}_{output_index}.{ext}");
            let image = ImageResource {
                mime: mime.to_string(),
                data: normalize_base64(&text).map_err(|e| {
                    DocsError::Notebook(format!(
                        "cell {cell_index} output {output_index}: invalid {mime} payload: {e}"
                    ))
                })?,
            };
            resources.outputs.insert(name.clone(), image);
            format!("![{ext}]({name})")
        }
        _ => indent(text.trim_end()),
    };
    Ok(Some(rendered))
}

/// Payloads are either strings or lists of lines.
fn bundle_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        other => other.to_string(),
    }
}

/// Validates a base64 payload and re-encodes it without line breaks.
fn normalize_base64(raw: &str) -> Result<String, base64::DecodeError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(STANDARD.encode(bytes))
}

/// Indents non-blank lines by four spaces.
fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("    {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
