//! Fenced code block discovery.
//!
//! A block is an opening fence of three backticks immediately followed by
//! the language tag and a newline, the body, a newline, and a closing fence.
//! The body match is non-greedy, so the first closing fence ends the block.

use std::ops::Range;

use regex::Regex;

use crate::error::DocsError;

/// A fenced code block located inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Byte span of the whole block, fences included.
    pub span: Range<usize>,
    /// Byte span of the body between the fences.
    pub body: Range<usize>,
    /// 1-based line number of the opening fence.
    pub line: usize,
}

impl CodeBlock {
    /// Returns the block body as a slice of `content`.
    #[must_use]
    pub fn body<'a>(&self, content: &'a str) -> &'a str {
        &content[self.body.clone()]
    }

    /// Returns the whole block, fences included, as a slice of `content`.
    #[must_use]
    pub fn text<'a>(&self, content: &'a str) -> &'a str {
        &content[self.span.clone()]
    }
}

/// Finds fenced code blocks for a single language.
#[derive(Debug, Clone)]
pub struct CodeBlockScanner {
    language: String,
    pattern: Regex,
}

impl CodeBlockScanner {
    /// Builds a scanner for blocks tagged `language`.
    ///
    /// # Errors
    ///
    /// Returns `DocsError::Pattern` if the fence pattern cannot be compiled.
    pub fn new(language: &str) -> Result<Self, DocsError> {
        let pattern = Regex::new(&format!(
            r"(?s)```{}\n(.*?)\n```",
            regex::escape(language)
        ))?;
        Ok(Self {
            language: language.to_string(),
            pattern,
        })
    }

    /// Language tag this scanner matches.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns every block in `content`, in document order.
    #[must_use]
    pub fn find(&self, content: &str) -> Vec<CodeBlock> {
        let mut line = 1;
        let mut counted_to = 0;

        self.pattern
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let body = caps.get(1)?;
                line += content[counted_to..whole.start()].matches('\n').count();
                counted_to = whole.start();
                Some(CodeBlock {
                    span: whole.range(),
                    body: body.range(),
                    line,
                })
            })
            .collect()
    }

    /// Renders a block of this scanner's language around `code`.
    #[must_use]
    pub fn render(&self, code: &str) -> String {
        render_code_block(&self.language, code)
    }
}

/// Renders a fenced block with surrounding blank lines trimmed from `code`.
///
/// Only whole blank lines are trimmed. Indentation of the first line and
/// trailing spaces of the last line are kept.
#[must_use]
pub fn render_code_block(language: &str, code: &str) -> String {
    format!("```{language}\n{}\n```", trim_blank_lines(code))
}

/// Strips leading and trailing whitespace-only lines.
#[must_use]
pub fn trim_blank_lines(code: &str) -> &str {
    let Some(first) = code.find(|c: char| !c.is_whitespace()) else {
        return "";
    };
    let start = code[..first].rfind('\n').map_or(0, |nl| nl + 1);

    let last = code
        .rfind(|c: char| !c.is_whitespace())
        .unwrap_or(first);
    let end = code[last..].find('\n').map_or(code.len(), |nl| last + nl);

    &code[start..end]
}

/// Rebuilds `content` with the given spans replaced.
///
/// Replacements must be sorted by span start and must not overlap. Text
/// outside the replaced spans is copied byte-for-byte.
#[must_use]
pub fn splice(content: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;

    for (span, text) in replacements {
        out.push_str(&content[cursor..span.start]);
        out.push_str(text);
        cursor = span.end;
    }
    out.push_str(&content[cursor..]);
    out
}
