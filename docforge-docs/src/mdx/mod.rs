//! MDX page handling.
//!
//! - Fenced code block discovery and splicing
//! - Shell-magic line protection around external formatters
//! - YAML frontmatter parsing and rendering

pub mod codeblock;
pub mod frontmatter;
pub mod magic;
