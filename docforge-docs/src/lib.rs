//! `docforge` Docs: text transformations over a documentation corpus
//!
//! Locates and rewrites fenced code blocks in MDX pages, parses and checks
//! page frontmatter, exports notebooks to Markdown, and renders cookbook
//! pages from a notebook registry. Callers read and write the files; the
//! only filesystem access here is checking that registered notebooks exist.

pub mod cookbook;
pub mod error;
pub mod mdx;
pub mod notebook;
pub mod validate;
