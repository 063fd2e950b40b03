//! `docforge` - maintenance tooling for an MDX documentation corpus
//!
//! Reformats embedded code snippets, publishes executed notebooks as
//! cookbook pages, and checks page frontmatter.

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod observability;
pub mod snippets;
pub mod walk;
