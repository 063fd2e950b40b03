//! Project configuration types.

pub mod schema;

pub use schema::{
    CookbookConfig, FormatterConfig, FrontmatterRules, LINE_LENGTH_PLACEHOLDER, ProjectConfig,
};
