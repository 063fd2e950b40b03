//! Project configuration loading.
//!
//! The `docforge.yaml` schema lives in `docforge-core`; this module finds
//! the file, expands environment references, parses and validates it.

pub mod loader;
pub mod validation;

pub use docforge_core::config::*;
pub use loader::{DEFAULT_CONFIG_FILE, LoadedConfig, load_config, load_config_from};
pub use validation::{ValidationResult, Validator};
