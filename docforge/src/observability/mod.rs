//! Observability module
//!
//! Structured logging for `docforge` runs.

pub mod logging;

pub use logging::{LogFormat, init_logging};
