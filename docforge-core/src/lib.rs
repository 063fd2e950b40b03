//! `docforge` Core: shared types and configuration schema
//!
//! This crate provides the project configuration types and error types shared
//! across `docforge` (CLI) and `docforge-docs` (text transformations).

pub mod config;
pub mod error;
