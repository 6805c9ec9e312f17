//! # reportql-core
//!
//! Core types, settings, and error types shared by the reportql crates.
//! This crate has no dependency on the query compiler and provides the
//! foundation for it.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Compiler settings (dialect overrides, quoting policy, logging)
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{ReportError, ReportResult};
pub use settings::{DatabaseSettings, Settings};
