//! # reportql
//!
//! A compiler from report definitions to SQL.
//!
//! This is the meta-crate that re-exports the member crates for convenient
//! access. Depend on `reportql` to get everything, or on the individual
//! crates for finer-grained control.

/// Error types, settings, settings loading, and logging setup.
pub use reportql_core as core;

/// Report metadata, dialects, and query compilation.
pub use reportql_db as db;

pub use reportql_core::{ReportError, ReportResult, Settings};
pub use reportql_db::{PreparedQuery, Report, SqlQuery, Value};
