//! Settings for reportql.
//!
//! [`Settings`] holds the knobs a report run needs before it can compile SQL:
//! which database dialect to target, optional overrides of the driver-reported
//! identifier metadata, whether case-sensitive quoting was requested, and the
//! log configuration.

use serde::{Deserialize, Serialize};

/// Database dialect configuration.
///
/// The identifier metadata fields are normally reported by the driver at
/// runtime. When left as `None` the preset for [`backend`](Self::backend) is
/// used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// The backend name: `postgresql`, `mysql`, `sqlite`, `oracle` or `generic`.
    pub backend: String,
    /// The identifier quote string (e.g. `"` or `` ` ``).
    pub quote_string: Option<String>,
    /// Whether the database folds unquoted identifiers to lower case.
    pub stores_lower_case_identifiers: Option<bool>,
    /// Whether the database folds unquoted identifiers to upper case.
    pub stores_upper_case_identifiers: Option<bool>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: "generic".to_string(),
            quote_string: None,
            stores_lower_case_identifiers: None,
            stores_upper_case_identifiers: None,
        }
    }
}

/// The complete set of reportql settings.
///
/// # Examples
///
/// ```
/// use reportql_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.case_sensitive_database_names);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Database ─────────────────────────────────────────────────────

    /// The target database dialect.
    pub database: DatabaseSettings,
    /// Quote identifiers whose case the database would otherwise fold.
    pub case_sensitive_database_names: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter directive (e.g. "info", "reportql_db=debug").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            database: DatabaseSettings::default(),
            case_sensitive_database_names: false,
            log_level: "info".to_string(),
        }
    }
}
