//! Database dialects and identifier quoting.
//!
//! A [`Dialect`] captures the identifier metadata a driver reports: the quote
//! string and whether unquoted identifiers are folded to lower or upper case.
//! [`IdentifierQuoter`] uses it to decide which parts of a dotted name need
//! quoting.

use reportql_core::{DatabaseSettings, ReportError, ReportResult};

/// The family of database the compiled SQL is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseBackendType {
    /// PostgreSQL (folds to lower case, `"` quotes).
    PostgreSQL,
    /// MySQL / MariaDB (no folding, `` ` `` quotes).
    MySQL,
    /// SQLite (no folding, `"` quotes).
    SQLite,
    /// Oracle (folds to upper case, `"` quotes).
    Oracle,
    /// Anything else: no folding, `"` quotes.
    Generic,
}

impl DatabaseBackendType {
    /// Parses a backend name as used in settings files.
    pub fn from_name(name: &str) -> ReportResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Self::PostgreSQL),
            "mysql" | "mariadb" => Ok(Self::MySQL),
            "sqlite" | "sqlite3" => Ok(Self::SQLite),
            "oracle" => Ok(Self::Oracle),
            "generic" | "" => Ok(Self::Generic),
            other => Err(ReportError::ConfigurationError(format!(
                "Unknown database backend '{other}'"
            ))),
        }
    }
}

/// Identifier metadata for one database connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// The backend family.
    pub backend: DatabaseBackendType,
    /// The string placed on both sides of a quoted identifier.
    pub quote_string: String,
    /// Unquoted identifiers are stored in lower case.
    pub stores_lower_case_identifiers: bool,
    /// Unquoted identifiers are stored in upper case.
    pub stores_upper_case_identifiers: bool,
}

impl Dialect {
    /// Returns the preset metadata for a backend.
    pub fn for_backend(backend: DatabaseBackendType) -> Self {
        let (quote_string, lower, upper) = match backend {
            DatabaseBackendType::PostgreSQL => ("\"", true, false),
            DatabaseBackendType::Oracle => ("\"", false, true),
            DatabaseBackendType::MySQL => ("`", false, false),
            DatabaseBackendType::SQLite | DatabaseBackendType::Generic => ("\"", false, false),
        };
        Self {
            backend,
            quote_string: quote_string.to_string(),
            stores_lower_case_identifiers: lower,
            stores_upper_case_identifiers: upper,
        }
    }

    /// Builds a dialect from settings, applying any explicit overrides on
    /// top of the backend preset.
    pub fn from_settings(settings: &DatabaseSettings) -> ReportResult<Self> {
        let mut dialect = Self::for_backend(DatabaseBackendType::from_name(&settings.backend)?);
        if let Some(quote) = &settings.quote_string {
            dialect.quote_string.clone_from(quote);
        }
        if let Some(lower) = settings.stores_lower_case_identifiers {
            dialect.stores_lower_case_identifiers = lower;
        }
        if let Some(upper) = settings.stores_upper_case_identifiers {
            dialect.stores_upper_case_identifiers = upper;
        }
        Ok(dialect)
    }

    /// Reports whether unquoted identifiers are folded to lower case.
    pub const fn folds_to_lower_case(&self) -> bool {
        self.stores_lower_case_identifiers
    }

    /// Reports whether unquoted identifiers are folded to upper case.
    pub const fn folds_to_upper_case(&self) -> bool {
        self.stores_upper_case_identifiers
    }

    /// Returns the identifier quote string.
    pub fn quote_character(&self) -> &str {
        &self.quote_string
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::for_backend(DatabaseBackendType::Generic)
    }
}

/// Quotes the parts of table and column names that need it.
///
/// Each `.`-separated segment is quoted when it contains a space, or when
/// case-sensitive quoting was requested and the dialect would fold the
/// segment's case.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierQuoter<'a> {
    dialect: &'a Dialect,
    case_sensitive: bool,
}

impl<'a> IdentifierQuoter<'a> {
    /// Creates a quoter for `dialect`. `case_sensitive` is the report-level
    /// request to preserve identifier case.
    pub const fn new(dialect: &'a Dialect, case_sensitive: bool) -> Self {
        Self {
            dialect,
            case_sensitive,
        }
    }

    /// Returns `name` with each segment quoted as required.
    ///
    /// # Examples
    ///
    /// ```
    /// use reportql_db::dialect::{DatabaseBackendType, Dialect, IdentifierQuoter};
    ///
    /// let pg = Dialect::for_backend(DatabaseBackendType::PostgreSQL);
    /// let quoter = IdentifierQuoter::new(&pg, true);
    /// assert_eq!(quoter.quote("Orders.Order Date"), "\"Orders\".\"Order Date\"");
    /// assert_eq!(quoter.quote("orders.total"), "orders.total");
    /// ```
    pub fn quote(&self, name: &str) -> String {
        name.split('.')
            .map(|segment| {
                if self.needs_quoting(segment) {
                    let q = self.dialect.quote_character();
                    format!("{q}{segment}{q}")
                } else {
                    segment.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    fn needs_quoting(&self, segment: &str) -> bool {
        if segment.contains(' ') {
            return true;
        }
        if !self.case_sensitive {
            return false;
        }
        (self.dialect.folds_to_lower_case() && segment != segment.to_lowercase())
            || (self.dialect.folds_to_upper_case() && segment != segment.to_uppercase())
    }
}
