//! Core error types for reportql.
//!
//! This module provides the error enum [`ReportError`] covering unresolved
//! template references, parameter value problems, formula evaluation failures,
//! and configuration errors. A malformed template (an unmatched `{`) is not an
//! error: the scanner logs a warning and treats the remainder as literal text.

use thiserror::Error;

/// The primary error type for reportql.
///
/// Reference errors ([`UnknownFormula`](Self::UnknownFormula) and
/// [`UnknownParameter`](Self::UnknownParameter)) abort the current compile;
/// they point at a broken report definition, not at a transient condition.
#[derive(Error, Debug)]
pub enum ReportError {
    // ── Template references ──────────────────────────────────────────

    /// A `{@id}` reference names a formula the report does not define.
    #[error("Unknown formula reference: {0}")]
    UnknownFormula(String),

    /// A `{?id}` reference names a parameter the report does not define.
    #[error("Unknown parameter reference: {0}")]
    UnknownParameter(String),

    // ── Parameter values ─────────────────────────────────────────────

    /// The value source produced no value for a parameter.
    #[error("No value supplied for parameter: {0}")]
    MissingParameterValue(String),

    /// A parameter value does not have the shape its arity requires.
    #[error("Parameter {id} expects {expected}, got {found}")]
    ParameterArity {
        /// The parameter identifier.
        id: String,
        /// Description of the required shape (e.g. "a two-element range").
        expected: String,
        /// Description of what was supplied.
        found: String,
    },

    // ── Formulas ─────────────────────────────────────────────────────

    /// A formula could not be evaluated.
    #[error("Formula {formula} could not be evaluated: {message}")]
    FormulaEvaluation {
        /// The formula name.
        formula: String,
        /// Why evaluation failed.
        message: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ReportError {
    /// Returns `true` for lookup failures of template references.
    pub const fn is_reference_error(&self) -> bool {
        matches!(self, Self::UnknownFormula(_) | Self::UnknownParameter(_))
    }
}

/// A convenience type alias for `Result<T, ReportError>`.
pub type ReportResult<T> = Result<T, ReportError>;
