//! Report formulas and their evaluation.
//!
//! A formula is referenced from a where-clause template as `{@id}`. In
//! execution mode the compiler evaluates it on the spot and binds the result;
//! in display mode it is shown by name.

use reportql_core::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A named formula defined by a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    /// The identifier used in `{@id}` references.
    pub id: String,
    /// The human-readable name.
    pub name: String,
    /// The formula source text, interpreted by a [`FormulaEvaluator`].
    pub expression: String,
}

impl Formula {
    /// Creates a formula.
    pub fn new(id: impl Into<String>, name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expression: expression.into(),
        }
    }

    /// Returns the `{@name}` form shown in display SQL.
    pub fn display_reference(&self) -> String {
        format!("{{@{}}}", self.name)
    }
}

/// Produces a formula's current value on demand.
pub trait FormulaEvaluator: Send + Sync {
    /// Evaluates `formula`.
    fn evaluate(&self, formula: &Formula) -> ReportResult<Value>;
}

impl<F> FormulaEvaluator for F
where
    F: Fn(&Formula) -> ReportResult<Value> + Send + Sync,
{
    fn evaluate(&self, formula: &Formula) -> ReportResult<Value> {
        self(formula)
    }
}

/// Evaluates formulas whose expression is a single literal.
///
/// Accepts `null`, `true`/`false`, integers, floats, single- or double-quoted
/// strings, and ISO-8601 dates, timestamps and times.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralFormulaEvaluator;

impl FormulaEvaluator for LiteralFormulaEvaluator {
    fn evaluate(&self, formula: &Formula) -> ReportResult<Value> {
        parse_literal(formula.expression.trim()).ok_or_else(|| ReportError::FormulaEvaluation {
            formula: formula.name.clone(),
            message: format!("'{}' is not a literal", formula.expression),
        })
    }
}

fn parse_literal(text: &str) -> Option<Value> {
    match text.to_lowercase().as_str() {
        "null" | "nil" => return Some(Value::Null),
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }

    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Int(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        return Some(Value::Float(f));
    }

    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return Some(Value::String(text[1..text.len() - 1].to_string()));
        }
    }

    if let Ok(d) = chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Value::Date(d));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, fmt) {
            return Some(Value::DateTime(dt));
        }
    }
    chrono::NaiveTime::parse_from_str(text, "%H:%M:%S")
        .ok()
        .map(Value::Time)
}
