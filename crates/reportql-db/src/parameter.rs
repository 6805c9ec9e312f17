//! Report parameters and the source of their runtime values.
//!
//! A parameter is referenced from a where-clause template as `{?id}`. Its
//! value is not stored here: at compile time the compiler asks a
//! [`ParameterValueSource`] (typically a prompt shown to the user).

use std::collections::HashMap;

use reportql_core::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The cardinality of a parameter's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    /// One scalar value.
    Single,
    /// Any number of discrete values.
    List,
    /// Exactly two bounding values, low then high.
    Range,
}

impl Arity {
    const fn expected(self) -> &'static str {
        match self {
            Self::Single => "a single value",
            Self::List => "a list of values",
            Self::Range => "a two-element range",
        }
    }
}

/// A report parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The identifier used in `{?id}` references.
    pub id: String,
    /// The human-readable name.
    pub name: String,
    /// The value cardinality.
    pub arity: Arity,
}

impl Parameter {
    /// Creates a parameter.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arity: Arity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arity,
        }
    }

    /// Returns the label shown in display SQL, `{?name}`.
    pub fn design_label(&self) -> String {
        format!("{{?{}}}", self.name)
    }

    /// Verifies that `value` has the shape this parameter's arity requires.
    pub fn check_value(&self, value: &Value) -> ReportResult<()> {
        let ok = match (self.arity, value.as_list()) {
            (Arity::Range, Some(vals)) => vals.len() == 2,
            (Arity::List, Some(_)) => true,
            (Arity::Single, None) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(ReportError::ParameterArity {
                id: self.id.clone(),
                expected: self.arity.expected().to_string(),
                found: value.shape(),
            })
        }
    }
}

/// Supplies parameter values at compile time.
pub trait ParameterValueSource {
    /// Returns the current value of `parameter`.
    ///
    /// List and range parameters are answered with [`Value::List`].
    fn parameter_value(&self, parameter: &Parameter) -> ReportResult<Value>;
}

impl ParameterValueSource for HashMap<String, Value> {
    fn parameter_value(&self, parameter: &Parameter) -> ReportResult<Value> {
        self.get(&parameter.id)
            .cloned()
            .ok_or_else(|| ReportError::MissingParameterValue(parameter.id.clone()))
    }
}

impl<F> ParameterValueSource for F
where
    F: Fn(&Parameter) -> ReportResult<Value>,
{
    fn parameter_value(&self, parameter: &Parameter) -> ReportResult<Value> {
        self(parameter)
    }
}
