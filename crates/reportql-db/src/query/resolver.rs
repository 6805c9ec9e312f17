//! Resolution of template references into SQL text.
//!
//! [`TemplateRenderer`] walks the segments produced by
//! [`TemplateScanner`](super::template::TemplateScanner) and replaces each
//! reference. The same operator-rewrite rules serve both compile modes:
//!
//! | Value shape | Previous word | Operator emitted |
//! |---|---|---|
//! | range | `!=`, `<>` | `not between` |
//! | range | `=`, `in` | `between` |
//! | list of 0 | any | dropped, ` is null` emitted instead |
//! | list of 1 | `in`, `<>` | `=` |
//! | list of 2+ | `!=`, `<>` | `not in` |
//! | list of 2+ | `=`, `in` | `in` |
//! | anything else | | previous word unchanged |
//!
//! In execution mode the renderer emits `?` placeholders and appends the
//! matching values to its bound-value list, left to right. In display mode it
//! emits parameter labels and formula names and binds nothing.

use reportql_core::ReportResult;

use super::template::{Segment, TemplateScanner};
use crate::dialect::IdentifierQuoter;
use crate::parameter::{Arity, Parameter, ParameterValueSource};
use crate::report::Report;
use crate::value::Value;

/// Which form of SQL a compile produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileMode {
    /// Human-readable SQL with labels instead of placeholders.
    Display,
    /// SQL with `?` placeholders plus an ordered bound-value list.
    Execution,
}

impl CompileMode {
    /// Returns the mode name used in log spans.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Execution => "execution",
        }
    }
}

enum Sink<'a> {
    Display,
    Execution {
        source: &'a dyn ParameterValueSource,
        bound: Vec<Value>,
    },
}

/// The shape that decides how a parameter's operator is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueShape {
    Scalar,
    Range,
    EmptyList,
    OneElement,
    ManyElements,
}

/// Renders template text for one compile.
///
/// A renderer is created per compile and never reused, so an execution-mode
/// bound-value list never carries values from an earlier run.
pub struct TemplateRenderer<'a> {
    report: &'a Report,
    quoter: IdentifierQuoter<'a>,
    sink: Sink<'a>,
}

impl<'a> TemplateRenderer<'a> {
    /// Creates a display-mode renderer.
    pub fn display(report: &'a Report) -> Self {
        Self {
            report,
            quoter: report.quoter(),
            sink: Sink::Display,
        }
    }

    /// Creates an execution-mode renderer drawing parameter values from `source`.
    pub fn execution(report: &'a Report, source: &'a dyn ParameterValueSource) -> Self {
        Self {
            report,
            quoter: report.quoter(),
            sink: Sink::Execution {
                source,
                bound: Vec::new(),
            },
        }
    }

    /// Returns the compile mode.
    pub const fn mode(&self) -> CompileMode {
        match self.sink {
            Sink::Display => CompileMode::Display,
            Sink::Execution { .. } => CompileMode::Execution,
        }
    }

    /// Quotes a table or column name for the report's dialect.
    pub fn quoted(&self, name: &str) -> String {
        self.quoter.quote(name)
    }

    /// Returns the values bound so far (always empty in display mode).
    pub fn bound_values(&self) -> &[Value] {
        match &self.sink {
            Sink::Display => &[],
            Sink::Execution { bound, .. } => bound,
        }
    }

    /// Consumes the renderer and returns the bound values.
    pub fn into_bound_values(self) -> Vec<Value> {
        match self.sink {
            Sink::Display => Vec::new(),
            Sink::Execution { bound, .. } => bound,
        }
    }

    /// Renders a template, replacing every reference.
    pub fn render(&mut self, template: &str) -> ReportResult<String> {
        let mut out = String::with_capacity(template.len());
        for segment in TemplateScanner::new(template) {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Formula { id } => self.formula(&mut out, id)?,
                Segment::Parameter { id, prev_word } => self.parameter(&mut out, id, prev_word)?,
                Segment::Column { name } => {
                    out.push(' ');
                    out.push_str(&self.quoted(name));
                    out.push(' ');
                }
            }
        }
        Ok(out)
    }

    fn formula(&mut self, out: &mut String, id: &str) -> ReportResult<()> {
        let report = self.report;
        let formula = report.find_formula(id)?;
        match &mut self.sink {
            Sink::Display => {
                out.push(' ');
                out.push_str(&formula.display_reference());
                out.push(' ');
            }
            Sink::Execution { bound, .. } => {
                bound.push(report.evaluate_formula(formula)?);
                out.push_str(" ? ");
            }
        }
        Ok(())
    }

    fn parameter(&mut self, out: &mut String, id: &str, prev_word: &str) -> ReportResult<()> {
        let report = self.report;
        let parameter = report.find_parameter(id)?;
        let (shape, replacement) = match &mut self.sink {
            Sink::Display => display_replacement(parameter),
            Sink::Execution { source, bound } => {
                let value = source.parameter_value(parameter)?;
                parameter.check_value(&value)?;
                tracing::trace!(parameter = %parameter.id, value = %value, "binding parameter");
                execution_replacement(parameter, value, bound)
            }
        };

        if shape == ValueShape::EmptyList {
            out.push_str(" is null");
        } else {
            out.push(' ');
            out.push_str(rewrite_operator(shape, prev_word));
            out.push(' ');
            out.push_str(&replacement);
        }
        Ok(())
    }
}

fn display_replacement(parameter: &Parameter) -> (ValueShape, String) {
    let label = parameter.design_label();
    match parameter.arity {
        Arity::Range => (ValueShape::Range, format!("{label} and {label}")),
        Arity::List => (ValueShape::ManyElements, format!("({label})")),
        Arity::Single => (ValueShape::Scalar, label),
    }
}

/// Appends the parameter's values to `bound` and returns the placeholders.
/// `value` has already been checked against the parameter's arity.
fn execution_replacement(
    parameter: &Parameter,
    value: Value,
    bound: &mut Vec<Value>,
) -> (ValueShape, String) {
    match (parameter.arity, value) {
        (Arity::Range, Value::List(bounds)) => {
            bound.extend(bounds);
            (ValueShape::Range, "? and ?".to_string())
        }
        (Arity::List, Value::List(items)) => {
            let shape = match items.len() {
                0 => ValueShape::EmptyList,
                1 => ValueShape::OneElement,
                _ => ValueShape::ManyElements,
            };
            let placeholders = if shape == ValueShape::ManyElements {
                format!("({})", vec!["?"; items.len()].join(","))
            } else {
                "?".to_string()
            };
            bound.extend(items);
            (shape, placeholders)
        }
        (_, scalar) => {
            bound.push(scalar);
            (ValueShape::Scalar, "?".to_string())
        }
    }
}

fn rewrite_operator(shape: ValueShape, prev_word: &str) -> &str {
    let negated = prev_word == "!=" || prev_word == "<>";
    let is_in = prev_word.eq_ignore_ascii_case("in");
    let inclusive = prev_word == "=" || is_in;
    match shape {
        ValueShape::Range if negated => "not between",
        ValueShape::Range if inclusive => "between",
        ValueShape::OneElement if is_in || prev_word == "<>" => "=",
        ValueShape::ManyElements if negated => "not in",
        ValueShape::ManyElements if inclusive => "in",
        _ => prev_word,
    }
}
