//! The report definition the query compiler reads from.
//!
//! A [`Report`] owns the formulas, parameters, groups, and subreports that
//! where-clause templates and ORDER BY generation refer to, together with
//! the target [`Dialect`].

use std::fmt;
use std::sync::Arc;

use reportql_core::{ReportError, ReportResult, Settings};

use crate::dialect::{Dialect, IdentifierQuoter};
use crate::formula::{Formula, FormulaEvaluator, LiteralFormulaEvaluator};
use crate::parameter::Parameter;
use crate::schema::Column;
use crate::selectable::Group;
use crate::value::Value;

/// A subreport, linked to its parent through parent-report columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subreport {
    /// The subreport name.
    pub name: String,
    /// Parent-report columns the subreport's joins use.
    pub parent_columns: Vec<Column>,
}

impl Subreport {
    /// Creates a subreport.
    pub fn new(name: impl Into<String>, parent_columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            parent_columns,
        }
    }
}

/// A report definition.
pub struct Report {
    /// The report name, used in log spans.
    pub name: String,
    /// The target database's identifier metadata.
    pub dialect: Dialect,
    /// Whether identifiers should be quoted to preserve their case.
    pub case_sensitive_database_names: bool,
    formulas: Vec<Formula>,
    parameters: Vec<Parameter>,
    groups: Vec<Group>,
    subreports: Vec<Subreport>,
    evaluator: Arc<dyn FormulaEvaluator>,
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("name", &self.name)
            .field("dialect", &self.dialect)
            .field("case_sensitive_database_names", &self.case_sensitive_database_names)
            .field("formulas", &self.formulas)
            .field("parameters", &self.parameters)
            .field("groups", &self.groups)
            .field("subreports", &self.subreports)
            .finish_non_exhaustive()
    }
}

impl Report {
    /// Creates an empty report targeting `dialect`.
    pub fn new(name: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            name: name.into(),
            dialect,
            case_sensitive_database_names: false,
            formulas: Vec::new(),
            parameters: Vec::new(),
            groups: Vec::new(),
            subreports: Vec::new(),
            evaluator: Arc::new(LiteralFormulaEvaluator),
        }
    }

    /// Creates an empty report configured from settings.
    pub fn from_settings(name: impl Into<String>, settings: &Settings) -> ReportResult<Self> {
        let mut report = Self::new(name, Dialect::from_settings(&settings.database)?);
        report.case_sensitive_database_names = settings.case_sensitive_database_names;
        Ok(report)
    }

    /// Replaces the formula evaluator.
    pub fn set_formula_evaluator(&mut self, evaluator: impl FormulaEvaluator + 'static) {
        self.evaluator = Arc::new(evaluator);
    }

    /// Adds a formula.
    pub fn add_formula(&mut self, formula: Formula) {
        self.formulas.push(formula);
    }

    /// Adds a parameter.
    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    /// Appends a group; groups sort in the order they are added.
    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Adds a subreport.
    pub fn add_subreport(&mut self, subreport: Subreport) {
        self.subreports.push(subreport);
    }

    /// Looks up a formula by id.
    pub fn find_formula(&self, id: &str) -> ReportResult<&Formula> {
        let id = id.trim();
        self.formulas
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| ReportError::UnknownFormula(id.to_string()))
    }

    /// Looks up a parameter by id.
    pub fn find_parameter(&self, id: &str) -> ReportResult<&Parameter> {
        let id = id.trim();
        self.parameters
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ReportError::UnknownParameter(id.to_string()))
    }

    /// Evaluates a formula with the report's evaluator.
    pub fn evaluate_formula(&self, formula: &Formula) -> ReportResult<Value> {
        self.evaluator.evaluate(formula)
    }

    /// Returns the groups in report order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns `true` if the report defines any groups.
    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Returns the subreports.
    pub fn subreports(&self) -> &[Subreport] {
        &self.subreports
    }

    /// Returns an identifier quoter for this report's dialect and quoting policy.
    pub const fn quoter(&self) -> IdentifierQuoter<'_> {
        IdentifierQuoter::new(&self.dialect, self.case_sensitive_database_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DatabaseBackendType;
    use crate::parameter::Arity;

    #[test]
    fn test_find_formula_and_parameter() {
        let mut report = Report::new("r", Dialect::default());
        report.add_formula(Formula::new("1", "Answer", "42"));
        report.add_parameter(Parameter::new("2", "Min", Arity::Single));

        assert_eq!(report.find_formula("1").unwrap().name, "Answer");
        assert_eq!(report.find_formula(" 1 ").unwrap().name, "Answer");
        assert_eq!(report.find_parameter("2").unwrap().name, "Min");
    }

    #[test]
    fn test_unknown_references() {
        let report = Report::new("r", Dialect::default());
        let err = report.find_formula("7").unwrap_err();
        assert!(err.is_reference_error());
        assert_eq!(err.to_string(), "Unknown formula reference: 7");
        assert!(matches!(
            report.find_parameter("x"),
            Err(ReportError::UnknownParameter(id)) if id == "x"
        ));
    }

    #[test]
    fn test_default_evaluator_is_literal() {
        let report = Report::new("r", Dialect::default());
        let value = report.evaluate_formula(&Formula::new("1", "f", "42")).unwrap();
        assert_eq!(value, Value::Int(42));
    }

    #[test]
    fn test_custom_evaluator() {
        let mut report = Report::new("r", Dialect::default());
        report.set_formula_evaluator(|_: &Formula| -> ReportResult<Value> { Ok(Value::from("x")) });
        let value = report.evaluate_formula(&Formula::new("1", "f", "ignored")).unwrap();
        assert_eq!(value, Value::from("x"));
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.database.backend = "oracle".to_string();
        settings.case_sensitive_database_names = true;
        let report = Report::from_settings("r", &settings).unwrap();
        assert_eq!(report.dialect.backend, DatabaseBackendType::Oracle);
        assert!(report.case_sensitive_database_names);
        assert_eq!(report.quoter().quote("orders"), "\"orders\"");
    }

    #[test]
    fn test_from_settings_bad_backend() {
        let mut settings = Settings::default();
        settings.database.backend = "paradox".to_string();
        assert!(Report::from_settings("r", &settings).is_err());
    }
}
