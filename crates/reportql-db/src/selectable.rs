//! Things a report can select and sort by.

use reportql_core::ReportResult;
use serde::{Deserialize, Serialize};

use crate::formula::Formula;
use crate::query::resolver::TemplateRenderer;
use crate::schema::{Column, Table};

/// A user-defined SQL expression column.
///
/// The expression may contain the same `{...}` references as a where clause;
/// they are resolved with the current compile mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserColumn {
    /// The identifier of this column.
    pub id: String,
    /// The human-readable name.
    pub name: String,
    /// The SQL expression template.
    pub expression: String,
}

impl UserColumn {
    /// Creates a user column.
    pub fn new(id: impl Into<String>, name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expression: expression.into(),
        }
    }
}

/// Anything that can appear in a SELECT list or be sorted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selectable {
    /// A database column.
    Column(Column),
    /// A formula, evaluated outside the database.
    Formula(Formula),
    /// A user-defined SQL expression.
    UserColumn(UserColumn),
}

impl Selectable {
    /// Returns the table this selectable reads from, if any.
    pub const fn table(&self) -> Option<&Table> {
        match self {
            Self::Column(col) => Some(col.table()),
            Self::Formula(_) | Self::UserColumn(_) => None,
        }
    }

    /// Returns a key identifying this selectable within one report.
    pub fn key(&self) -> String {
        match self {
            Self::Column(col) => format!("column:{}", col.full_name()),
            Self::Formula(formula) => format!("formula:{}", formula.id),
            Self::UserColumn(uc) => format!("user:{}", uc.id),
        }
    }

    /// Renders the SELECT-list expression. Formulas select nothing.
    pub fn select_expression(&self, renderer: &mut TemplateRenderer<'_>) -> ReportResult<Option<String>> {
        match self {
            Self::Column(col) => Ok(Some(renderer.quoted(&col.full_name()))),
            Self::Formula(_) => Ok(None),
            Self::UserColumn(uc) => renderer.render(&uc.expression).map(Some),
        }
    }

    /// Renders the ORDER BY expression. Formulas cannot be sorted in SQL.
    pub fn sort_expression(&self, renderer: &mut TemplateRenderer<'_>) -> ReportResult<Option<String>> {
        self.select_expression(renderer)
    }
}

impl From<Column> for Selectable {
    fn from(col: Column) -> Self {
        Self::Column(col)
    }
}

impl From<Formula> for Selectable {
    fn from(formula: Formula) -> Self {
        Self::Formula(formula)
    }
}

impl From<UserColumn> for Selectable {
    fn from(uc: UserColumn) -> Self {
        Self::UserColumn(uc)
    }
}

/// A sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortOrder {
    /// Returns the SQL keyword for this direction.
    pub const fn sql_keyword(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A report group. Groups sort before any explicitly sorted selectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// What the group breaks on.
    pub selectable: Selectable,
    /// The group's sort direction.
    pub sort_order: SortOrder,
}

impl Group {
    /// Creates a group.
    pub fn new(selectable: impl Into<Selectable>, sort_order: SortOrder) -> Self {
        Self {
            selectable: selectable.into(),
            sort_order,
        }
    }
}
