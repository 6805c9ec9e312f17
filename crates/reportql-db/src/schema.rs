//! Tables, columns, and joins referenced by a report query.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A database table.
///
/// Tables compare by name. A subreport builds its own `Table` values for the
/// relations it shares with its parent, and those must not appear twice in a
/// FROM list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Table {
    name: String,
}

impl Table {
    /// Creates a table with the given (possibly schema-qualified) name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a column belonging to this table.
    pub fn column(&self, name: impl Into<String>) -> Column {
        Column::new(self.clone(), name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A column of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    table: Table,
    name: String,
}

impl Column {
    /// Creates a column of `table`.
    pub fn new(table: Table, name: impl Into<String>) -> Self {
        Self {
            table,
            name: name.into(),
        }
    }

    /// Returns the table this column belongs to.
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Returns the simple column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `table.column` name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.table.name, self.name)
    }
}

/// A join condition between two columns, rendered as one WHERE conjunct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    /// The left-hand column.
    pub from: Column,
    /// The relational operator, e.g. `=`.
    pub relation: String,
    /// The right-hand column.
    pub to: Column,
}

impl Join {
    /// Creates a join `from <relation> to`.
    pub fn new(from: Column, relation: impl Into<String>, to: Column) -> Self {
        Self {
            from,
            relation: relation.into(),
            to,
        }
    }

    /// Creates an equi-join.
    pub fn equals(from: Column, to: Column) -> Self {
        Self::new(from, "=", to)
    }
}
