//! Collection of the tables a query reads from.

use crate::schema::{Column, Join, Table};
use crate::selectable::Selectable;

/// Builds the name-deduplicated table set for one compile.
///
/// Tables are kept in first-seen order: selectables, then both sides of each
/// join, then the parent columns used by subreports.
#[derive(Debug, Default)]
pub struct TableCollector {
    tables: Vec<Table>,
}

impl TableCollector {
    /// Creates an empty collector.
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds `table` unless a table with the same name is already present.
    pub fn add(&mut self, table: &Table) {
        if !self.tables.iter().any(|t| t.name() == table.name()) {
            self.tables.push(table.clone());
        }
    }

    /// Consumes the collector and returns the tables.
    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }

    /// Collects the tables referenced by selectables, joins, and subreport
    /// parent columns.
    pub fn collect<'a>(
        selectables: impl IntoIterator<Item = &'a Selectable>,
        joins: &[Join],
        parent_columns: impl IntoIterator<Item = &'a Column>,
    ) -> Vec<Table> {
        let mut collector = Self::new();
        for table in selectables.into_iter().filter_map(Selectable::table) {
            collector.add(table);
        }
        for join in joins {
            collector.add(join.from.table());
            collector.add(join.to.table());
        }
        for col in parent_columns {
            collector.add(col.table());
        }
        collector.into_tables()
    }
}
