//! Report query assembly.
//!
//! [`SqlQuery`] holds the mutable query description of one report: selected
//! fields, joins, explicit sorts, and the where-clause template. Each compile
//! rebuilds the table set and walks four phases in order (select, from,
//! where, order by) through a single [`TemplateRenderer`], so the display and
//! execution forms share one traversal.

use reportql_core::logging::compile_span;
use reportql_core::ReportResult;

use super::binder::PreparedQuery;
use super::resolver::TemplateRenderer;
use super::tables::TableCollector;
use crate::parameter::ParameterValueSource;
use crate::report::Report;
use crate::schema::{Join, Table};
use crate::selectable::{Selectable, SortOrder};

/// The query description of a report.
///
/// # Examples
///
/// ```
/// use reportql_db::dialect::Dialect;
/// use reportql_db::query::SqlQuery;
/// use reportql_db::report::Report;
/// use reportql_db::schema::Table;
///
/// let report = Report::new("Orders", Dialect::default());
/// let orders = Table::new("orders");
///
/// let mut query = SqlQuery::new();
/// query.add_selectable(orders.column("id"));
/// query.set_where_clause("{orders.total} > 100");
///
/// assert_eq!(
///     query.to_display_sql(&report).unwrap(),
///     "select orders.id from orders where ( orders.total  > 100)"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlQuery {
    selectables: Vec<Selectable>,
    joins: Vec<Join>,
    where_clause: Option<String>,
    sorts: Vec<(Selectable, SortOrder)>,
    tables: Vec<Table>,
    selectables_used: Vec<Selectable>,
}

impl SqlQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Query description ────────────────────────────────────────────

    /// Adds a selected field.
    pub fn add_selectable(&mut self, selectable: impl Into<Selectable>) {
        self.selectables.push(selectable.into());
    }

    /// Removes every selected field with the same key as `selectable`.
    pub fn remove_selectable(&mut self, selectable: &Selectable) {
        let key = selectable.key();
        self.selectables.retain(|s| s.key() != key);
    }

    /// Returns the selected fields.
    pub fn selectables(&self) -> &[Selectable] {
        &self.selectables
    }

    /// Adds a join.
    pub fn add_join(&mut self, join: Join) {
        self.joins.push(join);
    }

    /// Returns the joins.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Sets the where-clause template.
    pub fn set_where_clause(&mut self, clause: impl Into<String>) {
        self.where_clause = Some(clause.into());
    }

    /// Removes the where-clause template.
    pub fn clear_where_clause(&mut self) {
        self.where_clause = None;
    }

    /// Returns the where-clause template, if any.
    pub fn where_clause(&self) -> Option<&str> {
        self.where_clause.as_deref()
    }

    /// Returns the where-clause template if it has any non-blank text.
    fn user_clause(&self) -> Option<&str> {
        self.where_clause.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Sorts by `selectable`, or changes its direction if already sorted.
    pub fn add_sort(&mut self, selectable: impl Into<Selectable>, order: SortOrder) {
        let selectable = selectable.into();
        let key = selectable.key();
        if let Some(entry) = self.sorts.iter_mut().find(|(s, _)| s.key() == key) {
            entry.1 = order;
        } else {
            self.sorts.push((selectable, order));
        }
    }

    /// Stops sorting by `selectable`.
    pub fn remove_sort(&mut self, selectable: &Selectable) {
        let key = selectable.key();
        self.sorts.retain(|(s, _)| s.key() != key);
    }

    /// Returns the explicit sorts in order.
    pub fn sorts(&self) -> &[(Selectable, SortOrder)] {
        &self.sorts
    }

    // ── Derived collections ──────────────────────────────────────────

    /// Rebuilds the selectables and tables the query uses.
    ///
    /// Selected fields come first, then group selectables, then sort
    /// selectables, each kept once.
    pub fn find_selectables_used(&mut self, report: &Report) {
        let mut used: Vec<Selectable> = Vec::new();
        let candidates = self
            .selectables
            .iter()
            .chain(report.groups().iter().map(|g| &g.selectable))
            .chain(self.sorts.iter().map(|(s, _)| s));
        for selectable in candidates {
            let key = selectable.key();
            if !used.iter().any(|u| u.key() == key) {
                used.push(selectable.clone());
            }
        }

        self.tables = TableCollector::collect(
            &used,
            &self.joins,
            report.subreports().iter().flat_map(|sub| &sub.parent_columns),
        );
        self.selectables_used = used;
    }

    /// Recomputes and returns the tables the query reads from.
    pub fn tables_used(&mut self, report: &Report) -> &[Table] {
        self.find_selectables_used(report);
        &self.tables
    }

    /// Returns the number of tables found by the last compile or
    /// [`find_selectables_used`](Self::find_selectables_used) call.
    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    /// Returns the selectables found by the last compile or
    /// [`find_selectables_used`](Self::find_selectables_used) call.
    pub fn selectables_used(&self) -> &[Selectable] {
        &self.selectables_used
    }

    // ── Compilation ──────────────────────────────────────────────────

    /// Compiles the human-readable form of the query.
    ///
    /// Parameters appear as their `{?name}` labels and formulas as
    /// `{@name}`. Returns an empty string when there is nothing to select.
    pub fn to_display_sql(&mut self, report: &Report) -> ReportResult<String> {
        let mut renderer = TemplateRenderer::display(report);
        let span = compile_span(&report.name, renderer.mode().as_str());
        let _guard = span.enter();
        self.assemble(report, &mut renderer)
    }

    /// Compiles the executable form of the query.
    ///
    /// The SQL has one `?` per bound value, in the same order. Parameter
    /// values are requested from `source` and formulas are evaluated as
    /// they are met.
    pub fn to_prepared_sql(
        &mut self,
        report: &Report,
        source: &dyn ParameterValueSource,
    ) -> ReportResult<PreparedQuery> {
        let mut renderer = TemplateRenderer::execution(report, source);
        let span = compile_span(&report.name, renderer.mode().as_str());
        let _guard = span.enter();
        let sql = self.assemble(report, &mut renderer)?;
        if sql.is_empty() {
            return Ok(PreparedQuery::default());
        }
        let values = renderer.into_bound_values();
        tracing::debug!(bound = values.len(), "bound values collected");
        Ok(PreparedQuery::new(sql, values))
    }

    fn assemble(&mut self, report: &Report, renderer: &mut TemplateRenderer<'_>) -> ReportResult<String> {
        self.find_selectables_used(report);
        tracing::debug!(
            tables = self.tables.len(),
            selectables = self.selectables_used.len(),
            "compiling report query"
        );
        if self.tables.is_empty() || self.selectables_used.is_empty() {
            return Ok(String::new());
        }

        let mut sql = String::from("select ");
        let mut columns = Vec::with_capacity(self.selectables_used.len());
        for selectable in &self.selectables_used {
            if let Some(expr) = selectable.select_expression(renderer)? {
                columns.push(expr);
            }
        }
        if columns.is_empty() {
            tracing::debug!("no selectable renders SQL; nothing to run");
            return Ok(String::new());
        }
        sql.push_str(&columns.join(", "));

        self.build_from(&mut sql, renderer);
        self.build_where(&mut sql, renderer)?;
        self.build_order_by(&mut sql, report, renderer)?;
        Ok(sql)
    }

    fn build_from(&self, sql: &mut String, renderer: &TemplateRenderer<'_>) {
        sql.push_str(" from ");
        let tables: Vec<String> = self.tables.iter().map(|t| renderer.quoted(t.name())).collect();
        sql.push_str(&tables.join(", "));
    }

    fn build_where(&self, sql: &mut String, renderer: &mut TemplateRenderer<'_>) -> ReportResult<()> {
        let clause = self.user_clause();
        if self.joins.is_empty() && clause.is_none() {
            return Ok(());
        }

        sql.push_str(" where ");
        if !self.joins.is_empty() {
            let joins: Vec<String> = self
                .joins
                .iter()
                .map(|j| {
                    format!(
                        "{} {} {}",
                        renderer.quoted(&j.from.full_name()),
                        j.relation,
                        renderer.quoted(&j.to.full_name())
                    )
                })
                .collect();
            sql.push('(');
            sql.push_str(&joins.join(") and ("));
            sql.push(')');
        }
        if let Some(clause) = clause {
            if !self.joins.is_empty() {
                sql.push_str(" and ");
            }
            sql.push('(');
            sql.push_str(&renderer.render(clause)?);
            sql.push(')');
        }
        Ok(())
    }

    fn build_order_by(
        &self,
        sql: &mut String,
        report: &Report,
        renderer: &mut TemplateRenderer<'_>,
    ) -> ReportResult<()> {
        if !report.has_groups() && self.sorts.is_empty() {
            return Ok(());
        }
        let entries = report
            .groups()
            .iter()
            .map(|g| (&g.selectable, g.sort_order))
            .chain(self.sorts.iter().map(|(s, order)| (s, *order)));

        let mut orders = Vec::new();
        for (selectable, order) in entries {
            if let Some(expr) = selectable.sort_expression(renderer)? {
                orders.push(format!("{expr} {}", order.sql_keyword()));
            }
        }
        if !orders.is_empty() {
            sql.push_str(" order by ");
            sql.push_str(&orders.join(", "));
        }
        Ok(())
    }
}
