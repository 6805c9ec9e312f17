//! Integration tests for report query compilation.
//!
//! These tests drive whole reports through both compile modes and check the
//! produced SQL against the bound values, the way a caller preparing a
//! statement would use them.

use std::collections::HashMap;

use chrono::NaiveDate;
use reportql_core::{settings_loader, ReportError, ReportResult};
use reportql_db::dialect::{DatabaseBackendType, Dialect};
use reportql_db::query::{BindKind, SqlQuery};
use reportql_db::{Arity, Formula, Group, Join, Parameter, Report, SortOrder, Table, Value};

// ── Fixtures ──────────────────────────────────────────────────────────

/// Collapses whitespace runs so assertions do not depend on the padding
/// the compiler puts around references.
fn squash(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sales_report() -> Report {
    let mut report = Report::new(
        "Monthly Sales",
        Dialect::for_backend(DatabaseBackendType::PostgreSQL),
    );
    report.case_sensitive_database_names = true;
    report.add_formula(Formula::new("1", "Answer", "42"));
    report.add_parameter(Parameter::new("region", "Regions", Arity::List));
    report.add_parameter(Parameter::new("dates", "Order Dates", Arity::Range));
    report.add_parameter(Parameter::new("min", "Min Total", Arity::Single));
    report.add_group(Group::new(
        Table::new("Orders").column("region"),
        SortOrder::Ascending,
    ));
    report
}

fn sales_query() -> SqlQuery {
    let orders = Table::new("Orders");
    let items = Table::new("order_items");
    let mut query = SqlQuery::new();
    query.add_selectable(orders.column("id"));
    query.add_selectable(orders.column("Order Date"));
    query.add_join(Join::equals(orders.column("id"), items.column("order_id")));
    query.set_where_clause(
        "{Orders.region} in {?region} and {Orders.Order Date} = {?dates} \
         and {order_items.qty} >= {?min}",
    );
    query.add_sort(items.column("qty"), SortOrder::Descending);
    query
}

fn sales_values(regions: Vec<Value>) -> HashMap<String, Value> {
    let mut values = HashMap::new();
    values.insert("region".to_string(), Value::List(regions));
    values.insert(
        "dates".to_string(),
        Value::List(vec![
            Value::Date(date(2024, 1, 1)),
            Value::Date(date(2024, 1, 31)),
        ]),
    );
    values.insert("min".to_string(), Value::Int(100));
    values
}

// ── Whole-report compiles ─────────────────────────────────────────────

#[test]
fn test_display_sql_for_full_report() {
    let report = sales_report();
    let mut query = sales_query();
    let sql = query.to_display_sql(&report).unwrap();
    assert_eq!(
        squash(&sql),
        "select \"Orders\".id, \"Orders\".\"Order Date\", \"Orders\".region, order_items.qty \
         from \"Orders\", order_items \
         where (\"Orders\".id = order_items.order_id) and ( \"Orders\".region in ({?Regions}) \
         and \"Orders\".\"Order Date\" between {?Order Dates} and {?Order Dates} \
         and order_items.qty >= {?Min Total}) \
         order by \"Orders\".region asc, order_items.qty desc"
    );
}

#[test]
fn test_prepared_sql_for_full_report() {
    let report = sales_report();
    let mut query = sales_query();
    let values = sales_values(vec![Value::from("EAST"), Value::from("WEST")]);

    let prepared = query.to_prepared_sql(&report, &values).unwrap();
    assert_eq!(
        squash(&prepared.sql),
        "select \"Orders\".id, \"Orders\".\"Order Date\", \"Orders\".region, order_items.qty \
         from \"Orders\", order_items \
         where (\"Orders\".id = order_items.order_id) and ( \"Orders\".region in (?,?) \
         and \"Orders\".\"Order Date\" between ? and ? \
         and order_items.qty >= ?) \
         order by \"Orders\".region asc, order_items.qty desc"
    );
    assert_eq!(
        prepared.values,
        vec![
            Value::from("EAST"),
            Value::from("WEST"),
            Value::Date(date(2024, 1, 1)),
            Value::Date(date(2024, 1, 31)),
            Value::Int(100),
        ]
    );
    assert_eq!(prepared.placeholder_count(), prepared.values.len());
    assert_eq!(query.num_tables(), 2);
}

#[test]
fn test_numbered_placeholders_for_postgres() {
    let report = sales_report();
    let mut query = sales_query();
    let prepared = query
        .to_prepared_sql(&report, &sales_values(vec![Value::from("EAST"), Value::from("WEST")]))
        .unwrap();
    let numbered = squash(&prepared.to_numbered());
    assert!(numbered.contains("in ($1,$2)"));
    assert!(numbered.contains("between $3 and $4"));
    assert!(numbered.contains(">= $5)"));
    assert!(!numbered.contains('?'));
}

#[test]
fn test_comment_in_where_clause_keeps_placeholders() {
    let report = sales_report();
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("orders").column("id"));
    query.set_where_clause("orders.total > 0 -- don't count drafts\n and orders.qty = {?min}");

    let mut values = HashMap::new();
    values.insert("min".to_string(), Value::Int(2));
    let prepared = query.to_prepared_sql(&report, &values).unwrap();
    assert_eq!(prepared.placeholder_count(), 1);
    assert_eq!(prepared.placeholder_count(), prepared.values.len());
    let numbered = prepared.to_numbered();
    assert!(numbered.contains("orders.qty  = $1"));
    assert!(!numbered.contains('?'));
}

#[test]
fn test_single_region_becomes_equality() {
    let report = sales_report();
    let mut query = sales_query();
    let prepared = query
        .to_prepared_sql(&report, &sales_values(vec![Value::from("EAST")]))
        .unwrap();
    assert!(squash(&prepared.sql).contains("\"Orders\".region = ? and"));
    assert_eq!(prepared.values.len(), 4);
}

#[test]
fn test_no_regions_becomes_is_null() {
    let report = sales_report();
    let mut query = sales_query();
    let prepared = query.to_prepared_sql(&report, &sales_values(vec![])).unwrap();
    assert!(squash(&prepared.sql).contains("( \"Orders\".region is null and"));
    assert_eq!(prepared.values.len(), 3);
    assert_eq!(prepared.placeholder_count(), 3);
}

#[test]
fn test_repeated_compiles_do_not_accumulate_values() {
    let report = sales_report();
    let mut query = sales_query();
    let values = sales_values(vec![Value::from("EAST"), Value::from("WEST")]);
    let first = query.to_prepared_sql(&report, &values).unwrap();
    let second = query.to_prepared_sql(&report, &values).unwrap();
    assert_eq!(first.values.len(), 5);
    assert_eq!(first, second);
}

#[test]
fn test_query_changes_between_compiles() {
    let report = sales_report();
    let mut query = sales_query();
    query.to_display_sql(&report).unwrap();
    assert_eq!(query.num_tables(), 2);

    query.add_selectable(Table::new("customers").column("name"));
    let sql = query.to_display_sql(&report).unwrap();
    assert!(sql.contains("from \"Orders\", order_items, customers"));
    assert_eq!(query.num_tables(), 3);
}

// ── Parameters and formulas ───────────────────────────────────────────

#[test]
fn test_formula_then_parameter_order() {
    let report = sales_report();
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("orders").column("id"));
    query.set_where_clause("{@1} > {?min}");

    let mut values = HashMap::new();
    values.insert("min".to_string(), Value::Int(7));
    let prepared = query.to_prepared_sql(&report, &values).unwrap();
    assert_eq!(squash(&prepared.sql), "select orders.id from orders where ( ? > ?)");
    assert_eq!(prepared.values, vec![Value::Int(42), Value::Int(7)]);
}

#[test]
fn test_range_with_not_equal() {
    let report = sales_report();
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("orders").column("id"));
    query.set_where_clause("orders.total != {?dates}");

    let mut values = HashMap::new();
    values.insert("dates".to_string(), Value::List(vec![Value::Int(10), Value::Int(20)]));
    let prepared = query.to_prepared_sql(&report, &values).unwrap();
    assert_eq!(
        squash(&prepared.sql),
        "select orders.id from orders where (orders.total not between ? and ?)"
    );
    assert_eq!(prepared.values, vec![Value::Int(10), Value::Int(20)]);
}

#[test]
fn test_custom_evaluator_and_closure_source() {
    let mut report = sales_report();
    report.set_formula_evaluator(|formula: &Formula| -> ReportResult<Value> {
        Ok(Value::from(format!("eval:{}", formula.name)))
    });
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("orders").column("id"));
    query.set_where_clause("orders.note = {@1} and orders.total >= {?min}");

    let source = |parameter: &Parameter| -> ReportResult<Value> {
        assert_eq!(parameter.id, "min");
        Ok(Value::Int(3))
    };
    let prepared = query.to_prepared_sql(&report, &source).unwrap();
    assert_eq!(prepared.values, vec![Value::from("eval:Answer"), Value::Int(3)]);
}

#[test]
fn test_timestamps_bind_as_dates() {
    let report = sales_report();
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("orders").column("id"));
    query.set_where_clause("orders.placed in {?dates}");

    let start = date(2024, 2, 1).and_hms_opt(8, 30, 0).unwrap();
    let end = date(2024, 2, 29).and_hms_opt(17, 0, 0).unwrap();
    let mut values = HashMap::new();
    values.insert(
        "dates".to_string(),
        Value::List(vec![Value::DateTime(start), Value::DateTime(end)]),
    );

    let prepared = query.to_prepared_sql(&report, &values).unwrap();
    assert!(prepared.sql.contains("between ? and ?"));
    let params = prepared.bind_params();
    assert_eq!(params.len(), 2);
    assert!(params.iter().all(|p| p.kind == BindKind::Date));
    assert_eq!(params[0].value, Value::Date(date(2024, 2, 1)));
    assert_eq!(params[1].index, 2);
}

// ── Errors ────────────────────────────────────────────────────────────

#[test]
fn test_unknown_formula_aborts_both_modes() {
    let report = sales_report();
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("orders").column("id"));
    query.set_where_clause("orders.total > {@404}");

    let err = query.to_display_sql(&report).unwrap_err();
    assert!(matches!(err, ReportError::UnknownFormula(ref id) if id == "404"));
    let err = query
        .to_prepared_sql(&report, &HashMap::<String, Value>::new())
        .unwrap_err();
    assert!(err.is_reference_error());
}

#[test]
fn test_missing_parameter_value() {
    let report = sales_report();
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("orders").column("id"));
    query.set_where_clause("orders.total > {?min}");
    let err = query
        .to_prepared_sql(&report, &HashMap::<String, Value>::new())
        .unwrap_err();
    assert!(matches!(err, ReportError::MissingParameterValue(ref id) if id == "min"));
    assert!(!err.is_reference_error());
}

#[test]
fn test_unmatched_brace_is_kept_as_text() {
    let report = sales_report();
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("orders").column("id"));
    query.set_where_clause("orders.note = '{draft'");
    assert_eq!(
        query.to_display_sql(&report).unwrap(),
        "select orders.id from orders where (orders.note = '{draft')"
    );
}

// ── Quoting and configuration ─────────────────────────────────────────

#[test]
fn test_quoting_without_case_sensitivity() {
    let report = Report::new("r", Dialect::for_backend(DatabaseBackendType::PostgreSQL));
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("Sales").column("orderdate"));
    query.add_selectable(Table::new("Sales").column("Order Date"));
    assert_eq!(
        query.to_display_sql(&report).unwrap(),
        "select Sales.orderdate, Sales.\"Order Date\" from Sales"
    );
}

#[test]
fn test_mysql_uses_backticks() {
    let mut report = Report::new("r", Dialect::for_backend(DatabaseBackendType::MySQL));
    report.case_sensitive_database_names = true;
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("Line Items").column("Qty"));
    assert_eq!(
        query.to_display_sql(&report).unwrap(),
        "select `Line Items`.Qty from `Line Items`"
    );
}

#[test]
fn test_report_from_toml_settings() {
    let settings = settings_loader::from_toml_str(
        r#"
        case_sensitive_database_names = true

        [database]
        backend = "oracle"
        "#,
    )
    .unwrap();
    let report = Report::from_settings("r", &settings).unwrap();
    let mut query = SqlQuery::new();
    query.add_selectable(Table::new("ORDERS").column("Total"));
    assert_eq!(
        query.to_display_sql(&report).unwrap(),
        "select ORDERS.\"Total\" from ORDERS"
    );
}
