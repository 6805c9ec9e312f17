//! # reportql-db
//!
//! The report query compiler. A report's selected fields, joins, groups,
//! sorts, and where-clause template are compiled into SQL in two forms: a
//! display string for showing the user what will run, and an execution
//! string with `?` placeholders plus the ordered values to bind.
//!
//! ## Architecture
//!
//! A [`SqlQuery`](query::SqlQuery) is mutated over a report's design
//! lifetime and never caches compiled output. Every compile recomputes the
//! table set, scans the where clause with a
//! [`TemplateScanner`](query::TemplateScanner), and resolves each reference
//! through a fresh [`TemplateRenderer`](query::TemplateRenderer), which owns
//! the bound-value list for that compile only.
//!
//! ## Module Overview
//!
//! - [`value`] - The backend-agnostic [`Value`](value::Value) enum
//! - [`dialect`] - Per-backend identifier metadata and quoting
//! - [`schema`] - Tables, columns, and joins
//! - [`formula`] - Formulas and their evaluators
//! - [`parameter`] - Parameters and the source of their values
//! - [`selectable`] - Selectable fields, groups, and sort orders
//! - [`report`] - The report definition
//! - [`query`] - Template scanning, resolution, and query assembly

// These clippy lints are intentionally allowed for the compiler crate:
// - format_push_string: format! with push_str is clearer than write! for SQL generation
// - doc_markdown: backtick requirements for documentation items are too strict
// - missing_const_for_fn: several accessors may grow non-const bodies
#![allow(clippy::format_push_string)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::match_same_arms)]
// literal_string_with_formatting_args: `{?name}` and `{@name}` templates are intentional
#![allow(clippy::literal_string_with_formatting_args)]

pub mod dialect;
pub mod formula;
pub mod parameter;
pub mod query;
pub mod report;
pub mod schema;
pub mod selectable;
pub mod value;

pub use dialect::{DatabaseBackendType, Dialect, IdentifierQuoter};
pub use formula::{Formula, FormulaEvaluator, LiteralFormulaEvaluator};
pub use parameter::{Arity, Parameter, ParameterValueSource};
pub use query::{PreparedQuery, SqlQuery};
pub use report::{Report, Subreport};
pub use schema::{Column, Join, Table};
pub use selectable::{Group, Selectable, SortOrder, UserColumn};
pub use value::Value;
