//! Query compilation.
//!
//! This module contains the compile pipeline, one stage per submodule:
//!
//! - [`template`] - Splitting where-clause templates into text and references
//! - [`resolver`] - Replacing references with labels or `?` placeholders
//! - [`tables`] - Collecting the name-deduplicated table set
//! - [`compiler`] - Assembling SELECT/FROM/WHERE/ORDER BY text
//! - [`binder`] - Execution-mode results and their bind parameters

pub mod binder;
pub mod compiler;
pub mod resolver;
pub mod tables;
pub mod template;

pub use binder::{BindKind, BindParam, PreparedQuery};
pub use compiler::SqlQuery;
pub use resolver::{CompileMode, TemplateRenderer};
pub use tables::TableCollector;
pub use template::{Segment, TemplateScanner};
