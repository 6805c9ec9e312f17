//! Execution-mode compile results and their bind parameters.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// How a bound value should be handed to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindKind {
    /// Bind as a date only. Timestamps are narrowed to their calendar date.
    Date,
    /// Bind with the driver's generic object binding.
    Object,
}

/// One value bound to one `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindParam {
    /// The 1-based placeholder position.
    pub index: usize,
    /// The value to bind.
    pub value: Value,
    /// The binding to use.
    pub kind: BindKind,
}

/// SQL with `?` placeholders and the values to bind to them, in order.
///
/// An empty `sql` means the report selects nothing yet and there is
/// nothing to run.
///
/// # Examples
///
/// ```
/// use reportql_db::query::binder::PreparedQuery;
/// use reportql_db::value::Value;
///
/// let query = PreparedQuery::new(
///     "select a from t where a = ? and b = '?'",
///     vec![Value::Int(1)],
/// );
/// assert_eq!(query.placeholder_count(), 1);
/// assert_eq!(query.to_numbered(), "select a from t where a = $1 and b = '?'");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreparedQuery {
    /// The statement text.
    pub sql: String,
    /// Bound values, one per placeholder, left to right.
    pub values: Vec<Value>,
}

impl PreparedQuery {
    /// Creates a prepared query.
    pub fn new(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }

    /// Returns `true` if there is no statement to run.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Counts `?` placeholders outside quoted literals, quoted identifiers,
    /// and comments.
    pub fn placeholder_count(&self) -> usize {
        placeholder_offsets(&self.sql).len()
    }

    /// Returns the bind parameters in placeholder order.
    ///
    /// Date and timestamp values are bound as dates.
    pub fn bind_params(&self) -> Vec<BindParam> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let (value, kind) = match value.as_date() {
                    Some(date) => (Value::Date(date), BindKind::Date),
                    None => (value.clone(), BindKind::Object),
                };
                BindParam {
                    index: i + 1,
                    value,
                    kind,
                }
            })
            .collect()
    }

    /// Rewrites the placeholders as `$1, $2, ...` for backends with numbered
    /// parameters.
    pub fn to_numbered(&self) -> String {
        let offsets = placeholder_offsets(&self.sql);
        let mut out = String::with_capacity(self.sql.len() + offsets.len() * 2);
        let mut last = 0;
        for (i, &offset) in offsets.iter().enumerate() {
            out.push_str(&self.sql[last..offset]);
            out.push_str(&format!("${}", i + 1));
            last = offset + 1;
        }
        out.push_str(&self.sql[last..]);
        out
    }
}

/// Byte offsets of the `?` characters outside quoted literals and
/// identifiers (`'...'`, `"..."`, `` `...` ``) and outside `--` and `/* */`
/// comments. A doubled quote leaves and re-enters the literal.
fn placeholder_offsets(sql: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut chars = sql.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                for (_, inner) in chars.by_ref() {
                    if inner == c {
                        break;
                    }
                }
            }
            '-' if chars.peek().map(|&(_, n)| n) == Some('-') => {
                for (_, inner) in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek().map(|&(_, n)| n) == Some('*') => {
                chars.next();
                let mut prev = '\0';
                for (_, inner) in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            '?' => offsets.push(i),
            _ => {}
        }
    }
    offsets
}
