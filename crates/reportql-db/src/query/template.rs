//! Scanning of where-clause templates.
//!
//! A template is SQL text with embedded references in braces:
//!
//! - `{@id}` - a formula
//! - `{?id}` - a parameter
//! - `{name}` - a column (anything else)
//!
//! [`TemplateScanner`] splits a template into [`Segment`]s. For a parameter
//! it also splits off the word right before the `{`, because that operator
//! may be rewritten depending on the parameter's arity.

/// One piece of a scanned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal SQL text, copied through unchanged.
    Text(&'a str),
    /// A `{@id}` formula reference.
    Formula {
        /// The formula identifier.
        id: &'a str,
    },
    /// A `{?id}` parameter reference.
    Parameter {
        /// The parameter identifier.
        id: &'a str,
        /// The word preceding the reference, not included in the
        /// preceding [`Segment::Text`]. Empty at the start of a template.
        prev_word: &'a str,
    },
    /// A `{name}` column reference.
    Column {
        /// The column name, braces stripped.
        name: &'a str,
    },
}

/// A lazy, single-pass scanner over a template.
///
/// # Examples
///
/// ```
/// use reportql_db::query::template::{Segment, TemplateScanner};
///
/// let segments: Vec<_> = TemplateScanner::new("{orders.total} > {?1}").collect();
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Column { name: "orders.total" },
///         Segment::Text(" "),
///         Segment::Parameter { id: "1", prev_word: ">" },
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TemplateScanner<'a> {
    template: &'a str,
    cursor: usize,
    pending: Option<Segment<'a>>,
    done: bool,
}

impl<'a> TemplateScanner<'a> {
    /// Creates a scanner starting at the beginning of `template`.
    pub const fn new(template: &'a str) -> Self {
        Self {
            template,
            cursor: 0,
            pending: None,
            done: false,
        }
    }

    /// Creates a scanner starting at byte offset `cursor`.
    ///
    /// A cursor past the end of `template`, or one that does not fall on a
    /// character boundary, yields no segments.
    pub fn with_cursor(template: &'a str, cursor: usize) -> Self {
        Self {
            template,
            cursor,
            pending: None,
            done: !template.is_char_boundary(cursor),
        }
    }

    fn finish(&mut self) -> Option<Segment<'a>> {
        self.done = true;
        let rest = &self.template[self.cursor..];
        if rest.is_empty() && self.cursor > 0 {
            None
        } else {
            Some(Segment::Text(rest))
        }
    }
}

impl<'a> Iterator for TemplateScanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }
        if self.done {
            return None;
        }

        let start = self.cursor;
        let Some(open) = self.template[start..].find('{').map(|i| start + i) else {
            return self.finish();
        };
        let Some(close) = self.template[open..].find('}').map(|i| open + i) else {
            tracing::warn!(
                position = open,
                "unmatched '{{' in where clause; treating the rest as literal text"
            );
            return self.finish();
        };

        let inner = &self.template[open + 1..close];
        let (text_end, reference) = match inner.chars().next() {
            Some('@') => (open, Segment::Formula { id: &inner[1..] }),
            Some('?') => {
                let (word_start, prev_word) = previous_word(self.template, start, open);
                (
                    word_start,
                    Segment::Parameter {
                        id: &inner[1..],
                        prev_word,
                    },
                )
            }
            _ => (open, Segment::Column { name: inner }),
        };
        self.cursor = close + 1;

        let text = &self.template[start..text_end];
        if text.is_empty() {
            Some(reference)
        } else {
            self.pending = Some(reference);
            Some(Segment::Text(text))
        }
    }
}

const fn is_operator_char(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '!')
}

/// Finds the word before `open`, looking no further back than `lower`.
///
/// Trailing whitespace is skipped. A run of comparison characters (`=<>!`)
/// is a word on its own, so `x<>{?1}` yields `<>`. Returns the byte offset
/// where the word starts (or `open` if there is none) and the word.
fn previous_word(template: &str, lower: usize, open: usize) -> (usize, &str) {
    let trimmed = template[lower..open].trim_end();
    let Some(last) = trimmed.chars().next_back() else {
        return (open, "");
    };
    let operator = is_operator_char(last);
    let start = trimmed
        .char_indices()
        .rev()
        .take_while(|&(_, c)| !c.is_whitespace() && is_operator_char(c) == operator)
        .last()
        .map_or(trimmed.len(), |(i, _)| i);
    (lower + start, &trimmed[start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(template: &str) -> Vec<Segment<'_>> {
        TemplateScanner::new(template).collect()
    }

    #[test]
    fn test_no_references_is_single_text() {
        assert_eq!(scan("a = 1 and b = 2"), vec![Segment::Text("a = 1 and b = 2")]);
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(scan(""), vec![Segment::Text("")]);
    }

    #[test]
    fn test_formula_reference() {
        assert_eq!(
            scan("x > {@12} + 1"),
            vec![
                Segment::Text("x > "),
                Segment::Formula { id: "12" },
                Segment::Text(" + 1"),
            ]
        );
    }

    #[test]
    fn test_parameter_splits_previous_word() {
        assert_eq!(
            scan("{orders.region} in {?3}"),
            vec![
                Segment::Column { name: "orders.region" },
                Segment::Text(" "),
                Segment::Parameter { id: "3", prev_word: "in" },
            ]
        );
    }

    #[test]
    fn test_parameter_operator_without_spaces() {
        assert_eq!(
            scan("qty<>{?1}"),
            vec![
                Segment::Text("qty"),
                Segment::Parameter { id: "1", prev_word: "<>" },
            ]
        );
    }

    #[test]
    fn test_parameter_at_start_has_empty_previous_word() {
        assert_eq!(
            scan("{?1} = qty"),
            vec![
                Segment::Parameter { id: "1", prev_word: "" },
                Segment::Text(" = qty"),
            ]
        );
    }

    #[test]
    fn test_previous_word_does_not_cross_prior_reference() {
        assert_eq!(
            scan("{@1}{?2}"),
            vec![
                Segment::Formula { id: "1" },
                Segment::Parameter { id: "2", prev_word: "" },
            ]
        );
    }

    #[test]
    fn test_formula_then_parameter() {
        assert_eq!(
            scan("{@1} > {?2}"),
            vec![
                Segment::Formula { id: "1" },
                Segment::Text(" "),
                Segment::Parameter { id: "2", prev_word: ">" },
            ]
        );
    }

    #[test]
    fn test_unmatched_brace_is_literal() {
        assert_eq!(
            scan("a = {b} and c = {d"),
            vec![
                Segment::Text("a = "),
                Segment::Column { name: "b" },
                Segment::Text(" and c = {d"),
            ]
        );
    }

    #[test]
    fn test_unmatched_brace_at_start() {
        assert_eq!(scan("{oops"), vec![Segment::Text("{oops")]);
    }

    #[test]
    fn test_trailing_reference_has_no_trailing_text() {
        assert_eq!(scan("{a}"), vec![Segment::Column { name: "a" }]);
    }

    #[test]
    fn test_with_cursor() {
        let segments: Vec<_> = TemplateScanner::with_cursor("{a} or {b}", 3).collect();
        assert_eq!(segments, vec![Segment::Text(" or "), Segment::Column { name: "b" }]);
    }

    #[test]
    fn test_with_cursor_out_of_range_yields_nothing() {
        assert_eq!(TemplateScanner::with_cursor("abc", 10).count(), 0);
        assert_eq!(TemplateScanner::with_cursor("é{a}", 1).count(), 0);
        assert_eq!(TemplateScanner::with_cursor("abc", 3).count(), 0);
        assert_eq!(
            TemplateScanner::with_cursor("é{a}", 2).collect::<Vec<_>>(),
            vec![Segment::Column { name: "a" }]
        );
    }

    #[test]
    fn test_previous_word_unicode() {
        assert_eq!(previous_word("straße ≠ {?1}", 0, 12), (8, "≠"));
    }
}
