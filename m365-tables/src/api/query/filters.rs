//! Translation of host query predicates into OData `$filter` fragments

use std::collections::HashMap;

use crate::api::error::{GraphError, GraphResult};

/// Name of the raw-filter escape-hatch column. When the host supplies it,
/// its value is used verbatim and no clauses are derived from other quals.
pub const RAW_FILTER_COLUMN: &str = "filter";

/// Scalar value of a pushed-down predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Bool(bool),
    Int(i64),
}

impl FilterValue {
    /// Render as an OData literal: strings single-quoted (embedded quotes
    /// doubled), booleans and integers bare.
    fn render(&self) -> String {
        match self {
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Comparison operator of a pushed-down predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
}

/// A single host-side predicate on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Qual {
    pub operator: CompareOp,
    pub value: FilterValue,
}

impl Qual {
    pub fn equal(value: FilterValue) -> Self {
        Self {
            operator: CompareOp::Equal,
            value,
        }
    }

    pub fn not_equal(value: FilterValue) -> Self {
        Self {
            operator: CompareOp::NotEqual,
            value,
        }
    }
}

/// Convert a snake_case column name to a camel-cased OData field name
/// (`is_read` → `IsRead`). The Graph API matches property names
/// case-insensitively in filter expressions.
pub fn to_api_field(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut upper_next = true;
    for c in column.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Build an OData `$filter` expression from the pushed-down quals.
///
/// Columns named in `exclude` bind to the request path (user id, drive id)
/// and never become filter clauses. A raw [`RAW_FILTER_COLUMN`] qual takes
/// precedence over every derived clause. `<>` is only translatable for
/// boolean values (rendered as equality against the negation); on any other
/// type it is rejected rather than silently dropped.
pub fn build_filter(
    quals: &HashMap<String, Qual>,
    exclude: &[&str],
) -> GraphResult<Option<String>> {
    if let Some(raw) = quals.get(RAW_FILTER_COLUMN) {
        if let Some(s) = raw.value.as_str() {
            if !s.is_empty() {
                return Ok(Some(s.to_string()));
            }
        }
    }

    let mut columns: Vec<&String> = quals
        .keys()
        .filter(|c| c.as_str() != RAW_FILTER_COLUMN && !exclude.contains(&c.as_str()))
        .collect();
    columns.sort();

    let mut clauses = Vec::with_capacity(columns.len());
    for column in columns {
        let qual = &quals[column];
        let field = to_api_field(column);
        match (qual.operator, &qual.value) {
            (CompareOp::Equal, value) => {
                clauses.push(format!("{} eq {}", field, value.render()));
            }
            (CompareOp::NotEqual, FilterValue::Bool(b)) => {
                clauses.push(format!("{} eq {}", field, !b));
            }
            (CompareOp::NotEqual, _) => {
                return Err(GraphError::UnsupportedQual(format!(
                    "<> is only supported for boolean columns (column {})",
                    column
                )));
            }
        }
    }

    if clauses.is_empty() {
        Ok(None)
    } else {
        Ok(Some(clauses.join(" and ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quals(entries: &[(&str, Qual)]) -> HashMap<String, Qual> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn snake_case_converts_to_api_fields() {
        assert_eq!(to_api_field("user_principal_name"), "UserPrincipalName");
        assert_eq!(to_api_field("is_read"), "IsRead");
        assert_eq!(to_api_field("id"), "Id");
    }

    #[test]
    fn equality_clauses_are_joined_with_and() {
        let q = quals(&[
            ("is_read", Qual::equal(FilterValue::Bool(true))),
            ("subject", Qual::equal(FilterValue::String("hi".into()))),
        ]);
        let filter = build_filter(&q, &[]).unwrap().unwrap();
        assert!(filter.contains("IsRead eq true"));
        assert!(filter.contains("Subject eq 'hi'"));
        assert!(filter.contains(" and "));
    }

    #[test]
    fn string_values_are_quoted_and_escaped() {
        let q = quals(&[(
            "display_name",
            Qual::equal(FilterValue::String("O'Brien".into())),
        )]);
        let filter = build_filter(&q, &[]).unwrap().unwrap();
        assert_eq!(filter, "DisplayName eq 'O''Brien'");
    }

    #[test]
    fn boolean_inequality_negates() {
        let q = quals(&[(
            "has_attachments",
            Qual::not_equal(FilterValue::Bool(true)),
        )]);
        let filter = build_filter(&q, &[]).unwrap().unwrap();
        assert_eq!(filter, "HasAttachments eq false");
    }

    #[test]
    fn string_inequality_is_rejected() {
        let q = quals(&[(
            "subject",
            Qual::not_equal(FilterValue::String("hi".into())),
        )]);
        let err = build_filter(&q, &[]).unwrap_err();
        assert!(matches!(err, GraphError::UnsupportedQual(_)));
    }

    #[test]
    fn raw_filter_overrides_derived_clauses() {
        let q = quals(&[
            ("is_read", Qual::equal(FilterValue::Bool(true))),
            (
                "filter",
                Qual::equal(FilterValue::String("startswith(subject,'x')".into())),
            ),
        ]);
        let filter = build_filter(&q, &[]).unwrap().unwrap();
        assert_eq!(filter, "startswith(subject,'x')");
        assert!(!filter.contains("IsRead"));
    }

    #[test]
    fn excluded_columns_never_become_clauses() {
        let q = quals(&[
            ("user_id", Qual::equal(FilterValue::String("u1".into()))),
            ("is_read", Qual::equal(FilterValue::Bool(false))),
        ]);
        let filter = build_filter(&q, &["user_id"]).unwrap().unwrap();
        assert_eq!(filter, "IsRead eq false");
    }

    #[test]
    fn no_translatable_quals_yields_none() {
        let q = quals(&[("user_id", Qual::equal(FilterValue::String("u1".into())))]);
        assert_eq!(build_filter(&q, &["user_id"]).unwrap(), None);
    }
}
