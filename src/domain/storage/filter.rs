//! Field filters for document queries
//!
//! Filters address top-level string fields of the stored JSON document.
//! In-memory backends evaluate them with [`DocumentFilter::matches`], SQL
//! backends translate them into predicates over the JSON column.

use serde_json::Value;

/// A predicate over the top-level string fields of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    /// Field equals the value exactly
    Eq { field: String, value: String },
    /// Field contains the value, ignoring case
    ContainsIgnoreCase { field: String, value: String },
    /// Any of the inner filters matches. An empty list matches nothing.
    Or(Vec<DocumentFilter>),
}

impl DocumentFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains_ignore_case(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ContainsIgnoreCase {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn or(filters: Vec<DocumentFilter>) -> Self {
        Self::Or(filters)
    }

    /// Evaluate the filter against a serialized document
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Self::Eq { field, value } => field_str(document, field) == Some(value.as_str()),
            Self::ContainsIgnoreCase { field, value } => field_str(document, field)
                .map(|s| s.to_lowercase().contains(&value.to_lowercase()))
                .unwrap_or(false),
            Self::Or(filters) => filters.iter().any(|f| f.matches(document)),
        }
    }
}

fn field_str<'a>(document: &'a Value, field: &str) -> Option<&'a str> {
    document.get(field).and_then(Value::as_str)
}
