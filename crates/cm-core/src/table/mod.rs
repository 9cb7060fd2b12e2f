//! The tabular view engine: typed matching, row filtering, selection.
//!
//! Everything here is pure. Records are opaque field maps keyed by column
//! key; the column type, not the value variant, decides how a query is
//! matched against a field.

pub mod filter;
pub mod matcher;
pub mod selection;

pub use filter::{filter_records, filterable_columns, ColumnFilter, QueryState};
pub use matcher::matches;
pub use selection::Selection;

use cm_common::RecordId;
use std::collections::HashMap;

/// Column key marking the checkbox column. Never filterable.
pub const SELECT_KEY: &str = "_select";

/// Matching strategy for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
}

/// One column of a tab view.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub label: String,
    pub key: String,
    pub ty: ColumnType,
}

impl ColumnSpec {
    pub fn new(label: impl Into<String>, key: impl Into<String>, ty: ColumnType) -> Self {
        ColumnSpec {
            label: label.into(),
            key: key.into(),
            ty,
        }
    }

    /// The unlabeled checkbox column.
    pub fn select() -> Self {
        ColumnSpec::new("", SELECT_KEY, ColumnType::Text)
    }

    pub fn is_select(&self) -> bool {
        self.key == SELECT_KEY
    }
}

/// A scalar field value.
///
/// Values may arrive preformatted (e.g. `"₱ 5,000.00"`); matching still
/// works because the column type drives interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
}

impl Value {
    /// String form used for matching and display. Null has none.
    ///
    /// Numbers use the shortest round-trip form, so `5000.0` renders as
    /// `5000` the way a numeric cell would.
    pub fn as_display(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => Some(format_number(*n)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

/// Canonical string form of a number: integral values drop the fraction.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One row of a tab view: a server id plus an opaque field map.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: RecordId,
    pub fields: HashMap<String, Value>,
}

impl Record {
    pub fn new(id: RecordId) -> Self {
        Record {
            id,
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Field lookup; absent keys read as null.
    pub fn get(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_column_excluded_by_flag() {
        assert!(ColumnSpec::select().is_select());
        assert!(!ColumnSpec::new("Name", "name", ColumnType::Text).is_select());
    }

    #[test]
    fn test_value_display_forms() {
        assert_eq!(Value::Null.as_display(), None);
        assert_eq!(Value::from("abc").as_display().unwrap(), "abc");
        assert_eq!(Value::Number(5000.0).as_display().unwrap(), "5000");
        assert_eq!(Value::Number(5000.5).as_display().unwrap(), "5000.5");
    }

    #[test]
    fn test_record_missing_field_is_null() {
        let r = Record::new(RecordId(1)).with_field("name", "Alice");
        assert_eq!(r.get("name"), &Value::Text("Alice".into()));
        assert!(r.get("missing").is_null());
    }

    #[test]
    fn test_value_from_option() {
        let v: Value = Option::<String>::None.into();
        assert!(v.is_null());
        let v: Value = Some("x".to_string()).into();
        assert_eq!(v, Value::Text("x".into()));
    }
}
