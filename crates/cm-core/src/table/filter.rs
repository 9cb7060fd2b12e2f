//! Row filtering over a record set.

use super::{matcher, ColumnSpec, Record};

/// Which columns a query is matched against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnFilter {
    /// Any filterable column may match (OR).
    #[default]
    All,
    /// Only the named column is consulted. An unknown key fails closed.
    Key(String),
}

/// The live search state of one tab.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub text: String,
    pub column: ColumnFilter,
}

impl QueryState {
    /// Normalized query text: trimmed and lowercased. Empty means "show all".
    pub fn normalized(&self) -> String {
        self.text.trim().to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Reset to the empty query with all columns, as on tab switch.
    pub fn clear(&mut self) {
        self.text.clear();
        self.column = ColumnFilter::All;
    }
}

/// Columns a query may match against: everything except the checkbox column.
pub fn filterable_columns(columns: &[ColumnSpec]) -> Vec<&ColumnSpec> {
    columns
        .iter()
        .filter(|c| !c.key.is_empty() && !c.is_select())
        .collect()
}

/// Derive the visible rows for a query. Pure; called on every change.
///
/// An empty query is the identity in original order. A `Key` filter naming
/// an unknown column yields zero rows.
pub fn filter_records(records: &[Record], columns: &[ColumnSpec], query: &QueryState) -> Vec<Record> {
    let q = query.normalized();
    if q.is_empty() {
        return records.to_vec();
    }

    let filterable = filterable_columns(columns);

    records
        .iter()
        .filter(|record| match &query.column {
            ColumnFilter::All => filterable
                .iter()
                .any(|col| matcher::matches(record.get(&col.key), col.ty, &q)),
            ColumnFilter::Key(key) => match filterable.iter().find(|c| &c.key == key) {
                Some(col) => matcher::matches(record.get(&col.key), col.ty, &q),
                None => false,
            },
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;
    use cm_common::RecordId;
    use proptest::prelude::*;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::select(),
            ColumnSpec::new("ID", "id", ColumnType::Number),
            ColumnSpec::new("Full Name", "name", ColumnType::Text),
            ColumnSpec::new("Date Deceased", "deceased_date", ColumnType::Date),
        ]
    }

    fn dataset() -> Vec<Record> {
        vec![
            Record::new(RecordId(1))
                .with_field("id", 1.0)
                .with_field("name", "Alice")
                .with_field("deceased_date", "2024-06-01"),
            Record::new(RecordId(2))
                .with_field("id", 2.0)
                .with_field("name", "Bob")
                .with_field("deceased_date", "2023-01-15"),
        ]
    }

    fn query(text: &str, column: ColumnFilter) -> QueryState {
        QueryState {
            text: text.to_string(),
            column,
        }
    }

    #[test]
    fn test_empty_query_is_identity() {
        let data = dataset();
        let out = filter_records(&data, &columns(), &QueryState::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, RecordId(1));
        assert_eq!(out[1].id, RecordId(2));
    }

    #[test]
    fn test_whitespace_query_is_identity() {
        let out = filter_records(&dataset(), &columns(), &query("   ", ColumnFilter::All));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_all_columns_or_semantics() {
        let out = filter_records(&dataset(), &columns(), &query("ali", ColumnFilter::All));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, RecordId(1));
    }

    #[test]
    fn test_single_column_filter() {
        let q = query("2023", ColumnFilter::Key("deceased_date".into()));
        let out = filter_records(&dataset(), &columns(), &q);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, RecordId(2));
    }

    #[test]
    fn test_unknown_column_fails_closed() {
        let q = query("ali", ColumnFilter::Key("nonexistent".into()));
        assert!(filter_records(&dataset(), &columns(), &q).is_empty());
    }

    #[test]
    fn test_select_column_not_filterable() {
        let cols = columns();
        let keys: Vec<_> = filterable_columns(&cols).iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "name", "deceased_date"]);

        // Even named explicitly, _select fails closed
        let q = query("x", ColumnFilter::Key("_select".into()));
        assert!(filter_records(&dataset(), &cols, &q).is_empty());
    }

    #[test]
    fn test_query_clear() {
        let mut q = query("abc", ColumnFilter::Key("name".into()));
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.column, ColumnFilter::All);
    }

    proptest! {
        // Filtering an already-filtered dataset changes nothing.
        #[test]
        fn prop_filter_idempotent(
            names in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..24),
            text in "[a-z0-9 ]{0,6}",
        ) {
            let cols = columns();
            let data: Vec<Record> = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    Record::new(RecordId(i as i64))
                        .with_field("id", i as f64)
                        .with_field("name", name.as_str())
                })
                .collect();
            let q = query(&text, ColumnFilter::All);

            let once = filter_records(&data, &cols, &q);
            let twice = filter_records(&once, &cols, &q);

            prop_assert_eq!(once.len(), twice.len());
            for (a, b) in once.iter().zip(twice.iter()) {
                prop_assert_eq!(a.id, b.id);
            }
        }
    }
}
