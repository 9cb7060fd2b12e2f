//! Multi-row selection state.

use cm_common::RecordId;
use std::collections::HashSet;

/// The set of selected record IDs for the active tab.
///
/// Cleared whenever the tab (and therefore the dataset) changes, so a
/// retained id always refers to a record in the current dataset.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    /// Toggle one row: insert if absent, remove if present.
    pub fn toggle(&mut self, id: RecordId) {
        if !self.ids.insert(id) {
            self.ids.remove(&id);
        }
    }

    /// Select every visible row. Rows hidden by the active filter are
    /// deliberately not touched by select-all.
    pub fn select_all<I: IntoIterator<Item = RecordId>>(&mut self, visible: I) {
        self.ids.extend(visible);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Header-checkbox display flag: non-empty dataset fully covered.
    pub fn is_all_selected(&self, dataset_len: usize) -> bool {
        dataset_len > 0 && self.ids.len() == dataset_len
    }

    /// Selected ids in ascending order, for stable request bodies.
    pub fn sorted_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.ids.iter().copied().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_toggle_inserts_then_removes() {
        let mut sel = Selection::new();
        sel.toggle(RecordId(1));
        assert!(sel.contains(RecordId(1)));
        sel.toggle(RecordId(1));
        assert!(!sel.contains(RecordId(1)));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_select_all_then_clear() {
        let mut sel = Selection::new();
        sel.select_all([RecordId(1), RecordId(2), RecordId(3)]);
        assert_eq!(sel.len(), 3);
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn select_all_ignores_hidden_rows() {
        // Only the rows surviving the filter are handed to select_all;
        // hidden rows stay unselected.
        let visible = [RecordId(1), RecordId(3)];
        let mut sel = Selection::new();
        sel.select_all(visible);
        assert!(sel.contains(RecordId(1)));
        assert!(!sel.contains(RecordId(2)));
        assert!(sel.contains(RecordId(3)));
    }

    #[test]
    fn test_is_all_selected() {
        let mut sel = Selection::new();
        assert!(!sel.is_all_selected(0));
        assert!(!sel.is_all_selected(2));

        sel.select_all([RecordId(1), RecordId(2)]);
        assert!(sel.is_all_selected(2));
        assert!(!sel.is_all_selected(3));
    }

    #[test]
    fn test_sorted_ids() {
        let mut sel = Selection::new();
        sel.select_all([RecordId(9), RecordId(2), RecordId(5)]);
        assert_eq!(
            sel.sorted_ids(),
            vec![RecordId(2), RecordId(5), RecordId(9)]
        );
    }

    proptest! {
        // Double toggle is the identity on any starting selection.
        #[test]
        fn prop_double_toggle_identity(
            initial in proptest::collection::hash_set(0i64..100, 0..20),
            id in 0i64..100,
        ) {
            let mut sel = Selection::new();
            sel.select_all(initial.iter().map(|i| RecordId(*i)));
            let before = sel.sorted_ids();

            sel.toggle(RecordId(id));
            sel.toggle(RecordId(id));

            prop_assert_eq!(sel.sorted_ids(), before);
        }
    }
}
