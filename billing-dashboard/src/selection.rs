use std::collections::BTreeSet;

use crate::models::Row;

/// Checked table rows. Never touches the records themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    ids: BTreeSet<String>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row; returns whether it is selected afterwards
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn select(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    pub fn deselect(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Header checkbox: select exactly the visible rows
    pub fn select_all<T: Row>(&mut self, visible: &[T]) {
        self.ids = visible.iter().map(|row| row.row_id().to_string()).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop selected ids that are no longer visible
    pub fn retain_visible<T: Row>(&mut self, visible: &[T]) {
        let visible: BTreeSet<&str> = visible.iter().map(Row::row_id).collect();
        self.ids.retain(|id| visible.contains(id.as_str()));
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Header checkbox state: checked only when there are rows and all are selected
    pub fn all_selected<T: Row>(&self, visible: &[T]) -> bool {
        !visible.is_empty() && visible.iter().all(|row| self.is_selected(row.row_id()))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
