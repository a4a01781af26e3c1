//! Shared ordered result list
//!
//! The list is owned by one search model, which is the only writer. Any
//! number of readers hold clones of the handle and follow changes through
//! [`ListEvent`]s, so a view can update incrementally.

use super::types::{Role, RoleValue, SearchResult};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A structural change to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListEvent {
    /// `count` rows were inserted starting at `start`
    Inserted { start: usize, count: usize },
    /// `count` rows starting at `start` were removed
    Removed { start: usize, count: usize },
    /// The list was replaced wholesale
    Reset,
}

/// Cloneable handle to the shared list
#[derive(Debug, Clone, Default)]
pub struct ResultList {
    rows: Arc<RwLock<Vec<SearchResult>>>,
}

impl ResultList {
    /// Create a new empty list
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<SearchResult>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<SearchResult>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Row at an index
    pub fn row_at(&self, index: usize) -> Option<SearchResult> {
        self.read().get(index).cloned()
    }

    /// Named attribute of a row
    pub fn data(&self, index: usize, role: Role) -> Option<RoleValue> {
        self.read().get(index).map(|row| row.data(role))
    }

    /// Copy of all rows
    pub fn snapshot(&self) -> Vec<SearchResult> {
        self.read().clone()
    }

    /// Remove every row; no event when the list is already empty
    pub(crate) fn reset(&self) -> Option<ListEvent> {
        let mut rows = self.write();
        if rows.is_empty() {
            return None;
        }
        rows.clear();
        Some(ListEvent::Reset)
    }

    /// Apply a mutation under a single write lock
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Vec<SearchResult>) -> R) -> R {
        let mut rows = self.write();
        f(&mut rows)
    }
}

/// Insert rows at `start` as one contiguous range
pub(crate) fn insert_rows(
    rows: &mut Vec<SearchResult>,
    start: usize,
    new_rows: Vec<SearchResult>,
) -> Option<ListEvent> {
    if new_rows.is_empty() {
        return None;
    }
    let count = new_rows.len();
    rows.splice(start..start, new_rows);
    Some(ListEvent::Inserted { start, count })
}

/// Remove a single row
pub(crate) fn remove_row(rows: &mut Vec<SearchResult>, index: usize) -> Option<ListEvent> {
    if index >= rows.len() {
        return None;
    }
    rows.remove(index);
    Some(ListEvent::Removed {
        start: index,
        count: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_remove_events() {
        let list = ResultList::new();

        let event = list.update(|rows| insert_rows(rows, 0, vec![row("a"), row("c")]));
        assert_eq!(event, Some(ListEvent::Inserted { start: 0, count: 2 }));

        let event = list.update(|rows| insert_rows(rows, 1, vec![row("b")]));
        assert_eq!(event, Some(ListEvent::Inserted { start: 1, count: 1 }));
        assert_eq!(list.row_at(1).unwrap().title, "b");

        let event = list.update(|rows| remove_row(rows, 0));
        assert_eq!(event, Some(ListEvent::Removed { start: 0, count: 1 }));
        assert_eq!(list.len(), 2);

        assert_eq!(list.update(|rows| insert_rows(rows, 0, vec![])), None);
        assert_eq!(list.update(|rows| remove_row(rows, 9)), None);
    }

    #[test]
    fn test_reset_only_reports_real_changes() {
        let list = ResultList::new();
        assert_eq!(list.reset(), None);

        list.update(|rows| insert_rows(rows, 0, vec![row("a")]));
        assert_eq!(list.reset(), Some(ListEvent::Reset));
        assert!(list.is_empty());
    }

    #[test]
    fn test_clones_share_rows() {
        let list = ResultList::new();
        let reader = list.clone();
        list.update(|rows| insert_rows(rows, 0, vec![row("a")]));

        assert_eq!(reader.len(), 1);
        assert_eq!(reader.data(0, Role::Title), Some(RoleValue::Text("a".to_string())));
        assert_eq!(reader.data(3, Role::Title), None);
    }
}
