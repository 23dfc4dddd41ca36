//! Per-position set entries for the active workout.
//!
//! The store is a table indexed by exercise position. Every visited
//! position holds at least one set entry; that invariant lives in
//! [`SetList`] and nowhere else.

use crate::sanitize::sanitize;
use crate::{SetEntry, SetField};

static DEFAULT_SETS: [SetEntry; 1] = [SetEntry::EMPTY];

/// Positions at or beyond this are ignored by every mutation
pub const MAX_POSITIONS: usize = 1024;

/// Non-empty list of set entries
#[derive(Clone, Debug, PartialEq, Eq)]
struct SetList(Vec<SetEntry>);

impl SetList {
    fn new() -> Self {
        SetList(vec![SetEntry::EMPTY])
    }

    fn push_empty(&mut self) {
        self.0.push(SetEntry::EMPTY);
    }

    fn remove(&mut self, index: usize) -> bool {
        if self.0.len() <= 1 || index >= self.0.len() {
            return false;
        }
        self.0.remove(index);
        true
    }
}

/// Set entries typed so far, per exercise position
#[derive(Clone, Debug, Default)]
pub struct ProgressStore {
    positions: Vec<Option<SetList>>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets for a position; a single empty entry if it was never visited
    pub fn get_sets(&self, position: usize) -> &[SetEntry] {
        match self.positions.get(position) {
            Some(Some(list)) => &list.0,
            _ => &DEFAULT_SETS,
        }
    }

    /// Whether anything has been recorded for this position yet
    pub fn is_visited(&self, position: usize) -> bool {
        matches!(self.positions.get(position), Some(Some(_)))
    }

    /// Ensure the position holds its default one-entry list
    pub fn visit(&mut self, position: usize) {
        let _ = self.list_mut(position);
    }

    /// Replace one field of one set with its sanitized value.
    ///
    /// Out-of-range `set_index` is ignored: input events can arrive after
    /// the set they targeted was removed.
    pub fn update_set(&mut self, position: usize, set_index: usize, field: SetField, raw: &str) {
        let Some(list) = self.list_mut(position) else {
            return;
        };
        match list.0.get_mut(set_index) {
            Some(entry) => {
                *entry.field_mut(field) = sanitize(raw);
                tracing::debug!(
                    "Position {} set {}: {:?} = {:?}",
                    position,
                    set_index,
                    field,
                    entry.field(field)
                );
            }
            None => {
                tracing::debug!(
                    "Ignoring update for missing set {} at position {}",
                    set_index,
                    position
                );
            }
        }
    }

    /// Append an empty set
    pub fn add_set(&mut self, position: usize) {
        if let Some(list) = self.list_mut(position) {
            list.push_empty();
        }
    }

    /// Remove a set unless it is the last one left
    pub fn remove_set(&mut self, position: usize, set_index: usize) {
        let Some(list) = self.list_mut(position) else {
            return;
        };
        if !list.remove(set_index) {
            tracing::debug!(
                "Kept set {} at position {} (last set or out of range)",
                set_index,
                position
            );
        }
    }

    /// Drop everything; used when a workout is cancelled
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    fn list_mut(&mut self, position: usize) -> Option<&mut SetList> {
        if position >= MAX_POSITIONS {
            tracing::warn!("Ignoring set change for out-of-range position {}", position);
            return None;
        }
        if self.positions.len() <= position {
            self.positions.resize_with(position + 1, || None);
        }
        Some(self.positions[position].get_or_insert_with(SetList::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unvisited_position_has_default_set() {
        let store = ProgressStore::new();
        assert_eq!(store.get_sets(3), &[SetEntry::EMPTY]);
        assert!(!store.is_visited(3));
    }

    #[test]
    fn test_update_set_sanitizes() {
        let mut store = ProgressStore::new();
        store.update_set(0, 0, SetField::Reps, "10 reps");
        store.update_set(0, 0, SetField::Weight, "62.5kg");

        let sets = store.get_sets(0);
        assert_eq!(sets[0].reps, "10");
        assert_eq!(sets[0].weight, "62.5");
        assert_eq!(sets[0].distance, "");
    }

    #[test]
    fn test_update_out_of_range_is_noop() {
        let mut store = ProgressStore::new();
        store.update_set(1, 0, SetField::Reps, "5");
        store.update_set(1, 4, SetField::Reps, "99");

        assert_eq!(store.get_sets(1).len(), 1);
        assert_eq!(store.get_sets(1)[0].reps, "5");
    }

    #[test]
    fn test_add_and_remove_sets() {
        let mut store = ProgressStore::new();
        store.add_set(0);
        store.add_set(0);
        assert_eq!(store.get_sets(0).len(), 3);

        store.update_set(0, 1, SetField::Reps, "8");
        store.remove_set(0, 0);
        assert_eq!(store.get_sets(0).len(), 2);
        assert_eq!(store.get_sets(0)[0].reps, "8");
    }

    #[test]
    fn test_remove_never_empties_list() {
        let mut store = ProgressStore::new();
        store.remove_set(0, 0);
        assert_eq!(store.get_sets(0).len(), 1);

        // Mixed sequence of adds and removes, including out-of-range indices
        let ops: [(bool, usize); 12] = [
            (true, 0),
            (false, 0),
            (false, 0),
            (false, 5),
            (true, 0),
            (true, 0),
            (false, 2),
            (false, 1),
            (false, 0),
            (false, 0),
            (true, 0),
            (false, 1),
        ];
        for (add, index) in ops {
            if add {
                store.add_set(2);
            } else {
                store.remove_set(2, index);
            }
            assert!(!store.get_sets(2).is_empty());
        }
        assert_eq!(store.get_sets(2).len(), 1);
    }

    #[test]
    fn test_positions_are_independent() {
        let mut store = ProgressStore::new();
        store.update_set(0, 0, SetField::Reps, "10");
        store.update_set(2, 0, SetField::Distance, "3.2");

        assert_eq!(store.get_sets(0)[0].distance, "");
        assert_eq!(store.get_sets(2)[0].distance, "3.2");
        assert!(!store.is_visited(1));
        assert_eq!(store.get_sets(1), &[SetEntry::EMPTY]);
    }

    #[test]
    fn test_out_of_range_position_is_ignored() {
        let mut store = ProgressStore::new();
        store.visit(usize::MAX);
        store.update_set(usize::MAX, 0, SetField::Reps, "5");
        store.add_set(MAX_POSITIONS);
        store.remove_set(usize::MAX, 0);

        assert!(!store.is_visited(MAX_POSITIONS));
        assert_eq!(store.get_sets(usize::MAX), &[SetEntry::EMPTY]);

        store.update_set(MAX_POSITIONS - 1, 0, SetField::Reps, "5");
        assert_eq!(store.get_sets(MAX_POSITIONS - 1)[0].reps, "5");
    }

    #[test]
    fn test_clear_resets_store() {
        let mut store = ProgressStore::new();
        store.add_set(0);
        store.clear();
        assert!(!store.is_visited(0));
        assert_eq!(store.get_sets(0).len(), 1);
    }
}
