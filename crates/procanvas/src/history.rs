//! Linear undo/redo history.
//!
//! [`HistoryStack`] keeps owned [`Snapshot`]s in a bounded deque together
//! with a cursor pointing at the snapshot that is currently visible. The only
//! mutators are [`commit`](HistoryStack::commit), [`undo`](HistoryStack::undo)
//! and [`redo`](HistoryStack::redo). Entries are never modified once stored,
//! so undo followed by redo always restores exactly the same state.

use std::{collections::VecDeque, num::NonZeroUsize};

use log::debug;

use crate::store::Snapshot;

/// Default number of entries kept.
pub const DEFAULT_HISTORY_CAPACITY: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// A bounded, linear history of diagram snapshots.
///
/// The stack always holds at least one entry, and `cursor < len()` holds
/// after every operation.
///
/// # Examples
///
/// ```
/// # use procanvas::{history::HistoryStack, store::Snapshot};
/// let mut history = HistoryStack::new(Snapshot::default());
/// history.commit(Snapshot::default());
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.cursor(), 1);
///
/// assert!(history.undo().is_some());
/// assert_eq!(history.cursor(), 0);
/// assert!(history.undo().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<Snapshot>,
    cursor: usize,
    capacity: NonZeroUsize,
}

impl HistoryStack {
    /// Creates a stack seeded with `initial` and the default capacity.
    pub fn new(initial: Snapshot) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    /// Creates a stack seeded with `initial` that keeps at most `capacity` entries.
    pub fn with_capacity(initial: Snapshot, capacity: NonZeroUsize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.get());
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity,
        }
    }

    /// Records `snapshot` as the newest state.
    ///
    /// Entries after the cursor are discarded first. When the stack then
    /// exceeds its capacity the oldest entry is evicted, so the cursor
    /// always ends on the snapshot just committed.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);

        let mut evicted = 0;
        while self.entries.len() > self.capacity.get() {
            self.entries.pop_front();
            evicted += 1;
        }
        self.cursor = self.entries.len() - 1;

        debug!(len = self.entries.len(), cursor = self.cursor, evicted; "History commit");
    }

    /// Steps back one entry and returns it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor; "History undo");
        self.entries.get(self.cursor)
    }

    /// Steps forward one entry and returns it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        debug!(cursor = self.cursor; "History redo");
        self.entries.get(self.cursor)
    }

    /// Returns the snapshot at the cursor.
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the stack is seeded on construction.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use procanvas_core::{
        geometry::Point,
        model::{DiagramElement, ElementKind},
    };

    use super::*;

    fn snapshot_with(count: usize) -> Snapshot {
        let elements = (0..count)
            .map(|i| {
                DiagramElement::new(
                    format!("task_{i}").as_str().into(),
                    ElementKind::Task,
                    Point::new(i as f32 * 10.0, 0.0),
                )
            })
            .collect();
        Snapshot::new(elements, Vec::new())
    }

    #[test]
    fn test_seeded_with_initial_snapshot() {
        let history = HistoryStack::new(snapshot_with(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current(), &snapshot_with(1));
        assert_eq!(history.capacity().get(), 20);
    }

    #[test]
    fn test_undo_redo_walk_the_cursor() {
        let mut history = HistoryStack::new(snapshot_with(0));
        history.commit(snapshot_with(1));
        history.commit(snapshot_with(2));

        assert_eq!(history.undo(), Some(&snapshot_with(1)));
        assert_eq!(history.undo(), Some(&snapshot_with(0)));
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), 0);

        assert_eq!(history.redo(), Some(&snapshot_with(1)));
        assert_eq!(history.redo(), Some(&snapshot_with(2)));
        assert_eq!(history.redo(), None);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_commit_discards_redo_branch() {
        let mut history = HistoryStack::new(snapshot_with(0));
        history.commit(snapshot_with(1));
        history.commit(snapshot_with(2));
        history.undo();
        history.undo();

        history.commit(snapshot_with(5));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert!(!history.can_redo());
        assert_eq!(history.current(), &snapshot_with(5));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let capacity = NonZeroUsize::new(3).unwrap();
        let mut history = HistoryStack::with_capacity(snapshot_with(0), capacity);
        for count in 1..=5 {
            history.commit(snapshot_with(count));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current(), &snapshot_with(5));

        history.undo();
        history.undo();
        assert_eq!(history.current(), &snapshot_with(3));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_capacity_of_one_keeps_only_latest() {
        let mut history = HistoryStack::with_capacity(snapshot_with(0), NonZeroUsize::MIN);
        history.commit(snapshot_with(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.current(), &snapshot_with(1));
        assert!(history.undo().is_none());
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use procanvas_core::{
        geometry::Point,
        model::{DiagramElement, ElementKind},
    };

    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Commit(u8),
        Undo,
        Redo,
    }

    // ===================
    // Strategies
    // ===================

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u8>().prop_map(Op::Commit),
            1 => Just(Op::Undo),
            1 => Just(Op::Redo),
        ]
    }

    fn capacity_strategy() -> impl Strategy<Value = NonZeroUsize> {
        (1usize..30).prop_map(|n| NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN))
    }

    fn marker_snapshot(tag: u8) -> Snapshot {
        let element = DiagramElement::new(
            format!("task_{tag}").as_str().into(),
            ElementKind::Task,
            Point::new(f32::from(tag), 0.0),
        );
        Snapshot::new(vec![element], Vec::new())
    }

    fn apply(history: &mut HistoryStack, op: Op) {
        match op {
            Op::Commit(tag) => history.commit(marker_snapshot(tag)),
            Op::Undo => {
                history.undo();
            }
            Op::Redo => {
                history.redo();
            }
        }
    }

    // ===================
    // Property Test Functions
    // ===================

    /// The cursor stays in range and the length never exceeds capacity.
    fn check_bounds_hold(ops: &[Op], capacity: NonZeroUsize) -> Result<(), TestCaseError> {
        let mut history = HistoryStack::with_capacity(Snapshot::default(), capacity);
        for &op in ops {
            apply(&mut history, op);
            prop_assert!(history.len() >= 1);
            prop_assert!(history.len() <= capacity.get());
            prop_assert!(history.cursor() < history.len());
        }
        Ok(())
    }

    /// A commit followed by one undo shows the state from before the commit.
    fn check_undo_reverts_commit(ops: &[Op], tag: u8) -> Result<(), TestCaseError> {
        let mut history = HistoryStack::new(Snapshot::default());
        for &op in ops {
            apply(&mut history, op);
        }
        let before = history.current().clone();

        history.commit(marker_snapshot(tag));
        let undone = history.undo().cloned();
        prop_assert_eq!(undone, Some(before));
        Ok(())
    }

    /// Undo then redo returns to the exact state before the undo.
    fn check_undo_redo_is_identity(ops: &[Op]) -> Result<(), TestCaseError> {
        let mut history = HistoryStack::new(Snapshot::default());
        for &op in ops {
            apply(&mut history, op);
        }
        let before = history.current().clone();
        let cursor = history.cursor();

        if history.undo().is_some() {
            prop_assert!(history.redo().is_some());
        }
        prop_assert_eq!(history.current(), &before);
        prop_assert_eq!(history.cursor(), cursor);
        Ok(())
    }

    /// The most recent commit survives eviction and is at the cursor.
    fn check_latest_commit_reachable(
        ops: &[Op],
        capacity: NonZeroUsize,
        tag: u8,
    ) -> Result<(), TestCaseError> {
        let mut history = HistoryStack::with_capacity(Snapshot::default(), capacity);
        for &op in ops {
            apply(&mut history, op);
        }
        history.commit(marker_snapshot(tag));
        prop_assert_eq!(history.current(), &marker_snapshot(tag));
        prop_assert_eq!(history.cursor(), history.len() - 1);
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_hold(ops in prop::collection::vec(op_strategy(), 0..80), capacity in capacity_strategy()) {
            check_bounds_hold(&ops, capacity)?;
        }

        #[test]
        fn undo_reverts_commit(ops in prop::collection::vec(op_strategy(), 0..60), tag in any::<u8>()) {
            check_undo_reverts_commit(&ops, tag)?;
        }

        #[test]
        fn undo_redo_is_identity(ops in prop::collection::vec(op_strategy(), 0..60)) {
            check_undo_redo_is_identity(&ops)?;
        }

        #[test]
        fn latest_commit_reachable(
            ops in prop::collection::vec(op_strategy(), 0..80),
            capacity in capacity_strategy(),
            tag in any::<u8>(),
        ) {
            check_latest_commit_reachable(&ops, capacity, tag)?;
        }
    }
}
