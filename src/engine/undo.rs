//! Bounded undo stack of dismissal snapshots

use std::collections::VecDeque;

use crate::notification::{LifecycleState, Notification, NotificationId};

pub const DEFAULT_UNDO_CAPACITY: usize = 50;

/// Immutable snapshot of a dismissed notification
///
/// Holds everything needed to put the item back where it ranked before:
/// id, priority, category and the original creation marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    snapshot: Notification,
    /// State the item was in right before dismissal
    previous_state: LifecycleState,
}

impl UndoEntry {
    pub fn new(notification: &Notification) -> Self {
        let previous_state = notification.state;
        let mut snapshot = notification.clone();
        snapshot.state = LifecycleState::Dismissed;
        Self {
            snapshot,
            previous_state,
        }
    }

    pub fn id(&self) -> NotificationId {
        self.snapshot.id
    }

    pub fn content(&self) -> &str {
        &self.snapshot.content
    }

    pub fn previous_state(&self) -> LifecycleState {
        self.previous_state
    }

    pub fn snapshot(&self) -> &Notification {
        &self.snapshot
    }

    /// Fresh pending copy for re-routing; the entry itself is untouched
    pub fn restore(&self) -> Notification {
        let mut restored = self.snapshot.clone();
        restored.state = LifecycleState::Pending;
        restored
    }
}

/// LIFO of [`UndoEntry`], dropping the oldest entry past `capacity`
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Bottom at the front, top at the back
    entries: VecDeque<UndoEntry>,
    capacity: usize,
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push on top; returns the evicted bottom entry when over capacity
    pub fn push(&mut self, entry: UndoEntry) -> Option<UndoEntry> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Most recent entry, or `None` when empty
    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }

    /// Entries from top (most recent) to bottom
    pub fn iter_top_first(&self) -> impl Iterator<Item = &UndoEntry> {
        self.entries.iter().rev()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str) -> UndoEntry {
        let mut n = Notification::new("tester", content, Category::Work);
        n.state = LifecycleState::Active;
        UndoEntry::new(&n)
    }

    use crate::notification::Category;

    #[test]
    fn test_lifo_order() {
        let mut stack = UndoStack::default();
        stack.push(entry("one"));
        stack.push(entry("two"));

        assert_eq!(stack.pop().map(|e| e.content().to_string()), Some("two".to_string()));
        assert_eq!(stack.pop().map(|e| e.content().to_string()), Some("one".to_string()));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_pop_empty_is_none() {
        let mut stack = UndoStack::new(3);
        assert!(stack.pop().is_none());
        assert!(stack.peek().is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut stack = UndoStack::new(2);
        assert!(stack.push(entry("a")).is_none());
        assert!(stack.push(entry("b")).is_none());
        let evicted = stack.push(entry("c")).unwrap();

        assert_eq!(evicted.content(), "a");
        assert_eq!(stack.len(), 2);
        let contents: Vec<&str> = stack.iter_top_first().map(|e| e.content()).collect();
        assert_eq!(contents, vec!["c", "b"]);
    }

    #[test]
    fn test_zero_capacity_becomes_one() {
        let mut stack = UndoStack::new(0);
        stack.push(entry("a"));
        stack.push(entry("b"));
        assert_eq!(stack.capacity(), 1);
        assert_eq!(stack.peek().map(|e| e.content()), Some("b"));
    }

    #[test]
    fn test_restore_leaves_entry_untouched() {
        let e = entry("keep me");
        let restored = e.restore();

        assert_eq!(restored.id, e.id());
        assert_eq!(restored.state, LifecycleState::Pending);
        assert_eq!(e.snapshot().state, LifecycleState::Dismissed);
        assert_eq!(e.previous_state(), LifecycleState::Active);
    }
}
