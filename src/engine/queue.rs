//! Active queue - binary max-heap with an id -> position index
//!
//! Ordering follows [`Notification::rank_cmp`]: higher priority first, ties
//! broken by earlier creation so older items are not starved.

use std::collections::HashMap;

use crate::notification::{Category, Notification, NotificationId};

/// Max-heap of active notifications supporting removal by id
#[derive(Debug, Default, Clone)]
pub struct PriorityQueue {
    heap: Vec<Notification>,
    /// id -> slot in `heap`, kept in sync by `swap`
    positions: HashMap<NotificationId, usize>,
    category_counts: [usize; Category::COUNT],
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.positions.get(&id).map(|&pos| &self.heap[pos])
    }

    /// Number of active items in `category`
    pub fn count(&self, category: Category) -> usize {
        self.category_counts[category.index()]
    }

    pub fn category_counts(&self) -> [usize; Category::COUNT] {
        self.category_counts
    }

    /// Heap contents in level order
    pub fn as_level_order(&self) -> &[Notification] {
        &self.heap
    }

    /// O(log n). An item whose id is already queued replaces the old copy.
    pub fn insert(&mut self, notification: Notification) {
        if self.contains(notification.id) {
            self.remove_by_id(notification.id);
        }

        let pos = self.heap.len();
        self.positions.insert(notification.id, pos);
        self.category_counts[notification.category.index()] += 1;
        self.heap.push(notification);
        self.sift_up(pos);
    }

    /// O(1)
    pub fn peek(&self) -> Option<&Notification> {
        self.heap.first()
    }

    /// O(log n)
    pub fn extract_top(&mut self) -> Option<Notification> {
        if self.heap.is_empty() {
            return None;
        }
        self.remove_at(0)
    }

    /// O(log n)
    pub fn remove_by_id(&mut self, id: NotificationId) -> Option<Notification> {
        let pos = *self.positions.get(&id)?;
        self.remove_at(pos)
    }

    /// Remove every item of `category`, returned in creation order
    pub fn drain_category(&mut self, category: Category) -> Vec<Notification> {
        if self.count(category) == 0 {
            return Vec::new();
        }

        let ids: Vec<NotificationId> = self
            .heap
            .iter()
            .filter(|n| n.category == category)
            .map(|n| n.id)
            .collect();
        let mut drained: Vec<Notification> =
            ids.into_iter().filter_map(|id| self.remove_by_id(id)).collect();
        drained.sort_by(|a, b| a.creation_cmp(b));
        drained
    }

    /// Every parent outranks (or ties) its children and the index matches the slots
    pub fn is_consistent(&self) -> bool {
        let heap_ok = (1..self.heap.len()).all(|i| {
            let parent = (i - 1) / 2;
            self.heap[parent].rank_cmp(&self.heap[i]).is_ge()
        });
        let index_ok = self.positions.len() == self.heap.len()
            && self
                .heap
                .iter()
                .enumerate()
                .all(|(i, n)| self.positions.get(&n.id) == Some(&i));
        heap_ok && index_ok
    }

    fn remove_at(&mut self, pos: usize) -> Option<Notification> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(pos, last);

        let removed = self.heap.pop()?;
        self.positions.remove(&removed.id);
        self.category_counts[removed.category.index()] -= 1;

        if pos < self.heap.len() {
            self.sift_down(pos);
            self.sift_up(pos);
        }
        Some(removed)
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].id, a);
        self.positions.insert(self.heap[b].id, b);
    }

    fn outranks(&self, a: usize, b: usize) -> bool {
        self.heap[a].rank_cmp(&self.heap[b]).is_gt()
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.outranks(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut best = pos;

            if left < len && self.outranks(left, best) {
                best = left;
            }
            if right < len && self.outranks(right, best) {
                best = right;
            }
            if best == pos {
                break;
            }
            self.swap(pos, best);
            pos = best;
        }
    }
}
