//! Dependency wait set - notifications held back by a blocking category

use crate::notification::{Category, Notification, NotificationId};

/// Waiting notifications keyed by category, each bucket in creation order
#[derive(Debug, Default, Clone)]
pub struct WaitSet {
    buckets: [Vec<Notification>; Category::COUNT],
}

impl WaitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Insert keeping creation order within the bucket
    pub fn insert(&mut self, notification: Notification) {
        let bucket = &mut self.buckets[notification.category.index()];
        let pos = bucket.partition_point(|n| n.creation_cmp(&notification).is_lt());
        bucket.insert(pos, notification);
    }

    /// Categories that currently have waiting items
    pub fn waiting_categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| !self.buckets[c.index()].is_empty())
            .collect()
    }

    /// Empty a bucket, oldest first
    pub fn take(&mut self, category: Category) -> Vec<Notification> {
        std::mem::take(&mut self.buckets[category.index()])
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.buckets.iter().flatten().find(|n| n.id == id)
    }

    /// All waiting items, oldest first
    pub fn to_vec(&self) -> Vec<Notification> {
        let mut all: Vec<Notification> = self.buckets.iter().flatten().cloned().collect();
        all.sort_by(|a, b| a.creation_cmp(b));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_keeps_creation_order() {
        let older = Notification::new("a", "first", Category::Social);
        let newer = Notification::new("b", "second", Category::Social);
        let (older_id, newer_id) = (older.id, newer.id);

        let mut waiting = WaitSet::new();
        waiting.insert(newer);
        waiting.insert(older);

        let taken: Vec<NotificationId> = waiting.take(Category::Social).iter().map(|n| n.id).collect();
        assert_eq!(taken, vec![older_id, newer_id]);
        assert!(waiting.is_empty());
    }

    #[test]
    fn test_counts_and_lookup() {
        let social = Notification::new("a", "x", Category::Social);
        let news = Notification::new("b", "y", Category::News);
        let social_id = social.id;

        let mut waiting = WaitSet::new();
        waiting.insert(social);
        waiting.insert(news);

        assert_eq!(waiting.len(), 2);
        assert_eq!(waiting.get(social_id).map(|n| n.category), Some(Category::Social));
        assert_eq!(waiting.waiting_categories(), vec![Category::Social, Category::News]);
        assert_eq!(waiting.to_vec()[0].id, social_id);
    }
}
