//! Focus (do-not-disturb) mode: the policy and the FIFO holding buffer

use std::collections::VecDeque;

use crate::config::FocusConfig;
use crate::notification::{Category, Notification, NotificationId, Priority};

pub const NORMAL_MODE: &str = "Normal";
pub const DEFAULT_MODE_NAME: &str = "DND";

/// Focus-mode flag plus the rules deciding which items bypass the buffer
#[derive(Debug, Clone)]
pub struct FocusPolicy {
    active: bool,
    mode_name: String,
    override_threshold: Priority,
    bypass_categories: Vec<Category>,
}

impl FocusPolicy {
    pub fn new(config: &FocusConfig) -> Self {
        Self {
            active: false,
            mode_name: DEFAULT_MODE_NAME.to_string(),
            override_threshold: Priority::clamped(i64::from(config.override_threshold)),
            bypass_categories: config.bypass_categories.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mode label: the configured name while active, `Normal` otherwise
    pub fn mode(&self) -> &str {
        if self.active {
            &self.mode_name
        } else {
            NORMAL_MODE
        }
    }

    pub fn set(&mut self, active: bool, mode_name: Option<&str>) {
        self.active = active;
        if let Some(name) = mode_name.map(str::trim).filter(|n| !n.is_empty()) {
            self.mode_name = name.to_string();
        }
    }

    pub fn override_threshold(&self) -> Priority {
        self.override_threshold
    }

    /// Strictly above the threshold, or in a bypass category
    pub fn bypasses(&self, notification: &Notification) -> bool {
        notification.priority > self.override_threshold
            || self.bypass_categories.contains(&notification.category)
    }

    /// True when the item must be parked instead of admitted
    pub fn should_buffer(&self, notification: &Notification) -> bool {
        self.active && !self.bypasses(notification)
    }
}

impl Default for FocusPolicy {
    fn default() -> Self {
        Self::new(&FocusConfig::default())
    }
}

/// FIFO of suppressed notifications, in arrival order
#[derive(Debug, Default, Clone)]
pub struct DndBuffer {
    items: VecDeque<Notification>,
}

impl DndBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, notification: Notification) {
        self.items.push_back(notification);
    }

    /// Take everything, oldest arrival first
    pub fn drain_all(&mut self) -> Vec<Notification> {
        self.items.drain(..).collect()
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Remove one item, keeping the rest in order
    pub fn remove_by_id(&mut self, id: NotificationId) -> Option<Notification> {
        let pos = self.items.iter().position(|n| n.id == id)?;
        self.items.remove(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn category_counts(&self) -> [usize; Category::COUNT] {
        let mut counts = [0; Category::COUNT];
        for n in &self.items {
            counts[n.category.index()] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notif(priority: i64, category: Category) -> Notification {
        let mut n = Notification::new("tester", "msg", category);
        n.priority = Priority::clamped(priority);
        n
    }

    #[test]
    fn test_buffer_is_fifo() {
        let mut buffer = DndBuffer::new();
        let items: Vec<Notification> = (0..3).map(|_| notif(40, Category::Social)).collect();
        let ids: Vec<NotificationId> = items.iter().map(|n| n.id).collect();
        for n in items {
            buffer.enqueue(n);
        }

        let drained: Vec<NotificationId> = buffer.drain_all().iter().map(|n| n.id).collect();
        assert_eq!(drained, ids);
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut buffer = DndBuffer::new();
        let a = notif(10, Category::News);
        let b = notif(20, Category::News);
        let c = notif(30, Category::Social);
        let (a_id, b_id, c_id) = (a.id, b.id, c.id);
        buffer.enqueue(a);
        buffer.enqueue(b);
        buffer.enqueue(c);

        assert_eq!(buffer.remove_by_id(b_id).map(|n| n.id), Some(b_id));
        assert!(buffer.remove_by_id(b_id).is_none());
        let rest: Vec<NotificationId> = buffer.iter().map(|n| n.id).collect();
        assert_eq!(rest, vec![a_id, c_id]);
        assert_eq!(buffer.category_counts()[Category::News.index()], 1);
    }

    #[test]
    fn test_policy_inactive_never_buffers() {
        let policy = FocusPolicy::default();
        assert!(!policy.should_buffer(&notif(10, Category::Social)));
        assert_eq!(policy.mode(), "Normal");
    }

    #[test]
    fn test_policy_threshold_is_strict() {
        let mut policy = FocusPolicy::default();
        policy.set(true, None);

        assert!(policy.should_buffer(&notif(90, Category::Work)));
        assert!(!policy.should_buffer(&notif(91, Category::Work)));
        // Bypass category regardless of score
        assert!(!policy.should_buffer(&notif(5, Category::Emergency)));
    }

    #[test]
    fn test_policy_mode_name() {
        let mut policy = FocusPolicy::default();
        policy.set(true, Some("Deep Work"));
        assert_eq!(policy.mode(), "Deep Work");
        policy.set(false, None);
        assert_eq!(policy.mode(), "Normal");
        policy.set(true, Some("  "));
        assert_eq!(policy.mode(), "Deep Work");
    }
}
