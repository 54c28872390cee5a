//! Notification data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};

use super::category::Category;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique notification id, monotonically increasing in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Allocate the next id
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Urgency score in `[0, 100]`; the heap ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

/// A raw score above [`Priority::MAX`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("priority {0} is outside 0..=100")]
pub struct PriorityOutOfRange(pub u8);

impl Priority {
    pub const MIN: Priority = Priority(0);
    pub const MAX: Priority = Priority(100);

    /// Clamp an arbitrary score into range
    pub fn clamped(score: i64) -> Self {
        Self(score.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = PriorityOutOfRange;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        if raw <= Self::MAX.0 {
            Ok(Self(raw))
        } else {
            Err(PriorityOutOfRange(raw))
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        priority.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a notification
///
/// `Pending` covers both "not yet routed" and "held in the dependency wait set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Pending,
    Active,
    Buffered,
    Dismissed,
    Delivered,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Pending => "pending",
            LifecycleState::Active => "active",
            LifecycleState::Buffered => "buffered",
            LifecycleState::Dismissed => "dismissed",
            LifecycleState::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub sender: String,
    pub content: String,
    pub category: Category,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub state: LifecycleState,
}

const SUMMARY_CHARS: usize = 20;

impl Notification {
    /// Create a pending notification with a fresh id and a zero score
    pub fn new(sender: impl Into<String>, content: impl Into<String>, category: Category) -> Self {
        Self {
            id: NotificationId::next(),
            sender: sender.into(),
            content: content.into(),
            category,
            priority: Priority::MIN,
            created_at: Utc::now(),
            state: LifecycleState::Pending,
        }
    }

    /// Heap order: higher priority first, then earlier creation, then lower id.
    ///
    /// `Ordering::Greater` means `self` should sit closer to the top.
    pub fn rank_cmp(&self, other: &Notification) -> CmpOrdering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.created_at.cmp(&self.created_at))
            .then_with(|| other.id.cmp(&self.id))
    }

    /// Creation order marker: earlier items compare less
    pub fn creation_cmp(&self, other: &Notification) -> CmpOrdering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Short human summary, e.g. `Summary: Mom said call me...`
    pub fn summary(&self) -> String {
        let head: String = self.content.chars().take(SUMMARY_CHARS).collect();
        format!("Summary: {} said {}...", self.sender, head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notif(priority: i64) -> Notification {
        let mut n = Notification::new("tester", "hello", Category::Social);
        n.priority = Priority::clamped(priority);
        n
    }

    #[test]
    fn test_ids_are_monotonic() {
        let a = NotificationId::next();
        let b = NotificationId::next();
        assert!(b > a);
    }

    #[test]
    fn test_priority_clamped() {
        assert_eq!(Priority::clamped(-20), Priority::MIN);
        assert_eq!(Priority::clamped(250), Priority::MAX);
        assert_eq!(Priority::clamped(42).value(), 42);
    }

    #[test]
    fn test_priority_serde_rejects_out_of_range() {
        assert_eq!(serde_json::to_string(&Priority::clamped(42)).unwrap(), "42");
        assert_eq!(serde_json::from_str::<Priority>("100").unwrap(), Priority::MAX);
        assert!(serde_json::from_str::<Priority>("200").is_err());
        assert_eq!(Priority::try_from(101), Err(PriorityOutOfRange(101)));
    }

    #[test]
    fn test_rank_cmp_priority_then_age() {
        let older = notif(50);
        let newer = notif(50);
        let higher = notif(70);

        assert_eq!(higher.rank_cmp(&older), CmpOrdering::Greater);
        // Equal priority: the older item ranks above
        assert_eq!(older.rank_cmp(&newer), CmpOrdering::Greater);
        assert_eq!(newer.rank_cmp(&older), CmpOrdering::Less);
        assert_eq!(older.rank_cmp(&older), CmpOrdering::Equal);
    }

    #[test]
    fn test_summary_truncates_on_char_boundary() {
        let n = Notification::new("Mom", "call me when you land at the airport", Category::Social);
        assert_eq!(n.summary(), "Summary: Mom said call me when you lan...");

        let short = Notification::new("Bank", "代码 1234", Category::Finance);
        assert_eq!(short.summary(), "Summary: Bank said 代码 1234...");
    }

    #[test]
    fn test_lifecycle_serde() {
        assert_eq!(serde_json::to_string(&LifecycleState::Buffered).unwrap(), "\"buffered\"");
        assert_eq!(LifecycleState::Pending.to_string(), "pending");
    }
}
