//! Read models returned by `list`, `visualize` and the mutating calls
//!
//! These are point-in-time copies taken under the state lock; holding one
//! never blocks the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::notification::{
    Category, LifecycleState, Notification, NotificationId, Priority, Urgency,
};

/// Wire form of a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationView {
    pub id: NotificationId,
    pub sender: String,
    pub content: String,
    pub app_type: Category,
    pub priority: Priority,
    pub urgency: Urgency,
    pub timestamp: DateTime<Utc>,
    pub status: LifecycleState,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            sender: n.sender.clone(),
            content: n.content.clone(),
            app_type: n.category,
            priority: n.priority,
            urgency: Urgency::from_priority(n.priority),
            timestamp: n.created_at,
            status: n.state,
        }
    }
}

/// Where an incoming notification ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteOutcome {
    Active,
    Buffered,
    Waiting,
}

/// Result of a successful submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub id: NotificationId,
    pub status: RouteOutcome,
    pub priority: Priority,
}

/// Current focus-mode state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeState {
    pub is_dnd: bool,
    pub mode: String,
}

/// Aggregate counts, recomputed on every read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub message: String,
    pub is_dnd: bool,
    pub mode: String,
    pub total_active: usize,
    pub total_buffered: usize,
    pub total_waiting: usize,
    pub active_by_category: BTreeMap<Category, usize>,
    pub buffered_by_category: BTreeMap<Category, usize>,
}

impl GlobalSummary {
    pub fn new(
        mode: &ModeState,
        active_counts: [usize; Category::COUNT],
        buffered_counts: [usize; Category::COUNT],
        total_waiting: usize,
    ) -> Self {
        let total_active: usize = active_counts.iter().sum();
        let total_buffered: usize = buffered_counts.iter().sum();

        let message = if !mode.is_dnd {
            format!("{} active notifications scheduled.", total_active)
        } else if total_buffered == 0 {
            "Empty".to_string()
        } else {
            format!("{} notifications buffered.", total_buffered)
        };

        Self {
            message,
            is_dnd: mode.is_dnd,
            mode: mode.mode.clone(),
            total_active,
            total_buffered,
            total_waiting,
            active_by_category: nonzero_counts(active_counts),
            buffered_by_category: nonzero_counts(buffered_counts),
        }
    }
}

fn nonzero_counts(counts: [usize; Category::COUNT]) -> BTreeMap<Category, usize> {
    Category::ALL
        .iter()
        .filter(|c| counts[c.index()] > 0)
        .map(|&c| (c, counts[c.index()]))
        .collect()
}

/// Response of `list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Heap level order
    pub active_queue: Vec<NotificationView>,
    /// Arrival order
    pub dnd_buffer: Vec<NotificationView>,
    /// Dependency-locked items, creation order
    pub waiting: Vec<NotificationView>,
    pub is_dnd: bool,
    pub mode: String,
    pub global_summary: GlobalSummary,
}

/// Response of `visualize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugView {
    /// Heap level order
    pub heap: Vec<NotificationView>,
    pub graph: BTreeMap<Category, Vec<Category>>,
    /// Content of each undo entry, most recent first
    pub stack: Vec<String>,
}
