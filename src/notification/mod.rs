//! Notification model and urgency scoring
//!
//! - `category`: the fixed set of notification categories
//! - `model`: ids, priorities, lifecycle states and the notification itself
//! - `urgency`: deterministic urgency classifier

pub mod category;
pub mod model;
pub mod urgency;

pub use category::{Category, UnknownCategory};
pub use model::{LifecycleState, Notification, NotificationId, Priority, PriorityOutOfRange};
pub use urgency::{Urgency, UrgencyClassifier};
