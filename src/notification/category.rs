//! Notification categories (the `app_type` on the wire)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed set of notification categories.
///
/// Each category has a stable index in `0..Category::COUNT`, used by the
/// dependency graph and per-category counters instead of string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Social,
    Work,
    News,
    Finance,
    Emergency,
    Health,
    Calendar,
}

impl Category {
    pub const COUNT: usize = 7;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Social,
        Category::Work,
        Category::News,
        Category::Finance,
        Category::Emergency,
        Category::Health,
        Category::Calendar,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Social => "social",
            Category::Work => "work",
            Category::News => "news",
            Category::Finance => "finance",
            Category::Emergency => "emergency",
            Category::Health => "health",
            Category::Calendar => "calendar",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unrecognised category name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
