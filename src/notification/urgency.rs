//! Urgency classification for notifications
//!
//! Every incoming notification is scored into a priority in `[0, 100]`:
//! - base weight of its category
//! - plus the best sender rule (exact match earns the full weight, a match on
//!   one word of the sender earns a fraction of it)
//! - plus the weight of every distinct configured keyword found in the content
//!
//! The score also maps onto a coarse [`Urgency`] level used for display.

use std::collections::{HashMap, HashSet};

use super::category::Category;
use super::model::Priority;
use crate::config::ClassifierConfig;

/// Urgency level for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }

    /// Bucket a score: 90+ critical, 70+ high, 40+ medium
    pub fn from_priority(priority: Priority) -> Self {
        match priority.value() {
            90..=100 => Urgency::Critical,
            70..=89 => Urgency::High,
            40..=69 => Urgency::Medium,
            _ => Urgency::Low,
        }
    }
}

/// Lowercase and split on anything that is not a letter or digit
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Deterministic urgency scorer
///
/// Holds only the lookup tables built from configuration; `classify` has no
/// side effects.
#[derive(Debug, Clone)]
pub struct UrgencyClassifier {
    category_weights: [i64; Category::COUNT],
    sender_weights: HashMap<String, i64>,
    keyword_weights: HashMap<String, i64>,
    partial_sender_divisor: i64,
}

impl UrgencyClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let mut category_weights = [config.default_category_weight; Category::COUNT];
        for (category, weight) in &config.category_weights {
            category_weights[category.index()] = *weight;
        }

        Self {
            category_weights,
            sender_weights: config
                .sender_weights
                .iter()
                .map(|(k, v)| (normalize_key(k), *v))
                .collect(),
            keyword_weights: config
                .keyword_weights
                .iter()
                .map(|(k, v)| (normalize_key(k), *v))
                .collect(),
            partial_sender_divisor: config.partial_sender_divisor.max(1),
        }
    }

    /// Score a notification's fields
    pub fn classify(&self, sender: &str, content: &str, category: Category) -> Priority {
        let base = self.category_weights[category.index()];
        // Widened so extreme configured weights cannot overflow
        let score = i128::from(base)
            + i128::from(self.sender_adjustment(sender))
            + self.keyword_adjustment(content);
        Priority::clamped(score.clamp(0, 100) as i64)
    }

    /// Full weight on an exact (case-insensitive) sender match, otherwise the
    /// best weight among the sender's words divided by the partial divisor.
    fn sender_adjustment(&self, sender: &str) -> i64 {
        if let Some(weight) = self.sender_weights.get(&normalize_key(sender)) {
            return *weight;
        }

        tokenize(sender)
            .filter_map(|token| self.sender_weights.get(&token))
            .map(|weight| weight / self.partial_sender_divisor)
            .max()
            .unwrap_or(0)
    }

    /// Sum of weights of distinct keywords present as words in the content
    fn keyword_adjustment(&self, content: &str) -> i128 {
        let tokens: HashSet<String> = tokenize(content).collect();
        tokens
            .iter()
            .filter_map(|token| self.keyword_weights.get(token))
            .map(|weight| i128::from(*weight))
            .sum()
    }
}

impl Default for UrgencyClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
