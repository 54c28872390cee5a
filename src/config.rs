//! Configuration - `~/.config/notif-orchestrator/config.json`
//!
//! Every field has a default, so a partial file (or no file at all) is valid.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::notification::Category;

/// Urgency classifier weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Base score per category
    #[serde(default = "default_category_weights")]
    pub category_weights: HashMap<Category, i64>,
    /// Base score for categories missing from `category_weights`
    #[serde(default = "default_category_weight")]
    pub default_category_weight: i64,
    /// Sender name (case-insensitive) -> adjustment
    #[serde(default = "default_sender_weights")]
    pub sender_weights: HashMap<String, i64>,
    /// Content keyword (single word, case-insensitive) -> adjustment
    #[serde(default = "default_keyword_weights")]
    pub keyword_weights: HashMap<String, i64>,
    /// A sender matched on one of its words earns `weight / partial_sender_divisor`
    #[serde(default = "default_partial_sender_divisor")]
    pub partial_sender_divisor: i64,
}

/// Focus (DND) mode policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Items scoring strictly above this bypass the buffer
    #[serde(default = "default_override_threshold")]
    pub override_threshold: u8,
    /// Categories that always bypass the buffer
    #[serde(default = "default_bypass_categories")]
    pub bypass_categories: Vec<Category>,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_undo_capacity")]
    pub undo_capacity: usize,
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// `[parent, child]` pairs: parent blocks child while it has active items
    #[serde(default = "default_dependencies")]
    pub dependencies: Vec<(Category, Category)>,
}

fn default_undo_capacity() -> usize {
    50
}

fn default_override_threshold() -> u8 {
    90
}

fn default_bypass_categories() -> Vec<Category> {
    vec![Category::Emergency]
}

fn default_category_weight() -> i64 {
    20
}

fn default_partial_sender_divisor() -> i64 {
    2
}

fn default_category_weights() -> HashMap<Category, i64> {
    HashMap::from([
        (Category::Emergency, 100),
        (Category::Health, 80),
        (Category::Work, 70),
        (Category::Calendar, 60),
        (Category::Finance, 60),
        (Category::Social, 40),
        (Category::News, 30),
    ])
}

fn default_sender_weights() -> HashMap<String, i64> {
    let family = ["mom", "dad", "wife", "husband"].map(|s| (s.to_string(), 30));
    let work = ["boss", "manager", "hr"].map(|s| (s.to_string(), 20));
    family.into_iter().chain(work).collect()
}

fn default_keyword_weights() -> HashMap<String, i64> {
    let critical = ["emergency", "alert", "urgent", "otp", "code", "911", "asap"]
        .map(|s| (s.to_string(), 25));
    let high = ["fast", "quick", "meeting", "due", "pay"].map(|s| (s.to_string(), 10));
    critical.into_iter().chain(high).collect()
}

fn default_dependencies() -> Vec<(Category, Category)> {
    use Category::*;

    let mut edges: Vec<(Category, Category)> = Category::ALL
        .iter()
        .filter(|c| **c != Emergency)
        .map(|c| (Emergency, *c))
        .collect();
    edges.extend([
        (Health, Social),
        (Health, News),
        (Work, Social),
        (Work, News),
        (Finance, Social),
        (Calendar, Social),
        (Calendar, News),
    ]);
    edges
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            category_weights: default_category_weights(),
            default_category_weight: default_category_weight(),
            sender_weights: default_sender_weights(),
            keyword_weights: default_keyword_weights(),
            partial_sender_divisor: default_partial_sender_divisor(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            override_threshold: default_override_threshold(),
            bypass_categories: default_bypass_categories(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo_capacity: default_undo_capacity(),
            focus: FocusConfig::default(),
            classifier: ClassifierConfig::default(),
            dependencies: default_dependencies(),
        }
    }
}

impl Config {
    /// Default configuration file path
    pub fn path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("notif-orchestrator")
            .join("config.json")
    }

    /// Load from `path` (or the default path). A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::path);

        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Range checks; dependency acyclicity is checked when the graph is built
    pub fn validate(&self) -> Result<()> {
        if self.undo_capacity == 0 {
            bail!("undo_capacity must be at least 1");
        }
        if self.focus.override_threshold > 100 {
            bail!(
                "focus.override_threshold must be within 0..=100, got {}",
                self.focus.override_threshold
            );
        }
        if self.classifier.partial_sender_divisor < 1 {
            bail!("classifier.partial_sender_divisor must be at least 1");
        }
        Ok(())
    }

    /// No dependency rules at all
    pub fn without_dependencies(mut self) -> Self {
        self.dependencies.clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.undo_capacity, 50);
        assert_eq!(config.focus.override_threshold, 90);
        assert_eq!(config.focus.bypass_categories, vec![Category::Emergency]);
        assert_eq!(config.classifier.category_weights[&Category::Work], 70);
        assert_eq!(config.classifier.sender_weights["boss"], 20);
        assert_eq!(config.classifier.keyword_weights["asap"], 25);
        assert!(config.dependencies.contains(&(Category::Emergency, Category::Calendar)));
        assert!(config.dependencies.contains(&(Category::Finance, Category::Social)));
        assert!(!config.dependencies.iter().any(|(p, c)| p == c));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"undo_capacity": 5}"#).unwrap();
        assert_eq!(config.undo_capacity, 5);
        assert_eq!(config.focus, FocusConfig::default());
        assert_eq!(config.dependencies, default_dependencies());
    }

    #[test]
    fn test_dependencies_parse_as_pairs() {
        let config: Config =
            serde_json::from_str(r#"{"dependencies": [["work", "social"]]}"#).unwrap();
        assert_eq!(config.dependencies, vec![(Category::Work, Category::Social)]);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut config = Config::default();
        config.undo_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.focus.override_threshold = 101;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.partial_sender_divisor = 0;
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_without_dependencies() {
        let config = Config::default().without_dependencies();
        assert!(config.dependencies.is_empty());
    }
}
