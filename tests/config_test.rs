//! Config file loading

use std::fs;

use notif_orchestrator::{Category, Config, Orchestrator, OrchestratorError};
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load(Some(&dir.path().join("absent.json"))).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_overrides_only_given_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{
            "undo_capacity": 3,
            "focus": { "override_threshold": 75 },
            "dependencies": [["finance", "news"]]
        }"#,
    );

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.undo_capacity, 3);
    assert_eq!(config.focus.override_threshold, 75);
    assert_eq!(config.focus.bypass_categories, vec![Category::Emergency]);
    assert_eq!(config.dependencies, vec![(Category::Finance, Category::News)]);
    assert_eq!(config.classifier, Config::default().classifier);
}

#[test]
fn test_loaded_config_drives_orchestrator() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{
            "undo_capacity": 1,
            "classifier": { "keyword_weights": { "deploy": 50 } },
            "dependencies": []
        }"#,
    );
    let config = Config::load(Some(&path)).unwrap();
    let orchestrator = Orchestrator::new(&config).unwrap();

    // work 70 + deploy 50, clamped
    assert_eq!(orchestrator.classify("ci", "deploy failed", Category::Work).value(), 100);
    // default keywords were replaced
    assert_eq!(orchestrator.classify("ci", "urgent", Category::Work).value(), 70);

    let a = orchestrator.notify("ci", "first", "work").unwrap();
    let b = orchestrator.notify("ci", "second", "work").unwrap();
    orchestrator.dismiss(a.id).unwrap();
    orchestrator.dismiss(b.id).unwrap();
    orchestrator.undo().unwrap();
    // capacity 1 evicted the first dismissal
    assert_eq!(orchestrator.undo(), Err(OrchestratorError::EmptyStack));
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "{ undo_capacity: ");
    let err = Config::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_unknown_category_in_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{ "dependencies": [["work", "gaming"]] }"#);
    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{ "undo_capacity": 0 }"#);
    let err = Config::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("undo_capacity"));
}

#[test]
fn test_cyclic_dependencies_are_rejected_at_startup() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{ "dependencies": [["work", "social"], ["social", "news"], ["news", "work"]] }"#,
    );
    let config = Config::load(Some(&path)).unwrap();
    assert!(matches!(
        Orchestrator::new(&config),
        Err(OrchestratorError::CycleDetected { .. })
    ));
}

#[test]
fn test_extreme_weights_do_not_break_scoring_or_flush() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{
            "classifier": {
                "keyword_weights": { "alpha": 9223372036854775807, "beta": 9223372036854775807 },
                "sender_weights": { "sink": -9223372036854775808 }
            },
            "dependencies": []
        }"#,
    );
    let config = Config::load(Some(&path)).unwrap();
    let orchestrator = Orchestrator::new(&config).unwrap();

    assert_eq!(orchestrator.classify("x", "alpha beta", Category::News).value(), 100);
    assert_eq!(orchestrator.classify("sink", "hello", Category::Work).value(), 0);

    orchestrator.set_mode(true, None);
    orchestrator.notify("sink", "first", "news").unwrap();
    orchestrator.notify("x", "alpha beta", "news").unwrap();
    orchestrator.notify("sink", "third", "social").unwrap();
    assert_eq!(orchestrator.list().dnd_buffer.len(), 2);

    orchestrator.set_mode(false, None);
    let snapshot = orchestrator.list();
    assert!(snapshot.dnd_buffer.is_empty());
    assert_eq!(snapshot.active_queue.len(), 3);
    assert!(orchestrator.consistency_violations().is_empty());
}
