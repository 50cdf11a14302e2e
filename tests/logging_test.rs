//! JSON logging to a file. Kept in its own test binary because the global
//! subscriber can only be installed once per process.

use chrono::{TimeZone, Utc};

use civic_core::record::RequestRecord;
use civic_core::telemetry::{init_logging, LogConfig, LogError, LogFormat};
use civic_core::Engine;

#[test]
fn json_events_are_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("civic.log");
    let config = LogConfig {
        format: LogFormat::Json,
        level: "civic_core=debug".to_string(),
        output_path: Some(path.clone()),
    };
    init_logging(&config).unwrap();

    let mut engine = Engine::default();
    let when = Utc.with_ymd_and_hms(2024, 5, 5, 5, 0, 0).unwrap();
    engine.rehydrate(vec![
        RequestRecord::new("SR-1", "Water", 2, when),
        RequestRecord::new("SR-2", "Water", 2, when),
    ])
    .unwrap();
    engine.components();

    let contents = std::fs::read_to_string(&path).unwrap();
    let events: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let messages: Vec<&str> = events
        .iter()
        .filter_map(|e| e["fields"]["message"].as_str())
        .collect();
    assert!(messages.contains(&"relationship edge created"));
    assert!(messages.contains(&"engine rehydrated"));
    assert!(messages.contains(&"components computed"));

    // A second subscriber cannot be installed.
    assert!(matches!(init_logging(&config), Err(LogError::AlreadyInitialized)));
}
