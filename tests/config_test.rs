use iconfetch::config::*;
use iconfetch::errors::IconError;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = FetcherConfig::default();
    assert_eq!(config.concurrency, 10);
    assert_eq!(config.timeout_secs, 30);
    assert!(config.user_agent.starts_with("iconfetch/"));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config(&dir.path().join("iconfetch.json")).unwrap();
    assert_eq!(config, FetcherConfig::default());
}

#[test]
fn test_load_partial_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("iconfetch.json");
    std::fs::write(&path, r#"{"concurrency": 3, "timeout_secs": 5}"#).unwrap();

    let config = load_config(&path).unwrap();

    assert_eq!(config.concurrency, 3);
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.max_icon_size, FetcherConfig::default().max_icon_size);
}

#[test]
fn test_load_malformed_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("iconfetch.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = load_config(&path).unwrap_err();

    match err {
        IconError::Config { message } => assert!(message.contains("iconfetch.json")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_config_serde_roundtrip() {
    let config = FetcherConfig {
        concurrency: 7,
        ..FetcherConfig::default()
    };
    let json = serde_json::to_string_pretty(&config).unwrap();
    assert_eq!(FetcherConfig::from_json(&json).unwrap(), config);
}
