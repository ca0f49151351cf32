use outbox_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = OutboxConfig::from_toml("").unwrap();

    // Storage defaults
    assert_eq!(config.storage.db_path, "outbox.db");
    assert!(config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 5_000);
    assert_eq!(config.storage.read_pool_size, 4);

    // Sync defaults
    assert_eq!(config.sync.tag, "sync-mutations");
    assert!(config.sync.background_sync_enabled);
    assert_eq!(config.sync.max_retries, 5);
    assert_eq!(config.sync.status_refresh_interval_ms, 5_000);
    assert!(config.sync.invalidate_on_complete.is_empty());

    // Remote defaults
    assert!(config.remote.url.is_none());
    assert!(config.remote.to_remote_config().is_none());

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
    assert!(config.observability.json);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[storage]
db_path = "/var/lib/app/outbox.db"

[sync]
background_sync_enabled = false
invalidate_on_complete = ["goals", "transactions"]

[remote]
url = "https://project.example.co"
anon_key = "anon"
"#;
    let config = OutboxConfig::from_toml(toml).unwrap();
    assert_eq!(config.storage.db_path, "/var/lib/app/outbox.db");
    // Non-overridden fields keep defaults
    assert!(config.storage.wal_mode);
    assert!(!config.sync.background_sync_enabled);
    assert_eq!(config.sync.max_retries, 5);
    assert_eq!(
        config.sync.invalidate_on_complete,
        vec!["goals".to_string(), "transactions".to_string()]
    );

    let remote = config.remote.to_remote_config().unwrap();
    assert_eq!(remote.url, "https://project.example.co");
    assert_eq!(remote.anon_key, "anon");
    assert!(remote.access_token.is_none());
}

#[test]
fn remote_config_requires_url_and_key() {
    let config = OutboxConfig::from_toml("[remote]\nurl = \"https://x.example\"\n").unwrap();
    assert!(config.remote.to_remote_config().is_none());
}

#[test]
fn config_rejects_malformed_toml() {
    let err = OutboxConfig::from_toml("[sync\nmax_retries = 3").unwrap_err();
    assert!(matches!(err, outbox_core::OutboxError::ConfigError { .. }));
}

#[test]
fn config_serde_roundtrip() {
    let config = OutboxConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = OutboxConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.storage.db_path, config.storage.db_path);
    assert_eq!(roundtripped.sync.tag, config.sync.tag);
}

#[test]
fn remote_config_debug_redacts_keys() {
    let remote = outbox_core::RemoteConfig {
        url: "https://x.example".into(),
        anon_key: "super-secret".into(),
        access_token: Some("token-secret".into()),
    };
    let rendered = format!("{remote:?}");
    assert!(rendered.contains("https://x.example"));
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("token-secret"));
}
