use config::{Config, File, FileFormat};

use anchorspan::presentation::Settings;
use anchorspan::presentation::config::{LlmSettings, StorageProviderSetting};

fn settings_from(toml: &str) -> Settings {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_no_configuration_when_loading_defaults_then_geometry_only_service_is_described() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 8080);
    assert!(!settings.llm.enabled);
    assert!(settings.database.is_none());
    assert_eq!(settings.storage.provider, StorageProviderSetting::Local);
    assert_eq!(settings.worker.batch_size, 5);
    assert_eq!(settings.engine.max_span_width, 420.0);
    assert!(settings.fallback.per_field_schema_only);
}

#[test]
fn given_partial_sections_when_deserializing_then_unset_fields_keep_defaults() {
    let settings = settings_from(
        r#"
        [server]
        port = 9090

        [engine]
        max_span_tokens = 20

        [fallback]
        sanitize_existing = false

        [storage]
        provider = "memory"

        [database]
        url = "postgres://localhost/anchorspan"
        "#,
    );

    assert_eq!(settings.server.port, 9090);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.engine.max_span_tokens, 20);
    assert_eq!(settings.engine.max_span_height, 140.0);
    assert!(!settings.fallback.sanitize_existing);
    assert!(settings.fallback.bulk_enabled);
    assert_eq!(settings.storage.provider, StorageProviderSetting::Memory);
    let database = settings.database.unwrap();
    assert_eq!(database.max_connections, 10);
    assert_eq!(database.connect_attempts, 6);
    assert_eq!(database.acquire_timeout_secs, 5);
}

#[test]
fn given_configured_key_when_resolving_then_it_wins_over_environment() {
    let llm = LlmSettings {
        api_key: Some("sk-configured".to_string()),
        ..LlmSettings::default()
    };

    assert_eq!(llm.resolved_api_key().as_deref(), Some("sk-configured"));
}

#[test]
fn given_local_provider_when_checking_credentials_then_no_key_is_required() {
    let local = LlmSettings {
        provider: "Local".to_string(),
        ..LlmSettings::default()
    };

    assert!(!local.requires_api_key());
    assert!(LlmSettings::default().requires_api_key());
}
