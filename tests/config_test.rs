//! Tests for loading [`SourceConfig`] from disk and building from it.

use std::io::Write;

use huginn::{DataSource, HuginnError, ServerMode, SourceConfig};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn explicit_file_is_loaded() {
    let file = write_config(
        r#"
        server_mode = "local"
        cache_capacity = 10

        [retry]
        max_attempts = 2
        "#,
    );

    let config = SourceConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.server_mode, ServerMode::Local);
    assert_eq!(config.cache_capacity, 10);
    assert!(config.retry.is_enabled());
    assert!(config.debug_enabled());
}

#[test]
fn missing_explicit_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SourceConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(matches!(err, HuginnError::Configuration(_)));
}

#[test]
fn invalid_toml_names_the_file() {
    let file = write_config("server_mode = ");
    let err = SourceConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, HuginnError::Configuration(_)));
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn bad_server_mode_rejected_at_load() {
    let file = write_config(r#"server_mode = "production""#);
    let err = SourceConfig::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("production"));
}

#[test]
fn loaded_config_builds_source() {
    let file = write_config(
        r#"
        cache_capacity = 3
        user_agent = "course-demo/1.0"
        assignment_server_url = "http://127.0.0.1:9"
        "#,
    );
    let config = SourceConfig::load(Some(file.path())).unwrap();

    let source = DataSource::builder().config(config).build().unwrap();
    assert_eq!(source.cache().capacity(), 3);
    assert_eq!(source.user_agent(), "course-demo/1.0");
    assert_eq!(source.server_mode(), ServerMode::Live);
    assert!(!source.debug_enabled());
}

#[test]
fn builder_setters_override_config() {
    let config = SourceConfig {
        cache_capacity: 50,
        ..SourceConfig::default()
    };
    let source = DataSource::builder()
        .config(config)
        .cache_capacity(5)
        .debug(true)
        .build()
        .unwrap();
    assert_eq!(source.cache().capacity(), 5);
    assert!(source.debug_enabled());
}
