//! File-based configuration loading.

use portico_config::{ConfigError, ConfigLoader, LogFormat};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn write_config(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_toml_file() {
    let file = write_config(
        ".toml",
        r#"
            [naming]
            prefix = "com.acme."
            random_suffix = false

            [interception]
            logging = false

            [telemetry]
            service_name = "greeter"

            [telemetry.logging]
            format = "pretty"
        "#,
    );

    let config = ConfigLoader::new()
        .with_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.naming.policy().name("Greeter"), "com.acme.Greeter");
    assert!(config.interception.timing);
    assert!(!config.interception.logging);
    assert_eq!(config.telemetry.service_name, "greeter");
    assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
}

#[test]
fn test_json_file() {
    let file = write_config(
        ".json",
        r#"{"naming": {"fixed_name": "X.Y.Z"}, "telemetry": {"metrics": {"enabled": false}}}"#,
    );

    let config = ConfigLoader::new()
        .with_optional_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.naming.fixed_name.as_deref(), Some("X.Y.Z"));
    assert!(!config.telemetry.metrics.enabled);
}

#[test]
fn test_unknown_field_in_file() {
    let file = write_config(
        ".toml",
        r#"
            [naming]
            pefix = "typo."
        "#,
    );

    let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::TomlError(_)));
}

#[test]
fn test_unsupported_extension() {
    let file = write_config(".yaml", "naming: {}");
    let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn test_malformed_json() {
    let file = write_config(".json", "{ not json");
    let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::JsonError(_)));
}

#[test]
fn test_dotenv_file_is_loaded() {
    let file = write_config(".env", "PORTICO_FILE_LOADING_TEST_MARKER=loaded\n");
    ConfigLoader::new().with_dotenv_file(file.path()).unwrap();
    assert_eq!(
        std::env::var("PORTICO_FILE_LOADING_TEST_MARKER").as_deref(),
        Ok("loaded")
    );
}
