//! Comprehensive unit tests for config.rs module

use std::io::Write;

use tle_ingest::config::{AppConfig, DatabaseConfig, LoggingConfig};
use tle_ingest::models::FieldPolicy;
use tle_ingest::orbit::CentralBody;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.database.path, "data/tle.db");
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.database.connection_timeout_secs, 30);
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_default_parsing_and_orbit_config() {
    let config = AppConfig::default();

    assert_eq!(config.field_policy().unwrap(), FieldPolicy::ZeroFill);
    assert!(!config.parsing.verify_checksum);
    assert_eq!(config.central_body().unwrap(), CentralBody::EARTH);
    assert_eq!(config.sources.manifest_path, "sources.csv");
    assert_eq!(config.sources.tle_directory, "tle");
}

#[test]
fn test_config_validation_success() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_zero_max_connections() {
    let mut config = AppConfig::default();
    config.database.max_connections = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_empty_database_path() {
    let mut config = AppConfig::default();
    config.database.path = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_invalid_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "invalid".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_valid_log_levels() {
    for level in ["trace", "debug", "info", "warn", "error"] {
        let mut config = AppConfig::default();
        config.logging.level = level.to_string();
        assert!(config.validate().is_ok(), "Failed for level: {}", level);
    }
}

#[test]
fn test_config_validation_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_field_policies() {
    let mut config = AppConfig::default();
    config.parsing.field_policy = "strict".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.parse_options().unwrap().policy, FieldPolicy::Strict);

    config.parsing.field_policy = "lenient".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_degenerate_body() {
    let mut config = AppConfig::default();
    config.orbit.mu_km3_s2 = 0.0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.orbit.body_radius_km = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_get_database_url_from_env() {
    std::env::set_var("DATABASE_URL", "sqlite:test.db");
    let config = AppConfig::default();
    assert_eq!(config.get_database_url(), "sqlite:test.db");
    std::env::remove_var("DATABASE_URL");
}

#[test]
fn test_load_from_explicit_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[database]\npath = \"/tmp/explicit.db\"\n\n[parsing]\nfield_policy = \"strict\"\nverify_checksum = true\n"
    )
    .unwrap();

    let config = AppConfig::load_from(Some(file.path())).unwrap();
    assert_eq!(config.database.path, "/tmp/explicit.db");
    assert_eq!(config.field_policy().unwrap(), FieldPolicy::Strict);
    assert!(config.parsing.verify_checksum);
    // Untouched sections keep their defaults
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_from_missing_explicit_file_fails() {
    let result = AppConfig::load_from(Some(std::path::Path::new("/nonexistent/tle-ingest.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_from_rejects_invalid_values() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[logging]\nlevel = \"loud\"\n").unwrap();

    assert!(AppConfig::load_from(Some(file.path())).is_err());
}

#[test]
fn test_database_config_default() {
    let config = DatabaseConfig::default();
    assert_eq!(config.path, "data/tle.db");
}

#[test]
fn test_logging_config_with_file_path() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        file_path: Some("/var/log/tle-ingest.log".to_string()),
        format: "json".to_string(),
    };
    assert!(config.file_path.is_some());
}

#[test]
fn test_config_serializes_to_json() {
    let json = serde_json::to_value(AppConfig::default()).unwrap();
    assert_eq!(json["parsing"]["field_policy"], "zero_fill");
    assert_eq!(json["sources"]["tle_directory"], "tle");
}
