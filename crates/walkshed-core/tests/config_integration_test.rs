//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;
use walkshed_core::config::{ConfigSource, LayeredConfig};

fn clear_env() {
    for var in [
        "WALKSHED_GEOAPIFY_KEY",
        "WALKSHED_POI_RADIUS_M",
        "WALKSHED_QUOTA_LIMIT",
        "WALKSHED_FAST_TTL_SECS",
        "WALKSHED_PLACES_URL",
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("WALKSHED_GEOAPIFY_KEY", "env-key");
    env::set_var("WALKSHED_POI_RADIUS_M", "1500");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
geoapify_api_key = "file-key"
poi_radius_meters = 2500
quota_limit = 7
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.require_api_key().unwrap(), "env-key");
    assert_eq!(config.geoapify_api_key.source, ConfigSource::Environment);
    assert_eq!(config.poi_radius_meters.value, 1500);
    assert_eq!(config.poi_radius_meters.source, ConfigSource::Environment);
    // Not set in env, file wins
    assert_eq!(config.quota_limit.value, 7);
    assert_eq!(config.quota_limit.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_value_is_ignored() {
    clear_env();
    env::set_var("WALKSHED_QUOTA_LIMIT", "plenty");
    env::set_var("WALKSHED_FAST_TTL_SECS", "60");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.quota_limit.value, 5);
    assert_eq!(config.quota_limit.source, ConfigSource::Default);
    assert_eq!(config.fast_ttl_secs.value, 60);

    clear_env();
}

#[test]
#[serial]
fn test_blank_api_key_counts_as_missing() {
    clear_env();
    env::set_var("WALKSHED_GEOAPIFY_KEY", "   ");

    let config = LayeredConfig::with_defaults().load_from_env();
    assert!(config.require_api_key().is_err());

    clear_env();
}

#[test]
fn test_malformed_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "poi_limit = \"many\"").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(result.is_err());
}

#[test]
fn test_missing_file_is_rejected() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/walkshed.toml");
    assert!(result.is_err());
}
