use crate::error::{Result, WalkshedError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PLACES_URL: &str = "https://api.geoapify.com/v2/places";
pub const DEFAULT_ISOLINE_URL: &str = "https://api.geoapify.com/v1/isoline";

/// Upper bounds accepted by `LayeredConfig::validate`
pub const MAX_WALK_MINUTES: u32 = 240;
pub const MAX_POI_RADIUS_METERS: u32 = 50_000;
pub const MAX_POI_LIMIT: usize = 500;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the lookup core
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub geoapify_api_key: ConfigValue<Option<String>>,
    pub places_url: ConfigValue<String>,
    pub isoline_url: ConfigValue<String>,
    pub poi_radius_meters: ConfigValue<u32>,
    pub poi_limit: ConfigValue<usize>,
    pub walk_minutes: ConfigValue<u32>,
    pub cache_decimals: ConfigValue<u32>,
    pub fast_ttl_secs: ConfigValue<u64>,
    pub durable_ttl_secs: ConfigValue<u64>,
    pub quota_limit: ConfigValue<u32>,
    pub quota_window_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            geoapify_api_key: ConfigValue::new(None, ConfigSource::Default),
            places_url: ConfigValue::new(DEFAULT_PLACES_URL.to_string(), ConfigSource::Default),
            isoline_url: ConfigValue::new(DEFAULT_ISOLINE_URL.to_string(), ConfigSource::Default),
            poi_radius_meters: ConfigValue::new(5_000, ConfigSource::Default),
            poi_limit: ConfigValue::new(100, ConfigSource::Default),
            walk_minutes: ConfigValue::new(30, ConfigSource::Default),
            cache_decimals: ConfigValue::new(3, ConfigSource::Default),
            fast_ttl_secs: ConfigValue::new(6 * 60 * 60, ConfigSource::Default),
            durable_ttl_secs: ConfigValue::new(4 * 24 * 60 * 60, ConfigSource::Default),
            quota_limit: ConfigValue::new(5, ConfigSource::Default),
            quota_window_secs: ConfigValue::new(60 * 60, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| WalkshedError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| WalkshedError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        let source = ConfigSource::File;
        if let Some(key) = file_config.geoapify_api_key {
            self.geoapify_api_key.update(Some(key), source);
        }
        if let Some(url) = file_config.places_url {
            self.places_url.update(url, source);
        }
        if let Some(url) = file_config.isoline_url {
            self.isoline_url.update(url, source);
        }
        if let Some(radius) = file_config.poi_radius_meters {
            self.poi_radius_meters.update(radius, source);
        }
        if let Some(limit) = file_config.poi_limit {
            self.poi_limit.update(limit, source);
        }
        if let Some(minutes) = file_config.walk_minutes {
            self.walk_minutes.update(minutes, source);
        }
        if let Some(decimals) = file_config.cache_decimals {
            self.cache_decimals.update(decimals, source);
        }
        if let Some(ttl) = file_config.fast_ttl_secs {
            self.fast_ttl_secs.update(ttl, source);
        }
        if let Some(ttl) = file_config.durable_ttl_secs {
            self.durable_ttl_secs.update(ttl, source);
        }
        if let Some(limit) = file_config.quota_limit {
            self.quota_limit.update(limit, source);
        }
        if let Some(window) = file_config.quota_window_secs {
            self.quota_window_secs.update(window, source);
        }

        Ok(self)
    }

    /// Load configuration from `WALKSHED_*` environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(key) = env::var("WALKSHED_GEOAPIFY_KEY") {
            if !key.trim().is_empty() {
                self.geoapify_api_key.update(Some(key), ConfigSource::Environment);
            }
        }
        if let Ok(url) = env::var("WALKSHED_PLACES_URL") {
            self.places_url.update(url, ConfigSource::Environment);
        }
        if let Ok(url) = env::var("WALKSHED_ISOLINE_URL") {
            self.isoline_url.update(url, ConfigSource::Environment);
        }

        update_from_env(&mut self.poi_radius_meters, "WALKSHED_POI_RADIUS_M");
        update_from_env(&mut self.poi_limit, "WALKSHED_POI_LIMIT");
        update_from_env(&mut self.walk_minutes, "WALKSHED_WALK_MINUTES");
        update_from_env(&mut self.cache_decimals, "WALKSHED_CACHE_DECIMALS");
        update_from_env(&mut self.fast_ttl_secs, "WALKSHED_FAST_TTL_SECS");
        update_from_env(&mut self.durable_ttl_secs, "WALKSHED_DURABLE_TTL_SECS");
        update_from_env(&mut self.quota_limit, "WALKSHED_QUOTA_LIMIT");
        update_from_env(&mut self.quota_window_secs, "WALKSHED_QUOTA_WINDOW_SECS");

        self
    }

    /// The provider API key, which has no default
    pub fn require_api_key(&self) -> Result<String> {
        self.geoapify_api_key.value.clone().ok_or_else(|| WalkshedError::ConfigMissing {
            key: "WALKSHED_GEOAPIFY_KEY".to_string(),
        })
    }

    pub fn fast_ttl(&self) -> Duration {
        Duration::from_secs(self.fast_ttl_secs.value)
    }

    pub fn durable_ttl(&self) -> Duration {
        Duration::from_secs(self.durable_ttl_secs.value)
    }

    pub fn quota_window(&self) -> Duration {
        Duration::from_secs(self.quota_window_secs.value)
    }

    /// Reject combinations the lookup core cannot work with
    pub fn validate(&self) -> Result<()> {
        check_range("walk_minutes", self.walk_minutes.value, 1, MAX_WALK_MINUTES)?;
        check_range("poi_radius_meters", self.poi_radius_meters.value, 1, MAX_POI_RADIUS_METERS)?;
        check_range("poi_limit", self.poi_limit.value, 1, MAX_POI_LIMIT)?;
        if self.cache_decimals.value > 9 {
            return Err(WalkshedError::ConfigInvalid {
                key: "cache_decimals".to_string(),
                reason: format!("{} is above the supported maximum of 9", self.cache_decimals.value),
            });
        }
        if self.fast_ttl_secs.value == 0 || self.durable_ttl_secs.value == 0 {
            return Err(WalkshedError::ConfigInvalid {
                key: "ttl".to_string(),
                reason: "cache expiries must be greater than zero".to_string(),
            });
        }
        if self.fast_ttl_secs.value > self.durable_ttl_secs.value {
            tracing::warn!(
                fast_ttl_secs = self.fast_ttl_secs.value,
                durable_ttl_secs = self.durable_ttl_secs.value,
                "Fast tier outlives durable tier"
            );
        }
        if self.quota_window_secs.value == 0 {
            return Err(WalkshedError::ConfigInvalid {
                key: "quota_window_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        let key_display = match &self.geoapify_api_key.value {
            Some(_) => "<set>".to_string(),
            None => "<unset>".to_string(),
        };
        map.insert("geoapify_api_key".to_string(), (key_display, self.geoapify_api_key.source));
        map.insert("places_url".to_string(), (self.places_url.value.clone(), self.places_url.source));
        map.insert(
            "isoline_url".to_string(),
            (self.isoline_url.value.clone(), self.isoline_url.source),
        );
        insert_display(&mut map, "poi_radius_meters", &self.poi_radius_meters);
        insert_display(&mut map, "poi_limit", &self.poi_limit);
        insert_display(&mut map, "walk_minutes", &self.walk_minutes);
        insert_display(&mut map, "cache_decimals", &self.cache_decimals);
        insert_display(&mut map, "fast_ttl_secs", &self.fast_ttl_secs);
        insert_display(&mut map, "durable_ttl_secs", &self.durable_ttl_secs);
        insert_display(&mut map, "quota_limit", &self.quota_limit);
        insert_display(&mut map, "quota_window_secs", &self.quota_window_secs);

        map
    }
}

fn check_range<T>(key: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(WalkshedError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("{} is outside {}..={}", value, min, max),
        });
    }
    Ok(())
}

fn update_from_env<T>(value: &mut ConfigValue<T>, var: &str)
where
    T: FromStr,
{
    if let Ok(raw) = env::var(var) {
        match raw.trim().parse::<T>() {
            Ok(parsed) => value.update(parsed, ConfigSource::Environment),
            Err(_) => tracing::warn!("Invalid {} value '{}': expected a non-negative integer", var, raw),
        }
    }
}

fn insert_display<T: Display>(
    map: &mut HashMap<String, (String, ConfigSource)>,
    key: &str,
    value: &ConfigValue<T>,
) {
    map.insert(key.to_string(), (value.value.to_string(), value.source));
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    geoapify_api_key: Option<String>,
    places_url: Option<String>,
    isoline_url: Option<String>,
    poi_radius_meters: Option<u32>,
    poi_limit: Option<usize>,
    walk_minutes: Option<u32>,
    cache_decimals: Option<u32>,
    fast_ttl_secs: Option<u64>,
    durable_ttl_secs: Option<u64>,
    quota_limit: Option<u32>,
    quota_window_secs: Option<u64>,
}
