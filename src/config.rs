//! Runtime configuration from the environment (and `.env`)

use std::env;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://wellness_tracker.db?mode=rwc";
pub const DEFAULT_API_BASE: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_LOG_FILTER: &str = "wellness_tracker=info";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
  pub database_url: String,
  pub max_connections: u32,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      max_connections: 5,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionConfig {
  pub api_base: String,
  pub timeout_secs: u64,
  /// Max cached lookups; 0 means "use the default"
  pub cache_capacity: usize,
  pub cache_ttl_secs: u64,
}

impl Default for NutritionConfig {
  fn default() -> Self {
    Self {
      api_base: DEFAULT_API_BASE.to_string(),
      timeout_secs: 10,
      cache_capacity: 256,
      cache_ttl_secs: 3600,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
  pub filter: String,
  pub json: bool,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      filter: DEFAULT_LOG_FILTER.to_string(),
      json: false,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
  pub store: StoreConfig,
  pub nutrition: NutritionConfig,
  pub log: LogConfig,
}

impl AppConfig {
  /// Load `.env` if present, then read overrides from the environment
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_process_env()
  }

  /// Read overrides from the process environment only
  pub fn from_process_env() -> Result<Self, ConfigError> {
    let defaults = AppConfig::default();

    Ok(Self {
      store: StoreConfig {
        database_url: env::var("WELLNESS_DATABASE_URL").unwrap_or(defaults.store.database_url),
        max_connections: parse_var("WELLNESS_DB_MAX_CONNECTIONS", defaults.store.max_connections)?,
      },
      nutrition: NutritionConfig {
        api_base: env::var("NUTRITION_API_BASE")
          .map(|base| base.trim_end_matches('/').to_string())
          .unwrap_or(defaults.nutrition.api_base),
        timeout_secs: parse_var("NUTRITION_API_TIMEOUT_SECS", defaults.nutrition.timeout_secs)?,
        cache_capacity: parse_var("NUTRITION_CACHE_CAPACITY", defaults.nutrition.cache_capacity)?,
        cache_ttl_secs: parse_var("NUTRITION_CACHE_TTL_SECS", defaults.nutrition.cache_ttl_secs)?,
      },
      log: LogConfig {
        filter: env::var("RUST_LOG").unwrap_or(defaults.log.filter),
        json: env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false),
      },
    })
  }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
  match env::var(key) {
    Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
      key: key.to_string(),
      value,
    }),
    Err(_) => Ok(default),
  }
}
