//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install the global subscriber. Returns false if one was already set.
pub fn init(config: &LogConfig) -> bool {
  let env_filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| {
    // Unparsable directives fall back to the crate default
    EnvFilter::new(crate::config::DEFAULT_LOG_FILTER)
  });

  let installed = if config.json {
    tracing_subscriber::fmt()
      .with_env_filter(env_filter)
      .with_target(false)
      .json()
      .try_init()
  } else {
    tracing_subscriber::fmt().with_env_filter(env_filter).try_init()
  };

  installed.is_ok()
}
