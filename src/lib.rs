pub mod analysis;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod metabolic;
pub mod models;
pub mod nutrition_api;
pub mod quality;
pub mod recommender;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

use std::sync::{Arc, Mutex};

use config::AppConfig;
use db::{Store, StoreError};
use nutrition_api::{LookupError, NutritionClient};
use recommender::MealRecommender;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error(transparent)]
  Config(#[from] config::ConfigError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Lookup(#[from] LookupError),
}

/// Everything a command needs: storage, the lookup client and the recommender
pub struct AppState {
  pub config: AppConfig,
  pub store: Store,
  pub nutrition: NutritionClient,
  pub recommender: Mutex<MealRecommender>,
}

impl AppState {
  pub async fn init(config: AppConfig) -> Result<Self, AppError> {
    let store = Store::open(&config.store).await?;
    let nutrition = NutritionClient::new(&config.nutrition)?;

    Ok(Self {
      config,
      store,
      nutrition,
      recommender: Mutex::new(MealRecommender::new()),
    })
  }

  /// Assemble state around an existing store (tests, embedding)
  pub fn with_store(config: AppConfig, store: Store) -> Result<Self, AppError> {
    let nutrition = NutritionClient::new(&config.nutrition)?;
    Ok(Self {
      config,
      store,
      nutrition,
      recommender: Mutex::new(MealRecommender::new()),
    })
  }
}

/// Load configuration, install logging and open the database
pub async fn run() -> Result<Arc<AppState>, AppError> {
  let config = AppConfig::from_env()?;
  logging::init(&config.log);

  let state = AppState::init(config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialize application state");
    e
  })?;

  tracing::info!("Wellness tracker ready");
  Ok(Arc::new(state))
}
