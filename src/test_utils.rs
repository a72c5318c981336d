//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Test fixtures
//! - Helper assertions

use crate::config::AppConfig;
use crate::db::Store;
use crate::AppState;
use crate::models::{
  ActivityLevel, Gender, Goal, MealLogEntry, MealType, MoodLogEntry, NewMealLog, NewUserProfile,
  UserProfile, WaterLogEntry,
};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) so every query sees the same in-memory database
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// App state over a test pool with default config
pub fn mock_app_state(pool: SqlitePool) -> AppState {
  AppState::with_store(AppConfig::default(), Store::from_pool(pool)).expect("Failed to build app state")
}

/// Seed one meal per day for the last `days` days (today included)
/// Returns the number of meals written
pub async fn seed_test_meals(store: &Store, days: i64) -> usize {
  let today = Local::now().date_naive();
  let mut written = 0;

  for i in 0..days {
    let meal_type = MealType::ALL[i as usize % MealType::ALL.len()];
    let meal = mock_new_meal_log(
      &format!("Seed meal {}", i),
      meal_type,
      400.0 + (i as f64) * 10.0,
      today - Duration::days(i),
      "12:00",
    );
    if store.log_meal(&meal).await {
      written += 1;
    }
  }

  written
}

/// Save the default mock profile
pub async fn seed_test_profile(store: &Store) -> UserProfile {
  let profile = mock_user_profile(Goal::MaintainWeight, &[]);
  assert!(store.save_profile(&profile).await, "Failed to seed profile");
  profile
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// 25 year old sedentary male, 70 kg / 170 cm (BMR 1642.5, 1971 kcal/day)
pub fn mock_user_profile(goal: Goal, restrictions: &[&str]) -> UserProfile {
  UserProfile::from_input(NewUserProfile {
    name: "Alex".to_string(),
    age: 25,
    weight_kg: 70.0,
    height_cm: 170.0,
    gender: Gender::Male,
    activity_level: ActivityLevel::Sedentary,
    goal,
    dietary_restrictions: restrictions.iter().map(|r| r.to_string()).collect(),
    allergies: String::new(),
  })
}

/// Create a stored-looking meal log (id 0)
#[allow(clippy::too_many_arguments)]
pub fn mock_meal_log(
  name: &str,
  meal_type: MealType,
  calories: f64,
  protein: f64,
  carbs: f64,
  fat: f64,
  date: NaiveDate,
  time: &str,
) -> MealLogEntry {
  MealLogEntry {
    id: 0,
    meal_name: name.to_string(),
    meal_type,
    calories,
    protein,
    carbs,
    fat,
    date,
    time: time.to_string(),
  }
}

/// Create a meal log for insertion with fixed macros (20 g protein, 50 g carbs, 10 g fat)
pub fn mock_new_meal_log(
  name: &str,
  meal_type: MealType,
  calories: f64,
  date: NaiveDate,
  time: &str,
) -> NewMealLog {
  NewMealLog {
    meal_name: name.to_string(),
    meal_type,
    calories,
    protein: 20.0,
    carbs: 50.0,
    fat: 10.0,
    date,
    time: time.to_string(),
  }
}

pub fn mock_water_log(amount_ml: f64, date: NaiveDate, hour: u32) -> WaterLogEntry {
  WaterLogEntry {
    id: 0,
    amount_ml,
    logged_at: datetime_at(date, hour),
  }
}

pub fn mock_mood_log(rating: i64, date: NaiveDate, hour: u32) -> MoodLogEntry {
  MoodLogEntry {
    id: 0,
    rating,
    notes: String::new(),
    logged_at: datetime_at(date, hour),
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// `date` at `hour`:00:00
pub fn datetime_at(date: NaiveDate, hour: u32) -> NaiveDateTime {
  date.and_hms_opt(hour, 0, 0).expect("Invalid hour")
}

/// Local calendar date N days ago
pub fn date_days_ago(days: i64) -> NaiveDate {
  Local::now().date_naive() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[tokio::test]
  #[serial]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('user_profile', 'meal_logs', 'water_logs', 'mood_logs')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 4, "Expected 4 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_seed_meals_returns_correct_count() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());

    assert_eq!(seed_test_meals(&store, 5).await, 5);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meal_logs")
      .fetch_one(&pool)
      .await
      .expect("Failed to count meals");
    assert_eq!(count, 5);

    let recent = store.get_recent_meals(2).await;
    assert_eq!(recent.len(), 3);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_seed_profile_is_readable() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());

    let profile = seed_test_profile(&store).await;
    assert_eq!(store.get_profile().await, Some(profile));

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let profile = mock_user_profile(Goal::LoseWeight, &["Vegan"]);
    assert_approx_eq!(profile.bmr, 1642.5, 1e-9);
    assert_approx_eq!(profile.daily_calories, 1971.0, 1e-9);
    assert_eq!(profile.dietary_restrictions, vec!["Vegan".to_string()]);

    let date = date_days_ago(0);
    let water = mock_water_log(250.0, date, 9);
    assert_eq!(water.logged_at.date(), date);
    assert_eq!(mock_mood_log(7, date, 22).logged_at, datetime_at(date, 22));
  }
}
