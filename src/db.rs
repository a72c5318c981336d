//! SQLite storage for the profile and the meal, water and mood logs
//!
//! The public `Store` surface never propagates errors: failures are logged
//! and turned into `false`, `None` or an empty list, which callers check.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::config::StoreConfig;
use crate::models::{
  DailyTotals, MealLogEntry, MoodLogEntry, NewMealLog, UserProfile, WaterLogEntry,
};

pub type DbPool = SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Query(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization error: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("Invalid stored value: {0}")]
  Invalid(String),
}

/// Profile row as stored; enums and restrictions are text columns
#[derive(Debug, FromRow)]
struct ProfileRow {
  name: String,
  age: i64,
  weight: f64,
  height: f64,
  gender: String,
  activity_level: String,
  goal: String,
  dietary_restrictions: Option<String>,
  allergies: Option<String>,
  daily_calories: f64,
  bmr: f64,
}

impl TryFrom<ProfileRow> for UserProfile {
  type Error = StoreError;

  fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
    let dietary_restrictions = match row.dietary_restrictions.as_deref() {
      Some(json) if !json.trim().is_empty() => serde_json::from_str(json)?,
      _ => Vec::new(),
    };

    Ok(UserProfile {
      name: row.name,
      age: u32::try_from(row.age).map_err(|_| StoreError::Invalid(format!("age {}", row.age)))?,
      weight_kg: row.weight,
      height_cm: row.height,
      gender: row.gender.parse().map_err(StoreError::Invalid)?,
      activity_level: row.activity_level.parse().map_err(StoreError::Invalid)?,
      goal: row.goal.parse().map_err(StoreError::Invalid)?,
      dietary_restrictions,
      allergies: row.allergies.unwrap_or_default(),
      daily_calories: row.daily_calories,
      bmr: row.bmr,
    })
  }
}

/// Application state holding the database connection pool
#[derive(Clone)]
pub struct Store {
  pub db: DbPool,
}

impl Store {
  /// Connect and run migrations
  pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
    tracing::info!(url = %config.database_url, "Initializing database");

    let pool = SqlitePoolOptions::new()
      .max_connections(config.max_connections)
      .connect(&config.database_url)
      .await?;

    let store = Self { db: pool };
    store.migrate().await?;

    tracing::info!("Database initialized successfully");
    Ok(store)
  }

  pub fn from_pool(db: DbPool) -> Self {
    Self { db }
  }

  async fn migrate(&self) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(&self.db).await?;
    Ok(())
  }

  /// Create any missing tables. Idempotent.
  pub async fn init_schema(&self) -> bool {
    report("init schema", self.migrate().await).is_some()
  }

  /// ---------------------------------------------------------------------------
  /// Profile
  /// ---------------------------------------------------------------------------

  /// Overwrite the single current profile
  pub async fn save_profile(&self, profile: &UserProfile) -> bool {
    report("save profile", self.try_save_profile(profile).await).is_some()
  }

  async fn try_save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
    let restrictions = serde_json::to_string(&profile.dietary_restrictions)?;

    sqlx::query(
      r#"
      INSERT INTO user_profile (
        id, name, age, weight, height, gender, activity_level, goal,
        dietary_restrictions, allergies, daily_calories, bmr
      )
      VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
      ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        age = excluded.age,
        weight = excluded.weight,
        height = excluded.height,
        gender = excluded.gender,
        activity_level = excluded.activity_level,
        goal = excluded.goal,
        dietary_restrictions = excluded.dietary_restrictions,
        allergies = excluded.allergies,
        daily_calories = excluded.daily_calories,
        bmr = excluded.bmr,
        updated_at = CURRENT_TIMESTAMP
      "#,
    )
    .bind(&profile.name)
    .bind(profile.age as i64)
    .bind(profile.weight_kg)
    .bind(profile.height_cm)
    .bind(profile.gender.as_str())
    .bind(profile.activity_level.label())
    .bind(profile.goal.label())
    .bind(restrictions)
    .bind(&profile.allergies)
    .bind(profile.daily_calories)
    .bind(profile.bmr)
    .execute(&self.db)
    .await?;

    Ok(())
  }

  pub async fn get_profile(&self) -> Option<UserProfile> {
    report("get profile", self.try_get_profile().await).flatten()
  }

  async fn try_get_profile(&self) -> Result<Option<UserProfile>, StoreError> {
    let row: Option<ProfileRow> = sqlx::query_as(
      r#"
      SELECT name, age, weight, height, gender, activity_level, goal,
             dietary_restrictions, allergies, daily_calories, bmr
      FROM user_profile
      ORDER BY updated_at DESC
      LIMIT 1
      "#,
    )
    .fetch_optional(&self.db)
    .await?;

    row.map(UserProfile::try_from).transpose()
  }

  /// ---------------------------------------------------------------------------
  /// Logging
  /// ---------------------------------------------------------------------------

  pub async fn log_meal(&self, meal: &NewMealLog) -> bool {
    let result = sqlx::query(
      r#"
      INSERT INTO meal_logs (meal_name, meal_type, calories, protein, carbs, fat, date, time)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
      "#,
    )
    .bind(&meal.meal_name)
    .bind(meal.meal_type)
    .bind(meal.calories)
    .bind(meal.protein)
    .bind(meal.carbs)
    .bind(meal.fat)
    .bind(meal.date)
    .bind(&meal.time)
    .execute(&self.db)
    .await;

    report("log meal", result.map_err(StoreError::from)).is_some()
  }

  pub async fn log_water(&self, amount_ml: f64, logged_at: NaiveDateTime) -> bool {
    let result = sqlx::query("INSERT INTO water_logs (amount, logged_at) VALUES (?1, ?2)")
      .bind(amount_ml)
      .bind(logged_at)
      .execute(&self.db)
      .await;

    report("log water", result.map_err(StoreError::from)).is_some()
  }

  /// Ratings outside 1-10 are rejected by the schema
  pub async fn log_mood(&self, rating: i64, notes: &str, logged_at: NaiveDateTime) -> bool {
    let result = sqlx::query("INSERT INTO mood_logs (rating, notes, logged_at) VALUES (?1, ?2, ?3)")
      .bind(rating)
      .bind(notes)
      .bind(logged_at)
      .execute(&self.db)
      .await;

    report("log mood", result.map_err(StoreError::from)).is_some()
  }

  /// ---------------------------------------------------------------------------
  /// Queries
  /// ---------------------------------------------------------------------------

  /// Meals from the last `days` days (today included), newest first
  pub async fn get_recent_meals(&self, days: i64) -> Vec<MealLogEntry> {
    let today = Local::now().date_naive();
    // Windows reaching past the calendar range cover every stored row
    let since = Duration::try_days(days)
      .and_then(|window| today.checked_sub_signed(window))
      .unwrap_or_else(|| {
        tracing::warn!(days, "Recent meal window exceeds the date range, reading all meals");
        NaiveDate::MIN
      });
    let result = sqlx::query_as::<_, MealLogEntry>(
      r#"
      SELECT id, meal_name, meal_type, calories, protein, carbs, fat, date, time
      FROM meal_logs
      WHERE date >= ?1
      ORDER BY date DESC, time DESC
      "#,
    )
    .bind(since)
    .fetch_all(&self.db)
    .await;

    report("get recent meals", result.map_err(StoreError::from)).unwrap_or_default()
  }

  /// Macro sums for one day; `None` when nothing was logged
  pub async fn get_daily_totals(&self, date: NaiveDate) -> Option<DailyTotals> {
    let result: Result<(Option<f64>, Option<f64>, Option<f64>, Option<f64>), _> = sqlx::query_as(
      r#"
      SELECT SUM(calories), SUM(protein), SUM(carbs), SUM(fat)
      FROM meal_logs
      WHERE date = ?1
      "#,
    )
    .bind(date)
    .fetch_one(&self.db)
    .await;

    match report("get daily totals", result.map_err(StoreError::from))? {
      (Some(calories), protein, carbs, fat) => Some(DailyTotals {
        total_calories: calories,
        total_protein: protein.unwrap_or(0.0),
        total_carbs: carbs.unwrap_or(0.0),
        total_fat: fat.unwrap_or(0.0),
      }),
      _ => None,
    }
  }

  /// Meals with `start <= date <= end`, oldest first
  pub async fn get_meals_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<MealLogEntry> {
    let result = sqlx::query_as::<_, MealLogEntry>(
      r#"
      SELECT id, meal_name, meal_type, calories, protein, carbs, fat, date, time
      FROM meal_logs
      WHERE date BETWEEN ?1 AND ?2
      ORDER BY date, time
      "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(&self.db)
    .await;

    report("get meals in range", result.map_err(StoreError::from)).unwrap_or_default()
  }

  pub async fn get_water_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<WaterLogEntry> {
    let result = sqlx::query_as::<_, WaterLogEntry>(
      r#"
      SELECT id, amount, logged_at
      FROM water_logs
      WHERE date(logged_at) BETWEEN ?1 AND ?2
      ORDER BY logged_at
      "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(&self.db)
    .await;

    report("get water in range", result.map_err(StoreError::from)).unwrap_or_default()
  }

  pub async fn get_mood_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<MoodLogEntry> {
    let result = sqlx::query_as::<_, MoodLogEntry>(
      r#"
      SELECT id, rating, notes, logged_at
      FROM mood_logs
      WHERE date(logged_at) BETWEEN ?1 AND ?2
      ORDER BY logged_at
      "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(&self.db)
    .await;

    report("get mood in range", result.map_err(StoreError::from)).unwrap_or_default()
  }
}

/// Log a failed storage operation and collapse the result to an Option
fn report<T>(operation: &str, result: Result<T, StoreError>) -> Option<T> {
  match result {
    Ok(value) => Some(value),
    Err(e) => {
      tracing::error!(error = %e, operation, "Storage operation failed");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{Goal, MealType};
  use crate::test_utils::*;
  use serial_test::serial;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
  }

  #[tokio::test]
  #[serial]
  async fn test_profile_round_trip_and_overwrite() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());

    assert!(store.get_profile().await.is_none());

    let mut profile = mock_user_profile(Goal::LoseWeight, &["Vegan", "Gluten-free"]);
    assert!(store.save_profile(&profile).await);
    assert_eq!(store.get_profile().await, Some(profile.clone()));

    profile.name = "Renamed".to_string();
    profile.goal = Goal::BuildMuscle;
    assert!(store.save_profile(&profile).await);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profile")
      .fetch_one(&pool)
      .await
      .expect("count");
    assert_eq!(count, 1);
    assert_eq!(store.get_profile().await, Some(profile));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_meal_round_trip_preserves_numbers() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());

    let meal = NewMealLog {
      meal_name: "Lentil Soup".to_string(),
      meal_type: MealType::Dinner,
      calories: 432.7,
      protein: 21.35,
      carbs: 55.05,
      fat: 9.125,
      date: day(10),
      time: "19:45".to_string(),
    };
    assert!(store.log_meal(&meal).await);

    let meals = store.get_meals_in_range(day(10), day(10)).await;
    assert_eq!(meals.len(), 1);
    let stored = &meals[0];
    assert_eq!(stored.meal_name, meal.meal_name);
    assert_eq!(stored.meal_type, meal.meal_type);
    assert_eq!(stored.calories, meal.calories);
    assert_eq!(stored.protein, meal.protein);
    assert_eq!(stored.carbs, meal.carbs);
    assert_eq!(stored.fat, meal.fat);
    assert_eq!(stored.date, meal.date);
    assert_eq!(stored.time, meal.time);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_range_queries_are_inclusive_and_ordered() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());

    for (d, time) in [(12, "08:00"), (10, "19:00"), (10, "07:30"), (9, "12:00")] {
      let meal = mock_new_meal_log("Meal", MealType::Lunch, 400.0, day(d), time);
      assert!(store.log_meal(&meal).await);
    }

    let meals = store.get_meals_in_range(day(10), day(12)).await;
    let keys: Vec<_> = meals.iter().map(|m| (m.date, m.time.as_str())).collect();
    assert_eq!(
      keys,
      vec![(day(10), "07:30"), (day(10), "19:00"), (day(12), "08:00")]
    );

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_daily_totals() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());

    assert!(store.get_daily_totals(day(3)).await.is_none());

    store.log_meal(&mock_new_meal_log("A", MealType::Breakfast, 300.0, day(3), "08:00")).await;
    store.log_meal(&mock_new_meal_log("B", MealType::Lunch, 500.0, day(3), "12:00")).await;
    store.log_meal(&mock_new_meal_log("C", MealType::Lunch, 900.0, day(4), "12:00")).await;

    let totals = store.get_daily_totals(day(3)).await.expect("totals");
    assert_eq!(totals.total_calories, 800.0);
    assert_eq!(totals.total_protein, 40.0);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_recent_meals_newest_first() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());
    let today = Local::now().date_naive();

    for (offset, time) in [(0, "08:00"), (0, "13:00"), (3, "12:00"), (30, "12:00")] {
      let date = today - Duration::days(offset);
      store.log_meal(&mock_new_meal_log("Meal", MealType::Lunch, 400.0, date, time)).await;
    }

    let recent = store.get_recent_meals(7).await;
    assert_eq!(recent.len(), 3);
    assert_eq!((recent[0].date, recent[0].time.as_str()), (today, "13:00"));
    assert_eq!(recent[2].date, today - Duration::days(3));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_recent_meals_huge_window_reads_everything() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());
    let today = Local::now().date_naive();

    store.log_meal(&mock_new_meal_log("Old", MealType::Dinner, 600.0, day(1), "19:00")).await;
    store.log_meal(&mock_new_meal_log("New", MealType::Lunch, 400.0, today, "12:00")).await;

    for days in [200_000_000, u32::MAX as i64, i64::MAX] {
      let recent = store.get_recent_meals(days).await;
      assert_eq!(recent.len(), 2, "window of {} days", days);
      assert_eq!(recent[0].meal_name, "New");
    }

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_water_and_mood_ranges() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());

    assert!(store.log_water(250.0, datetime_at(day(5), 9)).await);
    assert!(store.log_water(500.0, datetime_at(day(6), 23)).await);
    assert!(store.log_mood(7, "rested", datetime_at(day(6), 8)).await);

    let water = store.get_water_in_range(day(6), day(6)).await;
    assert_eq!(water.len(), 1);
    assert_eq!(water[0].amount_ml, 500.0);
    assert_eq!(water[0].logged_at, datetime_at(day(6), 23));

    let mood = store.get_mood_in_range(day(1), day(30)).await;
    assert_eq!(mood.len(), 1);
    assert_eq!(mood[0].rating, 7);
    assert_eq!(mood[0].notes, "rested");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_out_of_range_mood_is_rejected() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());

    assert!(!store.log_mood(11, "", datetime_at(day(6), 8)).await);
    assert!(!store.log_mood(0, "", datetime_at(day(6), 8)).await);
    assert!(store.get_mood_in_range(day(1), day(30)).await.is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_failures_degrade_to_sentinels() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());
    pool.close().await;

    assert!(!store.log_water(250.0, datetime_at(day(5), 9)).await);
    assert!(store.get_profile().await.is_none());
    assert!(store.get_meals_in_range(day(1), day(30)).await.is_empty());
    assert!(store.get_daily_totals(day(1)).await.is_none());
  }

  #[tokio::test]
  #[serial]
  async fn test_init_schema_is_idempotent() {
    let pool = setup_test_db().await;
    let store = Store::from_pool(pool.clone());
    assert!(store.init_schema().await);
    assert!(store.init_schema().await);
    teardown_test_db(pool).await;
  }
}
