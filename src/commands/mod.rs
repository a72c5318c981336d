//! Application commands: the operations a front end invokes
//!
//! Commands return `Result<_, String>` with a user-facing message; the
//! collaborators underneath have already logged the details.

pub mod dashboard;
pub mod nutrition;

use chrono::{NaiveDateTime, NaiveTime};

use crate::catalog::{self, MealCatalogEntry};
use crate::models::{
  MealType, NewMealLog, NewUserProfile, UserProfile, MOOD_RATING_MAX, MOOD_RATING_MIN,
};
use crate::recommender::{self, ScoredMeal, DEFAULT_RECOMMENDATION_COUNT};
use crate::validation::validate_nutrition_data;
use crate::AppState;

/// ---------------------------------------------------------------------------
/// Profile Commands
/// ---------------------------------------------------------------------------

/// Derive energy targets from the form input and store the profile
pub async fn save_profile(state: &AppState, input: NewUserProfile) -> Result<UserProfile, String> {
  let profile = UserProfile::from_input(input);

  if !state.store.save_profile(&profile).await {
    return Err("Failed to save profile".to_string());
  }

  tracing::info!(
    bmr = profile.bmr,
    daily_calories = profile.daily_calories,
    "Profile saved"
  );
  Ok(profile)
}

pub async fn get_profile(state: &AppState) -> Option<UserProfile> {
  state.store.get_profile().await
}

/// ---------------------------------------------------------------------------
/// Logging Commands
/// ---------------------------------------------------------------------------

/// Validate and store a manually entered meal. The time is stored as
/// zero-padded "HH:MM" so stored meals sort chronologically.
pub async fn log_meal(state: &AppState, mut meal: NewMealLog) -> Result<(), String> {
  if meal.meal_name.trim().is_empty() {
    return Err("Meal name is required".to_string());
  }

  let time = NaiveTime::parse_from_str(meal.time.trim(), "%H:%M")
    .map_err(|_| format!("time: Meal time must be HH:MM, got '{}'", meal.time))?;
  meal.time = time.format("%H:%M").to_string();

  let errors = validate_nutrition_data(meal.calories, meal.protein, meal.carbs, meal.fat);
  if !errors.is_empty() {
    let messages: Vec<String> = errors
      .into_iter()
      .map(|(field, message)| format!("{}: {}", field, message))
      .collect();
    return Err(messages.join("; "));
  }

  if state.store.log_meal(&meal).await {
    Ok(())
  } else {
    Err("Failed to log meal".to_string())
  }
}

/// Log a catalog meal by name as eaten at `at`
pub async fn log_catalog_meal(
  state: &AppState,
  name: &str,
  at: NaiveDateTime,
) -> Result<NewMealLog, String> {
  let entry = catalog::find(name).ok_or_else(|| format!("Unknown meal: {}", name))?;
  let meal = NewMealLog::from_catalog(entry, at);

  if state.store.log_meal(&meal).await {
    Ok(meal)
  } else {
    Err("Failed to log meal".to_string())
  }
}

pub async fn log_water(state: &AppState, amount_ml: f64, at: NaiveDateTime) -> Result<(), String> {
  if !amount_ml.is_finite() || amount_ml <= 0.0 {
    return Err("Water amount must be positive".to_string());
  }

  if state.store.log_water(amount_ml, at).await {
    Ok(())
  } else {
    Err("Failed to log water intake".to_string())
  }
}

pub async fn log_mood(
  state: &AppState,
  rating: i64,
  notes: &str,
  at: NaiveDateTime,
) -> Result<(), String> {
  if !(MOOD_RATING_MIN..=MOOD_RATING_MAX).contains(&rating) {
    return Err(format!(
      "Mood rating must be between {} and {}",
      MOOD_RATING_MIN, MOOD_RATING_MAX
    ));
  }

  if state.store.log_mood(rating, notes, at).await {
    Ok(())
  } else {
    Err("Failed to log mood".to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Recommendation Commands
/// ---------------------------------------------------------------------------

/// Recommendations for the stored profile; `count` defaults to
/// `DEFAULT_RECOMMENDATION_COUNT`
pub async fn get_recommendations(
  state: &AppState,
  meal_type: MealType,
  count: Option<usize>,
) -> Result<Vec<ScoredMeal>, String> {
  let count = count.unwrap_or(DEFAULT_RECOMMENDATION_COUNT);
  let profile = state.store.get_profile().await;

  let mut recommender = state
    .recommender
    .lock()
    .map_err(|e| format!("Recommender unavailable: {}", e))?;

  recommender
    .recommend(profile.as_ref(), meal_type, count)
    .map_err(|e| e.to_string())
}

/// Quick ideas honoring the stored profile's restrictions, if any
pub async fn get_quick_meal_ideas(state: &AppState) -> Vec<&'static MealCatalogEntry> {
  let restrictions = state
    .store
    .get_profile()
    .await
    .map(|profile| profile.dietary_restrictions)
    .unwrap_or_default();

  recommender::get_quick_meal_ideas(&restrictions)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::models::{ActivityLevel, Gender, Goal};
  use crate::test_utils::*;
  use chrono::NaiveDate;
  use serial_test::serial;

  fn noon() -> NaiveDateTime {
    datetime_at(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), 12)
  }

  fn input() -> NewUserProfile {
    NewUserProfile {
      name: "Sam".to_string(),
      age: 30,
      weight_kg: 60.0,
      height_cm: 165.0,
      gender: Gender::Female,
      activity_level: ActivityLevel::ModeratelyActive,
      goal: Goal::ImproveHealth,
      dietary_restrictions: vec!["Vegetarian".to_string()],
      allergies: "peanuts".to_string(),
    }
  }

  #[tokio::test]
  #[serial]
  async fn test_save_profile_derives_and_persists() {
    let pool = setup_test_db().await;
    let state = mock_app_state(pool.clone());

    let profile = save_profile(&state, input()).await.unwrap();
    // 10*60 + 6.25*165 - 5*30 - 161 = 1320.25
    assert_approx_eq!(profile.bmr, 1320.25, 1e-9);
    assert_approx_eq!(profile.daily_calories, 1320.25 * 1.55, 1e-9);
    assert_eq!(get_profile(&state).await, Some(profile));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_log_meal_rejects_invalid_nutrition() {
    let pool = setup_test_db().await;
    let state = mock_app_state(pool.clone());

    let mut meal = mock_new_meal_log("Pizza", MealType::Dinner, 800.0, noon().date(), "19:00");
    meal.calories = -5.0;
    assert!(log_meal(&state, meal).await.is_err());

    let blank = mock_new_meal_log("  ", MealType::Dinner, 800.0, noon().date(), "19:00");
    assert!(log_meal(&state, blank).await.is_err());

    assert!(state.store.get_meals_in_range(noon().date(), noon().date()).await.is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_log_meal_errors_name_their_fields() {
    let pool = setup_test_db().await;
    let state = mock_app_state(pool.clone());

    let mut meal = mock_new_meal_log("Pizza", MealType::Dinner, -5.0, noon().date(), "19:00");
    meal.fat = 900.0;
    let err = log_meal(&state, meal).await.unwrap_err();
    assert!(err.contains("calories: Calories must be between 0 and 10,000"), "{}", err);
    assert!(err.contains("fat: Fat must be between 0 and 500g"), "{}", err);
    assert!(!err.contains("protein:"), "{}", err);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_log_meal_normalizes_time() {
    let pool = setup_test_db().await;
    let state = mock_app_state(pool.clone());
    let date = noon().date();

    log_meal(&state, mock_new_meal_log("Lunch", MealType::Lunch, 500.0, date, "12:00"))
      .await
      .unwrap();
    log_meal(&state, mock_new_meal_log("Oats", MealType::Breakfast, 300.0, date, "9:05"))
      .await
      .unwrap();

    for bad in ["noon", "25:00", "12:75", ""] {
      let err = log_meal(&state, mock_new_meal_log("Snack", MealType::Snack, 100.0, date, bad))
        .await
        .unwrap_err();
      assert!(err.starts_with("time:"), "{}", err);
    }

    let stored = state.store.get_meals_in_range(date, date).await;
    let times: Vec<&str> = stored.iter().map(|m| m.time.as_str()).collect();
    assert_eq!(times, vec!["09:05", "12:00"]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_log_catalog_meal_snapshots_entry() {
    let pool = setup_test_db().await;
    let state = mock_app_state(pool.clone());

    let logged = log_catalog_meal(&state, "Turkey Wrap", noon()).await.unwrap();
    assert_eq!(logged.meal_type, MealType::Lunch);
    assert_eq!(logged.time, "12:00");
    assert!(log_catalog_meal(&state, "Space Food", noon()).await.is_err());

    let stored = state.store.get_meals_in_range(noon().date(), noon().date()).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].calories, logged.calories);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_water_and_mood_validation() {
    let pool = setup_test_db().await;
    let state = mock_app_state(pool.clone());

    assert!(log_water(&state, 0.0, noon()).await.is_err());
    assert!(log_water(&state, 350.0, noon()).await.is_ok());
    assert!(log_mood(&state, 11, "", noon()).await.is_err());
    assert!(log_mood(&state, 8, "good day", noon()).await.is_ok());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_recommendations_require_profile() {
    let pool = setup_test_db().await;
    let state = mock_app_state(pool.clone());

    let err = get_recommendations(&state, MealType::Lunch, None).await.unwrap_err();
    assert_eq!(err, "No user profile has been set up");

    let mut unrestricted = input();
    unrestricted.dietary_restrictions.clear();
    save_profile(&state, unrestricted).await.unwrap();
    let meals = get_recommendations(&state, MealType::Lunch, None).await.unwrap();
    assert_eq!(meals.len(), DEFAULT_RECOMMENDATION_COUNT);
    assert!(meals.iter().all(|m| m.meal.meal_type == MealType::Lunch));

    let one = get_recommendations(&state, MealType::Lunch, Some(1)).await.unwrap();
    assert_eq!(one.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_quick_ideas_use_profile_restrictions() {
    let pool = setup_test_db().await;
    let state = mock_app_state(pool.clone());

    assert_eq!(get_quick_meal_ideas(&state).await.len(), 6);

    let mut vegan = input();
    vegan.dietary_restrictions = vec!["Vegan".to_string()];
    save_profile(&state, vegan).await.unwrap();

    let ideas = get_quick_meal_ideas(&state).await;
    assert!(ideas.iter().all(|m| m.dietary_tags.iter().any(|t| t.eq_ignore_ascii_case("vegan"))));

    teardown_test_db(pool).await;
  }
}
