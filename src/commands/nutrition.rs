use chrono::NaiveDateTime;

use crate::models::{MealType, NewMealLog};
use crate::nutrition_api::NutritionLookupResult;
use crate::quality::{analyze_ingredient_quality, IngredientQuality};
use crate::AppState;

/// ---------------------------------------------------------------------------
/// Lookup Commands
/// ---------------------------------------------------------------------------

pub async fn search_food(state: &AppState, query: &str) -> Option<NutritionLookupResult> {
  state.nutrition.search_food(query).await
}

pub async fn lookup_barcode(state: &AppState, barcode: &str) -> Option<NutritionLookupResult> {
  state.nutrition.get_by_barcode(barcode).await
}

/// Healthy staples filtered by the stored profile's restrictions
pub async fn get_nutrition_suggestions(state: &AppState) -> Vec<NutritionLookupResult> {
  let restrictions = state
    .store
    .get_profile()
    .await
    .map(|profile| profile.dietary_restrictions)
    .unwrap_or_default();

  state.nutrition.get_nutrition_suggestions(&restrictions).await
}

pub fn analyze_food_quality(result: &NutritionLookupResult) -> IngredientQuality {
  analyze_ingredient_quality(&result.ingredients_text)
}

pub fn clear_nutrition_cache(state: &AppState) {
  state.nutrition.clear_cache();
  tracing::debug!("Nutrition lookup cache cleared");
}

/// ---------------------------------------------------------------------------
/// Logging From Lookups
/// ---------------------------------------------------------------------------

/// Log a portion of a looked-up food. The meal is named after the product.
pub async fn log_lookup_result(
  state: &AppState,
  result: &NutritionLookupResult,
  meal_type: MealType,
  grams: f64,
  at: NaiveDateTime,
) -> Result<NewMealLog, String> {
  if !grams.is_finite() || grams <= 0.0 {
    return Err("Portion size must be positive".to_string());
  }

  let meal = NewMealLog::from_lookup(&result.product_name, meal_type, result, grams, at);

  if state.store.log_meal(&meal).await {
    Ok(meal)
  } else {
    Err("Failed to log meal".to_string())
  }
}

/// Search, then log the first hit
pub async fn log_searched_food(
  state: &AppState,
  query: &str,
  meal_type: MealType,
  grams: f64,
  at: NaiveDateTime,
) -> Result<NewMealLog, String> {
  let result = state
    .nutrition
    .search_food(query)
    .await
    .ok_or_else(|| format!("No nutrition data found for '{}'", query.trim()))?;

  log_lookup_result(state, &result, meal_type, grams, at).await
}
