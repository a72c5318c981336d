use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::{self, MacroCalories, NutritionPatterns, NutritionSummary, WeeklyTrend};
use crate::export::{self, ExportKind};
use crate::models::MealType;
use crate::AppState;

/// ---------------------------------------------------------------------------
/// Analytics Commands
/// ---------------------------------------------------------------------------

/// Summary of the last `days` days of meals
pub async fn get_nutrition_summary(state: &AppState, days: u32) -> Result<NutritionSummary, String> {
  let meals = state.store.get_recent_meals(days as i64).await;
  analysis::format_nutrition_summary(&meals, days).map_err(|e| e.to_string())
}

pub async fn get_nutrition_patterns(state: &AppState, days: u32) -> Result<NutritionPatterns, String> {
  let meals = state.store.get_recent_meals(days as i64).await;
  analysis::analyze_nutrition_patterns(&meals).map_err(|e| e.to_string())
}

/// Insights for one day, measured against the stored profile's target
pub async fn get_daily_insights(state: &AppState, date: NaiveDate) -> Vec<String> {
  let totals = state.store.get_daily_totals(date).await;
  let target = state
    .store
    .get_profile()
    .await
    .map(|profile| profile.daily_calories);

  analysis::get_nutrition_insights(totals.as_ref(), target)
}

pub async fn get_meal_timing_insights(state: &AppState, days: u32) -> Vec<String> {
  let meals = state.store.get_recent_meals(days as i64).await;
  analysis::get_meal_timing_insights(&meals)
}

pub async fn get_weekly_trends(state: &AppState, start: NaiveDate, end: NaiveDate) -> Vec<WeeklyTrend> {
  let meals = state.store.get_meals_in_range(start, end).await;
  analysis::calculate_weekly_trends(&meals)
}

/// ---------------------------------------------------------------------------
/// Progress Dashboard
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
  pub calories_by_day: BTreeMap<NaiveDate, f64>,
  pub macro_calories: MacroCalories,
  pub meal_types: BTreeMap<MealType, usize>,
  pub water_by_day: BTreeMap<NaiveDate, f64>,
  pub mood_by_day: BTreeMap<NaiveDate, f64>,
}

/// Chart series for `start..=end`
pub async fn get_dashboard(state: &AppState, start: NaiveDate, end: NaiveDate) -> Dashboard {
  let meals = state.store.get_meals_in_range(start, end).await;
  let water = state.store.get_water_in_range(start, end).await;
  let mood = state.store.get_mood_in_range(start, end).await;

  Dashboard {
    calories_by_day: analysis::daily_calorie_totals(&meals),
    macro_calories: analysis::macro_calorie_split(&meals),
    meal_types: analysis::meal_type_counts(&meals),
    water_by_day: analysis::daily_water_totals(&water),
    mood_by_day: analysis::daily_mood_averages(&mood),
  }
}

/// Delimited-text export; `Err` when the range has nothing to export
pub async fn export_data(
  state: &AppState,
  start: NaiveDate,
  end: NaiveDate,
  kind: ExportKind,
) -> Result<String, String> {
  if start > end {
    return Err("Start date must not be after end date".to_string());
  }

  export::export_to_delimited_text(&state.store, start, end, kind)
    .await
    .ok_or_else(|| "No data available for the selected range".to_string())
}
