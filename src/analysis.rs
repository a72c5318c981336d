//! Nutrition analytics over logged meals
//!
//! Aggregate statistics and heuristic insight strings for the progress
//! dashboard. Everything here is a pure function of its inputs.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metabolic::{compute_macro_percentages, round1, MacroPercentages};
use crate::models::{DailyTotals, MealLogEntry, MealType, MoodLogEntry, WaterLogEntry};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// Explicit "insufficient input" results. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum AnalysisError {
  #[error("No meal data available for analysis")]
  InsufficientData,

  #[error("No meal data available")]
  NoData,

  #[error("No user profile has been set up")]
  MissingProfile,
}

/// ---------------------------------------------------------------------------
/// Shared Aggregates
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroTotals {
  pub calories: f64,
  pub protein: f64,
  pub carbs: f64,
  pub fat: f64,
}

impl MacroTotals {
  fn sum(logs: &[MealLogEntry]) -> Self {
    logs.iter().fold(Self::default(), |acc, meal| Self {
      calories: acc.calories + meal.calories,
      protein: acc.protein + meal.protein,
      carbs: acc.carbs + meal.carbs,
      fat: acc.fat + meal.fat,
    })
  }

  fn divided_by(&self, divisor: f64) -> Self {
    if divisor <= 0.0 {
      return Self::default();
    }
    Self {
      calories: self.calories / divisor,
      protein: self.protein / divisor,
      carbs: self.carbs / divisor,
      fat: self.fat / divisor,
    }
  }

  fn rounded(&self) -> Self {
    Self {
      calories: round1(self.calories),
      protein: round1(self.protein),
      carbs: round1(self.carbs),
      fat: round1(self.fat),
    }
  }
}

/// Number of logged meals per meal type
pub fn meal_type_counts(logs: &[MealLogEntry]) -> BTreeMap<MealType, usize> {
  let mut counts = BTreeMap::new();
  for meal in logs {
    *counts.entry(meal.meal_type).or_insert(0) += 1;
  }
  counts
}

/// ---------------------------------------------------------------------------
/// Nutrition Patterns
/// ---------------------------------------------------------------------------

const LOW_PROTEIN_AVG_G: f64 = 15.0;
const LOW_CALORIE_AVG: f64 = 1200.0;
const HIGH_CALORIE_AVG: f64 = 2500.0;
const MIN_BREAKFAST_SHARE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionPatterns {
  pub avg_calories: f64,
  pub avg_protein: f64,
  pub avg_carbs: f64,
  pub avg_fat: f64,
  pub meal_distribution: BTreeMap<MealType, usize>,
  pub insights: Vec<String>,
  pub total_meals_analyzed: usize,
}

/// Per-meal averages, meal type distribution and up to three insights
pub fn analyze_nutrition_patterns(logs: &[MealLogEntry]) -> Result<NutritionPatterns, AnalysisError> {
  if logs.is_empty() {
    return Err(AnalysisError::InsufficientData);
  }

  let total_meals = logs.len();
  let averages = MacroTotals::sum(logs).divided_by(total_meals as f64);
  let distribution = meal_type_counts(logs);

  let mut insights = Vec::new();

  if averages.protein < LOW_PROTEIN_AVG_G {
    insights.push(
      "Consider increasing protein intake for better muscle maintenance and satiety.".to_string(),
    );
  }

  if averages.calories < LOW_CALORIE_AVG {
    insights.push(
      "Your average calorie intake seems low. Consider adding healthy snacks.".to_string(),
    );
  } else if averages.calories > HIGH_CALORIE_AVG {
    insights.push(
      "Your calorie intake is quite high. Consider portion control if weight loss is your goal."
        .to_string(),
    );
  }

  let breakfasts = distribution.get(&MealType::Breakfast).copied().unwrap_or(0);
  if (breakfasts as f64) < total_meals as f64 * MIN_BREAKFAST_SHARE {
    insights.push(
      "Don't skip breakfast! It helps maintain steady energy levels throughout the day.".to_string(),
    );
  }

  let averages = averages.rounded();
  Ok(NutritionPatterns {
    avg_calories: averages.calories,
    avg_protein: averages.protein,
    avg_carbs: averages.carbs,
    avg_fat: averages.fat,
    meal_distribution: distribution,
    insights,
    total_meals_analyzed: total_meals,
  })
}

/// ---------------------------------------------------------------------------
/// Nutrition Summary
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionSummary {
  pub period_days: u32,
  pub total_meals: usize,
  pub totals: MacroTotals,
  pub daily_averages: MacroTotals,
  pub meal_distribution: BTreeMap<MealType, usize>,
  pub macro_percentages: MacroPercentages,
}

/// Totals and per-day averages over a `days`-long period.
///
/// Averages divide by `days`, not by the number of days that have logs.
/// A zero-day period reports zero averages.
pub fn format_nutrition_summary(logs: &[MealLogEntry], days: u32) -> Result<NutritionSummary, AnalysisError> {
  if logs.is_empty() {
    return Err(AnalysisError::NoData);
  }

  let totals = MacroTotals::sum(logs);
  let daily_averages = totals.divided_by(days as f64);
  let macro_percentages = compute_macro_percentages(totals.protein, totals.carbs, totals.fat);

  Ok(NutritionSummary {
    period_days: days,
    total_meals: logs.len(),
    totals: totals.rounded(),
    daily_averages: daily_averages.rounded(),
    meal_distribution: meal_type_counts(logs),
    macro_percentages,
  })
}

/// ---------------------------------------------------------------------------
/// Daily Insights
/// ---------------------------------------------------------------------------

const CALORIE_TARGET_TOLERANCE: f64 = 200.0;

/// Insights for one day's totals, optionally against a calorie target
pub fn get_nutrition_insights(totals: Option<&DailyTotals>, target_calories: Option<f64>) -> Vec<String> {
  let Some(totals) = totals else {
    return vec!["No nutrition data available for analysis.".to_string()];
  };

  let mut insights = Vec::new();
  let calories = totals.total_calories;

  if let Some(target) = target_calories {
    let diff = calories - target;
    if diff > CALORIE_TARGET_TOLERANCE {
      insights.push(format!(
        "You're {:.0} calories over your target. Consider reducing portion sizes.",
        diff
      ));
    } else if diff < -CALORIE_TARGET_TOLERANCE {
      insights.push(format!(
        "You're {:.0} calories under your target. Consider adding a healthy snack.",
        diff.abs()
      ));
    } else {
      insights.push("Your calorie intake is well-aligned with your target!".to_string());
    }
  }

  if calories > 0.0 {
    let protein_pct = totals.total_protein * 4.0 / calories * 100.0;
    if protein_pct < 10.0 {
      insights.push(
        "Consider increasing protein intake for better muscle maintenance and satiety.".to_string(),
      );
    } else if protein_pct > 35.0 {
      insights.push(
        "Your protein intake is quite high. Make sure to balance with carbs and fats.".to_string(),
      );
    } else {
      insights.push(format!("Good protein intake! ({:.1}% of calories)", protein_pct));
    }
  }

  if insights.len() < 3 {
    insights.push("Don't forget to stay hydrated throughout the day!".to_string());
  }

  insights
}

/// ---------------------------------------------------------------------------
/// Meal Timing
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayPart {
  Morning,
  Afternoon,
  Evening,
}

impl DayPart {
  fn from_hour(hour: u32) -> Self {
    match hour {
      5..=11 => DayPart::Morning,
      12..=16 => DayPart::Afternoon,
      _ => DayPart::Evening,
    }
  }
}

/// Hour of an "HH:MM" string; `None` when malformed
fn parse_hour(time: &str) -> Option<u32> {
  let hour: u32 = time.split(':').next()?.trim().parse().ok()?;
  (hour < 24).then_some(hour)
}

/// Insights on when meals are eaten. Entries with malformed times are
/// skipped when bucketing but still count toward the total.
pub fn get_meal_timing_insights(logs: &[MealLogEntry]) -> Vec<String> {
  if logs.is_empty() {
    return vec!["No meal timing data available for analysis.".to_string()];
  }

  let (mut morning, mut afternoon, mut evening, mut late) = (0usize, 0usize, 0usize, 0usize);
  for meal in logs {
    let Some(hour) = parse_hour(&meal.time) else {
      tracing::debug!(time = %meal.time, meal = %meal.meal_name, "Skipping malformed meal time");
      continue;
    };
    match DayPart::from_hour(hour) {
      DayPart::Morning => morning += 1,
      DayPart::Afternoon => afternoon += 1,
      DayPart::Evening => evening += 1,
    }
    if hour >= 21 {
      late += 1;
    }
  }

  let total = logs.len() as f64;
  let mut insights = Vec::new();

  if (morning as f64) / total < 0.2 {
    insights.push(
      "You tend to skip morning meals. Consider having a healthy breakfast to boost energy."
        .to_string(),
    );
  }
  if (evening as f64) / total > 0.5 {
    insights.push(
      "Most of your meals are in the evening. Try distributing meals more evenly throughout the day."
        .to_string(),
    );
  }
  if (afternoon as f64) / total > 0.6 {
    insights.push("Great job having substantial midday nutrition!".to_string());
  }
  if (late as f64) > total * 0.3 {
    insights.push(
      "You eat late quite often. Try to have your last meal 2-3 hours before bedtime.".to_string(),
    );
  }

  if insights.is_empty() {
    insights.push("Your meal timing patterns look balanced!".to_string());
  }

  insights
}

/// ---------------------------------------------------------------------------
/// Trends & Dashboard Series
/// ---------------------------------------------------------------------------

/// Per-ISO-week sums and per-meal means
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTrend {
  pub iso_year: i32,
  pub iso_week: u32,
  pub meal_count: usize,
  pub totals: MacroTotals,
  pub means: MacroTotals,
}

pub fn calculate_weekly_trends(logs: &[MealLogEntry]) -> Vec<WeeklyTrend> {
  let mut weeks: BTreeMap<(i32, u32), Vec<MealLogEntry>> = BTreeMap::new();
  for meal in logs {
    let week = meal.date.iso_week();
    weeks.entry((week.year(), week.week())).or_default().push(meal.clone());
  }

  weeks
    .into_iter()
    .map(|((iso_year, iso_week), meals)| {
      let totals = MacroTotals::sum(&meals);
      WeeklyTrend {
        iso_year,
        iso_week,
        meal_count: meals.len(),
        means: totals.divided_by(meals.len() as f64).rounded(),
        totals: totals.rounded(),
      }
    })
    .collect()
}

/// Calories per calendar day, for the intake-over-time chart
pub fn daily_calorie_totals(logs: &[MealLogEntry]) -> BTreeMap<NaiveDate, f64> {
  let mut days = BTreeMap::new();
  for meal in logs {
    *days.entry(meal.date).or_insert(0.0) += meal.calories;
  }
  days
}

/// Calories contributed by each macro across all logs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MacroCalories {
  pub protein_kcal: f64,
  pub carbs_kcal: f64,
  pub fat_kcal: f64,
}

pub fn macro_calorie_split(logs: &[MealLogEntry]) -> MacroCalories {
  let totals = MacroTotals::sum(logs);
  MacroCalories {
    protein_kcal: totals.protein * 4.0,
    carbs_kcal: totals.carbs * 4.0,
    fat_kcal: totals.fat * 9.0,
  }
}

pub fn daily_water_totals(logs: &[WaterLogEntry]) -> BTreeMap<NaiveDate, f64> {
  let mut days = BTreeMap::new();
  for entry in logs {
    *days.entry(entry.logged_at.date()).or_insert(0.0) += entry.amount_ml;
  }
  days
}

pub fn daily_mood_averages(logs: &[MoodLogEntry]) -> BTreeMap<NaiveDate, f64> {
  let mut days: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
  for entry in logs {
    let day = days.entry(entry.logged_at.date()).or_insert((0, 0));
    day.0 += entry.rating;
    day.1 += 1;
  }
  days
    .into_iter()
    .map(|(date, (sum, count))| (date, sum as f64 / count as f64))
    .collect()
}
