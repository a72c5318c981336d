use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::MealCatalogEntry;
use crate::nutrition_api::NutritionLookupResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
pub enum MealType {
  Breakfast,
  Lunch,
  Dinner,
  Snack,
}

impl MealType {
  pub const ALL: [MealType; 4] = [
    MealType::Breakfast,
    MealType::Lunch,
    MealType::Dinner,
    MealType::Snack,
  ];

  /// Share of daily calories targeted by a single meal of this type
  pub fn calorie_share(&self) -> f64 {
    match self {
      MealType::Breakfast => 0.25,
      MealType::Lunch => 0.35,
      MealType::Dinner => 0.35,
      MealType::Snack => 0.05,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      MealType::Breakfast => "Breakfast",
      MealType::Lunch => "Lunch",
      MealType::Dinner => "Dinner",
      MealType::Snack => "Snack",
    }
  }
}

impl fmt::Display for MealType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MealType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "breakfast" => Ok(MealType::Breakfast),
      "lunch" => Ok(MealType::Lunch),
      "dinner" => Ok(MealType::Dinner),
      "snack" => Ok(MealType::Snack),
      _ => Err(format!("Unknown meal type: {}", s)),
    }
  }
}

/// A logged meal. Only a numeric snapshot is stored, never a reference
/// back to the catalog entry or lookup it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MealLogEntry {
  pub id: i64,
  pub meal_name: String,
  pub meal_type: MealType,
  pub calories: f64,
  pub protein: f64,
  pub carbs: f64,
  pub fat: f64,
  pub date: NaiveDate,
  /// Wall-clock time as entered, "HH:MM"
  pub time: String,
}

/// For inserting new meal logs (without id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMealLog {
  pub meal_name: String,
  pub meal_type: MealType,
  pub calories: f64,
  pub protein: f64,
  pub carbs: f64,
  pub fat: f64,
  pub date: NaiveDate,
  pub time: String,
}

impl NewMealLog {
  /// Snapshot a catalog meal at the given moment
  pub fn from_catalog(entry: &MealCatalogEntry, at: NaiveDateTime) -> Self {
    Self {
      meal_name: entry.name.to_string(),
      meal_type: entry.meal_type,
      calories: entry.calories,
      protein: entry.protein,
      carbs: entry.carbs,
      fat: entry.fat,
      date: at.date(),
      time: at.format("%H:%M").to_string(),
    }
  }

  /// Snapshot an external lookup. Values are per 100 g, scaled by `grams`.
  pub fn from_lookup(
    meal_name: &str,
    meal_type: MealType,
    result: &NutritionLookupResult,
    grams: f64,
    at: NaiveDateTime,
  ) -> Self {
    let factor = grams / 100.0;
    Self {
      meal_name: meal_name.to_string(),
      meal_type,
      calories: result.energy_kcal_100g * factor,
      protein: result.proteins_100g * factor,
      carbs: result.carbohydrates_100g * factor,
      fat: result.fat_100g * factor,
      date: at.date(),
      time: at.format("%H:%M").to_string(),
    }
  }
}

/// Macro sums for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyTotals {
  pub total_calories: f64,
  pub total_protein: f64,
  pub total_carbs: f64,
  pub total_fat: f64,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog;

  fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
      .unwrap()
      .and_hms_opt(h, m, 0)
      .unwrap()
  }

  #[test]
  fn test_meal_type_parse() {
    assert_eq!("lunch".parse::<MealType>(), Ok(MealType::Lunch));
    assert_eq!(" Snack ".parse::<MealType>(), Ok(MealType::Snack));
    assert!("brunch".parse::<MealType>().is_err());
  }

  #[test]
  fn test_calorie_shares_sum_to_one() {
    let total: f64 = MealType::ALL.iter().map(|m| m.calorie_share()).sum();
    assert!((total - 1.0).abs() < 1e-9);
  }

  #[test]
  fn test_from_catalog_snapshots_values() {
    let entry = catalog::find("Turkey Wrap").unwrap();
    let log = NewMealLog::from_catalog(entry, at(12, 30));
    assert_eq!(log.meal_type, MealType::Lunch);
    assert_eq!(log.calories, 390.0);
    assert_eq!(log.protein, 28.0);
    assert_eq!(log.time, "12:30");
    assert_eq!(log.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
  }

  #[test]
  fn test_from_lookup_scales_per_100g() {
    let result = NutritionLookupResult {
      product_name: "Oat Bar".to_string(),
      energy_kcal_100g: 400.0,
      proteins_100g: 10.0,
      carbohydrates_100g: 60.0,
      fat_100g: 12.0,
      ..Default::default()
    };
    let log = NewMealLog::from_lookup("Oat bar", MealType::Snack, &result, 50.0, at(16, 5));
    assert_eq!(log.calories, 200.0);
    assert_eq!(log.protein, 5.0);
    assert_eq!(log.carbs, 30.0);
    assert_eq!(log.fat, 6.0);
    assert_eq!(log.time, "16:05");
  }
}
