//! Field-level validation for manually entered nutrition values

use std::collections::BTreeMap;

use crate::metabolic::calories_from_macros;

const MAX_CALORIES: f64 = 10_000.0;
const MAX_PROTEIN_G: f64 = 500.0;
const MAX_CARBS_G: f64 = 1_000.0;
const MAX_FAT_G: f64 = 500.0;
/// Allowed relative gap between stated calories and 4/4/9 macro calories
const MACRO_VARIANCE_LIMIT: f64 = 0.5;

/// Validation messages keyed by field ("calories", "protein", "carbs",
/// "fat", "macros"). Empty when the input is acceptable.
pub type ValidationErrors = BTreeMap<&'static str, String>;

pub fn validate_nutrition_data(calories: f64, protein: f64, carbs: f64, fat: f64) -> ValidationErrors {
  let mut errors = ValidationErrors::new();

  if !(0.0..=MAX_CALORIES).contains(&calories) {
    errors.insert("calories", "Calories must be between 0 and 10,000".to_string());
  }
  if !(0.0..=MAX_PROTEIN_G).contains(&protein) {
    errors.insert("protein", "Protein must be between 0 and 500g".to_string());
  }
  if !(0.0..=MAX_CARBS_G).contains(&carbs) {
    errors.insert("carbs", "Carbohydrates must be between 0 and 1,000g".to_string());
  }
  if !(0.0..=MAX_FAT_G).contains(&fat) {
    errors.insert("fat", "Fat must be between 0 and 500g".to_string());
  }

  let macro_calories = calories_from_macros(protein, carbs, fat);
  if calories > 0.0 && macro_calories > 0.0 {
    let variance = (calories - macro_calories).abs() / calories;
    if variance > MACRO_VARIANCE_LIMIT {
      errors.insert(
        "macros",
        "Macro breakdown doesn't align well with total calories".to_string(),
      );
    }
  }

  errors
}
