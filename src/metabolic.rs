//! Metabolic calculator
//!
//! Pure functions turning body metrics into energy targets. Called once when
//! a profile is saved; the results are stored on the profile.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, Gender};

/// Multiplier used when an activity label is not recognised
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.2;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Basal metabolic rate (Mifflin-St Jeor). Not rounded.
pub fn compute_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
  let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
  match gender {
    Gender::Male => base + 5.0,
    Gender::Female => base - 161.0,
  }
}

/// BMR scaled by the activity multiplier for `activity_level`.
///
/// Unknown labels silently fall back to the sedentary multiplier.
pub fn compute_daily_calories(bmr: f64, activity_level: &str) -> f64 {
  let multiplier = ActivityLevel::from_label(activity_level)
    .map(|level| level.multiplier())
    .unwrap_or(DEFAULT_ACTIVITY_MULTIPLIER);
  bmr * multiplier
}

/// Share of calories from each macro, in percent, rounded to one decimal
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroPercentages {
  pub protein: f64,
  pub carbs: f64,
  pub fat: f64,
}

impl MacroPercentages {
  pub fn total(&self) -> f64 {
    self.protein + self.carbs + self.fat
  }
}

/// Convert macro grams to calorie percentages. All zeros when there are no
/// calories at all.
pub fn compute_macro_percentages(protein_g: f64, carbs_g: f64, fat_g: f64) -> MacroPercentages {
  let protein_kcal = protein_g * KCAL_PER_GRAM_PROTEIN;
  let carbs_kcal = carbs_g * KCAL_PER_GRAM_CARBS;
  let fat_kcal = fat_g * KCAL_PER_GRAM_FAT;
  let total = protein_kcal + carbs_kcal + fat_kcal;

  if total == 0.0 {
    return MacroPercentages::default();
  }

  MacroPercentages {
    protein: round1(protein_kcal / total * 100.0),
    carbs: round1(carbs_kcal / total * 100.0),
    fat: round1(fat_kcal / total * 100.0),
  }
}

/// Calories implied by macro grams (4/4/9)
pub fn calories_from_macros(protein_g: f64, carbs_g: f64, fat_g: f64) -> f64 {
  protein_g * KCAL_PER_GRAM_PROTEIN + carbs_g * KCAL_PER_GRAM_CARBS + fat_g * KCAL_PER_GRAM_FAT
}

pub(crate) fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}
