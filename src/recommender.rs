//! Rule-based meal recommender
//!
//! Filters the static catalog against a profile's dietary restrictions and
//! ranks candidates with a weighted sum of calorie fit, goal fit, health
//! benefits, prep time, macro balance and a random variety bonus.
//!
//! The variety bonus makes production ordering non-reproducible across
//! calls. The random source is a type parameter so tests can seed it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::catalog::{self, MealCatalogEntry, CATALOG};
use crate::models::{Goal, MealType, UserProfile};

/// ---------------------------------------------------------------------------
/// Scoring Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_RECOMMENDATION_COUNT: usize = 3;
pub const MAX_VARIETY_BONUS: u32 = 15;
pub const QUICK_MEAL_MAX_PREP_MINUTES: u32 = 15;
pub const QUICK_MEAL_LIMIT: usize = 6;

const CALORIE_ALIGNMENT_WEIGHT: f64 = 0.3;
const HEALTH_BENEFIT_POINTS: f64 = 2.0;
const MACRO_BALANCE_POINTS: f64 = 10.0;

/// A catalog entry with its recommendation score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMeal {
  pub meal: &'static MealCatalogEntry,
  pub score: f64,
}

/// Calories a single meal of `meal_type` should provide
pub fn target_calories(daily_calories: f64, meal_type: MealType) -> f64 {
  daily_calories * meal_type.calorie_share()
}

/// Deterministic part of the score plus a caller-supplied variety bonus
pub fn score_meal(
  meal: &MealCatalogEntry,
  profile: &UserProfile,
  meal_type: MealType,
  variety_bonus: u32,
) -> f64 {
  let target = target_calories(profile.daily_calories, meal_type);
  let mut score = 0.0;

  // Calorie alignment: closer to target is better
  let calorie_diff = (meal.calories - target).abs();
  let alignment = (100.0 - calorie_diff / target * 100.0).max(0.0);
  score += alignment * CALORIE_ALIGNMENT_WEIGHT;

  score += goal_bonus(meal, profile.goal, target);

  score += meal.health_benefits.len() as f64 * HEALTH_BENEFIT_POINTS;

  score += match meal.preparation_time {
    t if t <= 10 => 10.0,
    t if t <= 20 => 5.0,
    _ => 0.0,
  };

  score += variety_bonus as f64;

  // Macro balance by grams, not calories
  let total_macros = meal.macro_grams();
  if total_macros > 0.0 {
    let protein_ratio = meal.protein / total_macros;
    let fat_ratio = meal.fat / total_macros;
    if (0.15..=0.4).contains(&protein_ratio) && (0.2..=0.4).contains(&fat_ratio) {
      score += MACRO_BALANCE_POINTS;
    }
  }

  score
}

fn goal_bonus(meal: &MealCatalogEntry, goal: Goal, target: f64) -> f64 {
  let mut bonus = 0.0;
  match goal {
    Goal::LoseWeight => {
      if meal.calories < target {
        bonus += 20.0;
      }
      if meal.protein > 15.0 {
        bonus += 15.0;
      }
    }
    Goal::GainWeight | Goal::BuildMuscle => {
      if meal.calories > target * 0.9 {
        bonus += 20.0;
      }
      if meal.protein > 20.0 {
        bonus += 20.0;
      }
    }
    Goal::MaintainWeight => {
      if meal.calories > 0.0 {
        let protein_ratio = meal.protein * 4.0 / meal.calories;
        if (0.15..=0.35).contains(&protein_ratio) {
          bonus += 15.0;
        }
      }
    }
    Goal::ImproveHealth => {}
  }
  bonus
}

/// ---------------------------------------------------------------------------
/// Recommender
/// ---------------------------------------------------------------------------

pub struct MealRecommender<R = StdRng> {
  rng: R,
}

impl MealRecommender<StdRng> {
  pub fn new() -> Self {
    Self::with_rng(StdRng::from_entropy())
  }
}

impl Default for MealRecommender<StdRng> {
  fn default() -> Self {
    Self::new()
  }
}

impl<R: Rng> MealRecommender<R> {
  pub fn with_rng(rng: R) -> Self {
    Self { rng }
  }

  /// Top `count` catalog meals of `meal_type` for this profile.
  ///
  /// Restrictions that exclude every meal are ignored rather than producing
  /// an empty list. Returns an empty list when the profile has no usable
  /// calorie target.
  pub fn get_recommendations(
    &mut self,
    profile: &UserProfile,
    meal_type: MealType,
    count: usize,
  ) -> Vec<ScoredMeal> {
    let target = target_calories(profile.daily_calories, meal_type);
    if !target.is_finite() || target <= 0.0 {
      tracing::warn!(
        daily_calories = profile.daily_calories,
        %meal_type,
        "Cannot score meals without a positive calorie target"
      );
      return Vec::new();
    }

    let available: Vec<&'static MealCatalogEntry> = catalog::partition(meal_type).collect();
    if available.is_empty() {
      return Vec::new();
    }

    let mut candidates: Vec<&'static MealCatalogEntry> = available
      .iter()
      .copied()
      .filter(|meal| meal.satisfies(&profile.dietary_restrictions))
      .collect();

    if candidates.is_empty() {
      tracing::debug!(
        restrictions = ?profile.dietary_restrictions,
        %meal_type,
        "No meal satisfies every restriction; falling back to the full partition"
      );
      candidates = available;
    }

    let mut scored: Vec<ScoredMeal> = candidates
      .into_iter()
      .map(|meal| {
        let variety = self.rng.gen_range(0..=MAX_VARIETY_BONUS);
        ScoredMeal {
          meal,
          score: score_meal(meal, profile, meal_type, variety),
        }
      })
      .collect();

    // Stable: ties keep catalog order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(count);
    scored
  }

  /// Like `get_recommendations`, but reports a missing profile explicitly
  pub fn recommend(
    &mut self,
    profile: Option<&UserProfile>,
    meal_type: MealType,
    count: usize,
  ) -> Result<Vec<ScoredMeal>, AnalysisError> {
    let profile = profile.ok_or(AnalysisError::MissingProfile)?;
    Ok(self.get_recommendations(profile, meal_type, count))
  }
}

/// Quick meals (prep <= 15 min) across every meal type, fastest first.
///
/// Unlike recommendations there is no fallback: restrictions that match
/// nothing yield an empty list.
pub fn get_quick_meal_ideas(restrictions: &[String]) -> Vec<&'static MealCatalogEntry> {
  let mut quick: Vec<&'static MealCatalogEntry> = CATALOG
    .iter()
    .filter(|meal| meal.preparation_time <= QUICK_MEAL_MAX_PREP_MINUTES)
    .filter(|meal| meal.satisfies(restrictions))
    .collect();

  quick.sort_by_key(|meal| meal.preparation_time);
  quick.truncate(QUICK_MEAL_LIMIT);
  quick
}
