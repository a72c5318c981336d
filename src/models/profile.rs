use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::metabolic::{compute_bmr, compute_daily_calories};

/// ---------------------------------------------------------------------------
/// Profile Enumerations
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  pub fn as_str(&self) -> &'static str {
    match self {
      Gender::Male => "Male",
      Gender::Female => "Female",
    }
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Gender {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "male" | "m" => Ok(Gender::Male),
      "female" | "f" => Ok(Gender::Female),
      _ => Err(format!("Unknown gender: {}", s)),
    }
  }
}

/// Five fixed activity tiers, from desk job to physical labour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
  Sedentary,
  LightlyActive,
  ModeratelyActive,
  VeryActive,
  ExtremelyActive,
}

impl ActivityLevel {
  pub const ALL: [ActivityLevel; 5] = [
    ActivityLevel::Sedentary,
    ActivityLevel::LightlyActive,
    ActivityLevel::ModeratelyActive,
    ActivityLevel::VeryActive,
    ActivityLevel::ExtremelyActive,
  ];

  /// TDEE multiplier applied to BMR
  pub fn multiplier(&self) -> f64 {
    match self {
      ActivityLevel::Sedentary => 1.2,
      ActivityLevel::LightlyActive => 1.375,
      ActivityLevel::ModeratelyActive => 1.55,
      ActivityLevel::VeryActive => 1.725,
      ActivityLevel::ExtremelyActive => 1.9,
    }
  }

  /// Human-readable label as shown on the profile form
  pub fn label(&self) -> &'static str {
    match self {
      ActivityLevel::Sedentary => "Sedentary (little/no exercise)",
      ActivityLevel::LightlyActive => "Lightly active (light exercise 1-3 days/week)",
      ActivityLevel::ModeratelyActive => "Moderately active (moderate exercise 3-5 days/week)",
      ActivityLevel::VeryActive => "Very active (hard exercise 6-7 days/week)",
      ActivityLevel::ExtremelyActive => "Extremely active (very hard exercise, physical job)",
    }
  }

  /// Accepts full form labels ("Lightly active (...)") as well as short
  /// keys ("light", "moderate"). Case-insensitive.
  pub fn from_label(label: &str) -> Option<Self> {
    let label = label.trim().to_lowercase();
    if label.starts_with("sedentary") {
      Some(ActivityLevel::Sedentary)
    } else if label.starts_with("light") {
      Some(ActivityLevel::LightlyActive)
    } else if label.starts_with("moderate") {
      Some(ActivityLevel::ModeratelyActive)
    } else if label.starts_with("very") {
      Some(ActivityLevel::VeryActive)
    } else if label.starts_with("extreme") {
      Some(ActivityLevel::ExtremelyActive)
    } else {
      None
    }
  }
}

impl fmt::Display for ActivityLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for ActivityLevel {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ActivityLevel::from_label(s).ok_or_else(|| format!("Unknown activity level: {}", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
  MaintainWeight,
  LoseWeight,
  GainWeight,
  BuildMuscle,
  ImproveHealth,
}

impl Goal {
  pub fn label(&self) -> &'static str {
    match self {
      Goal::MaintainWeight => "Maintain weight",
      Goal::LoseWeight => "Lose weight",
      Goal::GainWeight => "Gain weight",
      Goal::BuildMuscle => "Build muscle",
      Goal::ImproveHealth => "Improve overall health",
    }
  }

  pub fn from_label(label: &str) -> Option<Self> {
    let label = label.trim().to_lowercase();
    if label.contains("lose weight") {
      Some(Goal::LoseWeight)
    } else if label.contains("gain weight") {
      Some(Goal::GainWeight)
    } else if label.contains("build muscle") {
      Some(Goal::BuildMuscle)
    } else if label.contains("maintain") {
      Some(Goal::MaintainWeight)
    } else if label.contains("health") {
      Some(Goal::ImproveHealth)
    } else {
      None
    }
  }
}

impl fmt::Display for Goal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for Goal {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Goal::from_label(s).ok_or_else(|| format!("Unknown goal: {}", s))
  }
}

/// ---------------------------------------------------------------------------
/// User Profile
/// ---------------------------------------------------------------------------

/// The single current profile. `bmr` and `daily_calories` are derived at
/// construction and stored alongside the raw metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
  pub name: String,
  pub age: u32,
  pub weight_kg: f64,
  pub height_cm: f64,
  pub gender: Gender,
  pub activity_level: ActivityLevel,
  pub goal: Goal,
  pub dietary_restrictions: Vec<String>,
  pub allergies: String,
  pub daily_calories: f64,
  pub bmr: f64,
}

/// Profile form input (without derived energy targets)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserProfile {
  pub name: String,
  pub age: u32,
  pub weight_kg: f64,
  pub height_cm: f64,
  pub gender: Gender,
  pub activity_level: ActivityLevel,
  pub goal: Goal,
  #[serde(default)]
  pub dietary_restrictions: Vec<String>,
  #[serde(default)]
  pub allergies: String,
}

impl UserProfile {
  /// Build a profile from form input, deriving BMR and daily calories
  pub fn from_input(input: NewUserProfile) -> Self {
    let bmr = compute_bmr(input.weight_kg, input.height_cm, input.age, input.gender);
    let daily_calories = compute_daily_calories(bmr, input.activity_level.label());

    Self {
      name: input.name,
      age: input.age,
      weight_kg: input.weight_kg,
      height_cm: input.height_cm,
      gender: input.gender,
      activity_level: input.activity_level,
      goal: input.goal,
      dietary_restrictions: input.dietary_restrictions,
      allergies: input.allergies,
      daily_calories,
      bmr,
    }
  }
}
