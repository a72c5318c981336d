use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WaterLogEntry {
  pub id: i64,
  #[sqlx(rename = "amount")]
  pub amount_ml: f64,
  pub logged_at: NaiveDateTime,
}

/// Mood rating on a 1-10 scale with optional free-text notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MoodLogEntry {
  pub id: i64,
  pub rating: i64,
  pub notes: String,
  pub logged_at: NaiveDateTime,
}

pub const MOOD_RATING_MIN: i64 = 1;
pub const MOOD_RATING_MAX: i64 = 10;
