pub mod meal;
pub mod profile;
pub mod wellness;

pub use meal::{DailyTotals, MealLogEntry, MealType, NewMealLog};
pub use profile::{ActivityLevel, Gender, Goal, NewUserProfile, UserProfile};
pub use wellness::{MoodLogEntry, WaterLogEntry, MOOD_RATING_MAX, MOOD_RATING_MIN};

pub use crate::nutrition_api::NutritionLookupResult;
