//! Keyword heuristics over ingredient text and food suggestions

use serde::Serialize;

const BASE_QUALITY_SCORE: i32 = 50;

const POSITIVE_KEYWORDS: &[&str] = &[
  "organic",
  "natural",
  "whole grain",
  "fresh",
  "pure",
  "virgin",
  "unrefined",
  "raw",
  "free-range",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
  "artificial",
  "preservatives",
  "high fructose corn syrup",
  "trans fat",
  "hydrogenated",
  "monosodium glutamate",
  "artificial colors",
  "artificial flavors",
];

/// Staples looked up for suggestions, in priority order
pub const HEALTHY_FOODS: &[&str] = &[
  "quinoa",
  "salmon",
  "avocado",
  "spinach",
  "blueberries",
  "sweet potato",
  "almonds",
  "greek yogurt",
  "broccoli",
  "chicken breast",
];

const ANIMAL_FOODS: &[&str] = &["salmon", "chicken breast", "greek yogurt"];
const DAIRY_FOODS: &[&str] = &["greek yogurt"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientQuality {
  /// 0-100
  pub quality_score: i32,
  pub insights: Vec<String>,
  pub ingredient_count: usize,
}

/// Score an ingredient list from keyword hits and list length
pub fn analyze_ingredient_quality(ingredients_text: &str) -> IngredientQuality {
  if ingredients_text.trim().is_empty() {
    return IngredientQuality {
      quality_score: 0,
      insights: vec!["No ingredient information available".to_string()],
      ingredient_count: 0,
    };
  }

  let ingredients = ingredients_text.to_lowercase();
  let mut score = BASE_QUALITY_SCORE;
  let mut insights = Vec::new();

  for keyword in POSITIVE_KEYWORDS {
    if ingredients.contains(keyword) {
      score += 10;
      insights.push(format!("Contains {} - good quality indicator", keyword));
    }
  }

  for keyword in NEGATIVE_KEYWORDS {
    if ingredients.contains(keyword) {
      score -= 15;
      insights.push(format!("Contains {} - consider alternatives", keyword));
    }
  }

  let ingredient_count = ingredients.split(',').count();
  if ingredient_count <= 5 {
    score += 5;
    insights.push("Simple ingredient list - usually a good sign".to_string());
  } else if ingredient_count > 15 {
    score -= 5;
    insights.push("Long ingredient list - check for unnecessary additives".to_string());
  }

  if insights.is_empty() {
    insights.push("Standard ingredient profile - no specific concerns identified".to_string());
  }

  IngredientQuality {
    quality_score: score.clamp(0, 100),
    insights,
    ingredient_count,
  }
}

/// Healthy staples compatible with the restrictions: vegetarian and vegan
/// drop meat, fish and dairy.
pub fn suggested_foods(restrictions: &[String]) -> Vec<&'static str> {
  let lowered: Vec<String> = restrictions.iter().map(|r| r.trim().to_lowercase()).collect();
  let plant_based = lowered.iter().any(|r| r == "vegetarian" || r == "vegan");
  let vegan = lowered.iter().any(|r| r == "vegan");

  HEALTHY_FOODS
    .iter()
    .copied()
    .filter(|food| !(plant_based && ANIMAL_FOODS.contains(food)))
    .filter(|food| !(vegan && DAIRY_FOODS.contains(food)))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_text_scores_zero() {
    let quality = analyze_ingredient_quality("   ");
    assert_eq!(quality.quality_score, 0);
    assert_eq!(quality.ingredient_count, 0);
    assert_eq!(quality.insights.len(), 1);
  }

  #[test]
  fn test_simple_organic_list() {
    // 50 + organic 10 + simple list 5
    let quality = analyze_ingredient_quality("Organic oats, honey, salt");
    assert_eq!(quality.quality_score, 65);
    assert_eq!(quality.ingredient_count, 3);
  }

  #[test]
  fn test_negative_keywords_and_long_list() {
    let text = "sugar, water, artificial flavors, hydrogenated oil, a, b, c, d, e, f, g, h, i, j, k, l";
    let quality = analyze_ingredient_quality(text);
    // 50 - artificial 15 - artificial flavors 15 - hydrogenated 15 - long list 5
    assert_eq!(quality.quality_score, 0);
    assert_eq!(quality.ingredient_count, 16);
    assert!(quality.insights.iter().any(|i| i.contains("Long ingredient list")));
  }

  #[test]
  fn test_score_is_clamped_high() {
    let text = "organic natural whole grain fresh pure virgin unrefined raw free-range";
    assert_eq!(analyze_ingredient_quality(text).quality_score, 100);
  }

  #[test]
  fn test_medium_list_without_keywords() {
    let quality = analyze_ingredient_quality("a, b, c, d, e, f, g");
    assert_eq!(quality.quality_score, 50);
    assert_eq!(
      quality.insights,
      vec!["Standard ingredient profile - no specific concerns identified".to_string()]
    );
  }

  #[test]
  fn test_suggested_foods_respect_restrictions() {
    assert_eq!(suggested_foods(&[]).len(), HEALTHY_FOODS.len());

    let vegetarian = suggested_foods(&["Vegetarian".to_string()]);
    assert!(!vegetarian.contains(&"salmon"));
    assert!(!vegetarian.contains(&"greek yogurt"));
    assert_eq!(vegetarian[0], "quinoa");
    assert_eq!(vegetarian[1], "avocado");
  }
}
