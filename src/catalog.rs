//! Static meal catalog
//!
//! Immutable reference data shared by the recommender and quick-meal ideas.
//! Entries are ordered within each meal type; that order breaks score ties.

use serde::Serialize;

use crate::models::MealType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealCatalogEntry {
  pub name: &'static str,
  pub meal_type: MealType,
  pub description: &'static str,
  pub ingredients: &'static [&'static str],
  pub calories: f64,
  pub protein: f64,
  pub carbs: f64,
  pub fat: f64,
  /// Minutes
  pub preparation_time: u32,
  pub dietary_tags: &'static [&'static str],
  pub health_benefits: &'static [&'static str],
}

impl MealCatalogEntry {
  /// True when every restriction appears among the dietary tags (case-insensitive)
  pub fn satisfies(&self, restrictions: &[String]) -> bool {
    restrictions.iter().all(|restriction| {
      self
        .dietary_tags
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(restriction.trim()))
    })
  }

  pub fn macro_grams(&self) -> f64 {
    self.protein + self.carbs + self.fat
  }
}

pub static CATALOG: &[MealCatalogEntry] = &[
  // Breakfast
  MealCatalogEntry {
    name: "Greek Yogurt Parfait",
    meal_type: MealType::Breakfast,
    description: "Greek yogurt layered with berries and granola",
    ingredients: &["Greek yogurt", "mixed berries", "granola", "honey"],
    calories: 280.0,
    protein: 18.0,
    carbs: 35.0,
    fat: 8.0,
    preparation_time: 5,
    dietary_tags: &["vegetarian", "gluten-free"],
    health_benefits: &["probiotics", "antioxidants", "fiber"],
  },
  MealCatalogEntry {
    name: "Avocado Toast",
    meal_type: MealType::Breakfast,
    description: "Whole grain toast topped with mashed avocado and seasonings",
    ingredients: &["whole grain bread", "avocado", "lime juice", "salt", "pepper"],
    calories: 320.0,
    protein: 8.0,
    carbs: 25.0,
    fat: 22.0,
    preparation_time: 8,
    dietary_tags: &["vegan", "vegetarian"],
    health_benefits: &["healthy fats", "fiber", "potassium"],
  },
  MealCatalogEntry {
    name: "Protein Smoothie",
    meal_type: MealType::Breakfast,
    description: "Blended smoothie with protein powder, fruits, and spinach",
    ingredients: &["protein powder", "banana", "spinach", "almond milk", "berries"],
    calories: 250.0,
    protein: 25.0,
    carbs: 20.0,
    fat: 5.0,
    preparation_time: 5,
    dietary_tags: &["dairy-free", "vegetarian"],
    health_benefits: &["high protein", "vitamins", "antioxidants"],
  },
  MealCatalogEntry {
    name: "Oatmeal Bowl",
    meal_type: MealType::Breakfast,
    description: "Steel-cut oats with fruits, nuts, and cinnamon",
    ingredients: &["steel-cut oats", "banana", "walnuts", "cinnamon", "maple syrup"],
    calories: 350.0,
    protein: 12.0,
    carbs: 45.0,
    fat: 14.0,
    preparation_time: 15,
    dietary_tags: &["vegan", "vegetarian", "gluten-free"],
    health_benefits: &["fiber", "complex carbs", "omega-3"],
  },
  // Lunch
  MealCatalogEntry {
    name: "Quinoa Buddha Bowl",
    meal_type: MealType::Lunch,
    description: "Colorful bowl with quinoa, roasted vegetables, and tahini dressing",
    ingredients: &["quinoa", "sweet potato", "chickpeas", "kale", "tahini", "lemon"],
    calories: 420.0,
    protein: 16.0,
    carbs: 55.0,
    fat: 16.0,
    preparation_time: 25,
    dietary_tags: &["vegan", "vegetarian", "gluten-free"],
    health_benefits: &["complete protein", "fiber", "antioxidants"],
  },
  MealCatalogEntry {
    name: "Grilled Chicken Salad",
    meal_type: MealType::Lunch,
    description: "Mixed greens with grilled chicken, vegetables, and vinaigrette",
    ingredients: &["chicken breast", "mixed greens", "cherry tomatoes", "cucumber", "olive oil"],
    calories: 380.0,
    protein: 35.0,
    carbs: 12.0,
    fat: 22.0,
    preparation_time: 20,
    dietary_tags: &["gluten-free", "dairy-free"],
    health_benefits: &["lean protein", "vitamins", "healthy fats"],
  },
  MealCatalogEntry {
    name: "Vegetable Stir-fry",
    meal_type: MealType::Lunch,
    description: "Mixed vegetables stir-fried with tofu and brown rice",
    ingredients: &["tofu", "broccoli", "bell peppers", "brown rice", "soy sauce", "ginger"],
    calories: 340.0,
    protein: 18.0,
    carbs: 42.0,
    fat: 12.0,
    preparation_time: 18,
    dietary_tags: &["vegan", "vegetarian"],
    health_benefits: &["plant protein", "fiber", "vitamins"],
  },
  MealCatalogEntry {
    name: "Turkey Wrap",
    meal_type: MealType::Lunch,
    description: "Whole wheat wrap with turkey, vegetables, and hummus",
    ingredients: &["turkey breast", "whole wheat tortilla", "hummus", "lettuce", "tomatoes"],
    calories: 390.0,
    protein: 28.0,
    carbs: 35.0,
    fat: 15.0,
    preparation_time: 10,
    dietary_tags: &["dairy-free"],
    health_benefits: &["lean protein", "fiber", "B vitamins"],
  },
  // Dinner
  MealCatalogEntry {
    name: "Baked Salmon",
    meal_type: MealType::Dinner,
    description: "Herb-crusted salmon with roasted vegetables and quinoa",
    ingredients: &["salmon fillet", "asparagus", "quinoa", "herbs", "lemon", "olive oil"],
    calories: 450.0,
    protein: 35.0,
    carbs: 28.0,
    fat: 22.0,
    preparation_time: 30,
    dietary_tags: &["gluten-free", "dairy-free"],
    health_benefits: &["omega-3", "complete protein", "vitamins"],
  },
  MealCatalogEntry {
    name: "Vegetarian Chili",
    meal_type: MealType::Dinner,
    description: "Hearty chili with beans, vegetables, and spices",
    ingredients: &["black beans", "kidney beans", "tomatoes", "onions", "bell peppers", "spices"],
    calories: 320.0,
    protein: 18.0,
    carbs: 52.0,
    fat: 4.0,
    preparation_time: 35,
    dietary_tags: &["vegan", "vegetarian", "gluten-free"],
    health_benefits: &["fiber", "plant protein", "antioxidants"],
  },
  MealCatalogEntry {
    name: "Lean Beef Stir-fry",
    meal_type: MealType::Dinner,
    description: "Lean beef strips with vegetables over brown rice",
    ingredients: &["lean beef", "broccoli", "snap peas", "brown rice", "garlic", "soy sauce"],
    calories: 410.0,
    protein: 30.0,
    carbs: 38.0,
    fat: 14.0,
    preparation_time: 22,
    dietary_tags: &["dairy-free"],
    health_benefits: &["iron", "protein", "B vitamins"],
  },
  MealCatalogEntry {
    name: "Stuffed Bell Peppers",
    meal_type: MealType::Dinner,
    description: "Bell peppers stuffed with turkey, rice, and vegetables",
    ingredients: &["ground turkey", "bell peppers", "brown rice", "onions", "tomatoes"],
    calories: 380.0,
    protein: 26.0,
    carbs: 32.0,
    fat: 16.0,
    preparation_time: 40,
    dietary_tags: &["gluten-free", "dairy-free"],
    health_benefits: &["lean protein", "vitamins", "fiber"],
  },
  // Snack
  MealCatalogEntry {
    name: "Apple with Almond Butter",
    meal_type: MealType::Snack,
    description: "Sliced apple with natural almond butter",
    ingredients: &["apple", "almond butter"],
    calories: 190.0,
    protein: 6.0,
    carbs: 20.0,
    fat: 11.0,
    preparation_time: 2,
    dietary_tags: &["vegan", "vegetarian", "gluten-free"],
    health_benefits: &["fiber", "healthy fats", "vitamin C"],
  },
  MealCatalogEntry {
    name: "Protein Energy Balls",
    meal_type: MealType::Snack,
    description: "No-bake energy balls with oats, dates, and protein powder",
    ingredients: &["rolled oats", "dates", "protein powder", "chia seeds", "coconut"],
    calories: 150.0,
    protein: 8.0,
    carbs: 18.0,
    fat: 5.0,
    preparation_time: 10,
    dietary_tags: &["vegetarian", "gluten-free"],
    health_benefits: &["protein", "fiber", "natural sugars"],
  },
  MealCatalogEntry {
    name: "Mixed Nuts",
    meal_type: MealType::Snack,
    description: "Portion-controlled mix of raw almonds, walnuts, and cashews",
    ingredients: &["almonds", "walnuts", "cashews"],
    calories: 160.0,
    protein: 6.0,
    carbs: 6.0,
    fat: 14.0,
    preparation_time: 1,
    dietary_tags: &["vegan", "vegetarian", "gluten-free", "keto"],
    health_benefits: &["healthy fats", "protein", "vitamin E"],
  },
  MealCatalogEntry {
    name: "Veggie Hummus Plate",
    meal_type: MealType::Snack,
    description: "Fresh vegetables with homemade hummus",
    ingredients: &["carrots", "cucumbers", "bell peppers", "hummus"],
    calories: 140.0,
    protein: 6.0,
    carbs: 16.0,
    fat: 6.0,
    preparation_time: 5,
    dietary_tags: &["vegan", "vegetarian", "gluten-free"],
    health_benefits: &["fiber", "vitamins", "plant protein"],
  },
];

/// Entries for one meal type, in catalog order
pub fn partition(meal_type: MealType) -> impl Iterator<Item = &'static MealCatalogEntry> {
  CATALOG.iter().filter(move |entry| entry.meal_type == meal_type)
}

/// Look up an entry by exact name
pub fn find(name: &str) -> Option<&'static MealCatalogEntry> {
  CATALOG.iter().find(|entry| entry.name == name)
}
