//! OpenFoodFacts nutrition lookup
//!
//! Text search and barcode lookup against the public food database. Every
//! network or parse failure degrades to `None` with a logged warning. Hits
//! are memoised in a bounded LRU cache with a per-entry TTL.

use lru::LruCache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::NutritionConfig;
use crate::quality::suggested_foods;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const USER_AGENT: &str = "WellnessTracker/1.0 (https://github.com/wellness-tracker)";
const SEARCH_PAGE_SIZE: &str = "5";
const SEARCH_FIELDS: &str = "product_name,brands,nutriscore_grade,energy_kcal_100g,proteins_100g,\
carbohydrates_100g,fat_100g,fiber_100g,sugars_100g,salt_100g,ingredients_text";
const MIN_QUERY_CHARS: usize = 2;
const SUGGESTION_COUNT: usize = 5;
const SUGGESTION_PAUSE: Duration = Duration::from_millis(100);

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
  Some(n) => n,
  None => unreachable!(),
};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("API error: {0}")]
  Api(String),

  #[error("Invalid URL: {0}")]
  Url(#[from] url::ParseError),
}

/// ---------------------------------------------------------------------------
/// Lookup Data Structures
/// ---------------------------------------------------------------------------

/// Normalised product record. Nutrient values are per 100 g.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionLookupResult {
  pub product_name: String,
  pub brand: String,
  /// Nutri-Score grade, upper-cased ("A".."E"), empty when unknown
  pub nutriscore_grade: String,
  pub energy_kcal_100g: f64,
  pub proteins_100g: f64,
  pub carbohydrates_100g: f64,
  pub fat_100g: f64,
  pub fiber_100g: f64,
  pub sugars_100g: f64,
  pub salt_100g: f64,
  pub ingredients_text: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
  #[serde(default)]
  products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
  status: Option<Value>,
  product: Option<Product>,
}

/// Raw product as returned by the API. Numbers sometimes arrive as strings.
#[derive(Debug, Default, Deserialize)]
struct Product {
  product_name: Option<String>,
  brands: Option<String>,
  nutriscore_grade: Option<String>,
  energy_kcal_100g: Option<Value>,
  proteins_100g: Option<Value>,
  carbohydrates_100g: Option<Value>,
  fat_100g: Option<Value>,
  fiber_100g: Option<Value>,
  sugars_100g: Option<Value>,
  salt_100g: Option<Value>,
  ingredients_text: Option<String>,
}

impl Product {
  fn has_nutrition_data(&self) -> bool {
    self.energy_kcal_100g.is_some()
  }

  fn into_result(self) -> NutritionLookupResult {
    NutritionLookupResult {
      product_name: self
        .product_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Unknown Product".to_string()),
      brand: self.brands.unwrap_or_default(),
      nutriscore_grade: self.nutriscore_grade.unwrap_or_default().to_uppercase(),
      energy_kcal_100g: lenient_number(&self.energy_kcal_100g),
      proteins_100g: lenient_number(&self.proteins_100g),
      carbohydrates_100g: lenient_number(&self.carbohydrates_100g),
      fat_100g: lenient_number(&self.fat_100g),
      fiber_100g: lenient_number(&self.fiber_100g),
      sugars_100g: lenient_number(&self.sugars_100g),
      salt_100g: lenient_number(&self.salt_100g),
      ingredients_text: self.ingredients_text.unwrap_or_default(),
    }
  }
}

/// Numbers or numeric strings; anything else reads as 0
fn lenient_number(value: &Option<Value>) -> f64 {
  match value {
    Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
    Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
    _ => 0.0,
  }
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

struct CachedLookup {
  result: NutritionLookupResult,
  expires_at: Instant,
}

pub struct NutritionClient {
  http: Client,
  api_base: String,
  cache: Mutex<LruCache<String, CachedLookup>>,
  cache_ttl: Duration,
}

impl NutritionClient {
  pub fn new(config: &NutritionConfig) -> Result<Self, LookupError> {
    let http = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;

    let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(DEFAULT_CACHE_CAPACITY);

    Ok(Self {
      http,
      api_base: config.api_base.trim_end_matches('/').to_string(),
      cache: Mutex::new(LruCache::new(capacity)),
      cache_ttl: Duration::from_secs(config.cache_ttl_secs),
    })
  }

  /// First product matching `query` that carries an energy value
  pub async fn search_food(&self, query: &str) -> Option<NutritionLookupResult> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
      return None;
    }

    let key = format!("search_{}", query.to_lowercase());
    if let Some(hit) = self.cached(&key) {
      return Some(hit);
    }

    match self.fetch_search(query).await {
      Ok(Some(result)) => {
        self.remember(key, result.clone());
        Some(result)
      }
      Ok(None) => None,
      Err(e) => {
        tracing::warn!(error = %e, query, "Food search failed");
        None
      }
    }
  }

  /// Product for an all-digit barcode
  pub async fn get_by_barcode(&self, barcode: &str) -> Option<NutritionLookupResult> {
    let barcode = barcode.trim();
    if barcode.is_empty() || !barcode.chars().all(|c| c.is_ascii_digit()) {
      return None;
    }

    let key = format!("barcode_{}", barcode);
    if let Some(hit) = self.cached(&key) {
      return Some(hit);
    }

    match self.fetch_barcode(barcode).await {
      Ok(Some(result)) => {
        self.remember(key, result.clone());
        Some(result)
      }
      Ok(None) => None,
      Err(e) => {
        tracing::warn!(error = %e, barcode, "Barcode lookup failed");
        None
      }
    }
  }

  /// Look up healthy staples compatible with the restrictions, one at a
  /// time with a short pause between requests. Misses are skipped.
  pub async fn get_nutrition_suggestions(&self, restrictions: &[String]) -> Vec<NutritionLookupResult> {
    let mut suggestions = Vec::new();

    for food in suggested_foods(restrictions).into_iter().take(SUGGESTION_COUNT) {
      if let Some(result) = self.search_food(food).await {
        suggestions.push(result);
      }
      tokio::time::sleep(SUGGESTION_PAUSE).await;
    }

    suggestions
  }

  pub fn clear_cache(&self) {
    self.cache_guard().clear();
  }

  pub fn cached_entries(&self) -> usize {
    self.cache_guard().len()
  }

  async fn fetch_search(&self, query: &str) -> Result<Option<NutritionLookupResult>, LookupError> {
    let mut url = Url::parse(&format!("{}/cgi/search.pl", self.api_base))?;
    url
      .query_pairs_mut()
      .append_pair("search_terms", query)
      .append_pair("search_simple", "1")
      .append_pair("action", "process")
      .append_pair("json", "1")
      .append_pair("page_size", SEARCH_PAGE_SIZE)
      .append_pair("fields", SEARCH_FIELDS);

    let response = self.http.get(url).send().await?;
    if !response.status().is_success() {
      let status = response.status();
      let error_text = response.text().await.unwrap_or_default();
      return Err(LookupError::Api(format!("Search API error {}: {}", status, error_text)));
    }

    let body: SearchResponse = response.json().await?;
    Ok(
      body
        .products
        .into_iter()
        .find(Product::has_nutrition_data)
        .map(Product::into_result),
    )
  }

  async fn fetch_barcode(&self, barcode: &str) -> Result<Option<NutritionLookupResult>, LookupError> {
    let url = Url::parse(&format!("{}/api/v0/product/{}.json", self.api_base, barcode))?;

    let response = self.http.get(url).send().await?;
    if !response.status().is_success() {
      let status = response.status();
      let error_text = response.text().await.unwrap_or_default();
      return Err(LookupError::Api(format!("Product API error {}: {}", status, error_text)));
    }

    let body: ProductResponse = response.json().await?;
    let found = body.status.as_ref().and_then(Value::as_i64) == Some(1);
    Ok(
      body
        .product
        .filter(|product| found && product.has_nutrition_data())
        .map(Product::into_result),
    )
  }

  fn cache_guard(&self) -> MutexGuard<'_, LruCache<String, CachedLookup>> {
    match self.cache.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }

  fn cached(&self, key: &str) -> Option<NutritionLookupResult> {
    let mut cache = self.cache_guard();
    let expired = match cache.get(key) {
      Some(entry) if Instant::now() < entry.expires_at => return Some(entry.result.clone()),
      Some(_) => true,
      None => false,
    };
    if expired {
      cache.pop(key);
    }
    None
  }

  fn remember(&self, key: String, result: NutritionLookupResult) {
    let entry = CachedLookup {
      result,
      expires_at: Instant::now() + self.cache_ttl,
    };
    self.cache_guard().put(key, entry);
  }
}
