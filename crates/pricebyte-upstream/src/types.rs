//! Response types for the product backend's `GET /api/products/{id}` endpoint.
//!
//! ## Observed shape
//!
//! ### Store offers
//! Each product carries `store_products`, one per retailer listing. The
//! `raw_details` blob is whatever the scraper captured for that retailer and
//! may be `null`.
//!
//! ### Nutrition
//! Two encodings occur in `raw_details` and never together in practice:
//! - Coles listings carry `nutrition.breakdown`, a list of titled sections
//!   (`"Per Serving"`, `"Per 100g"`) of `{nutrient, value}` pairs.
//! - Older scrapes carry `nutrition_facts`, a flat object such as
//!   `{"calories_per_serving": 120, "protein": "7g"}`.
//!
//! The encoding is resolved once while deserializing [`RawDetails`] into a
//! [`NutritionSource`]; downstream code never probes the JSON again.
//!
//! ### Price history
//! `start_date`/`end_date` are `LocalDate` strings (`"2024-03-01"`) from the
//! backend; `end_date` is `null` for the current price.
//!
//! ### Nullable strings
//! `brand`, `category`, `unit` and `description` have been seen as `null` on
//! freshly ingested rows. They are read as empty strings.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Top-level product record.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProduct {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    /// Free-form size string, e.g. `"611g"` or `"2L"`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub size: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub unit: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub store_products: Vec<ApiStoreProduct>,
}

/// A single retailer's listing of the product.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStoreProduct {
    pub id: i64,
    /// Lower-case retailer key, e.g. `"coles"`.
    pub store: String,
    #[serde(default)]
    pub store_product_id: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    pub current_price: f64,
    #[serde(default)]
    pub availability: Option<bool>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub raw_details: Option<RawDetails>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub price_history: Vec<ApiPriceHistory>,
}

impl ApiStoreProduct {
    /// The nutrition encoding carried by this offer, or
    /// [`NutritionSource::Absent`] when it has no raw details.
    #[must_use]
    pub fn nutrition(&self) -> &NutritionSource {
        const ABSENT: &NutritionSource = &NutritionSource::Absent;
        self.raw_details.as_ref().map_or(ABSENT, |d| &d.nutrition)
    }

    /// Long-form description, when the retailer provided a non-empty one.
    #[must_use]
    pub fn long_description(&self) -> Option<&str> {
        self.raw_details
            .as_ref()
            .and_then(|d| d.long_description.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPriceHistory {
    pub price: f64,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Retailer-specific details captured by the scraper.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawDetailsWire")]
pub struct RawDetails {
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub weight: Option<String>,
    pub ingredients: Option<String>,
    pub barcode: Option<String>,
    pub rating: Option<f64>,
    pub nutrition: NutritionSource,
}

/// Which nutrition encoding an offer carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NutritionSource {
    /// Titled sections of nutrient/value pairs.
    Breakdown(Vec<BreakdownSection>),
    /// Flat object of named fields.
    Facts(Map<String, Value>),
    #[default]
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BreakdownSection {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub nutrients: Vec<BreakdownNutrient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BreakdownNutrient {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nutrient: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
}

#[derive(Deserialize)]
struct RawDetailsWire {
    #[serde(default, deserialize_with = "lenient_string")]
    brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, rename = "longDescription", deserialize_with = "lenient_string")]
    long_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    weight: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    ingredients: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
    #[serde(default)]
    nutrition: Option<Value>,
    #[serde(default)]
    nutrition_facts: Option<Value>,
}

impl From<RawDetailsWire> for RawDetails {
    fn from(wire: RawDetailsWire) -> Self {
        let nutrition = resolve_nutrition_source(wire.nutrition, wire.nutrition_facts);
        Self {
            brand: wire.brand,
            category: wire.category,
            description: wire.description,
            long_description: wire.long_description,
            weight: wire.weight,
            ingredients: wire.ingredients,
            barcode: wire.barcode,
            rating: wire.rating,
            nutrition,
        }
    }
}

/// Breakdown wins whenever `nutrition.breakdown` is a well-formed list;
/// otherwise a `nutrition_facts` object is used.
fn resolve_nutrition_source(nutrition: Option<Value>, facts: Option<Value>) -> NutritionSource {
    let breakdown = nutrition
        .and_then(|mut n| n.get_mut("breakdown").map(Value::take))
        .filter(Value::is_array)
        .and_then(|b| match serde_json::from_value::<Vec<BreakdownSection>>(b) {
            Ok(sections) => Some(sections),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed nutrition breakdown");
                None
            }
        });

    if let Some(sections) = breakdown {
        return NutritionSource::Breakdown(sections);
    }

    match facts {
        Some(Value::Object(map)) => NutritionSource::Facts(map),
        _ => NutritionSource::Absent,
    }
}

/// Scraped blobs are loosely typed. Numbers are rendered as strings, and
/// anything else that is not a string is dropped.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
