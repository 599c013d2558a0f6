use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A product as served to page consumers, normalized from the backend's
/// product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    /// Category with its first character upper-cased.
    pub category: String,
    /// Leading number of the backend's size string, `0` when none is present.
    pub size: f64,
    pub unit: String,
    /// Empty string when the backend has no image.
    pub image_url: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub nutrition: NutritionInfo,
    pub store_products: Vec<StoreProduct>,
}

/// Nutrient name to display string, split into per-serving and per-100g
/// buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    pub per_serving: BTreeMap<String, String>,
    #[serde(rename = "per100g")]
    pub per_100g: BTreeMap<String, String>,
}

impl NutritionInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_serving.is_empty() && self.per_100g.is_empty()
    }
}

/// One retailer's listing of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProduct {
    pub store_product_id: i64,
    /// Store name with its first character upper-cased, e.g. `"Coles"`.
    pub store: String,
    pub standard_price: f64,
    pub product_url: Option<String>,
    pub price_history: Vec<PriceHistoryEntry>,
}

/// A price that held between two instants. Open-ended upstream entries are
/// closed at the time of normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryEntry {
    #[serde(serialize_with = "serialize_iso_millis")]
    pub start_date: DateTime<Utc>,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub end_date: DateTime<Utc>,
    pub price: f64,
}

/// Renders timestamps as `2024-01-01T00:00:00.000Z`.
fn serialize_iso_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Search results envelope returned by the backend's search endpoint.
///
/// The gateway passes upstream search bodies through untouched; this type is
/// only used to build the empty envelope for blank queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<serde_json::Value>,
    pub total_count: i64,
    pub offset: i64,
    pub limit: i64,
    pub has_next: bool,
}

impl SearchResponse {
    #[must_use]
    pub fn empty(offset: i64, limit: i64) -> Self {
        Self {
            results: Vec::new(),
            total_count: 0,
            offset,
            limit,
            has_next: false,
        }
    }
}
