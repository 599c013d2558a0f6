//! Normalization from [`ApiProduct`] to [`pricebyte_core::Product`].
//!
//! Size parsing and date coercion live in [`crate::parse`]; nutrition
//! resolution lives in `crate::nutrition`. This module handles the
//! structural conversion.

use chrono::{DateTime, Utc};
use pricebyte_core::{NutritionInfo, PriceHistoryEntry, Product, StoreProduct};

use crate::error::NormalizeError;
use crate::nutrition;
use crate::parse::{capitalize_first, parse_size, parse_upstream_date};
use crate::types::{ApiPriceHistory, ApiProduct, ApiStoreProduct};

/// Normalizes a backend product record into the served [`Product`] view.
///
/// `now` closes open-ended price-history entries.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidDate`] if a price-history date cannot be
/// parsed.
pub fn normalize_product(
    product: ApiProduct,
    now: DateTime<Utc>,
) -> Result<Product, NormalizeError> {
    let nutrition = first_nutrition(&product.store_products);
    let long_description = product
        .store_products
        .iter()
        .find_map(ApiStoreProduct::long_description)
        .map(str::to_owned);

    let store_products = product
        .store_products
        .into_iter()
        .map(|offer| normalize_store_product(offer, now))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Product {
        product_id: product.id,
        name: product.name,
        brand: product.brand,
        category: capitalize_first(&product.category),
        size: parse_size(&product.size),
        unit: product.unit,
        image_url: product.image_url.unwrap_or_default(),
        description: product.description,
        long_description,
        nutrition,
        store_products,
    })
}

/// Nutrition from the first offer that yields any. Later offers are not
/// consulted once one succeeds.
fn first_nutrition(offers: &[ApiStoreProduct]) -> NutritionInfo {
    offers
        .iter()
        .map(|offer| nutrition::resolve(offer.nutrition()))
        .find(|info| !info.is_empty())
        .unwrap_or_default()
}

fn normalize_store_product(
    offer: ApiStoreProduct,
    now: DateTime<Utc>,
) -> Result<StoreProduct, NormalizeError> {
    let store_product_id = offer.id;
    let price_history = offer
        .price_history
        .into_iter()
        .map(|entry| normalize_price_history(entry, store_product_id, now))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StoreProduct {
        store_product_id,
        store: capitalize_first(&offer.store),
        standard_price: offer.current_price,
        product_url: offer.product_url,
        price_history,
    })
}

fn normalize_price_history(
    entry: ApiPriceHistory,
    store_product_id: i64,
    now: DateTime<Utc>,
) -> Result<PriceHistoryEntry, NormalizeError> {
    let start_date =
        parse_upstream_date(&entry.start_date).ok_or_else(|| NormalizeError::InvalidDate {
            store_product_id,
            field: "start_date",
            value: entry.start_date.clone(),
        })?;

    let end_date = match entry.end_date.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_upstream_date(raw).ok_or_else(|| NormalizeError::InvalidDate {
            store_product_id,
            field: "end_date",
            value: raw.to_owned(),
        })?,
        None => now,
    };

    Ok(PriceHistoryEntry {
        start_date,
        end_date,
        price: entry.price,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
