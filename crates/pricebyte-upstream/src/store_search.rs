//! Supermarket product search through the `RapidAPI` Coles and Woolworths
//! endpoints.
//!
//! Stores are addressed by their display labels (`"Coles Store"`,
//! `"Woolies Store"`). A store without configured credentials, or an unknown
//! label, yields an empty result with zero API uses rather than an error.

use std::time::Duration;

use pricebyte_core::{AppConfig, StoreApiConfig};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::StoreSearchError;

/// Results requested per page.
pub const MAX_PAGE_SIZE: u32 = 20;

/// Upper bound on pages fetched for one query, in case `total_pages` is
/// nonsensical.
pub(crate) const MAX_PAGES: u32 = 50;

/// One search hit, flattened from the store API's result shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreProductHit {
    pub store: String,
    pub price: f64,
    pub product_name: String,
    pub brand: String,
    pub weight: String,
    pub product_url: String,
}

/// All hits for a query, plus how many API calls were spent getting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSearchResults {
    pub api_uses: u32,
    pub products: Vec<StoreProductHit>,
}

#[derive(Debug, Deserialize)]
struct SearchPageResponse {
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    product_brand: Option<String>,
    #[serde(default)]
    product_size: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

pub struct StoreSearchClient {
    client: Client,
    coles: Option<StoreApiConfig>,
    woolies: Option<StoreApiConfig>,
}

impl StoreSearchClient {
    /// # Errors
    ///
    /// Returns [`StoreSearchError::Http`] if the `reqwest::Client` cannot be
    /// built.
    pub fn new(
        timeout_secs: u64,
        coles: Option<StoreApiConfig>,
        woolies: Option<StoreApiConfig>,
    ) -> Result<Self, StoreSearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            coles,
            woolies,
        })
    }

    /// # Errors
    ///
    /// See [`StoreSearchClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreSearchError> {
        Self::new(
            config.upstream_timeout_secs,
            config.coles_api.clone(),
            config.woolies_api.clone(),
        )
    }

    fn credentials(&self, store: &str) -> Option<&StoreApiConfig> {
        match store {
            "Coles Store" => self.coles.as_ref(),
            "Woolies Store" => self.woolies.as_ref(),
            _ => None,
        }
    }

    /// Searches `store` for `product_name`, following pagination.
    ///
    /// The page count is taken from the first response. A non-200 page ends
    /// the walk early with whatever was collected so far.
    ///
    /// # Errors
    ///
    /// - [`StoreSearchError::InvalidUrl`] if the configured endpoint URL does not parse.
    /// - [`StoreSearchError::Http`] on network failure.
    /// - [`StoreSearchError::Deserialize`] if a 200 page is not valid JSON.
    pub async fn query_products(
        &self,
        store: &str,
        product_name: &str,
    ) -> Result<StoreSearchResults, StoreSearchError> {
        let Some(api) = self.credentials(store) else {
            tracing::debug!(store, "no store search credentials; skipping");
            return Ok(StoreSearchResults::default());
        };

        let base = Url::parse(&api.url).map_err(|e| StoreSearchError::InvalidUrl {
            url: api.url.clone(),
            reason: e.to_string(),
        })?;

        let mut results = StoreSearchResults::default();
        let mut page_count: Option<u32> = None;
        let mut page = 1u32;

        loop {
            let mut url = base.clone();
            url.query_pairs_mut()
                .append_pair("query", product_name)
                .append_pair("size", &MAX_PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());

            let response = self
                .client
                .get(url)
                .header("x-rapidapi-key", &api.key)
                .header("x-rapidapi-host", &api.host)
                .send()
                .await?;
            results.api_uses += 1;

            if response.status() != StatusCode::OK {
                tracing::warn!(
                    store,
                    page,
                    status = response.status().as_u16(),
                    "store search page failed; stopping"
                );
                break;
            }

            let body = response.text().await?;
            let parsed = serde_json::from_str::<SearchPageResponse>(&body).map_err(|e| {
                StoreSearchError::Deserialize {
                    context: format!("{store} search page {page}"),
                    source: e,
                }
            })?;

            let total = *page_count.get_or_insert(parsed.total_pages.unwrap_or(0));
            results
                .products
                .extend(parsed.results.into_iter().map(|hit| StoreProductHit {
                    store: store.to_owned(),
                    price: hit.current_price.unwrap_or(0.0),
                    product_name: hit.product_name.unwrap_or_default(),
                    brand: hit.product_brand.unwrap_or_default(),
                    weight: hit.product_size.unwrap_or_default(),
                    product_url: hit.url.unwrap_or_default(),
                }));

            if page >= total.min(MAX_PAGES) {
                break;
            }
            page += 1;
        }

        tracing::info!(
            store,
            product_name,
            api_uses = results.api_uses,
            hits = results.products.len(),
            "store search complete"
        );
        Ok(results)
    }
}
