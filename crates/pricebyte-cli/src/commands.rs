//! Subcommand handlers. Each one builds the client it needs from config,
//! makes a single request, and prints JSON to stdout.

use chrono::Utc;
use pricebyte_core::AppConfig;
use pricebyte_upstream::{normalize_product, StoreSearchClient, UpstreamClient};

pub(crate) async fn run_product(config: &AppConfig, product_id: i64) -> anyhow::Result<()> {
    let client = UpstreamClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build upstream client: {e}"))?;

    let api_product = client.fetch_product(product_id).await?;
    let product = normalize_product(api_product, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&product)?);
    Ok(())
}

pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    offset: i64,
    limit: i64,
) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("search query must not be blank");
    }

    let client = UpstreamClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build upstream client: {e}"))?;

    let page = client.search(query, offset, limit).await?;
    match serde_json::from_str::<serde_json::Value>(&page.body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", page.body),
    }
    Ok(())
}

pub(crate) async fn run_store_search(
    config: &AppConfig,
    store: &str,
    product_name: &str,
) -> anyhow::Result<()> {
    let client = StoreSearchClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build store search client: {e}"))?;

    let results = client.query_products(store, product_name).await?;
    if results.api_uses == 0 {
        tracing::warn!(store, "no API calls made; check the store label and credentials");
    }
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
