use thiserror::Error;

/// Errors returned by [`crate::UpstreamClient`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Errors raised while reshaping an upstream product into the served view.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid {field} \"{value}\" in price history of store product {store_product_id}")]
    InvalidDate {
        store_product_id: i64,
        field: &'static str,
        value: String,
    },
}

/// Errors returned by [`crate::StoreSearchClient`].
#[derive(Debug, Error)]
pub enum StoreSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store search URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
