//! HTTP client for the product/search backend.

mod urls;

use std::time::Duration;

use pricebyte_core::AppConfig;
use reqwest::{Client, StatusCode, Url};

use crate::error::UpstreamError;
use crate::types::ApiProduct;

/// A search response passed through from the backend untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub status: u16,
    pub body: String,
}

/// Client for the backend's product detail and search endpoints.
///
/// Every request is made once; nothing is retried. Search requests carry
/// their own hard timeout on top of the client-wide one and surface expiry as
/// [`UpstreamError::Timeout`].
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
    search_timeout: Duration,
}

impl UpstreamClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`UpstreamError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        search_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| UpstreamError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
            search_timeout,
        })
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`UpstreamClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        Self::new(
            &config.external_api_url,
            Duration::from_secs(config.upstream_timeout_secs),
            Duration::from_secs(config.search_timeout_secs),
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Fetches one product record by id.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::NotFound`] when the backend answers 404.
    /// - [`UpstreamError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`UpstreamError::Timeout`] when the client-wide timeout expires.
    /// - [`UpstreamError::Http`] on network failure.
    /// - [`UpstreamError::Deserialize`] if the body is not a product record.
    pub async fn fetch_product(&self, product_id: i64) -> Result<ApiProduct, UpstreamError> {
        let url = urls::product_url(&self.base_url, product_id);
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| classify_send_error(e, &url, self.request_timeout))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(e, &url, self.request_timeout))?;
        serde_json::from_str::<ApiProduct>(&body).map_err(|e| UpstreamError::Deserialize {
            context: format!("product {product_id}"),
            source: e,
        })
    }

    /// Runs a search against the backend and returns its body verbatim.
    ///
    /// The whole exchange, body included, must finish within the search
    /// timeout.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Timeout`] when the search timeout expires.
    /// - [`UpstreamError::UnexpectedStatus`] for any non-2xx status.
    /// - [`UpstreamError::Http`] on network failure.
    pub async fn search(
        &self,
        query: &str,
        offset: i64,
        limit: i64,
    ) -> Result<SearchPage, UpstreamError> {
        let url = urls::search_url(&self.base_url, query, offset, limit);
        let exchange = async {
            let response = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(UpstreamError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let body = response.text().await?;
            Ok::<_, UpstreamError>(SearchPage {
                status: status.as_u16(),
                body,
            })
        };

        match tokio::time::timeout(self.search_timeout, exchange).await {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(UpstreamError::Http(e))) => {
                Err(classify_send_error(e, &url, self.request_timeout))
            }
            Ok(Err(other)) => Err(other),
            Err(_elapsed) => Err(UpstreamError::Timeout {
                url: url.to_string(),
                timeout_secs: self.search_timeout.as_secs(),
            }),
        }
    }
}

/// Reqwest reports its own timeout as an ordinary error; surface it as
/// [`UpstreamError::Timeout`] so callers can tell it apart.
fn classify_send_error(error: reqwest::Error, url: &Url, timeout: Duration) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout {
            url: url.to_string(),
            timeout_secs: timeout.as_secs(),
        }
    } else {
        UpstreamError::Http(error)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
