use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// `RapidAPI` credentials for one supermarket search endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreApiConfig {
    pub url: String,
    pub host: String,
    pub key: String,
}

impl std::fmt::Debug for StoreApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreApiConfig")
            .field("url", &self.url)
            .field("host", &self.host)
            .field("key", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the product/search backend, without a trailing slash.
    pub external_api_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub upstream_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub user_agent: String,
    pub search_cache_max_entries: usize,
    pub search_cache_ttl_secs: u64,
    pub coles_api: Option<StoreApiConfig>,
    pub woolies_api: Option<StoreApiConfig>,
}
