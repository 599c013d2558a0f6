pub mod client;
pub mod error;
pub mod normalize;
mod nutrition;
pub mod parse;
pub mod store_search;
pub mod types;

pub use client::{SearchPage, UpstreamClient};
pub use error::{NormalizeError, StoreSearchError, UpstreamError};
pub use normalize::normalize_product;
pub use store_search::{StoreProductHit, StoreSearchClient, StoreSearchResults};
pub use types::{ApiPriceHistory, ApiProduct, ApiStoreProduct, NutritionSource, RawDetails};
