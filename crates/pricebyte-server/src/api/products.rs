use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use pricebyte_core::Product;
use pricebyte_upstream::{normalize_product, UpstreamError};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let Ok(product_id) = raw_id.trim().parse::<i64>() else {
        tracing::debug!(request_id = %req_id.0, raw_id, "rejecting non-numeric product id");
        return Err(ApiError::bad_request("Invalid product ID"));
    };

    let api_product = state
        .upstream
        .fetch_product(product_id)
        .await
        .map_err(|e| match e {
            UpstreamError::NotFound { .. } => {
                tracing::info!(request_id = %req_id.0, product_id, "product not found upstream");
                ApiError::not_found("Product not found")
            }
            other => {
                tracing::error!(
                    request_id = %req_id.0,
                    product_id,
                    error = %other,
                    "product fetch failed"
                );
                ApiError::internal()
            }
        })?;

    let product = normalize_product(api_product, Utc::now()).map_err(|e| {
        tracing::error!(
            request_id = %req_id.0,
            product_id,
            error = %e,
            "product normalization failed"
        );
        ApiError::internal()
    })?;

    Ok(Json(product))
}
