use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use pricebyte_core::SearchResponse;
use pricebyte_upstream::{SearchPage, UpstreamError};
use serde::Deserialize;

use crate::cache::SearchCacheKey;
use crate::middleware::RequestId;

use super::{ApiError, AppState};

const DEFAULT_OFFSET: i64 = 0;
const DEFAULT_LIMIT: i64 = 10;

/// Raw query string. Paging values are kept as strings so that garbage falls
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

fn passthrough(page: SearchPage) -> Response {
    let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::OK);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        page.body,
    )
        .into_response()
}

pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let offset = parse_or(query.offset.as_deref(), DEFAULT_OFFSET);
    let limit = parse_or(query.limit.as_deref(), DEFAULT_LIMIT);

    let q = query.q.as_deref().unwrap_or_default();
    if q.trim().is_empty() {
        return Ok(Json(SearchResponse::empty(offset, limit)).into_response());
    }

    let key = SearchCacheKey::new(q, offset, limit);
    if let Some(page) = state.search_cache.get(&key).await {
        tracing::debug!(request_id = %req_id.0, q, offset, limit, "search cache hit");
        return Ok(passthrough(page));
    }

    match state.upstream.search(q, offset, limit).await {
        Ok(page) => {
            state.search_cache.insert(key, page.clone()).await;
            Ok(passthrough(page))
        }
        Err(UpstreamError::Timeout { timeout_secs, .. }) => {
            tracing::warn!(request_id = %req_id.0, q, timeout_secs, "search timed out");
            Err(ApiError::gateway_timeout("Search request timed out"))
        }
        Err(e) => {
            tracing::error!(request_id = %req_id.0, q, error = %e, "search failed");
            Err(ApiError::internal())
        }
    }
}
