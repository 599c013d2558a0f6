//! URL construction for backend endpoints.

use reqwest::Url;

/// `{base}/api/products/{id}`. `base` must end with a slash.
pub(super) fn product_url(base: &Url, product_id: i64) -> Url {
    let id = product_id.to_string();
    with_segments(base, &["api", "products", id.as_str()])
}

/// `{base}/api/products/search?q=&offset=&limit=` with the query encoded.
pub(super) fn search_url(base: &Url, query: &str, offset: i64, limit: i64) -> Url {
    let mut url = with_segments(base, &["api", "products", "search"]);
    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("offset", &offset.to_string())
        .append_pair("limit", &limit.to_string());
    url
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
