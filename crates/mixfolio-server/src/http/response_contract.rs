// SPDX-License-Identifier: Apache-2.0

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use mixfolio_api::{map_error, ApiError};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::time::Duration;

#[must_use]
pub(crate) fn api_error_status(err: &ApiError) -> StatusCode {
    StatusCode::from_u16(map_error(err).status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[must_use]
pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = api_error_status(&err);
    (status, Json(json!({"error": err}))).into_response()
}

pub(crate) fn put_cache_headers(headers: &mut HeaderMap, max_age: Duration, etag: Option<&str>) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", max_age.as_secs())) {
        headers.insert("cache-control", value);
    }
    if let Some(Ok(value)) = etag.map(HeaderValue::from_str) {
        headers.insert("etag", value);
    }
}

#[must_use]
pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[must_use]
pub(crate) fn if_none_match(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// `If-None-Match` carries `*` or a comma-separated list of entity tags and
/// is compared weakly, so `W/"x"` matches `"x"`.
#[must_use]
pub(crate) fn etag_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(raw) = if_none_match(headers) else {
        return false;
    };
    let current = weak_opaque(etag);
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .any(|tag| tag == "*" || weak_opaque(tag) == current)
}

fn weak_opaque(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
