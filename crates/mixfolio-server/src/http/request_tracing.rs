// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::http::HeaderMap;

/// Longest caller-supplied request id that is propagated verbatim.
const MAX_REQUEST_ID_BYTES: usize = 128;

#[must_use]
pub(crate) fn extract_request_id(headers: &HeaderMap, state: &AppState) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_BYTES)
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let id = state
                .request_id_seed
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            format!("req-{id:016x}")
        })
}

/// Bounded route label for metrics and spans; raw asset paths would blow up
/// cardinality.
#[must_use]
pub(crate) fn route_class(path: &str) -> &'static str {
    match path {
        "/healthz" => "/healthz",
        "/metrics" => "/metrics",
        "/api/tracks" => "/api/tracks",
        "/api/genres" => "/api/genres",
        p if p.starts_with("/files/") || p.starts_with("/api/audio/") => "/files/*path",
        _ => "unmatched",
    }
}
