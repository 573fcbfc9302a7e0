// SPDX-License-Identifier: Apache-2.0

use crate::http::response_contract::{api_error_response, put_cache_headers};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use mixfolio_api::{map_resolve_error, ApiError};
use mixfolio_store::{AssetRequest, ResolveError, ResolvedAsset};
use std::sync::atomic::Ordering;
use tracing::{error, info};

/// `GET /files/{logicalId}[.{ext}]`
pub(crate) async fn files_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Response {
    let request = match AssetRequest::parse(&path) {
        Ok(request) => request,
        Err(err) => return resolve_error_response(&state, &err),
    };

    let timeout = state.api.resolve_timeout;
    match tokio::time::timeout(timeout, state.resolver.resolve(&request)).await {
        Ok(Ok(asset)) => {
            state.metrics.observe_asset_served(asset.bytes.len());
            asset_response(&state, asset)
        }
        Ok(Err(err)) => resolve_error_response(&state, &err),
        Err(_) => {
            state.metrics.asset_timeouts.fetch_add(1, Ordering::Relaxed);
            let timeout_ms = timeout.as_millis() as u64;
            error!(
                logical_id = %request.logical_id,
                timeout_ms,
                "asset resolution timed out"
            );
            api_error_response(ApiError::timeout(&request.logical_id, timeout_ms))
        }
    }
}

fn asset_response(state: &AppState, asset: ResolvedAsset) -> Response {
    let len = asset.bytes.len();
    let mut resp = (StatusCode::OK, asset.bytes).into_response();
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(asset.content_type),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    put_cache_headers(headers, state.api.asset_cache_max_age, None);
    resp
}

fn resolve_error_response(state: &AppState, err: &ResolveError) -> Response {
    state.metrics.observe_resolve_error(err);
    match err {
        ResolveError::InvalidPath { path, reason } => {
            info!(path = %path, reason = %reason, "rejected asset path");
        }
        ResolveError::NotFound { logical_id, tried } => {
            info!(logical_id = %logical_id, tried = tried.len(), "asset not found");
        }
        ResolveError::Storage { .. } => {
            error!(error = %err, "asset storage failure");
        }
    }
    api_error_response(map_resolve_error(err))
}
