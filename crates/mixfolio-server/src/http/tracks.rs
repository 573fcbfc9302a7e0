use crate::http::response_contract::{
    api_error_response, etag_matches, put_cache_headers, sha256_hex,
};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use mixfolio_api::{parse_track_query, ApiError};
use mixfolio_model::all_genres;
use mixfolio_store::CatalogLoad;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// The catalog is re-read per request, so clients must revalidate.
const CATALOG_MAX_AGE: Duration = Duration::ZERO;

pub(crate) async fn tracks_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let query = match parse_track_query(&params) {
        Ok(query) => query,
        Err(err) => return api_error_response(err),
    };
    let load = match load_catalog(&state).await {
        Ok(load) => load,
        Err(resp) => return resp,
    };
    let tracks = query.apply(&load.tracks);
    catalog_response(&headers, &load, &tracks)
}

pub(crate) async fn genres_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let load = match load_catalog(&state).await {
        Ok(load) => load,
        Err(resp) => return resp,
    };
    let genres: Vec<String> = all_genres(&load.tracks).into_iter().collect();
    catalog_response(&headers, &load, &genres)
}

async fn load_catalog(state: &AppState) -> Result<CatalogLoad, Response> {
    let loader = Arc::clone(&state.catalog);
    match tokio::task::spawn_blocking(move || loader.load()).await {
        Ok(load) => {
            state.metrics.observe_catalog(&load.source);
            Ok(load)
        }
        Err(e) => {
            error!(error = %e, "catalog load task failed");
            Err(api_error_response(ApiError::internal("Failed to load tracks data")))
        }
    }
}

fn catalog_response<T: Serialize>(
    headers: &HeaderMap,
    load: &CatalogLoad,
    payload: &T,
) -> Response {
    let body = match serde_json::to_vec(payload) {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "catalog serialization failed");
            return api_error_response(ApiError::internal("Failed to load tracks data"));
        }
    };
    let etag = format!("\"{}\"", sha256_hex(&body));
    let mut resp = if etag_matches(headers, &etag) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        let mut resp = (StatusCode::OK, body).into_response();
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        resp
    };
    let out = resp.headers_mut();
    put_cache_headers(out, CATALOG_MAX_AGE, Some(&etag));
    out.insert(
        "x-catalog-source",
        HeaderValue::from_static(load.source.as_str()),
    );
    resp
}
