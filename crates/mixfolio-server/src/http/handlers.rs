use crate::AppState;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let body = state.metrics.render(state.resolver.backend_tag()).await;
    let mut resp = (StatusCode::OK, body).into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4"),
    );
    resp
}
