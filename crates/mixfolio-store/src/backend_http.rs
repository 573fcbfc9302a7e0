// SPDX-License-Identifier: Apache-2.0

use crate::{AssetKey, AssetStore, StoreError, StoreErrorCode};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use std::time::Duration;
use tracing::instrument;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote object storage (S3-style bucket or any static file host) addressed
/// as `{base_url}/{key}`.
pub struct HttpObjectStore {
    base_url: Url,
    auth_bearer: Option<String>,
    client: Client,
}

impl std::fmt::Debug for HttpObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpObjectStore")
            .field("base_url", &self.base_url.as_str())
            .field(
                "auth_bearer",
                &self.auth_bearer.as_ref().map(|_| "<redacted>"),
            )
            .finish_non_exhaustive()
    }
}

impl HttpObjectStore {
    pub fn new(base_url: &str, auth_bearer: Option<String>) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, auth_bearer, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        auth_bearer: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Validation,
                format!("invalid storage base url `{base_url}`: {e}"),
            )
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(StoreError::new(
                StoreErrorCode::Validation,
                format!("storage base url must be http(s): {base_url}"),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        Ok(Self {
            base_url,
            auth_bearer: auth_bearer.filter(|t| !t.trim().is_empty()),
            client,
        })
    }

    /// Each key segment is appended percent-encoded, so names with spaces or
    /// `+` survive the trip.
    #[must_use]
    pub fn object_url(&self, key: &AssetKey) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(key.segments());
        }
        url
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth_bearer {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

fn transport_error(url: &Url, err: &reqwest::Error) -> StoreError {
    let code = if err.is_timeout() {
        StoreErrorCode::Timeout
    } else {
        StoreErrorCode::Network
    };
    StoreError::new(code, format!("request to {url} failed: {err}"))
}

fn status_error(url: &Url, status: StatusCode) -> StoreError {
    StoreError::new(
        StoreErrorCode::Network,
        format!("unexpected status {status} from {url}"),
    )
}

fn is_absent(status: StatusCode) -> bool {
    matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE)
}

#[async_trait]
impl AssetStore for HttpObjectStore {
    fn backend_tag(&self) -> &'static str {
        "http"
    }

    #[instrument(name = "store_http_head", skip(self), fields(key = %key))]
    async fn exists(&self, key: &AssetKey) -> Result<bool, StoreError> {
        let url = self.object_url(key);
        let resp = self
            .authorized(self.client.head(url.clone()))
            .send()
            .await
            .map_err(|e| transport_error(&url, &e))?;
        let status = resp.status();
        if status.is_success() {
            Ok(true)
        } else if is_absent(status) {
            Ok(false)
        } else {
            Err(status_error(&url, status))
        }
    }

    #[instrument(name = "store_http_get", skip(self), fields(key = %key))]
    async fn read(&self, key: &AssetKey) -> Result<Vec<u8>, StoreError> {
        let url = self.object_url(key);
        let resp = self
            .authorized(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| transport_error(&url, &e))?;
        let status = resp.status();
        if is_absent(status) {
            return Err(StoreError::new(
                StoreErrorCode::NotFound,
                format!("object missing at {url}"),
            ));
        }
        if !status.is_success() {
            return Err(status_error(&url, status));
        }
        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| transport_error(&url, &e))
    }
}
