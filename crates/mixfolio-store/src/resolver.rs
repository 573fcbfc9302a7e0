// SPDX-License-Identifier: Apache-2.0

use crate::retry::{BackoffPolicy, RetryPolicy};
use crate::{AssetKey, AssetStore, StoreError, StoreErrorCode};
use mixfolio_model::{content_type_for_extension, split_extension, CANDIDATE_EXTENSIONS};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A request for the audio behind a logical identifier, optionally pinned
/// to one explicit extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub logical_id: String,
    /// With leading dot, exactly as requested (`.flac`, `.WAV`).
    pub extension: Option<String>,
}

impl AssetRequest {
    /// Parses a path below the files route, e.g. `Comet` or `Comet.flac`.
    pub fn parse(path: &str) -> Result<Self, ResolveError> {
        AssetKey::parse(path).map_err(|e| ResolveError::invalid_path(path, &e))?;
        let (stem, extension) = split_extension(path);
        Ok(Self {
            logical_id: stem.to_string(),
            extension: extension.map(ToString::to_string),
        })
    }

    #[must_use]
    pub fn logical(logical_id: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            extension: None,
        }
    }

    #[must_use]
    pub fn explicit(logical_id: impl Into<String>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = if extension.starts_with('.') {
            extension
        } else {
            format!(".{extension}")
        };
        Self {
            logical_id: logical_id.into(),
            extension: Some(extension),
        }
    }

    #[must_use]
    pub fn requested_path(&self) -> String {
        format!(
            "{}{}",
            self.logical_id,
            self.extension.as_deref().unwrap_or_default()
        )
    }

    fn key_with(&self, suffix: &str) -> Result<AssetKey, ResolveError> {
        let raw = format!("{}{suffix}", self.logical_id);
        AssetKey::parse(&raw).map_err(|e| ResolveError::invalid_path(&raw, &e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub logical_id: String,
    pub key: AssetKey,
    pub content_type: &'static str,
    pub backend: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    InvalidPath {
        path: String,
        reason: String,
    },
    /// No candidate exists. Expected and benign.
    NotFound {
        logical_id: String,
        tried: Vec<String>,
    },
    /// Storage misbehaved while checking or reading.
    Storage {
        logical_id: String,
        key: String,
        source: StoreError,
    },
}

impl ResolveError {
    fn invalid_path(path: &str, err: &StoreError) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: err.message.clone(),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPath { .. } => "invalid_path",
            Self::NotFound { .. } => "not_found",
            Self::Storage { .. } => "storage_failure",
        }
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath { reason, .. } => write!(f, "{reason}"),
            Self::NotFound { logical_id, .. } => write!(f, "file not found: {logical_id}"),
            Self::Storage {
                logical_id,
                key,
                source,
            } => write!(f, "storage failure for {logical_id} at {key}: {source}"),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub struct AssetResolver {
    store: Arc<dyn AssetStore>,
    retry: RetryPolicy,
}

impl AssetResolver {
    #[must_use]
    pub fn new(store: Arc<dyn AssetStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    #[must_use]
    pub fn backend_tag(&self) -> &'static str {
        self.store.backend_tag()
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// An explicit extension is checked alone; otherwise candidates are
    /// tried in `CANDIDATE_EXTENSIONS` order and the first hit wins.
    #[instrument(
        name = "resolve_asset",
        skip(self, request),
        fields(backend = self.store.backend_tag(), logical_id = %request.logical_id)
    )]
    pub async fn resolve(&self, request: &AssetRequest) -> Result<ResolvedAsset, ResolveError> {
        if let Some(ext) = request.extension.as_deref() {
            let key = request.key_with(ext)?;
            if !self.candidate_exists(request, &key).await? {
                return Err(ResolveError::NotFound {
                    logical_id: request.logical_id.clone(),
                    tried: vec![key.to_string()],
                });
            }
            return self
                .fetch(request, key, content_type_for_extension(ext))
                .await;
        }

        let mut tried = Vec::with_capacity(CANDIDATE_EXTENSIONS.len());
        for candidate in CANDIDATE_EXTENSIONS {
            let key = request.key_with(candidate.suffix)?;
            let found = self.candidate_exists(request, &key).await?;
            debug!(key = %key, found, "candidate checked");
            tried.push(key.to_string());
            if found {
                return self
                    .fetch(request, key, candidate.format.content_type())
                    .await;
            }
        }
        Err(ResolveError::NotFound {
            logical_id: request.logical_id.clone(),
            tried,
        })
    }

    pub async fn resolve_path(&self, path: &str) -> Result<ResolvedAsset, ResolveError> {
        self.resolve(&AssetRequest::parse(path)?).await
    }

    async fn candidate_exists(
        &self,
        request: &AssetRequest,
        key: &AssetKey,
    ) -> Result<bool, ResolveError> {
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            match self.store.exists(key).await {
                Err(e) if self.should_retry(&e, attempt) => {
                    self.backoff("exists", key, attempt, &e).await;
                }
                Err(e) => return Err(storage_failure(request, key, e)),
                Ok(found) => return Ok(found),
            }
        }
    }

    async fn fetch(
        &self,
        request: &AssetRequest,
        key: AssetKey,
        content_type: &'static str,
    ) -> Result<ResolvedAsset, ResolveError> {
        let mut attempt = 0usize;
        let bytes = loop {
            attempt += 1;
            match self.store.read(&key).await {
                Ok(bytes) => break bytes,
                Err(e) if self.should_retry(&e, attempt) => {
                    self.backoff("read", &key, attempt, &e).await;
                }
                Err(e) if e.code == StoreErrorCode::NotFound => {
                    // Removed between existence check and read.
                    return Err(ResolveError::NotFound {
                        logical_id: request.logical_id.clone(),
                        tried: vec![key.to_string()],
                    });
                }
                Err(e) => return Err(storage_failure(request, &key, e)),
            }
        };
        info!(
            key = %key,
            content_type,
            bytes = bytes.len(),
            "asset resolved"
        );
        Ok(ResolvedAsset {
            logical_id: request.logical_id.clone(),
            key,
            content_type,
            backend: self.store.backend_tag(),
            bytes,
        })
    }

    fn should_retry(&self, err: &StoreError, attempt: usize) -> bool {
        err.code.is_transient() && attempt < self.retry.attempts()
    }

    async fn backoff(&self, op: &str, key: &AssetKey, attempt: usize, err: &StoreError) {
        let delay = self.retry.delay_for_attempt(attempt);
        warn!(
            op,
            key = %key,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "transient storage failure, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

fn storage_failure(request: &AssetRequest, key: &AssetKey, source: StoreError) -> ResolveError {
    ResolveError::Storage {
        logical_id: request.logical_id.clone(),
        key: key.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_explicit_extension() {
        let req = AssetRequest::parse("Comet.flac").expect("parse");
        assert_eq!(req, AssetRequest::explicit("Comet", "flac"));
        assert_eq!(req.requested_path(), "Comet.flac");

        let req = AssetRequest::parse("Wish List (Slowed + Reverbed)").expect("parse");
        assert_eq!(req.extension, None);
    }

    #[test]
    fn parse_rejects_traversal() {
        let err = AssetRequest::parse("../etc/passwd").expect_err("traversal");
        assert_eq!(err.as_str(), "invalid_path");
    }

    #[test]
    fn not_found_display_names_the_identifier() {
        let err = ResolveError::NotFound {
            logical_id: "Comet".to_string(),
            tried: vec!["Comet.flac".to_string()],
        };
        assert_eq!(err.to_string(), "file not found: Comet");
    }
}
