// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidAssetPath,
    InvalidQueryParameter,
    AssetNotFound,
    AssetIoFailure,
    Timeout,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidAssetPath => "InvalidAssetPath",
            Self::InvalidQueryParameter => "InvalidQueryParameter",
            Self::AssetNotFound => "AssetNotFound",
            Self::AssetIoFailure => "AssetIoFailure",
            Self::Timeout => "Timeout",
            Self::Internal => "Internal",
        }
    }
}

/// Error body sent inside the `{"error": ...}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"parameter": name, "value": value}),
        )
    }

    #[must_use]
    pub fn invalid_asset_path(path: &str, reason: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidAssetPath,
            format!("invalid asset path: {reason}"),
            json!({"path": path}),
        )
    }

    #[must_use]
    pub fn asset_not_found(logical_id: &str, tried: &[String]) -> Self {
        Self::new(
            ApiErrorCode::AssetNotFound,
            format!("File not found: {logical_id}"),
            json!({"logical_id": logical_id, "tried": tried}),
        )
    }

    /// Storage internals stay in the logs; the body only names what failed.
    #[must_use]
    pub fn asset_io_failure(logical_id: &str, key: &str) -> Self {
        Self::new(
            ApiErrorCode::AssetIoFailure,
            "Internal server error",
            json!({"logical_id": logical_id, "key": key}),
        )
    }

    #[must_use]
    pub fn timeout(logical_id: &str, timeout_ms: u64) -> Self {
        Self::new(
            ApiErrorCode::Timeout,
            "Internal server error",
            json!({"logical_id": logical_id, "timeout_ms": timeout_ms}),
        )
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_with_their_stable_names() {
        for code in [
            ApiErrorCode::InvalidAssetPath,
            ApiErrorCode::AssetNotFound,
            ApiErrorCode::AssetIoFailure,
            ApiErrorCode::Timeout,
        ] {
            let encoded = serde_json::to_value(code).expect("encode code");
            assert_eq!(encoded, Value::String(code.as_str().to_string()));
        }
    }

    #[test]
    fn not_found_names_identifier_and_candidates() {
        let err = ApiError::asset_not_found("Comet", &["Comet.flac".to_string()]);
        assert_eq!(err.message, "File not found: Comet");
        assert_eq!(err.details["tried"], json!(["Comet.flac"]));
    }
}
