// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};
use mixfolio_store::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
}

#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    let status_code = match error.code {
        ApiErrorCode::InvalidAssetPath | ApiErrorCode::InvalidQueryParameter => 400,
        ApiErrorCode::AssetNotFound => 404,
        // A resolution that overran its budget is reported like any other
        // storage failure.
        ApiErrorCode::AssetIoFailure | ApiErrorCode::Timeout | ApiErrorCode::Internal => 500,
    };
    ApiErrorMapping { status_code }
}

/// Absence and storage failure stay distinct all the way to the wire.
#[must_use]
pub fn map_resolve_error(error: &ResolveError) -> ApiError {
    match error {
        ResolveError::InvalidPath { path, reason } => ApiError::invalid_asset_path(path, reason),
        ResolveError::NotFound { logical_id, tried } => {
            ApiError::asset_not_found(logical_id, tried)
        }
        ResolveError::Storage {
            logical_id, key, ..
        } => ApiError::asset_io_failure(logical_id, key),
    }
}
