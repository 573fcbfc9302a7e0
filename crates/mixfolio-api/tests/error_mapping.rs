use mixfolio_api::{map_error, map_resolve_error, ApiError, ApiErrorCode};
use mixfolio_store::{ResolveError, StoreError, StoreErrorCode};
use serde_json::json;

#[test]
fn not_found_and_io_failure_map_to_distinct_statuses() {
    let not_found = map_resolve_error(&ResolveError::NotFound {
        logical_id: "Comet".to_string(),
        tried: vec!["Comet.flac".to_string()],
    });
    assert_eq!(not_found.code, ApiErrorCode::AssetNotFound);
    assert_eq!(map_error(&not_found).status_code, 404);
    assert_eq!(not_found.details["logical_id"], "Comet");

    let io = map_resolve_error(&ResolveError::Storage {
        logical_id: "Comet".to_string(),
        key: "Comet.mp3".to_string(),
        source: StoreError::new(StoreErrorCode::Io, "disk on fire"),
    });
    assert_eq!(io.code, ApiErrorCode::AssetIoFailure);
    assert_eq!(map_error(&io).status_code, 500);
    assert!(!io.message.contains("disk on fire"));
}

#[test]
fn invalid_paths_are_client_errors() {
    let err = map_resolve_error(&ResolveError::InvalidPath {
        path: "../x".to_string(),
        reason: "path traversal blocked".to_string(),
    });
    assert_eq!(err.code, ApiErrorCode::InvalidAssetPath);
    assert_eq!(map_error(&err).status_code, 400);
}

#[test]
fn timeouts_are_server_errors() {
    assert_eq!(
        map_error(&ApiError::timeout("Comet", 10_000)).status_code,
        500
    );
}

#[test]
fn error_body_rejects_unknown_fields() {
    let raw = json!({
        "code": "AssetNotFound",
        "message": "File not found: Comet",
        "details": {},
        "extra": true
    });
    assert!(serde_json::from_value::<ApiError>(raw).is_err());
}
