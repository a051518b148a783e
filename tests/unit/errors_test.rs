use std::error::Error;

use collectionbar::types::errors::*;

// === NativeApiError Tests ===

#[test]
fn native_api_error_display_variants() {
    assert_eq!(
        NativeApiError::NotFound("42".to_string()).to_string(),
        "Bookmark node not found: 42"
    );
    assert_eq!(
        NativeApiError::NotAFolder("42".to_string()).to_string(),
        "Bookmark node is not a folder: 42"
    );
    assert_eq!(
        NativeApiError::ProtectedNode("1".to_string()).to_string(),
        "Cannot modify special bookmark folder: 1"
    );
    assert_eq!(
        NativeApiError::FolderNotEmpty("7".to_string()).to_string(),
        "Cannot remove non-empty bookmark folder: 7"
    );
    assert_eq!(
        NativeApiError::InvalidOperation("nope".to_string()).to_string(),
        "Invalid bookmark operation: nope"
    );
    assert_eq!(
        NativeApiError::Backend("disk I/O".to_string()).to_string(),
        "Bookmark store error: disk I/O"
    );
}

#[test]
fn native_api_error_from_rusqlite() {
    let err: NativeApiError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, NativeApiError::Backend(_)));
}

// === ResolutionError Tests ===

#[test]
fn resolution_error_display() {
    assert_eq!(
        ResolutionError::EmptyRoot.to_string(),
        "Bookmark tree root has no top-level folders"
    );
}

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::IoError("denied".to_string()).to_string(),
        "Storage I/O error: denied"
    );
    assert_eq!(
        StorageError::SerializationError("eof".to_string()).to_string(),
        "Storage serialization error: eof"
    );
}

// === ApiError Tests ===

#[test]
fn api_error_display_variants() {
    assert_eq!(ApiError::NotConfigured.to_string(), "API is not configured");
    assert_eq!(
        ApiError::Network("timed out".to_string()).to_string(),
        "API network error: timed out"
    );
    assert_eq!(
        ApiError::HttpStatus(401).to_string(),
        "Remote service returned HTTP 401"
    );
    assert_eq!(
        ApiError::InvalidResponse("missing field".to_string()).to_string(),
        "Invalid API response: missing field"
    );
}

// === SyncError Tests ===

#[test]
fn sync_error_delegates_display_to_inner_error() {
    let err: SyncError = ApiError::HttpStatus(500).into();
    assert_eq!(err.to_string(), "Remote service returned HTTP 500");

    let err: SyncError = ResolutionError::EmptyRoot.into();
    assert_eq!(err.to_string(), "Bookmark tree root has no top-level folders");
}

#[test]
fn sync_error_exposes_source() {
    let err: SyncError = NativeApiError::NotFound("x".to_string()).into();
    let source = err.source().expect("wrapped errors have a source");
    assert_eq!(source.to_string(), "Bookmark node not found: x");

    let err = SyncError::Validation("Invalid URL".to_string());
    assert_eq!(err.to_string(), "Validation failed: Invalid URL");
    assert!(err.source().is_none());
}

#[test]
fn errors_implement_error_trait() {
    let errors: Vec<Box<dyn Error>> = vec![
        Box::new(NativeApiError::NotFound("id".to_string())),
        Box::new(ResolutionError::EmptyRoot),
        Box::new(StorageError::IoError("io".to_string())),
        Box::new(ApiError::NotConfigured),
        Box::new(SyncError::Validation("v".to_string())),
    ];
    assert_eq!(errors.len(), 5);
}
