use std::fmt;

// === NativeApiError ===

/// Errors raised by the native bookmark tree API.
#[derive(Debug)]
pub enum NativeApiError {
    /// No node with the given ID exists.
    NotFound(String),
    /// The node is a link where a folder was required.
    NotAFolder(String),
    /// The node is the root or one of the browser's special folders.
    ProtectedNode(String),
    /// `remove` was called on a folder that still has children.
    FolderNotEmpty(String),
    /// The requested change is not allowed on this node.
    InvalidOperation(String),
    /// The underlying store failed.
    Backend(String),
}

impl fmt::Display for NativeApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeApiError::NotFound(id) => write!(f, "Bookmark node not found: {}", id),
            NativeApiError::NotAFolder(id) => write!(f, "Bookmark node is not a folder: {}", id),
            NativeApiError::ProtectedNode(id) => {
                write!(f, "Cannot modify special bookmark folder: {}", id)
            }
            NativeApiError::FolderNotEmpty(id) => {
                write!(f, "Cannot remove non-empty bookmark folder: {}", id)
            }
            NativeApiError::InvalidOperation(msg) => {
                write!(f, "Invalid bookmark operation: {}", msg)
            }
            NativeApiError::Backend(msg) => write!(f, "Bookmark store error: {}", msg),
        }
    }
}

impl std::error::Error for NativeApiError {}

impl From<rusqlite::Error> for NativeApiError {
    fn from(e: rusqlite::Error) -> Self {
        NativeApiError::Backend(e.to_string())
    }
}

// === ResolutionError ===

/// A required special folder could not be located in the bookmark tree.
#[derive(Debug)]
pub enum ResolutionError {
    /// The tree root has no top-level folders at all.
    EmptyRoot,
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::EmptyRoot => {
                write!(f, "Bookmark tree root has no top-level folders")
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

// === StorageError ===

/// Errors from the settings/cache store.
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the storage file failed.
    IoError(String),
    /// The stored document could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::IoError(msg) => write!(f, "Storage I/O error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === ApiError ===

/// Errors from the remote collections service.
#[derive(Debug)]
pub enum ApiError {
    /// Base URL or API key missing.
    NotConfigured,
    /// The request never produced an HTTP response.
    Network(String),
    /// The service answered with a non-success status.
    HttpStatus(u16),
    /// The response body did not have the expected shape.
    InvalidResponse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotConfigured => write!(f, "API is not configured"),
            ApiError::Network(msg) => write!(f, "API network error: {}", msg),
            ApiError::HttpStatus(status) => write!(f, "Remote service returned HTTP {}", status),
            ApiError::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// === SyncError ===

/// Top-level error for sync, backup and controller operations.
#[derive(Debug)]
pub enum SyncError {
    Resolution(ResolutionError),
    NativeApi(NativeApiError),
    Storage(StorageError),
    Api(ApiError),
    /// User input rejected before reaching the remote service.
    Validation(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Resolution(e) => write!(f, "{}", e),
            SyncError::NativeApi(e) => write!(f, "{}", e),
            SyncError::Storage(e) => write!(f, "{}", e),
            SyncError::Api(e) => write!(f, "{}", e),
            SyncError::Validation(msg) => write!(f, "Validation failed: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Resolution(e) => Some(e),
            SyncError::NativeApi(e) => Some(e),
            SyncError::Storage(e) => Some(e),
            SyncError::Api(e) => Some(e),
            SyncError::Validation(_) => None,
        }
    }
}

impl From<ResolutionError> for SyncError {
    fn from(e: ResolutionError) -> Self {
        SyncError::Resolution(e)
    }
}

impl From<NativeApiError> for SyncError {
    fn from(e: NativeApiError) -> Self {
        SyncError::NativeApi(e)
    }
}

impl From<StorageError> for SyncError {
    fn from(e: StorageError) -> Self {
        SyncError::Storage(e)
    }
}

impl From<ApiError> for SyncError {
    fn from(e: ApiError) -> Self {
        SyncError::Api(e)
    }
}
