use std::fmt;

// === StorageError ===

/// Errors raised by a persistent key-value slot backend.
#[derive(Debug)]
pub enum StorageError {
    /// The backend could not be read from.
    ReadFailed(String),
    /// The backend rejected a write (quota, disabled storage, locked file).
    WriteFailed(String),
    /// The backend itself is unusable (e.g. poisoned lock, closed database).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadFailed(msg) => write!(f, "Storage read failed: {}", msg),
            StorageError::WriteFailed(msg) => write!(f, "Storage write failed: {}", msg),
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

// === HistoryError ===

/// Errors related to reading-history operations.
///
/// These never reach the UI: the infallible `HistoryManager` methods log them
/// and fall back to an empty (or unchanged) list.
#[derive(Debug)]
pub enum HistoryError {
    /// The persistent slot could not be read or written, or the list could
    /// not be serialized.
    StorageUnavailable(String),
    /// The slot holds a value that is not a list of history entries.
    MalformedPersistedData(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::StorageUnavailable(msg) => {
                write!(f, "History storage unavailable: {}", msg)
            }
            HistoryError::MalformedPersistedData(msg) => {
                write!(f, "Malformed history data: {}", msg)
            }
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<StorageError> for HistoryError {
    fn from(err: StorageError) -> Self {
        HistoryError::StorageUnavailable(err.to_string())
    }
}

// === CatalogError ===

/// Errors related to the remote book catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The requested book does not exist.
    NotFound(String),
    /// The request never produced an HTTP response.
    NetworkError(String),
    /// The catalog answered with a non-success status.
    HttpStatus(u16),
    /// The response body did not match the expected shape.
    ParseError(String),
    /// A create or upload request was rejected before it was sent.
    InvalidInput(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "Book not found: {}", id),
            CatalogError::NetworkError(msg) => write!(f, "Catalog network error: {}", msg),
            CatalogError::HttpStatus(code) => write!(f, "Catalog returned HTTP {}", code),
            CatalogError::ParseError(msg) => write!(f, "Catalog parse error: {}", msg),
            CatalogError::InvalidInput(msg) => write!(f, "Invalid book input: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
