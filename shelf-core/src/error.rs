//! Error types for Shelf Core

use thiserror::Error;

/// Result type alias using InventoryError
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Failures reported by inventory operations
///
/// Every variant except `Poisoned` is an expected, recoverable condition. A
/// failed operation never leaves a partial change behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Book already exists: {0}")]
    DuplicateId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Book not available: {0}")]
    Unavailable(String),

    #[error("Quantity ceiling reached: {0}")]
    CapacityExceeded(String),

    #[error("Inventory lock poisoned")]
    Poisoned,
}

/// Errors that occur while loading or seeding a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog entry {index} rejected: {source}")]
    Rejected {
        index: usize,
        #[source]
        source: InventoryError,
    },
}
