//! Error types for the allocation engine.

use thiserror::Error;

use crate::types::EntryId;

/// Errors raised by band tables, the allocator and holders.
///
/// Every error is returned at the call that caused it. A holder that returns
/// an error keeps its previous consistent state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Band tables are missing, malformed or do not cover `1..`
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Requested quantities would exceed capacity under the reject policy
    #[error("Capacity exceeded: requested {requested} exceeds capacity {capacity}")]
    CapacityExceeded { requested: u64, capacity: u64 },

    /// No entry with this id
    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    /// An entry with this id already exists
    #[error("Duplicate entry id: {0}")]
    DuplicateEntry(EntryId),

    /// Allocation records could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(String),
}

pub type AllocationResult<T> = std::result::Result<T, AllocationError>;

/// Errors raised while loading an engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] AllocationError),
}
