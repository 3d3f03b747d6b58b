//! Error types for the record store.

use thiserror::Error;

/// Errors that can occur while loading or persisting the record store.
///
/// A missing or empty snapshot file is not an error, it reads as an empty
/// store. Corruption of an existing snapshot surfaces instead of being
/// silently treated as empty.
#[derive(Debug, Error)]
pub enum Error {
    /// The snapshot file exists but could not be read.
    #[error("Failed to read record store: {0}")]
    Read(#[source] std::io::Error),

    /// The snapshot file exists but does not hold a valid record array.
    #[error("Corrupt record store: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The snapshot could not be serialized or written back.
    #[error("Failed to persist record store: {0}")]
    Write(#[source] std::io::Error),
}
