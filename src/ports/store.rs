//! Record store port: Trait for the local durable store.
//!
//! The concrete storage engine is an external collaborator; the ledger is
//! built entirely on this minimal keyed capability set (get-all / set /
//! delete-all) over opaque records.

/// An opaque stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Lookup key
    pub key: String,
    /// Opaque payload bytes
    pub value: Vec<u8>,
}

/// Trait for local durable storage.
///
/// All data stays on the device. Implementations must serialize writes so
/// that two sequential `set` calls are observed in call order by a
/// subsequent `get_all`.
pub trait RecordStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write a record, replacing any record with the same key.
    ///
    /// # Errors
    /// Returns error if the write fails.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), Self::Error>;

    /// Read all records.
    ///
    /// A fresh call re-reads the full current state; it is not a live
    /// cursor.
    ///
    /// # Errors
    /// Returns error if the read fails.
    fn get_all(&self) -> Result<Vec<StoredRecord>, Self::Error>;

    /// Delete every record. Destructive and irreversible.
    ///
    /// # Errors
    /// Returns error if the delete fails.
    fn delete_all(&self) -> Result<(), Self::Error>;
}
