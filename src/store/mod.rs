//! Append-only record store.
//!
//! The store holds a header row followed by one row per generated record.
//! It is created once, appended to for the rest of the process lifetime
//! and read back in full for export.

mod csv_store;
mod memory;

pub use csv_store::CsvStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use thiserror::Error;

use crate::record::Record;

/// Errors raised by a [`RecordStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to write to store: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to read store: {0}")]
    Read(#[source] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store is {size} bytes, above the {limit} byte export limit")]
    TooLarge { size: u64, limit: u64 },
}

/// Storage abstraction for generated records.
pub trait RecordStore: Send + Sync {
    /// Creates the store with its header row if it does not exist yet.
    ///
    /// Returns `true` when the store was created by this call. An existing
    /// store is left untouched.
    fn ensure_initialized(&self) -> Result<bool, StoreError>;

    /// Appends one record after all existing rows.
    fn append(&self, record: &Record) -> Result<(), StoreError>;

    /// Returns the current size of the store in bytes without reading it.
    fn size(&self) -> Result<u64, StoreError>;

    /// Returns the full content of the store, header included.
    ///
    /// Reading never creates the store.
    fn read_all(&self) -> Result<Vec<u8>, StoreError>;
}

/// Encodes the header row.
pub(crate) fn encode_header() -> Result<Vec<u8>, StoreError> {
    let mut writer = row_writer(Vec::new());
    writer.write_record(crate::record::HEADER)?;
    into_bytes(writer)
}

/// Encodes a single record row.
pub(crate) fn encode_row(record: &Record) -> Result<Vec<u8>, StoreError> {
    let mut writer = row_writer(Vec::new());
    writer.serialize(record)?;
    into_bytes(writer)
}

fn row_writer<W: std::io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, StoreError> {
    writer
        .into_inner()
        .map_err(|e| StoreError::Write(e.into_error()))
}

/// Parses exported store content back into records.
pub fn parse_records(content: &[u8]) -> Result<Vec<Record>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content);
    reader.deserialize().collect()
}
