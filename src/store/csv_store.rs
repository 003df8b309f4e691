//! File-backed CSV store.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use super::{RecordStore, StoreError, encode_header, encode_row, parse_records};
use crate::record::Record;

/// Record store backed by a CSV file on disk.
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,

    /// Serializes appends so concurrent callers never interleave rows.
    write_lock: Mutex<()>,
}

impl CsvStore {
    /// Creates a store handle for the given path. Nothing is touched on disk.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header into a file this store just created.
    ///
    /// On failure the file is removed again, so a store is never left
    /// without its header.
    fn write_header_or_remove(&self, mut file: impl Write) -> Result<(), StoreError> {
        let written = encode_header().and_then(|header| {
            file.write_all(&header).map_err(StoreError::Write)?;
            file.flush().map_err(StoreError::Write)
        });

        if written.is_err() {
            drop(file);
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to remove partial store {}: {}", self.path.display(), e);
            }
        }
        written
    }

    fn not_found_or(&self, e: std::io::Error) -> StoreError {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound(self.path.clone())
        } else {
            StoreError::Read(e)
        }
    }

    /// Reads and parses every record currently in the store.
    pub fn records(&self) -> Result<Vec<Record>, StoreError> {
        let content = self.read_all()?;
        parse_records(&content).map_err(StoreError::Csv)
    }
}

impl RecordStore for CsvStore {
    fn ensure_initialized(&self) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("Store already exists at {}", self.path.display());
                return Ok(false);
            }
            Err(e) => return Err(StoreError::Write(e)),
        };

        self.write_header_or_remove(file)?;

        info!("Created record store at {}", self.path.display());
        Ok(true)
    }

    fn append(&self, record: &Record) -> Result<(), StoreError> {
        let row = encode_row(record)?;
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(StoreError::Write)?;

        file.write_all(&row).map_err(StoreError::Write)?;
        file.flush().map_err(StoreError::Write)?;

        debug!("Appended record for {}", record.masked_mobile());
        Ok(())
    }

    fn size(&self) -> Result<u64, StoreError> {
        std::fs::metadata(&self.path)
            .map(|meta| meta.len())
            .map_err(|e| self.not_found_or(e))
    }

    fn read_all(&self) -> Result<Vec<u8>, StoreError> {
        std::fs::read(&self.path).map_err(|e| self.not_found_or(e))
    }
}
