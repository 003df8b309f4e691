//! In-memory store.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use super::{RecordStore, StoreError, encode_header, encode_row};
use crate::record::Record;

/// Record store that keeps its content in memory.
///
/// Behaves like [`super::CsvStore`]: it must be initialized before use and
/// reports [`StoreError::NotFound`] when read before that.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn ensure_initialized(&self) -> Result<bool, StoreError> {
        let mut content = self.content.lock().unwrap_or_else(PoisonError::into_inner);
        if content.is_some() {
            return Ok(false);
        }
        *content = Some(encode_header()?);
        Ok(true)
    }

    fn append(&self, record: &Record) -> Result<(), StoreError> {
        let row = encode_row(record)?;
        let mut content = self.content.lock().unwrap_or_else(PoisonError::into_inner);
        match content.as_mut() {
            Some(bytes) => {
                bytes.extend_from_slice(&row);
                Ok(())
            }
            None => Err(StoreError::Write(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "store is not initialized",
            ))),
        }
    }

    fn size(&self) -> Result<u64, StoreError> {
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| StoreError::NotFound(PathBuf::from("<memory>")))
    }

    fn read_all(&self) -> Result<Vec<u8>, StoreError> {
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| StoreError::NotFound(PathBuf::from("<memory>")))
    }
}
