//! In-memory storage implementation.

use super::{BoxFuture, ExportDocument, Storage, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::future::ready;
use std::sync::{PoisonError, RwLock};

/// In-memory storage for tests and scratch sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<BTreeMap<String, ExportDocument>>,
}

fn lock_error<T>(e: PoisonError<T>) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_read<T>(&self, f: impl FnOnce(&BTreeMap<String, ExportDocument>) -> StorageResult<T>) -> StorageResult<T> {
        let docs = self.documents.read().map_err(lock_error)?;
        f(&docs)
    }

    fn with_write<T>(&self, f: impl FnOnce(&mut BTreeMap<String, ExportDocument>) -> T) -> StorageResult<T> {
        let mut docs = self.documents.write().map_err(lock_error)?;
        Ok(f(&mut docs))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &ExportDocument) -> BoxFuture<'_, StorageResult<()>> {
        let result = self.with_write(|docs| {
            docs.insert(id.to_string(), document.clone());
        });
        Box::pin(ready(result))
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ExportDocument>> {
        let result = self.with_read(|docs| docs.get(id).cloned().ok_or_else(|| StorageError::NotFound(id.to_string())));
        Box::pin(ready(result))
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let result = self.with_write(|docs| {
            docs.remove(id);
        });
        Box::pin(ready(result))
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let result = self.with_read(|docs| Ok(docs.keys().cloned().collect()));
        Box::pin(ready(result))
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let result = self.with_read(|docs| Ok(docs.contains_key(id)));
        Box::pin(ready(result))
    }
}
