//! Persistence: the export document codec and document stores.

mod codec;
mod file;
mod memory;

pub use codec::{CodecError, CodecResult, ExportDocument, export_file_name, parse_document, validate_shape};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Failures of a plan store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No saved plan named {0:?}")]
    NotFound(String),
    #[error("Saved plan is not a valid document: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    /// The store's shared state was poisoned by a panicking writer.
    #[error("Plan store unavailable: {0}")]
    Other(String),
}

impl From<CodecError> for StorageError {
    fn from(e: CodecError) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A named-plan store. Saving under an existing name replaces that plan.
pub trait Storage: Send + Sync {
    fn save(&self, id: &str, document: &ExportDocument) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ExportDocument>>;

    /// Removing a plan that was never saved is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Saved plan names, sorted.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
