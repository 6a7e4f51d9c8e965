//! File-based storage: one pretty-printed JSON export per document.

use super::{BoxFuture, ExportDocument, Storage, StorageError, StorageResult};
use std::fs;
use std::future::ready;
use std::path::{Path, PathBuf};

/// Stores documents as `<id>.json` files in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for document storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)
            .map_err(|e| StorageError::Io(format!("Failed to create {}: {e}", base_path.display())))?;
        Ok(Self { base_path })
    }

    /// Get the file path for a document ID.
    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn write(&self, id: &str, document: &ExportDocument) -> StorageResult<()> {
        let path = self.document_path(id);
        let json = document.to_json()?;
        fs::write(&path, json).map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
    }

    fn read(&self, id: &str) -> StorageResult<ExportDocument> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
        ExportDocument::from_json(&json)
            .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {e}", path.display())))
    }

    fn remove(&self, id: &str) -> StorageResult<()> {
        let path = self.document_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StorageError::Io(format!("Failed to delete {}: {e}", path.display())))?;
        }
        Ok(())
    }

    fn ids(&self) -> StorageResult<Vec<String>> {
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;
        let mut ids: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &ExportDocument) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(ready(self.write(id, document)))
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ExportDocument>> {
        Box::pin(ready(self.read(id)))
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(ready(self.remove(id)))
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(ready(self.ids()))
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        Box::pin(ready(Ok(self.document_path(id).exists())))
    }
}
