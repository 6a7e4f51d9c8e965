//! Application errors.

use tacmap_core::storage::{CodecError, StorageError};
use tacmap_render::RendererError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown map: {0}")]
    UnknownMap(String),
    #[error("Map {map} has no floor {floor}")]
    UnknownFloor { map: String, floor: i32 },
    #[error("Unknown {kind}: {id}")]
    UnknownItem { kind: &'static str, id: String },
    #[error("Document rejected: {0}")]
    Rejected(String),
}

pub type AppResult<T> = Result<T, AppError>;
