//! JSON export document: `{ "elementsByFloor": {...}, "stageState": {...} }`.

use crate::elements::FloorElements;
use crate::session::EditorState;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use thiserror::Error;

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid document: {0}")]
    InvalidShape(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// The persisted part of an editor session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default)]
    pub elements_by_floor: FloorElements,
    #[serde(default)]
    pub stage_state: Viewport,
}

impl ExportDocument {
    pub fn from_state(state: &EditorState) -> Self {
        Self {
            elements_by_floor: state.elements.clone(),
            stage_state: state.viewport,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> CodecResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> CodecResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(json: &str) -> CodecResult<Self> {
        let value = parse_document(json)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Parse an import and check its outer shape, without decoding elements.
///
/// The root must be an object; `elementsByFloor`, when present, must be an
/// object whose every value is an array.
pub fn parse_document(json: &str) -> CodecResult<Value> {
    let value: Value = serde_json::from_str(json)?;
    validate_shape(&value)?;
    Ok(value)
}

pub fn validate_shape(value: &Value) -> CodecResult<()> {
    let Value::Object(root) = value else {
        return Err(CodecError::InvalidShape("document is not an object".to_string()));
    };
    match root.get("elementsByFloor") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Object(floors)) => match floors.iter().find(|(_, v)| !v.is_array()) {
            Some((floor, _)) => Err(CodecError::InvalidShape(format!("elementsByFloor[{floor}] is not an array"))),
            None => Ok(()),
        },
        Some(_) => Err(CodecError::InvalidShape("elementsByFloor is not an object".to_string())),
    }
}

/// Default download name, e.g. `r6-tactical-map-bank-2024-05-01.json`.
pub fn export_file_name(map_id: Option<&str>, date: impl Display) -> String {
    format!("r6-tactical-map-{}-{}.json", map_id.unwrap_or("untitled"), date)
}
