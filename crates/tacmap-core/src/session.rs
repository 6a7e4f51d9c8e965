//! Editor session state and the actions that mutate it.

use crate::catalog::{LegendItem, OperatorConfig};
use crate::elements::{Element, ElementId, ElementPatch, FloorElements, HexColor};
use crate::history::{History, Snapshot};
use crate::storage::validate_shape;
use crate::tools::ToolKind;
use crate::viewport::{Viewport, ViewportPatch, clamp_scale};
use serde_json::Value;

/// A discrete change to the editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Switch maps. Resets the whole session.
    SetActiveMap(Option<String>),
    SetTool(ToolKind),
    SetColor(HexColor),
    SetOperator(Option<OperatorConfig>),
    SetLegendItem(Option<LegendItem>),
    AddElement { floor: i32, element: Element },
    RemoveElement { floor: i32, id: ElementId },
    UpdateElement { floor: i32, id: ElementId, patch: ElementPatch },
    SetViewport(ViewportPatch),
    /// Replace elements and viewport from an export document.
    LoadState(Value),
    /// Empty one floor, or every floor (and reset the viewport) when `None`.
    ClearCanvas { floor: Option<i32> },
    Undo,
}

impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetActiveMap(_) => "SetActiveMap",
            Action::SetTool(_) => "SetTool",
            Action::SetColor(_) => "SetColor",
            Action::SetOperator(_) => "SetOperator",
            Action::SetLegendItem(_) => "SetLegendItem",
            Action::AddElement { .. } => "AddElement",
            Action::RemoveElement { .. } => "RemoveElement",
            Action::UpdateElement { .. } => "UpdateElement",
            Action::SetViewport(_) => "SetViewport",
            Action::LoadState(_) => "LoadState",
            Action::ClearCanvas { .. } => "ClearCanvas",
            Action::Undo => "Undo",
        }
    }
}

/// Result of applying an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    /// Nothing changed (a snapshot may still have been taken).
    Unchanged,
    /// The action was refused and the state left untouched.
    Rejected(String),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

/// The single mutable root of an editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub map_id: Option<String>,
    pub elements: FloorElements,
    pub tool: ToolKind,
    pub color: HexColor,
    pub operator: Option<OperatorConfig>,
    pub legend_item: Option<LegendItem>,
    pub viewport: Viewport,
    history: History,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            map_id: None,
            elements: FloorElements::new(),
            tool: ToolKind::default(),
            color: HexColor::red(),
            operator: None,
            legend_item: None,
            viewport: Viewport::default(),
            history: History::new(),
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh session for `map_id`.
    pub fn for_map(map_id: impl Into<String>) -> Self {
        Self {
            map_id: Some(map_id.into()),
            ..Self::default()
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.elements.clone(),
            viewport: self.viewport,
        }
    }

    /// Push current state to the undo stack (call before making changes).
    fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Apply one action atomically.
    pub fn apply(&mut self, action: Action) -> ActionOutcome {
        log::debug!("Applying {}", action.name());
        match action {
            Action::SetActiveMap(map_id) => {
                *self = Self {
                    map_id,
                    ..Self::default()
                };
                ActionOutcome::Applied
            }
            Action::SetTool(tool) => {
                self.tool = tool;
                ActionOutcome::Applied
            }
            Action::SetColor(color) => {
                self.color = color;
                ActionOutcome::Applied
            }
            Action::SetOperator(operator) => {
                self.operator = operator;
                ActionOutcome::Applied
            }
            Action::SetLegendItem(item) => {
                self.legend_item = item;
                ActionOutcome::Applied
            }
            Action::AddElement { floor, mut element } => {
                self.push_undo();
                element.regenerate_id();
                self.elements.push(floor, element);
                ActionOutcome::Applied
            }
            Action::RemoveElement { floor, id } => {
                self.push_undo();
                if self.elements.remove(floor, id) {
                    ActionOutcome::Applied
                } else {
                    ActionOutcome::Unchanged
                }
            }
            Action::UpdateElement { floor, id, patch } => {
                self.push_undo();
                if self.elements.update(floor, id, &patch) {
                    ActionOutcome::Applied
                } else {
                    ActionOutcome::Unchanged
                }
            }
            Action::SetViewport(patch) => {
                self.viewport.merge(patch);
                ActionOutcome::Applied
            }
            Action::LoadState(document) => self.load_state(document),
            Action::ClearCanvas { floor } => {
                self.push_undo();
                match floor {
                    Some(floor) => self.elements.clear_floor(floor),
                    None => {
                        self.elements.clear();
                        self.viewport.reset();
                    }
                }
                ActionOutcome::Applied
            }
            Action::Undo => match self.history.pop() {
                Some(snapshot) => {
                    self.elements = snapshot.elements;
                    self.viewport = snapshot.viewport;
                    ActionOutcome::Applied
                }
                None => ActionOutcome::Unchanged,
            },
        }
    }

    fn load_state(&mut self, document: Value) -> ActionOutcome {
        let (elements, viewport) = match decode_document(document) {
            Ok(decoded) => decoded,
            Err(reason) => {
                log::error!("Invalid imported state: {reason}");
                return ActionOutcome::Rejected(reason);
            }
        };
        self.push_undo();
        self.elements = elements;
        if let Some(mut viewport) = viewport {
            viewport.scale = clamp_scale(viewport.scale);
            self.viewport = viewport;
        }
        ActionOutcome::Applied
    }
}

/// Validate and decode the parts of an export document the state cares about.
fn decode_document(document: Value) -> Result<(FloorElements, Option<Viewport>), String> {
    validate_shape(&document).map_err(|e| e.to_string())?;
    let Value::Object(mut root) = document else {
        return Err("document is not an object".to_string());
    };

    let elements = match root.remove("elementsByFloor") {
        None | Some(Value::Null) => FloorElements::new(),
        Some(value) => serde_json::from_value(value).map_err(|e| format!("elementsByFloor: {e}"))?,
    };
    let viewport = match root.remove("stageState") {
        None | Some(Value::Null) => None,
        Some(value) => Some(serde_json::from_value(value).map_err(|e| format!("stageState: {e}"))?),
    };
    Ok((elements, viewport))
}
