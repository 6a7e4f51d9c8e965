//! TacMap Core Library
//!
//! Platform-agnostic model and logic for the TacMap floor-plan annotation
//! editor: elements per floor, the session reducer with undo, the viewport
//! transform, and the tool state machine.

pub mod catalog;
pub mod elements;
pub mod history;
pub mod input;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod tools;
pub mod viewport;

pub use catalog::{LegendCatalog, LegendItem, MapCatalog, MapConfig, OperatorCatalog, OperatorConfig};
pub use elements::{Element, ElementId, ElementKind, ElementPatch, FloorElements, HexColor};
pub use history::History;
pub use input::{Modifiers, MouseButton, PointerEvent};
pub use navigation::ViewportController;
pub use session::{Action, ActionOutcome, EditorState};
pub use storage::{ExportDocument, Storage};
pub use tools::{PointerTarget, TextInput, ToolKind, ToolManager};
pub use viewport::{Viewport, ViewportPatch};
