//! Tool system: turns pointer gestures into editor actions.

use crate::elements::{
    Arrow, Drawing, Element, ElementId, ElementPatch, MIN_ARROW_LENGTH, PermMarker, Text,
};
use crate::session::{Action, EditorState};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    #[default]
    Select,
    PermMarker,
    Operator,
    Arrow,
    Text,
    Draw,
    Erase,
    LegendIcon,
}

impl ToolKind {
    /// Tools that record a stroke between pointer down and up.
    pub fn is_stroke(&self) -> bool {
        matches!(self, ToolKind::Arrow | ToolKind::Draw | ToolKind::Erase)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::PermMarker => "permMarker",
            ToolKind::Operator => "operator",
            ToolKind::Arrow => "arrow",
            ToolKind::Text => "text",
            ToolKind::Draw => "draw",
            ToolKind::Erase => "erase",
            ToolKind::LegendIcon => "legendIcon",
        }
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Background,
    Element(ElementId),
}

/// Asks the user for a text label.
pub trait TextInput {
    /// Text to place at `position`, or `None` if the user cancelled.
    fn request_text(&mut self, position: Point) -> Option<String>;
}

/// Text input that always cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextInput;

impl TextInput for NoTextInput {
    fn request_text(&mut self, _position: Point) -> Option<String> {
        None
    }
}

/// Text input that always answers with the same string.
#[derive(Debug, Clone, Default)]
pub struct FixedTextInput(pub String);

impl TextInput for FixedTextInput {
    fn request_text(&mut self, _position: Point) -> Option<String> {
        Some(self.0.clone())
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A stroke tool is recording points.
    Drawing {
        tool: ToolKind,
        floor: i32,
        points: Vec<Point>,
    },
    /// An element is being dragged with the select tool.
    Dragging {
        floor: i32,
        id: ElementId,
        origin: Point,
        start: Point,
        current: Point,
    },
}

/// The in-progress gesture, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPreview<'a> {
    Stroke { eraser: bool, points: &'a [Point] },
    Arrow { start: Point, end: Point },
    /// Element `id` is shown at `position` until the drag ends.
    Drag { id: ElementId, position: Point },
}

/// Drives the active tool through pointer down/move/up.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    state: ToolState,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// Drop any gesture in progress.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Begin a tool interaction at a world point.
    pub fn pointer_down(
        &mut self,
        target: PointerTarget,
        world: Point,
        floor: i32,
        editor: &EditorState,
        text_input: &mut dyn TextInput,
    ) -> Option<Action> {
        let tool = editor.tool;

        if let PointerTarget::Element(id) = target {
            return match tool {
                ToolKind::Erase => Some(Action::RemoveElement { floor, id }),
                ToolKind::Select => {
                    let origin = editor.elements.get(floor, id)?.position()?;
                    self.state = ToolState::Dragging {
                        floor,
                        id,
                        origin,
                        start: world,
                        current: world,
                    };
                    None
                }
                _ => None,
            };
        }

        let element = match tool {
            ToolKind::Select => return None,
            ToolKind::Arrow | ToolKind::Draw | ToolKind::Erase => {
                self.state = ToolState::Drawing {
                    tool,
                    floor,
                    points: vec![world],
                };
                return None;
            }
            ToolKind::PermMarker => Element::PermMarker(PermMarker::new(world, editor.color)),
            ToolKind::Operator => Element::Operator(editor.operator.as_ref()?.place(world)),
            ToolKind::LegendIcon => Element::LegendIcon(editor.legend_item.as_ref()?.place(world)),
            ToolKind::Text => {
                let text = text_input.request_text(world)?;
                if text.trim().is_empty() {
                    return None;
                }
                Element::Text(Text::new(world, text, editor.color))
            }
        };
        Some(Action::AddElement { floor, element })
    }

    /// Update the current interaction.
    pub fn pointer_move(&mut self, world: Point) {
        match &mut self.state {
            ToolState::Drawing { tool: ToolKind::Arrow, points, .. } => {
                points.truncate(1);
                points.push(world);
            }
            ToolState::Drawing { points, .. } => points.push(world),
            ToolState::Dragging { current, .. } => *current = world,
            ToolState::Idle => {}
        }
    }

    /// End the current interaction and return the resulting action, if any.
    ///
    /// `world` only places a dragged element; strokes are built from the
    /// points recorded so far.
    pub fn pointer_up(&mut self, world: Point, editor: &EditorState) -> Option<Action> {
        match std::mem::take(&mut self.state) {
            ToolState::Idle => None,
            ToolState::Drawing { tool, floor, points } => {
                let element = finish_stroke(tool, points, editor)?;
                Some(Action::AddElement { floor, element })
            }
            ToolState::Dragging {
                floor,
                id,
                origin,
                start,
                ..
            } => {
                let delta: Vec2 = world - start;
                if delta.hypot2() < f64::EPSILON {
                    return None;
                }
                Some(Action::UpdateElement {
                    floor,
                    id,
                    patch: ElementPatch::position(origin + delta),
                })
            }
        }
    }

    /// Get the preview of the current interaction.
    pub fn preview(&self) -> Option<ToolPreview<'_>> {
        match &self.state {
            ToolState::Idle => None,
            ToolState::Drawing { tool: ToolKind::Arrow, points, .. } => {
                let start = *points.first()?;
                let end = points.get(1).copied().unwrap_or(start);
                Some(ToolPreview::Arrow { start, end })
            }
            ToolState::Drawing { tool, points, .. } => Some(ToolPreview::Stroke {
                eraser: *tool == ToolKind::Erase,
                points,
            }),
            ToolState::Dragging {
                id,
                origin,
                start,
                current,
                ..
            } => Some(ToolPreview::Drag {
                id: *id,
                position: *origin + (*current - *start),
            }),
        }
    }
}

/// Build the element a finished stroke produces from the points recorded on
/// down and move. The release position is never added.
fn finish_stroke(tool: ToolKind, points: Vec<Point>, editor: &EditorState) -> Option<Element> {
    match tool {
        ToolKind::Arrow => {
            let [start, end] = points[..] else {
                return None;
            };
            if start.distance(end) <= MIN_ARROW_LENGTH {
                return None;
            }
            Some(Element::Arrow(Arrow::new(start, end, editor.color)))
        }
        ToolKind::Draw | ToolKind::Erase => {
            if points.len() < 2 {
                return None;
            }
            Some(Element::Drawing(if tool == ToolKind::Erase {
                Drawing::eraser(points)
            } else {
                Drawing::pen(points, editor.color)
            }))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LegendCatalog, OperatorCatalog};
    use crate::elements::{CompositeMode, HexColor};

    fn editor_with(tool: ToolKind) -> EditorState {
        let mut editor = EditorState::for_map("bank");
        editor.apply(Action::SetTool(tool));
        editor
    }

    fn down(tm: &mut ToolManager, editor: &EditorState, at: Point) -> Option<Action> {
        tm.pointer_down(PointerTarget::Background, at, 0, editor, &mut NoTextInput)
    }

    fn added(action: Option<Action>) -> Element {
        match action {
            Some(Action::AddElement { element, .. }) => element,
            other => panic!("expected AddElement, got {other:?}"),
        }
    }

    #[test]
    fn test_marker_places_immediately() {
        let editor = editor_with(ToolKind::PermMarker);
        let mut tm = ToolManager::new();
        let Element::PermMarker(marker) = added(down(&mut tm, &editor, Point::new(3.0, 4.0))) else {
            panic!("expected a marker");
        };
        assert_eq!(marker.position, Point::new(3.0, 4.0));
        assert_eq!(marker.fill, HexColor::red());
        assert!(!tm.is_active());
    }

    #[test]
    fn test_icons_need_a_selection() {
        let mut editor = editor_with(ToolKind::Operator);
        let mut tm = ToolManager::new();
        assert!(down(&mut tm, &editor, Point::ZERO).is_none());

        let operators = OperatorCatalog::builtin();
        editor.apply(Action::SetOperator(operators.get("ash").cloned()));
        let Element::Operator(op) = added(down(&mut tm, &editor, Point::ZERO)) else {
            panic!("expected an operator");
        };
        assert_eq!(op.operator_id, "ash");
        assert!((op.width - 30.0).abs() < f64::EPSILON);

        editor.apply(Action::SetTool(ToolKind::LegendIcon));
        assert!(down(&mut tm, &editor, Point::ZERO).is_none());
        editor.apply(Action::SetLegendItem(LegendCatalog::builtin().get("camera").cloned()));
        assert!(matches!(added(down(&mut tm, &editor, Point::ZERO)), Element::LegendIcon(_)));
    }

    #[test]
    fn test_text_prompt() {
        let editor = editor_with(ToolKind::Text);
        let mut tm = ToolManager::new();
        assert!(down(&mut tm, &editor, Point::ZERO).is_none());

        let blank = tm.pointer_down(
            PointerTarget::Background,
            Point::ZERO,
            0,
            &editor,
            &mut FixedTextInput("   ".to_string()),
        );
        assert!(blank.is_none());

        let action = tm.pointer_down(
            PointerTarget::Background,
            Point::new(1.0, 2.0),
            0,
            &editor,
            &mut FixedTextInput("Site B".to_string()),
        );
        let Element::Text(text) = added(action) else { panic!("expected text") };
        assert_eq!(text.text, "Site B");
        assert!((text.font_size - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_draw_stroke() {
        let editor = editor_with(ToolKind::Draw);
        let mut tm = ToolManager::new();
        assert!(down(&mut tm, &editor, Point::new(0.0, 0.0)).is_none());
        assert!(tm.is_active());
        tm.pointer_move(Point::new(1.0, 1.0));
        tm.pointer_move(Point::new(2.0, 1.0));
        assert!(matches!(tm.preview(), Some(ToolPreview::Stroke { eraser: false, points }) if points.len() == 3));

        let Element::Drawing(drawing) = added(tm.pointer_up(Point::new(2.0, 1.0), &editor)) else {
            panic!("expected a drawing");
        };
        assert_eq!(drawing.points.len(), 3);
        assert!((drawing.stroke_width - 2.0).abs() < f64::EPSILON);
        assert!(!tm.is_active());
        assert!(tm.preview().is_none());
    }

    #[test]
    fn test_single_click_stroke_dropped() {
        let editor = editor_with(ToolKind::Draw);
        let mut tm = ToolManager::new();
        down(&mut tm, &editor, Point::new(5.0, 5.0));
        assert!(tm.pointer_up(Point::new(5.0, 5.0), &editor).is_none());
        assert!(!tm.is_active());
    }

    #[test]
    fn test_draw_keeps_recorded_points_exactly() {
        let editor = editor_with(ToolKind::Draw);
        let mut tm = ToolManager::new();
        down(&mut tm, &editor, Point::new(0.0, 0.0));
        tm.pointer_move(Point::new(5.0, 5.0));
        tm.pointer_move(Point::new(10.0, 0.0));

        // Released somewhere else than the last move.
        let Element::Drawing(drawing) = added(tm.pointer_up(Point::new(12.0, 0.0), &editor)) else {
            panic!("expected a drawing");
        };
        assert_eq!(crate::elements::points::flatten(&drawing.points), vec![0.0, 0.0, 5.0, 5.0, 10.0, 0.0]);
    }

    #[test]
    fn test_stroke_without_move_dropped() {
        for tool in [ToolKind::Draw, ToolKind::Erase, ToolKind::Arrow] {
            let editor = editor_with(tool);
            let mut tm = ToolManager::new();
            down(&mut tm, &editor, Point::new(0.0, 0.0));
            assert!(tm.pointer_up(Point::new(50.0, 0.0), &editor).is_none(), "{tool:?}");
            assert!(!tm.is_active());
        }
    }

    #[test]
    fn test_arrow_ends_at_last_move() {
        let editor = editor_with(ToolKind::Arrow);
        let mut tm = ToolManager::new();
        down(&mut tm, &editor, Point::new(0.0, 0.0));
        tm.pointer_move(Point::new(5.0, 0.0));
        // Exactly the minimum length is too short, whatever the release point.
        assert!(tm.pointer_up(Point::new(40.0, 0.0), &editor).is_none());

        down(&mut tm, &editor, Point::new(0.0, 0.0));
        tm.pointer_move(Point::new(5.5, 0.0));
        let Element::Arrow(arrow) = added(tm.pointer_up(Point::new(40.0, 0.0), &editor)) else {
            panic!("expected an arrow");
        };
        assert_eq!(arrow.points, [Point::new(0.0, 0.0), Point::new(5.5, 0.0)]);
    }

    #[test]
    fn test_erase_stroke_and_element() {
        let mut editor = editor_with(ToolKind::Erase);
        let mut tm = ToolManager::new();
        down(&mut tm, &editor, Point::new(0.0, 0.0));
        tm.pointer_move(Point::new(10.0, 0.0));
        assert!(matches!(tm.preview(), Some(ToolPreview::Stroke { eraser: true, .. })));
        let Element::Drawing(drawing) = added(tm.pointer_up(Point::new(10.0, 0.0), &editor)) else {
            panic!("expected a drawing");
        };
        assert_eq!(drawing.global_composite_operation, Some(CompositeMode::DestinationOut));

        editor.apply(Action::AddElement {
            floor: 0,
            element: Element::PermMarker(PermMarker::new(Point::ZERO, HexColor::red())),
        });
        let id = editor.elements.floor(0)[0].id();
        let action = tm.pointer_down(PointerTarget::Element(id), Point::ZERO, 0, &editor, &mut NoTextInput);
        assert_eq!(action, Some(Action::RemoveElement { floor: 0, id }));
        assert!(!tm.is_active());
    }

    #[test]
    fn test_arrow_keeps_two_points() {
        let editor = editor_with(ToolKind::Arrow);
        let mut tm = ToolManager::new();
        down(&mut tm, &editor, Point::new(0.0, 0.0));
        tm.pointer_move(Point::new(10.0, 0.0));
        tm.pointer_move(Point::new(20.0, 5.0));
        assert_eq!(
            tm.preview(),
            Some(ToolPreview::Arrow {
                start: Point::new(0.0, 0.0),
                end: Point::new(20.0, 5.0)
            })
        );
        let Element::Arrow(arrow) = added(tm.pointer_up(Point::new(20.0, 5.0), &editor)) else {
            panic!("expected an arrow");
        };
        assert_eq!(arrow.points, [Point::new(0.0, 0.0), Point::new(20.0, 5.0)]);
        assert_eq!(arrow.stroke, arrow.fill);
    }

    #[test]
    fn test_short_arrow_dropped() {
        let editor = editor_with(ToolKind::Arrow);
        let mut tm = ToolManager::new();
        down(&mut tm, &editor, Point::new(0.0, 0.0));
        tm.pointer_move(Point::new(3.0, 4.0));
        assert!(tm.pointer_up(Point::new(3.0, 4.0), &editor).is_none());
        assert!(tm.preview().is_none());
    }

    #[test]
    fn test_element_target_skips_drawing() {
        let mut editor = editor_with(ToolKind::Draw);
        editor.apply(Action::AddElement {
            floor: 0,
            element: Element::PermMarker(PermMarker::new(Point::ZERO, HexColor::red())),
        });
        let id = editor.elements.floor(0)[0].id();
        let mut tm = ToolManager::new();
        assert!(tm.pointer_down(PointerTarget::Element(id), Point::ZERO, 0, &editor, &mut NoTextInput).is_none());
        assert!(!tm.is_active());
    }

    #[test]
    fn test_select_drag_updates_position() {
        let mut editor = editor_with(ToolKind::Select);
        editor.apply(Action::AddElement {
            floor: 0,
            element: Element::PermMarker(PermMarker::new(Point::new(10.0, 10.0), HexColor::red())),
        });
        let id = editor.elements.floor(0)[0].id();
        let mut tm = ToolManager::new();
        tm.pointer_down(PointerTarget::Element(id), Point::new(11.0, 11.0), 0, &editor, &mut NoTextInput);
        tm.pointer_move(Point::new(21.0, 16.0));
        assert_eq!(
            tm.preview(),
            Some(ToolPreview::Drag {
                id,
                position: Point::new(20.0, 15.0)
            })
        );
        let action = tm.pointer_up(Point::new(21.0, 16.0), &editor);
        assert_eq!(
            action,
            Some(Action::UpdateElement {
                floor: 0,
                id,
                patch: ElementPatch::position(Point::new(20.0, 15.0)),
            })
        );
    }

    #[test]
    fn test_arrows_are_not_dragged() {
        let mut editor = editor_with(ToolKind::Select);
        editor.apply(Action::AddElement {
            floor: 0,
            element: Element::Arrow(Arrow::new(Point::ZERO, Point::new(50.0, 0.0), HexColor::red())),
        });
        let id = editor.elements.floor(0)[0].id();
        let mut tm = ToolManager::new();
        tm.pointer_down(PointerTarget::Element(id), Point::new(25.0, 0.0), 0, &editor, &mut NoTextInput);
        assert!(!tm.is_active());
    }
}
