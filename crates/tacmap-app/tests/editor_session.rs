//! End-to-end editor sessions against an asset directory on disk.

use kurbo::{Point, Vec2};
use std::collections::HashMap;
use std::path::Path;
use tacmap_app::{AppConfig, AppError, Editor};
use tacmap_core::input::KeyEvent;
use tacmap_core::storage::FileStorage;
use tacmap_core::tools::NoTextInput;
use tacmap_core::{Action, Modifiers, MouseButton, PointerEvent, ToolKind};
use tacmap_render::Primitive;

fn write_assets(root: &Path) {
    std::fs::create_dir_all(root.join("maps/bank")).unwrap();
    std::fs::write(
        root.join("maps/index.json"),
        r#"{"maps": [{"id": "bank", "nameKey": "maps.bank",
                      "floors": [{"nameKey": "floors.basement", "floorNumber": -1},
                                 {"nameKey": "floors.ground", "floorNumber": 0}]}]}"#,
    )
    .unwrap();
    std::fs::write(
        root.join("maps/bank/config.json"),
        r#"{"floors": [
              {"callouts": [{"nameKey": "vault", "x": 100, "y": 120}],
               "icons": [{"legendId": "hatchFloor", "x": 40, "y": 40},
                         {"legendId": "notALegendItem", "x": 0, "y": 0}]},
              {"callouts": [], "icons": []}
           ]}"#,
    )
    .unwrap();
}

fn editor(root: &Path) -> Editor {
    let config = AppConfig {
        asset_root: root.to_path_buf(),
        width: 200,
        height: 150,
        inline_icon_decode: true,
        ..AppConfig::default()
    };
    let labels: HashMap<String, String> =
        [("mapCallouts.bank.vault".to_string(), "Vault".to_string())].into_iter().collect();
    Editor::new(config).with_labels(Box::new(labels))
}

fn drag(editor: &mut Editor, from: Point, to: Point) {
    editor.handle_pointer(&PointerEvent::Down { position: from, button: MouseButton::Left }, &mut NoTextInput);
    editor.handle_pointer(&PointerEvent::Move { position: from.midpoint(to) }, &mut NoTextInput);
    editor.handle_pointer(&PointerEvent::Move { position: to }, &mut NoTextInput);
    editor.handle_pointer(&PointerEvent::Up { position: to, button: MouseButton::Left }, &mut NoTextInput);
}

#[test]
fn test_admin_overlay_follows_floor_position() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut editor = editor(dir.path());
    editor.open_map("bank").unwrap();

    // Basement is the first floor in the list, so it gets the first admin entry.
    assert_eq!(editor.floor(), -1);
    assert_eq!(editor.overlay().callouts[0].label, "Vault");
    assert_eq!(editor.overlay().icons.len(), 1);

    editor.set_floor(0).unwrap();
    assert!(editor.overlay().callouts.is_empty());
    assert!(matches!(editor.set_floor(2), Err(AppError::UnknownFloor { .. })));
}

#[test]
fn test_preset_icon_decodes_and_renders() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut editor = editor(dir.path());
    editor.open_map("bank").unwrap();

    // Inline decodes finish on request; the next poll applies them once.
    assert_eq!(editor.sync_icons(), 1);
    assert_eq!(editor.sync_icons(), 0);
    let scene = editor.scene();
    assert!(matches!(scene.layers.overlay[0], Primitive::Callout { .. }));
    assert!(matches!(scene.layers.overlay[1], Primitive::Image { .. }));

    let png = editor.render_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_drawing_drag_and_undo_session() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut editor = editor(dir.path());
    editor.open_map("bank").unwrap();
    editor.set_floor(0).unwrap();

    editor.select_tool(ToolKind::Draw);
    drag(&mut editor, Point::new(10.0, 10.0), Point::new(60.0, 10.0));
    editor.select_tool(ToolKind::PermMarker);
    editor.handle_pointer(
        &PointerEvent::Down { position: Point::new(100.0, 100.0), button: MouseButton::Left },
        &mut NoTextInput,
    );
    assert_eq!(editor.state().elements.floor(0).len(), 2);

    // Move the marker with the select tool.
    editor.select_tool(ToolKind::Select);
    drag(&mut editor, Point::new(100.0, 100.0), Point::new(120.0, 90.0));
    let moved = editor.state().elements.floor(0)[1].position().unwrap();
    assert_eq!(moved, Point::new(120.0, 90.0));

    // Panning with the middle button is not undoable.
    editor.handle_pointer(
        &PointerEvent::Down { position: Point::new(0.0, 0.0), button: MouseButton::Middle },
        &mut NoTextInput,
    );
    editor.handle_pointer(&PointerEvent::Move { position: Point::new(5.0, 5.0) }, &mut NoTextInput);
    editor.handle_pointer(
        &PointerEvent::Up { position: Point::new(5.0, 5.0), button: MouseButton::Middle },
        &mut NoTextInput,
    );
    assert_eq!(editor.state().viewport.pan, Vec2::new(5.0, 5.0));

    let undo = KeyEvent::Pressed {
        key: "z".to_string(),
        modifiers: Modifiers::ctrl(),
    };
    assert!(editor.handle_key(&undo));
    assert_eq!(editor.state().elements.floor(0)[1].position(), Some(Point::new(100.0, 100.0)));
    assert!(editor.handle_key(&undo));
    assert!(editor.handle_key(&undo));
    assert!(editor.state().elements.floor(0).is_empty());
    assert!(!editor.state().can_undo());
}

#[test]
fn test_file_storage_reload() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let storage = FileStorage::new(dir.path().join("plans")).unwrap();

    let mut editor = editor(dir.path());
    editor.open_map("bank").unwrap();
    editor.select_tool(ToolKind::PermMarker);
    editor.handle_pointer(
        &PointerEvent::Down { position: Point::new(30.0, 30.0), button: MouseButton::Left },
        &mut NoTextInput,
    );
    editor.save_to(&storage, "retake").unwrap();

    let mut other = self::editor(dir.path());
    other.open_map("bank").unwrap();
    other.load_from(&storage, "retake").unwrap();
    assert_eq!(other.state().elements, editor.state().elements);

    other.dispatch(Action::Undo);
    assert!(other.state().elements.is_empty());
}
