//! End-to-end editor sessions: gestures, history and export.

use easel_core::{Modifiers, PointerEvent, SerializableColor, Shape, ShapeKind, ToolKind};
use easel_editor::{Editor, EditorConfig, EditorError};
use easel_render::{
    BoxFuture, CpuDecoder, PixmapSurface, RasterSnapshot, RenderError, RenderResult, SnapshotDecoder,
    Surface, encode_png,
};
use kurbo::Point;
use std::cell::Cell;
use std::rc::Rc;

fn editor() -> Editor {
    Editor::new(&EditorConfig {
        width: 120,
        height: 90,
        ..EditorConfig::default()
    })
    .unwrap()
}

fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    editor
        .pointer(PointerEvent::Down {
            position: Point::new(from.0, from.1),
        })
        .unwrap();
    editor
        .pointer(PointerEvent::Move {
            position: Point::new(to.0, to.1),
        })
        .unwrap();
    editor
        .pointer(PointerEvent::Up {
            position: Point::new(to.0, to.1),
        })
        .unwrap();
}

fn add_rect(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    editor.set_tool(ToolKind::Shape(ShapeKind::Rectangle)).unwrap();
    drag(editor, from, to);
}

fn stroke(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    editor.set_tool(ToolKind::Brush).unwrap();
    drag(editor, from, to);
}

fn undo(editor: &mut Editor) -> bool {
    pollster::block_on(editor.undo()).unwrap()
}

fn redo(editor: &mut Editor) -> bool {
    pollster::block_on(editor.redo()).unwrap()
}

static CPU: CpuDecoder = CpuDecoder;

/// Decodes on the CPU unless told to fail.
struct FlakyDecoder {
    fail: Rc<Cell<bool>>,
}

impl SnapshotDecoder for FlakyDecoder {
    fn decode_snapshot<'a>(&'a self, snapshot: &'a RasterSnapshot) -> BoxFuture<'a, RenderResult<PixmapSurface>> {
        if self.fail.get() {
            Box::pin(std::future::ready(Err(RenderError::Decode("corrupt snapshot".into()))))
        } else {
            CPU.decode_snapshot(snapshot)
        }
    }

    fn decode_image<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, RenderResult<PixmapSurface>> {
        CPU.decode_image(bytes)
    }
}

#[test]
fn test_undo_redo_round_trip() {
    let mut editor = editor();
    let blank = editor.raster().data().to_vec();

    stroke(&mut editor, (10.0, 20.0), (100.0, 20.0));
    add_rect(&mut editor, (20.0, 40.0), (70.0, 80.0));
    let raster = editor.raster().data().to_vec();
    let shapes: Vec<_> = editor.shapes().iter().cloned().collect();

    assert!(undo(&mut editor));
    assert!(editor.shapes().is_empty());
    assert!(undo(&mut editor));
    assert_eq!(editor.raster().data(), blank.as_slice());
    assert!(!editor.can_undo());
    assert!(!undo(&mut editor));

    assert!(redo(&mut editor));
    assert!(redo(&mut editor));
    assert!(!editor.can_redo());
    assert_eq!(editor.raster().data(), raster.as_slice());
    let restored: Vec<_> = editor.shapes().iter().cloned().collect();
    assert_eq!(restored.len(), shapes.len());
    assert!(restored.iter().zip(&shapes).all(|(a, b)| a.same_content(b)));
}

fn click(editor: &mut Editor, at: (f64, f64)) {
    drag(editor, at, at);
}

fn snapshot(editor: &Editor) -> (Vec<u8>, Vec<Shape>) {
    (editor.raster().data().to_vec(), editor.shapes().iter().cloned().collect())
}

fn assert_state(editor: &Editor, expected: &(Vec<u8>, Vec<Shape>)) {
    assert!(editor.raster().data() == expected.0.as_slice(), "raster differs");
    let shapes: Vec<_> = editor.shapes().iter().cloned().collect();
    assert_eq!(shapes.len(), expected.1.len());
    assert!(shapes.iter().zip(&expected.1).all(|(a, b)| a.same_content(b)));
}

#[test]
fn test_round_trip_over_every_action() {
    let mut editor = editor();
    let start = snapshot(&editor);

    add_rect(&mut editor, (10.0, 10.0), (50.0, 40.0));
    add_rect(&mut editor, (75.0, 10.0), (110.0, 40.0));

    editor.set_tool(ToolKind::Select).unwrap();
    click(&mut editor, (30.0, 25.0));
    drag(&mut editor, (30.0, 25.0), (40.0, 35.0));
    drag(&mut editor, (60.0, 50.0), (66.0, 60.0));
    assert_eq!(editor.history().transform_len(), 2);

    stroke(&mut editor, (5.0, 75.0), (115.0, 75.0));

    editor.set_tool(ToolKind::Eraser).unwrap();
    drag(&mut editor, (40.0, 70.0), (80.0, 80.0));

    editor.set_tool(ToolKind::Text).unwrap();
    click(&mut editor, (8.0, 86.0));
    editor.submit_text("Hi").unwrap();

    editor.set_tool(ToolKind::Select).unwrap();
    click(&mut editor, (95.0, 25.0));
    pollster::block_on(editor.key(easel_core::KeyEvent::new("Delete"))).unwrap();
    assert_eq!(editor.shapes().len(), 1);

    let end = snapshot(&editor);
    // Two transforms plus six checkpoints: two creates, stroke, erase, text, delete.
    let steps = 8;
    for _ in 0..steps {
        assert!(undo(&mut editor));
    }
    assert!(!editor.can_undo());
    assert_state(&editor, &start);

    for _ in 0..steps {
        assert!(redo(&mut editor));
    }
    assert!(!editor.can_redo());
    assert_state(&editor, &end);
    let bounds = editor.shapes().iter().next().unwrap().bounds();
    assert!((bounds.x0 - 20.0).abs() < 1e-9 && (bounds.x1 - 66.0).abs() < 1e-9);
}

#[test]
fn test_transform_undo_takes_priority() {
    let mut editor = editor();
    add_rect(&mut editor, (10.0, 10.0), (50.0, 40.0));

    editor.set_tool(ToolKind::Select).unwrap();
    drag(&mut editor, (30.0, 25.0), (60.0, 55.0));
    let moved = editor.shapes().iter().next().unwrap().bounds();
    assert!((moved.x0 - 40.0).abs() < 1e-9 && (moved.y0 - 40.0).abs() < 1e-9);
    assert_eq!(editor.history().transform_len(), 1);

    stroke(&mut editor, (5.0, 85.0), (115.0, 85.0));
    let with_stroke = editor.raster().data().to_vec();

    // The drag is undone first; the newer stroke stays.
    assert!(undo(&mut editor));
    let bounds = editor.shapes().iter().next().unwrap().bounds();
    assert!((bounds.x0 - 10.0).abs() < 1e-9 && (bounds.y0 - 10.0).abs() < 1e-9);
    assert_eq!(editor.raster().data(), with_stroke.as_slice());

    // Then the raster stack: the stroke goes, shapes return to the post-drag checkpoint.
    assert!(undo(&mut editor));
    assert_ne!(editor.raster().data(), with_stroke.as_slice());
    let bounds = editor.shapes().iter().next().unwrap().bounds();
    assert!((bounds.x0 - 40.0).abs() < 1e-9);
}

#[test]
fn test_new_edit_truncates_redo() {
    let mut editor = editor();
    stroke(&mut editor, (10.0, 10.0), (100.0, 10.0));
    stroke(&mut editor, (10.0, 30.0), (100.0, 30.0));
    assert!(undo(&mut editor));
    assert!(undo(&mut editor));
    assert!(editor.can_redo());

    stroke(&mut editor, (10.0, 50.0), (100.0, 50.0));
    assert!(!editor.can_redo());
    assert!(!redo(&mut editor));
    assert_eq!(editor.history().raster_len(), 2);
}

#[test]
fn test_new_edit_truncates_transform_redo() {
    let mut editor = editor();
    add_rect(&mut editor, (10.0, 10.0), (50.0, 40.0));
    editor.set_tool(ToolKind::Select).unwrap();
    drag(&mut editor, (30.0, 25.0), (40.0, 35.0));
    assert!(undo(&mut editor));
    assert!(editor.can_redo());

    stroke(&mut editor, (5.0, 85.0), (115.0, 85.0));
    assert!(!editor.can_redo());
}

#[test]
fn test_selection_is_exclusive() {
    let mut editor = editor();
    add_rect(&mut editor, (5.0, 5.0), (40.0, 40.0));
    add_rect(&mut editor, (70.0, 40.0), (110.0, 80.0));
    editor.set_tool(ToolKind::Select).unwrap();

    drag(&mut editor, (20.0, 20.0), (20.0, 20.0));
    drag(&mut editor, (90.0, 60.0), (90.0, 60.0));
    let selected: Vec<_> = editor.shapes().iter().filter(|s| s.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(Some(selected[0].id()), editor.shapes().selected_id());
    assert!(selected[0].bounds().contains(Point::new(90.0, 60.0)));
}

#[test]
fn test_eraser_leaves_shapes_alone() {
    let mut editor = editor();
    editor.set_filled(true);
    add_rect(&mut editor, (20.0, 20.0), (100.0, 70.0));
    let before = editor.shapes().iter().next().unwrap().clone();

    editor.set_tool(ToolKind::Eraser).unwrap();
    editor.set_brush_size(20.0);
    drag(&mut editor, (0.0, 45.0), (120.0, 45.0));

    let after = editor.shapes().iter().next().unwrap();
    assert!(after.same_content(&before));
    // The raster under the path is cleared, the shape still draws on top.
    assert_eq!(editor.raster().sample(60, 45).unwrap().a, 0);
    assert_eq!(editor.visible().sample(60, 45).unwrap(), SerializableColor::black());
}

#[test]
fn test_same_size_erase_removes_soft_stroke() {
    let mut editor = Editor::new(&EditorConfig {
        width: 120,
        height: 90,
        background: None,
        ..EditorConfig::default()
    })
    .unwrap();
    editor.set_brush_size(10.0);
    stroke(&mut editor, (10.0, 45.0), (110.0, 45.0));
    assert!(editor.raster().sample(60, 45).unwrap().a > 0);

    editor.set_tool(ToolKind::Eraser).unwrap();
    drag(&mut editor, (10.0, 45.0), (110.0, 45.0));
    let tinted: Vec<i64> = (0..90)
        .filter(|&y| editor.raster().sample(60, y).unwrap().a > 0)
        .collect();
    assert!(tinted.is_empty(), "tinted rows left at x=60: {tinted:?}");
}

#[test]
fn test_export_refused_mid_gesture() {
    let mut editor = editor();
    editor
        .pointer(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
        })
        .unwrap();
    assert!(matches!(
        editor.export_artwork(),
        Err(EditorError::GestureInProgress(_))
    ));
    assert!(matches!(
        pollster::block_on(editor.undo()),
        Err(EditorError::GestureInProgress(_))
    ));
    editor.pointer(PointerEvent::Leave).unwrap();
    assert!(editor.export_artwork().is_ok());
}

#[test]
fn test_decode_failure_keeps_state() {
    let fail = Rc::new(Cell::new(false));
    let mut editor = editor().with_decoder(FlakyDecoder { fail: fail.clone() });
    stroke(&mut editor, (10.0, 45.0), (110.0, 45.0));
    let painted = editor.raster().data().to_vec();

    fail.set(true);
    assert!(matches!(
        pollster::block_on(editor.undo()),
        Err(EditorError::Render(RenderError::Decode(_)))
    ));
    assert_eq!(editor.raster().data(), painted.as_slice());
    assert!(editor.can_undo());
    assert!(!editor.can_redo());

    fail.set(false);
    assert!(undo(&mut editor));
    assert_ne!(editor.raster().data(), painted.as_slice());
}

#[test]
fn test_delete_is_undoable() {
    let mut editor = editor();
    add_rect(&mut editor, (10.0, 10.0), (50.0, 40.0));
    editor.set_tool(ToolKind::Select).unwrap();
    drag(&mut editor, (30.0, 25.0), (30.0, 25.0));

    pollster::block_on(editor.key(easel_core::KeyEvent::new("Delete"))).unwrap();
    assert!(editor.shapes().is_empty());
    assert_eq!(editor.history().raster_len(), 3);

    assert!(undo(&mut editor));
    assert_eq!(editor.shapes().len(), 1);
}

#[test]
fn test_delete_abandons_drag() {
    let mut editor = editor();
    add_rect(&mut editor, (10.0, 10.0), (50.0, 40.0));
    editor.set_tool(ToolKind::Select).unwrap();
    editor
        .pointer(PointerEvent::Down {
            position: Point::new(30.0, 25.0),
        })
        .unwrap();
    editor
        .pointer(PointerEvent::Move {
            position: Point::new(35.0, 30.0),
        })
        .unwrap();
    assert!(editor.delete_selection().unwrap());
    assert_eq!(editor.phase(), easel_core::GesturePhase::Idle);
    assert_eq!(editor.history().transform_len(), 0);
    // A stray release after the delete does nothing.
    editor
        .pointer(PointerEvent::Up {
            position: Point::new(35.0, 30.0),
        })
        .unwrap();
    assert!(editor.shapes().is_empty());
}

#[test]
fn test_resize_handle_and_undo() {
    let mut editor = editor();
    add_rect(&mut editor, (10.0, 10.0), (50.0, 40.0));
    editor.set_tool(ToolKind::Select).unwrap();
    drag(&mut editor, (30.0, 25.0), (30.0, 25.0));

    // Drag the SE corner past the NW corner; the floor holds.
    drag(&mut editor, (50.0, 40.0), (0.0, 0.0));
    let bounds = editor.shapes().iter().next().unwrap().bounds();
    assert!((bounds.width() - 10.0).abs() < 1e-9);
    assert!((bounds.height() - 10.0).abs() < 1e-9);
    assert_eq!(editor.history().transform_len(), 1);

    assert!(undo(&mut editor));
    let bounds = editor.shapes().iter().next().unwrap().bounds();
    assert!((bounds.width() - 40.0).abs() < 1e-9);
}

#[test]
fn test_load_initial_image_resets_history() {
    let mut editor = editor();
    stroke(&mut editor, (10.0, 10.0), (100.0, 10.0));
    add_rect(&mut editor, (10.0, 10.0), (50.0, 40.0));

    let red: Vec<u8> = std::iter::repeat([200, 10, 10, 255]).take(20 * 10).flatten().collect();
    let png = encode_png(&red, 20, 10).unwrap();
    pollster::block_on(editor.load_initial_image(&png)).unwrap();

    assert!(!editor.can_undo());
    assert!(editor.shapes().is_empty());
    assert_eq!(editor.raster().sample(5, 5).unwrap(), SerializableColor::new(200, 10, 10, 255));
    // Outside the image the background shows.
    assert_eq!(editor.raster().sample(60, 60).unwrap(), SerializableColor::white());

    assert!(matches!(
        pollster::block_on(editor.load_initial_image(b"nope")),
        Err(EditorError::Render(RenderError::Decode(_)))
    ));
    assert_eq!(editor.raster().sample(5, 5).unwrap(), SerializableColor::new(200, 10, 10, 255));
}

#[test]
fn test_export_artwork() {
    let mut editor = editor();
    editor.set_filled(true);
    add_rect(&mut editor, (10.0, 10.0), (50.0, 40.0));
    editor.set_tool(ToolKind::Select).unwrap();
    drag(&mut editor, (30.0, 25.0), (30.0, 25.0));

    let artwork = editor.export_artwork().unwrap();
    assert_eq!((artwork.width, artwork.height), (120, 90));
    assert_eq!(artwork.pixels.len(), 120 * 90 * 4);
    assert_eq!(artwork.tool, ToolKind::Select);
    assert_eq!(artwork.shapes.len(), 1);
    assert!(!artwork.shapes[0].selected);

    // The handle at the NW corner is not part of the export.
    let decoded = easel_render::decode_image(&artwork.png).unwrap();
    assert_eq!(decoded.sample(11, 11).unwrap(), SerializableColor::black());
    assert!(artwork.to_json().unwrap().contains("data:image/png;base64,"));
}

#[test]
fn test_redo_shortcuts() {
    let mut editor = editor();
    stroke(&mut editor, (10.0, 10.0), (100.0, 10.0));
    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::default()
    };
    let ctrl_shift = Modifiers { shift: true, ..ctrl };

    pollster::block_on(editor.key(easel_core::KeyEvent::new("z").with_modifiers(ctrl))).unwrap();
    assert!(editor.can_redo());
    pollster::block_on(editor.key(easel_core::KeyEvent::new("Z").with_modifiers(ctrl_shift))).unwrap();
    assert!(!editor.can_redo());
    pollster::block_on(editor.key(easel_core::KeyEvent::new("z").with_modifiers(ctrl))).unwrap();
    pollster::block_on(editor.key(easel_core::KeyEvent::new("y").with_modifiers(ctrl))).unwrap();
    assert!(editor.can_undo());
    assert!(!editor.can_redo());
}
