use image::RgbaImage;
use proofmark_editor::{
    Color, Editor, Gesture, Point, PointerInput, Scene, ShapeKind, StampKind, Stroke, Tool,
    UiRequest,
};
use std::sync::Arc;

fn editor() -> Editor {
    Editor::new(Scene::with_page_sizes(&[(800.0, 600.0)]).unwrap())
}

fn down(editor: &mut Editor, x: f64, y: f64, t: f64) -> Option<UiRequest> {
    editor.pointer_down(PointerInput::new(x, y).at(t))
}

fn up(editor: &mut Editor, x: f64, y: f64, t: f64) -> Option<UiRequest> {
    editor.pointer_up(PointerInput::new(x, y).at(t))
}

fn mv(editor: &mut Editor, x: f64, y: f64) {
    editor.pointer_move(PointerInput::new(x, y));
}

fn click(editor: &mut Editor, x: f64, y: f64, t: f64) {
    down(editor, x, y, t);
    up(editor, x, y, t + 30.0);
}

// ---- labeled rect ----

#[test]
fn test_labeled_rect_phase_transition_at_thirty_units() {
    let mut editor = editor();
    editor.set_tool(Tool::LabeledRect);

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 10.0, 10.0);
    // Distance ~14.1: still stretching the leader, nothing created.
    assert!(matches!(
        editor.gesture(),
        Gesture::LabeledRectLeader { .. }
    ));

    mv(&mut editor, 0.0, 40.0);
    match editor.gesture() {
        Gesture::LabeledRectSquare {
            leader_end,
            rect_start,
            ..
        } => {
            assert_eq!(*leader_end, Point::new(0.0, 30.0));
            assert_eq!(*rect_start, Point::new(0.0, 35.0));
        }
        other => panic!("expected square phase, got {other:?}"),
    }
}

#[test]
fn test_labeled_rect_short_leader_release_cancels() {
    let mut editor = editor();
    editor.set_tool(Tool::LabeledRect);

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 10.0, 10.0);
    up(&mut editor, 10.0, 10.0, 100.0);

    assert!(editor.gesture().is_idle());
    assert_eq!(editor.scene().visible_shapes().count(), 0);
}

#[test]
fn test_labeled_rect_commit_with_label() {
    let mut editor = editor();
    editor.set_tool(Tool::LabeledRect);

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 0.0, 40.0);
    mv(&mut editor, 40.0, 80.0);
    let request = up(&mut editor, 40.0, 80.0, 200.0);
    assert!(matches!(request, Some(UiRequest::LabelChar)));

    editor.submit_label('小');
    assert!(editor.gesture().is_idle());

    let shape = editor.scene().visible_shapes().next().unwrap();
    match &shape.kind {
        ShapeKind::LabeledRect {
            start,
            end,
            label,
            leader,
        } => {
            // Square snapped to the shorter drag axis (40 vs 45).
            assert_eq!(*start, Point::new(0.0, 35.0));
            assert_eq!(*end, Point::new(40.0, 75.0));
            assert_eq!(*label, '小');
            assert_eq!(leader.start, Point::new(0.0, 0.0));
            assert_eq!(leader.end, Point::new(0.0, 30.0));
        }
        other => panic!("expected labeled rect, got {other:?}"),
    }
}

#[test]
fn test_labeled_rect_cancel_commits_nothing() {
    let mut editor = editor();
    editor.set_tool(Tool::LabeledRect);

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 0.0, 40.0);
    mv(&mut editor, 40.0, 80.0);
    up(&mut editor, 40.0, 80.0, 200.0);

    editor.cancel_label_entry();
    assert!(editor.gesture().is_idle());
    assert_eq!(editor.scene().visible_shapes().count(), 0);
}

// ---- polyline ----

#[test]
fn test_polyline_double_click_closes_figure() {
    let mut editor = editor();
    editor.set_tool(Tool::Polyline);

    click(&mut editor, 0.0, 0.0, 0.0);
    click(&mut editor, 10.0, 0.0, 500.0);
    click(&mut editor, 10.0, 10.0, 1000.0);
    // Second click of the pair: 200 ms later, 1 unit away.
    down(&mut editor, 10.0, 11.0, 1200.0);

    let shape = editor.scene().visible_shapes().next().expect("committed");
    match &shape.kind {
        ShapeKind::Polyline { points } => {
            assert_eq!(points.len(), 4);
            assert_eq!(points[0], Point::new(0.0, 0.0));
            assert_eq!(points[3], points[0]);
        }
        other => panic!("expected polyline, got {other:?}"),
    }
    assert!(editor.gesture().is_idle());
}

#[test]
fn test_polyline_double_click_on_fresh_canvas_starts_drawing() {
    let mut editor = editor();
    editor.set_tool(Tool::Polyline);

    click(&mut editor, 100.0, 100.0, 0.0);
    // Double-click with a single vertex down: adds a vertex, never
    // finalizes a degenerate figure.
    down(&mut editor, 100.0, 100.0, 100.0);

    assert!(matches!(
        editor.gesture(),
        Gesture::DrawingPolyline { .. }
    ));
    assert_eq!(editor.scene().visible_shapes().count(), 0);
}

#[test]
fn test_polyline_vertex_undo_and_cancel() {
    let mut editor = editor();
    editor.set_tool(Tool::Polyline);

    click(&mut editor, 0.0, 0.0, 0.0);
    click(&mut editor, 20.0, 0.0, 500.0);
    click(&mut editor, 40.0, 0.0, 1000.0);

    editor.undo_last_vertex();
    match editor.gesture() {
        Gesture::DrawingPolyline { vertices, .. } => assert_eq!(vertices.len(), 2),
        other => panic!("unexpected gesture {other:?}"),
    }

    editor.undo_last_vertex();
    editor.undo_last_vertex();
    assert!(editor.gesture().is_idle());
    assert_eq!(editor.scene().visible_shapes().count(), 0);
}

// ---- annotated shapes ----

#[test]
fn test_annotated_shape_full_flow() {
    let mut editor = editor();
    editor.set_tool(Tool::RectAnnotated);

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 50.0, 40.0);
    up(&mut editor, 50.0, 40.0, 100.0);

    // Base shape committed, leader now follows the pointer.
    assert_eq!(editor.scene().visible_shapes().count(), 1);
    assert!(matches!(editor.gesture(), Gesture::LeaderFollow { .. }));

    mv(&mut editor, 80.0, 20.0);
    match editor.gesture() {
        Gesture::LeaderFollow {
            leader_start,
            leader_end,
            ..
        } => {
            // Anchor recomputed per move: nearest edge midpoint.
            assert_eq!(*leader_start, Point::new(50.0, 20.0));
            assert_eq!(*leader_end, Point::new(80.0, 20.0));
        }
        other => panic!("unexpected gesture {other:?}"),
    }

    let request = down(&mut editor, 80.0, 20.0, 500.0);
    assert!(matches!(
        request,
        Some(UiRequest::AnnotationText { existing: None, .. })
    ));

    editor.submit_annotation_text("トルツメ".to_string(), false, 14.0);
    assert!(editor.gesture().is_idle());

    let shape = editor.scene().visible_shapes().next().unwrap();
    let ann = shape.annotation.as_ref().expect("annotation attached");
    assert_eq!(ann.text, "トルツメ");
    assert_eq!(ann.leader.start, Point::new(50.0, 20.0));
    assert_eq!(ann.leader.end, Point::new(80.0, 20.0));
    assert_eq!((ann.x, ann.y), (80.0, 20.0));
}

#[test]
fn test_annotation_cancel_keeps_bare_shape() {
    let mut editor = editor();
    editor.set_tool(Tool::EllipseAnnotated);

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 60.0, 30.0);
    up(&mut editor, 60.0, 30.0, 100.0);
    down(&mut editor, 100.0, 15.0, 500.0);

    editor.cancel_annotation_entry();
    assert!(editor.gesture().is_idle());

    let shape = editor.scene().visible_shapes().next().unwrap();
    assert!(shape.annotation.is_none());
}

#[test]
fn test_undersized_annotated_shape_never_enters_leader_phase() {
    let mut editor = editor();
    editor.set_tool(Tool::RectAnnotated);

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 3.0, 3.0);
    up(&mut editor, 3.0, 3.0, 100.0);

    assert!(editor.gesture().is_idle());
    assert_eq!(editor.scene().visible_shapes().count(), 0);
}

// ---- plain shapes ----

#[test]
fn test_undersized_rect_discarded() {
    let mut editor = editor();
    editor.set_tool(Tool::Rect);
    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 4.0, 4.0);
    up(&mut editor, 4.0, 4.0, 100.0);
    assert_eq!(editor.scene().visible_shapes().count(), 0);
}

#[test]
fn test_thin_line_still_commits() {
    let mut editor = editor();
    editor.set_tool(Tool::Line);
    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 0.0, 4.0);
    up(&mut editor, 0.0, 4.0, 100.0);
    assert_eq!(editor.scene().visible_shapes().count(), 1);
}

#[test]
fn test_shift_snaps_line_to_forty_five_degrees() {
    let mut editor = editor();
    editor.set_tool(Tool::Line);

    down(&mut editor, 0.0, 0.0, 0.0);
    editor.pointer_move(PointerInput::new(100.0, 10.0).with_shift());
    editor.pointer_up(PointerInput::new(100.0, 10.0).with_shift().at(100.0));

    let shape = editor.scene().visible_shapes().next().unwrap();
    match &shape.kind {
        ShapeKind::Line { start, end } => {
            assert_eq!(*start, Point::new(0.0, 0.0));
            // Nearest 45-degree ray is horizontal; length is preserved.
            assert!(end.y.abs() < 1e-9);
            assert!((end.x - (100.0f64.powi(2) + 10.0f64.powi(2)).sqrt()).abs() < 1e-9);
        }
        other => panic!("expected line, got {other:?}"),
    }
}

#[test]
fn test_rect_with_font_preset_carries_caption() {
    let mut editor = editor();
    editor.set_font_preset(Some("Mincho".to_string()));
    editor.set_tool(Tool::Rect);

    down(&mut editor, 10.0, 10.0, 0.0);
    mv(&mut editor, 60.0, 50.0);
    up(&mut editor, 60.0, 50.0, 100.0);

    let shape = editor.scene().visible_shapes().next().unwrap();
    let label = shape.font_label.as_ref().expect("caption attached");
    assert_eq!(label.font_name, "Mincho");
    // Drag ran down-right, so the caption hangs off the bottom-right.
    assert_eq!(label.text_x, 65.0);
    assert_eq!(label.text_y, 55.0);
}

// ---- select tool ----

#[test]
fn test_drag_commits_exactly_one_snapshot() {
    let mut editor = editor();
    editor.set_tool(Tool::Rect);
    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 50.0, 50.0);
    up(&mut editor, 50.0, 50.0, 100.0);

    editor.set_tool(Tool::Select);
    click(&mut editor, 0.0, 25.0, 1000.0);
    assert!(editor.has_selection());

    let before = editor.history_len();
    down(&mut editor, 25.0, 25.0, 2000.0);
    mv(&mut editor, 30.0, 30.0);
    mv(&mut editor, 45.0, 40.0);
    up(&mut editor, 45.0, 40.0, 2100.0);

    assert_eq!(editor.history_len(), before + 1);
    let shape = editor.scene().visible_shapes().next().unwrap();
    match &shape.kind {
        ShapeKind::Rect { start, end } => {
            assert_eq!(*start, Point::new(20.0, 15.0));
            assert_eq!(*end, Point::new(70.0, 65.0));
        }
        other => panic!("expected rect, got {other:?}"),
    }
}

#[test]
fn test_rubber_band_selects_intersecting_content() {
    let mut editor = editor();
    for x in [10.0, 50.0] {
        editor.set_tool(Tool::Rect);
        down(&mut editor, x, x, 0.0);
        mv(&mut editor, x + 20.0, x + 20.0);
        up(&mut editor, x + 20.0, x + 20.0, 100.0);
    }

    editor.set_tool(Tool::Select);
    down(&mut editor, 150.0, 150.0, 1000.0);
    mv(&mut editor, 5.0, 5.0);
    up(&mut editor, 5.0, 5.0, 1100.0);

    assert_eq!(editor.selection().shape_ids().len(), 2);
}

#[test]
fn test_tiny_rubber_band_falls_back_to_point_pick() {
    let mut editor = editor();
    editor
        .add_stroke(Stroke::new(
            vec![Point::new(100.0, 100.0), Point::new(110.0, 100.0)],
            Color::BLACK,
            3.0,
        ))
        .unwrap();

    editor.set_tool(Tool::Select);
    down(&mut editor, 105.0, 105.0, 0.0);
    up(&mut editor, 105.0, 105.0, 50.0);

    // The sweep was a click: no shape there, so the stroke wins.
    assert_eq!(editor.selection().stroke_ids().len(), 1);
}

#[test]
fn test_double_click_reopens_text_entry() {
    let mut editor = editor();
    editor
        .add_text(proofmark_editor::TextElement::new(
            "hi".to_string(),
            100.0,
            100.0,
            Color::BLACK,
            14.0,
            false,
        ))
        .unwrap();

    editor.set_tool(Tool::Select);
    click(&mut editor, 105.0, 105.0, 0.0);
    let request = down(&mut editor, 105.0, 105.0, 100.0);
    match request {
        Some(UiRequest::TextEntry { existing: Some(text) }) => assert_eq!(text.text, "hi"),
        other => panic!("expected prefilled text entry, got {other:?}"),
    }

    editor.submit_text("やり直し".to_string(), true, 16.0);
    let text = editor.scene().visible_texts().next().unwrap();
    assert_eq!(text.text, "やり直し");
    assert!(text.vertical);
    assert_eq!(text.font_size, 16.0);
}

#[test]
fn test_tool_switch_clears_selection_and_gesture() {
    let mut editor = editor();
    editor.set_tool(Tool::Polyline);
    click(&mut editor, 0.0, 0.0, 0.0);
    click(&mut editor, 20.0, 0.0, 500.0);
    assert!(!editor.gesture().is_idle());

    editor.set_tool(Tool::Pen);
    assert!(editor.gesture().is_idle());
    assert!(!editor.has_selection());
    assert_eq!(editor.scene().visible_shapes().count(), 0);
}

#[test]
fn test_escape_cancel_is_idempotent() {
    let mut editor = editor();
    editor.set_tool(Tool::Polyline);
    click(&mut editor, 0.0, 0.0, 0.0);
    editor.cancel();
    assert!(editor.gesture().is_idle());
    editor.cancel();
    assert!(editor.gesture().is_idle());
}

// ---- freehand & eraser ----

#[test]
fn test_pen_commits_stroke_on_release() {
    let mut editor = editor();
    editor.set_tool(Tool::Pen);
    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 5.0, 5.0);
    mv(&mut editor, 10.0, 10.0);
    up(&mut editor, 10.0, 10.0, 100.0);

    let stroke = editor.scene().visible_strokes().next().unwrap();
    assert_eq!(stroke.points.len(), 3);
    assert!(!stroke.marker);
}

#[test]
fn test_marker_stroke_is_translucent() {
    let mut editor = editor();
    editor.set_tool(Tool::Marker);
    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 20.0, 0.0);
    up(&mut editor, 20.0, 0.0, 100.0);

    let stroke = editor.scene().visible_strokes().next().unwrap();
    assert!(stroke.marker);
    assert!((stroke.opacity - 0.3).abs() < 1e-9);
}

#[test]
fn test_single_point_stroke_discarded() {
    let mut editor = editor();
    editor.set_tool(Tool::Pen);
    down(&mut editor, 0.0, 0.0, 0.0);
    up(&mut editor, 0.0, 0.0, 50.0);
    assert_eq!(editor.scene().visible_strokes().count(), 0);
}

#[test]
fn test_eraser_radius_is_twice_stroke_width() {
    let mut editor = editor();
    editor
        .add_stroke(Stroke::new(
            vec![Point::new(10.0, 10.0), Point::new(12.0, 10.0)],
            Color::BLACK,
            3.0,
        ))
        .unwrap();
    editor
        .add_stroke(Stroke::new(
            vec![Point::new(100.0, 100.0), Point::new(102.0, 100.0)],
            Color::BLACK,
            3.0,
        ))
        .unwrap();
    editor.set_tool(Tool::Eraser);
    editor.set_stroke_width(3.0);

    // Radius 6: (14, 10) reaches the first stroke's sample at (12, 10).
    let before = editor.history_len();
    down(&mut editor, 14.0, 10.0, 0.0);
    mv(&mut editor, 90.0, 100.0);
    up(&mut editor, 90.0, 100.0, 100.0);

    assert_eq!(editor.scene().visible_strokes().count(), 1);
    // Incremental deletions commit as one snapshot at release.
    assert_eq!(editor.history_len(), before + 1);
}

// ---- stamps, text, images ----

#[test]
fn test_stamp_placed_at_click() {
    let mut editor = editor();
    editor.set_tool(Tool::Stamp);
    editor.set_stamp_kind(Some(StampKind::Done));
    down(&mut editor, 40.0, 60.0, 0.0);

    let shape = editor.scene().visible_shapes().next().unwrap();
    match &shape.kind {
        ShapeKind::Stamp { at, kind, size } => {
            assert_eq!(*at, Point::new(40.0, 60.0));
            assert_eq!(*kind, StampKind::Done);
            assert_eq!(*size, 28.0);
        }
        other => panic!("expected stamp, got {other:?}"),
    }
}

#[test]
fn test_stamp_tool_without_kind_does_nothing() {
    let mut editor = editor();
    editor.set_tool(Tool::Stamp);
    down(&mut editor, 40.0, 60.0, 0.0);
    assert_eq!(editor.scene().visible_shapes().count(), 0);
}

#[test]
fn test_text_tool_requests_entry_then_places() {
    let mut editor = editor();
    editor.set_tool(Tool::Text);
    let request = down(&mut editor, 5.0, 7.0, 0.0);
    assert!(matches!(
        request,
        Some(UiRequest::TextEntry { existing: None })
    ));

    editor.submit_text("メモ".to_string(), true, 12.0);
    let text = editor.scene().visible_texts().next().unwrap();
    assert_eq!((text.x, text.y), (5.0, 7.0));
    assert!(text.vertical);
}

#[test]
fn test_image_tool_without_pending_requests_pick() {
    let mut editor = editor();
    editor.set_tool(Tool::Image);
    let request = down(&mut editor, 5.0, 7.0, 0.0);
    assert!(matches!(request, Some(UiRequest::ImagePick)));
}

#[test]
fn test_image_placement_keeps_aspect_ratio() {
    let mut editor = editor();
    editor.set_tool(Tool::Image);
    editor.provide_image(Arc::new(RgbaImage::new(100, 50)));

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 80.0, 80.0);
    up(&mut editor, 80.0, 80.0, 100.0);

    let image = editor.scene().visible_images().next().unwrap();
    assert_eq!(image.start, Point::new(0.0, 0.0));
    // 2:1 image fitted into an 80x80 drag: width rules.
    assert_eq!(image.end, Point::new(80.0, 40.0));
}

#[test]
fn test_tiny_image_drag_discarded() {
    let mut editor = editor();
    editor.set_tool(Tool::Image);
    editor.provide_image(Arc::new(RgbaImage::new(100, 50)));

    down(&mut editor, 0.0, 0.0, 0.0);
    mv(&mut editor, 8.0, 8.0);
    up(&mut editor, 8.0, 8.0, 100.0);

    assert_eq!(editor.scene().visible_images().count(), 0);
}

#[test]
fn test_center_placement_caps_size_and_switches_tool() {
    let mut editor = editor();
    editor.set_tool(Tool::Image);
    editor.provide_image(Arc::new(RgbaImage::new(400, 800)));
    editor.place_image_at_center();

    let image = editor.scene().visible_images().next().unwrap();
    assert_eq!(image.start, Point::new(325.0, 150.0));
    assert_eq!(image.end, Point::new(475.0, 450.0));
    assert_eq!(editor.tool(), Tool::Select);
}
