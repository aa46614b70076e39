use proofmark_editor::{Color, Editor, Point, Scene, Shape, ShapeKind};

fn editor() -> Editor {
    Editor::new(Scene::with_page_sizes(&[(800.0, 600.0)]).unwrap())
}

fn rect(x: f64, y: f64) -> Shape {
    Shape::new(
        ShapeKind::Rect {
            start: Point::new(x, y),
            end: Point::new(x + 20.0, y + 20.0),
        },
        Color::BLACK,
        2.0,
    )
}

#[test]
fn test_undo_at_seed_is_noop() {
    let mut editor = editor();
    let before = editor.scene().clone();
    assert!(!editor.can_undo());
    editor.undo();
    assert_eq!(editor.scene(), &before);
}

#[test]
fn test_redo_at_tail_is_noop() {
    let mut editor = editor();
    editor.add_shape(rect(0.0, 0.0)).unwrap();
    let before = editor.scene().clone();
    assert!(!editor.can_redo());
    editor.redo();
    assert_eq!(editor.scene(), &before);
}

#[test]
fn test_undo_redo_round_trip() {
    let mut editor = editor();
    let empty = editor.scene().clone();
    for i in 0..5 {
        editor.add_shape(rect(i as f64 * 30.0, 0.0)).unwrap();
    }
    let after_fifth = editor.scene().clone();

    for _ in 0..5 {
        editor.undo();
    }
    assert_eq!(editor.scene(), &empty);

    for _ in 0..5 {
        editor.redo();
    }
    assert_eq!(editor.scene(), &after_fifth);
}

#[test]
fn test_new_edit_discards_redo_branch() {
    let mut editor = editor();
    editor.add_shape(rect(0.0, 0.0)).unwrap();
    editor.add_shape(rect(30.0, 0.0)).unwrap();
    editor.undo();
    assert!(editor.can_redo());

    editor.add_shape(rect(60.0, 0.0)).unwrap();
    assert!(!editor.can_redo());
    assert_eq!(editor.scene().visible_shapes().count(), 2);
}

#[test]
fn test_history_capped_at_fifty() {
    let mut editor = editor();
    for i in 0..60 {
        editor.add_shape(rect(i as f64, 0.0)).unwrap();
    }
    assert_eq!(editor.history_len(), 50);
    assert_eq!(editor.history_index(), 49);
    assert!(!editor.can_redo());
    // The newest entry is the live state: undo steps back one edit.
    editor.undo();
    assert_eq!(editor.scene().visible_shapes().count(), 59);
}

#[test]
fn test_clear_collapses_to_current_state() {
    let mut editor = editor();
    editor.add_shape(rect(0.0, 0.0)).unwrap();
    editor.add_shape(rect(30.0, 0.0)).unwrap();
    editor.clear_history();
    assert_eq!(editor.history_len(), 1);
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
    assert_eq!(editor.scene().visible_shapes().count(), 2);
}

#[test]
fn test_undo_prunes_stale_selection() {
    use proofmark_editor::PointerInput;

    let mut editor = editor();
    let id = editor.add_shape(rect(0.0, 0.0)).unwrap();
    editor.set_tool(proofmark_editor::Tool::Select);
    // Click the rect outline to select it, then undo its creation: the
    // selection must not keep referencing the vanished id.
    editor.pointer_down(PointerInput::new(0.0, 10.0));
    editor.pointer_up(PointerInput::new(0.0, 10.0));
    assert!(editor.has_selection());

    editor.undo();
    assert!(editor.scene().shape(id).is_none());
    assert!(!editor.has_selection());
}
