use proofmark_editor::{
    transform, Annotation, Color, Editor, EntityId, LeaderLine, Point, Scene, Selection, Shape,
    ShapeKind, TextAlign,
};

fn scene() -> Scene {
    Scene::with_page_sizes(&[(800.0, 600.0)]).unwrap()
}

/// A 100x100 rect at the origin with a callout anchored on its right
/// edge, text to the right of the leader end.
fn annotated_rect(scene: &mut Scene) -> EntityId {
    let mut shape = Shape::new(
        ShapeKind::Rect {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 100.0),
        },
        Color::BLACK,
        2.0,
    );
    shape.annotation = Some(Annotation {
        text: "ab".to_string(),
        x: 150.0,
        y: 50.0,
        color: Color::RED,
        font_size: 10.0,
        vertical: false,
        align: TextAlign::Left,
        leader: LeaderLine::new(Point::new(100.0, 50.0), Point::new(144.0, 50.0)),
    });
    scene.add_shape(shape).unwrap()
}

#[test]
fn test_leader_end_move_preserves_text_offset() {
    let mut scene = scene();
    let id = annotated_rect(&mut scene);

    transform::move_leader_end(&mut scene, id, 10.0, 20.0);

    let shape = scene.shape(id).unwrap();
    // The owning shape did not move.
    assert_eq!(
        shape.kind,
        ShapeKind::Rect {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 100.0),
        }
    );
    let ann = shape.annotation.as_ref().unwrap();
    // End moved by exactly the delta.
    assert_eq!(ann.leader.end, Point::new(154.0, 70.0));
    // Text kept its offset from the end.
    assert_eq!((ann.x, ann.y), (160.0, 70.0));
    // Start re-anchored to the nearest rect edge midpoint.
    assert_eq!(ann.leader.start, Point::new(100.0, 50.0));
}

#[test]
fn test_leader_end_move_swings_anchor_to_nearest_edge() {
    let mut scene = scene();
    let id = annotated_rect(&mut scene);

    // Drag the end far below the rect: the bottom edge midpoint wins.
    transform::move_leader_end(&mut scene, id, -94.0, 250.0);
    let ann = scene.shape(id).unwrap().annotation.as_ref().unwrap();
    assert_eq!(ann.leader.end, Point::new(50.0, 300.0));
    assert_eq!(ann.leader.start, Point::new(50.0, 100.0));
}

#[test]
fn test_annotation_move_flips_alignment() {
    let mut scene = scene();
    let id = annotated_rect(&mut scene);

    // Drag the callout to the far left of the rect.
    transform::move_annotation_only(&mut scene, id, -300.0, 0.0);

    let shape = scene.shape(id).unwrap();
    assert_eq!(
        shape.kind,
        ShapeKind::Rect {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 100.0),
        }
    );
    let ann = shape.annotation.as_ref().unwrap();
    // Text position simply translated.
    assert_eq!((ann.x, ann.y), (-150.0, 50.0));
    // Anchor swung to the left edge midpoint, and the leader now runs
    // leftward, so the text aligns right.
    assert_eq!(ann.leader.start, Point::new(0.0, 50.0));
    assert_eq!(ann.align, TextAlign::Right);
    // The refined end sits against the text box, not at the raw delta.
    assert!(ann.leader.end.x < 0.0);
}

#[test]
fn test_ellipse_anchor_projects_through_angle() {
    let mut scene = scene();
    let mut shape = Shape::new(
        ShapeKind::Ellipse {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 50.0),
        },
        Color::BLACK,
        2.0,
    );
    shape.annotation = Some(Annotation {
        text: "x".to_string(),
        x: 200.0,
        y: 25.0,
        color: Color::RED,
        font_size: 10.0,
        vertical: false,
        align: TextAlign::Left,
        leader: LeaderLine::new(Point::new(100.0, 25.0), Point::new(194.0, 25.0)),
    });
    let id = scene.add_shape(shape).unwrap();

    // Pull the end straight down; the anchor should land on the bottom
    // of the ellipse (angle projection), not an edge midpoint.
    transform::move_leader_end(&mut scene, id, -144.0, 175.0);
    let ann = scene.shape(id).unwrap().annotation.as_ref().unwrap();
    assert_eq!(ann.leader.end, Point::new(50.0, 200.0));
    assert!((ann.leader.start.x - 50.0).abs() < 1e-9);
    assert!((ann.leader.start.y - 50.0).abs() < 1e-9);
}

#[test]
fn test_line_anchor_is_fixed_midpoint() {
    let mut scene = scene();
    let mut shape = Shape::new(
        ShapeKind::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 0.0),
        },
        Color::BLACK,
        2.0,
    );
    shape.annotation = Some(Annotation {
        text: "x".to_string(),
        x: 120.0,
        y: 40.0,
        color: Color::RED,
        font_size: 10.0,
        vertical: false,
        align: TextAlign::Left,
        leader: LeaderLine::new(Point::new(50.0, 0.0), Point::new(114.0, 40.0)),
    });
    let id = scene.add_shape(shape).unwrap();

    transform::move_leader_end(&mut scene, id, 50.0, 50.0);
    let ann = scene.shape(id).unwrap().annotation.as_ref().unwrap();
    assert_eq!(ann.leader.start, Point::new(50.0, 0.0));
}

#[test]
fn test_moving_shape_carries_callout() {
    let mut scene = scene();
    let id = annotated_rect(&mut scene);
    let mut selection = Selection::new();
    selection.set_shape_ids(&scene, vec![id]);

    transform::move_selected_shapes(&mut scene, &mut selection, 7.0, -3.0);

    let shape = scene.shape(id).unwrap();
    let ann = shape.annotation.as_ref().unwrap();
    assert_eq!(
        shape.kind,
        ShapeKind::Rect {
            start: Point::new(7.0, -3.0),
            end: Point::new(107.0, 97.0),
        }
    );
    assert_eq!(ann.leader.start, Point::new(107.0, 47.0));
    assert_eq!(ann.leader.end, Point::new(151.0, 47.0));
    assert_eq!((ann.x, ann.y), (157.0, 47.0));
}

#[test]
fn test_move_with_stale_id_is_silent() {
    let mut scene = scene();
    let id = annotated_rect(&mut scene);
    scene.remove_entities(&[], &[id], &[], &[]);

    // Ids that no longer resolve are skipped without error.
    transform::move_annotation_only(&mut scene, id, 5.0, 5.0);
    transform::move_leader_end(&mut scene, id, 5.0, 5.0);
}

#[test]
fn test_editor_move_api_snapshots_only_on_request() {
    let mut editor = Editor::new(Scene::with_page_sizes(&[(800.0, 600.0)]).unwrap());
    let id = editor
        .add_shape(Shape::new(
            ShapeKind::Rect {
                start: Point::new(0.0, 0.0),
                end: Point::new(40.0, 40.0),
            },
            Color::BLACK,
            2.0,
        ))
        .unwrap();
    editor.set_selected_shape_ids(vec![id]);
    let before = editor.history_len();

    // A toolbar-style nudge: several move steps, one commit.
    editor.move_selected_shapes(5.0, 0.0);
    editor.move_selected_shapes(5.0, 0.0);
    assert_eq!(editor.history_len(), before);
    editor.save_to_history();
    assert_eq!(editor.history_len(), before + 1);

    let shape = editor.scene().shape(id).unwrap();
    assert_eq!(
        shape.kind,
        ShapeKind::Rect {
            start: Point::new(10.0, 0.0),
            end: Point::new(50.0, 40.0),
        }
    );
    // Undo rolls the whole nudge back in one step.
    editor.undo();
    let shape = editor.scene().shape(id).unwrap();
    assert_eq!(
        shape.kind,
        ShapeKind::Rect {
            start: Point::new(0.0, 0.0),
            end: Point::new(40.0, 40.0),
        }
    );
}

#[test]
fn test_recolor_selection_recolors_callout() {
    let mut scene = scene();
    let id = annotated_rect(&mut scene);
    let mut selection = Selection::new();
    selection.set_shape_ids(&scene, vec![id]);

    assert!(transform::update_selected_color(
        &mut scene,
        &selection,
        Color::rgb(10, 20, 30)
    ));
    let shape = scene.shape(id).unwrap();
    assert_eq!(shape.color, Color::rgb(10, 20, 30));
    assert_eq!(
        shape.annotation.as_ref().unwrap().color,
        Color::rgb(10, 20, 30)
    );
}

#[test]
fn test_delete_selected_clears_selection() {
    let mut scene = scene();
    let id = annotated_rect(&mut scene);
    let mut selection = Selection::new();
    selection.set_shape_ids(&scene, vec![id]);

    assert!(transform::delete_selected(&mut scene, &mut selection));
    assert!(scene.shape(id).is_none());
    assert!(selection.is_empty());
}
