use proofmark_editor::{
    Bounds, Color, Point, Scene, Selection, Shape, ShapeKind, Stroke, TextElement,
};

fn scene() -> Scene {
    Scene::with_page_sizes(&[(800.0, 600.0)]).unwrap()
}

fn rect(scene: &mut Scene, x: f64, y: f64, size: f64) -> proofmark_editor::EntityId {
    scene
        .add_shape(Shape::new(
            ShapeKind::Rect {
                start: Point::new(x, y),
                end: Point::new(x + size, y + size),
            },
            Color::BLACK,
            2.0,
        ))
        .unwrap()
}

#[test]
fn test_newest_shape_wins_at_point() {
    let mut scene = scene();
    let _older = rect(&mut scene, 0.0, 0.0, 50.0);
    let newer = rect(&mut scene, 0.0, 0.0, 50.0);

    let mut selection = Selection::new();
    let picked = selection.select_shape_at(&scene, &Point::new(25.0, 1.0), 5.0);
    assert_eq!(picked, Some(newer));
    assert_eq!(selection.shape_ids(), &[newer]);
}

#[test]
fn test_point_miss_returns_none() {
    let scene = scene();
    let mut selection = Selection::new();
    assert!(selection
        .select_shape_at(&scene, &Point::new(400.0, 400.0), 5.0)
        .is_none());
    assert!(selection.is_empty());
}

#[test]
fn test_shape_selection_replaces_stroke_selection() {
    let mut scene = scene();
    scene
        .add_stroke(Stroke::new(
            vec![Point::new(200.0, 200.0), Point::new(210.0, 200.0)],
            Color::BLACK,
            3.0,
        ))
        .unwrap();
    let shape = rect(&mut scene, 0.0, 0.0, 50.0);

    let mut selection = Selection::new();
    selection.select_stroke_at(&scene, &Point::new(205.0, 200.0), 10.0);
    assert_eq!(selection.stroke_ids().len(), 1);

    selection.select_shape_at(&scene, &Point::new(25.0, 1.0), 5.0);
    assert_eq!(selection.shape_ids(), &[shape]);
    assert!(selection.stroke_ids().is_empty());
}

#[test]
fn test_rect_select_gathers_strokes_and_shapes() {
    let mut scene = scene();
    scene
        .add_stroke(Stroke::new(
            vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)],
            Color::BLACK,
            3.0,
        ))
        .unwrap();
    rect(&mut scene, 30.0, 30.0, 20.0);
    rect(&mut scene, 500.0, 500.0, 20.0);

    let mut selection = Selection::new();
    let band = Bounds::new(0.0, 0.0, 100.0, 100.0);
    selection.select_strokes_in_rect(&scene, &band);
    selection.select_shapes_in_rect(&scene, &band);

    assert_eq!(selection.stroke_ids().len(), 1);
    assert_eq!(selection.shape_ids().len(), 1);
    // Union bounds covers both categories.
    let bounds = selection.bounds().unwrap();
    assert!(bounds.min_x <= 10.0 && bounds.max_x >= 50.0);
}

#[test]
fn test_text_selection_uses_metric_bounds() {
    let mut scene = scene();
    let id = scene
        .add_text(TextElement::new(
            "abc".to_string(),
            100.0,
            100.0,
            Color::BLACK,
            14.0,
            false,
        ))
        .unwrap();

    let mut selection = Selection::new();
    assert_eq!(
        selection.select_text_at(&scene, &Point::new(110.0, 108.0), 10.0),
        Some(id)
    );
    assert!(selection
        .select_text_at(&scene, &Point::new(300.0, 108.0), 10.0)
        .is_none());
}

#[test]
fn test_prune_drops_stale_ids() {
    let mut scene = scene();
    let id = rect(&mut scene, 0.0, 0.0, 50.0);

    let mut selection = Selection::new();
    selection.set_shape_ids(&scene, vec![id]);
    assert!(!selection.is_empty());

    scene.remove_entities(&[], &[id], &[], &[]);
    selection.prune(&scene);
    assert!(selection.is_empty());
    assert!(selection.bounds().is_none());
}

#[test]
fn test_annotation_only_selection_is_exclusive() {
    let mut scene = scene();
    let id = rect(&mut scene, 0.0, 0.0, 50.0);

    let mut selection = Selection::new();
    selection.set_shape_ids(&scene, vec![id]);
    selection.set_annotation_shape(Some(id));
    assert!(selection.shape_ids().is_empty());
    assert_eq!(selection.annotation_shape(), Some(id));
}

#[test]
fn test_hidden_layer_not_selectable() {
    let mut scene = scene();
    let layer = scene.current_layer_id();
    rect(&mut scene, 0.0, 0.0, 50.0);
    scene.set_layer_visible(layer, false);

    let mut selection = Selection::new();
    assert!(selection
        .select_shape_at(&scene, &Point::new(25.0, 1.0), 5.0)
        .is_none());
}
