use proofmark_editor::hit::{self, AnnotationHit};
use proofmark_editor::{
    Annotation, Bounds, Color, LeaderLine, Point, Shape, ShapeKind, TextAlign,
};

fn annotation(text: &str, x: f64, y: f64, end: Point) -> Annotation {
    Annotation {
        text: text.to_string(),
        x,
        y,
        color: Color::RED,
        font_size: 14.0,
        vertical: false,
        align: TextAlign::Left,
        leader: LeaderLine::new(Point::new(0.0, 0.0), end),
    }
}

#[test]
fn test_rect_outline_edge_only() {
    let b = Bounds::new(0.0, 0.0, 100.0, 100.0);
    assert!(!hit::hit_rect_outline(&Point::new(50.0, 50.0), &b, 5.0));
    assert!(hit::hit_rect_outline(&Point::new(50.0, 2.0), &b, 5.0));
    assert!(hit::hit_rect_outline(&Point::new(98.0, 60.0), &b, 5.0));
    assert!(!hit::hit_rect_outline(&Point::new(120.0, 50.0), &b, 5.0));
}

#[test]
fn test_ellipse_perimeter() {
    let center = Point::new(50.0, 50.0);
    assert!(hit::hit_ellipse_ring(
        &Point::new(90.0, 50.0),
        center,
        40.0,
        20.0,
        5.0
    ));
    assert!(!hit::hit_ellipse_ring(
        &Point::new(50.0, 50.0),
        center,
        40.0,
        20.0,
        5.0
    ));
    assert!(hit::hit_ellipse_ring(
        &Point::new(50.0, 70.0),
        center,
        40.0,
        20.0,
        5.0
    ));
}

#[test]
fn test_degenerate_ellipse_never_hits() {
    let center = Point::new(50.0, 50.0);
    assert!(!hit::hit_ellipse_ring(
        &Point::new(50.0, 50.0),
        center,
        0.0,
        20.0,
        5.0
    ));
}

#[test]
fn test_polyline_hits_every_segment() {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
    ];
    assert!(hit::hit_polyline(&Point::new(50.0, 3.0), &points, 5.0));
    assert!(hit::hit_polyline(&Point::new(97.0, 50.0), &points, 5.0));
    assert!(!hit::hit_polyline(&Point::new(50.0, 50.0), &points, 5.0));
}

#[test]
fn test_leader_end_checked_before_text() {
    // Text block starts at the leader end, so a point near the end
    // matches both; the end must win.
    let ann = annotation("abc", 100.0, 100.0, Point::new(100.0, 100.0));
    let hit = hit::hit_annotation(&Point::new(102.0, 102.0), &ann, 10.0);
    assert_eq!(hit, Some(AnnotationHit::LeaderEnd));
}

#[test]
fn test_leader_end_grabs_at_one_and_a_half_tolerance() {
    let ann = annotation("abc", 500.0, 500.0, Point::new(100.0, 100.0));
    // 13 units away: outside plain tolerance, inside 1.5x.
    let hit = hit::hit_annotation(&Point::new(113.0, 100.0), &ann, 10.0);
    assert_eq!(hit, Some(AnnotationHit::LeaderEnd));
    assert_eq!(
        hit::hit_annotation(&Point::new(116.0, 100.0), &ann, 10.0),
        None
    );
}

#[test]
fn test_annotation_text_block_hit() {
    // Horizontal "abc" at (100, 100), 14px: block is 25.2 x 16.8.
    let ann = annotation("abc", 100.0, 100.0, Point::new(300.0, 300.0));
    assert_eq!(
        hit::hit_annotation(&Point::new(110.0, 108.0), &ann, 5.0),
        Some(AnnotationHit::Text)
    );
    assert_eq!(
        hit::hit_annotation(&Point::new(200.0, 108.0), &ann, 5.0),
        None
    );
}

#[test]
fn test_annotated_shape_hit_through_callout() {
    let mut shape = Shape::new(
        ShapeKind::Rect {
            start: Point::new(0.0, 0.0),
            end: Point::new(50.0, 50.0),
        },
        Color::BLACK,
        2.0,
    );
    shape.annotation = Some(Annotation {
        text: "trim".to_string(),
        x: 120.0,
        y: 20.0,
        color: Color::RED,
        font_size: 14.0,
        vertical: false,
        align: TextAlign::Left,
        leader: LeaderLine::new(Point::new(50.0, 25.0), Point::new(120.0, 20.0)),
    });
    // On the leader line, far from the rect outline.
    assert!(hit::hit_shape(&Point::new(85.0, 23.0), &shape, 5.0));
    // Inside the rect interior: still not a hit.
    assert!(!hit::hit_shape(&Point::new(25.0, 25.0), &shape, 5.0));
}

#[test]
fn test_stamp_hit_radius() {
    let shape = Shape::new(
        ShapeKind::Stamp {
            at: Point::new(50.0, 50.0),
            kind: proofmark_editor::StampKind::Done,
            size: 28.0,
        },
        Color::RED,
        2.0,
    );
    assert!(hit::hit_shape(&Point::new(60.0, 50.0), &shape, 5.0));
    assert!(!hit::hit_shape(&Point::new(90.0, 50.0), &shape, 5.0));
}

#[test]
fn test_labeled_rect_hits_square_and_leader() {
    let shape = Shape::new(
        ShapeKind::LabeledRect {
            start: Point::new(40.0, 40.0),
            end: Point::new(80.0, 90.0),
            label: '小',
            leader: LeaderLine::new(Point::new(0.0, 0.0), Point::new(30.0, 30.0)),
        },
        Color::RED,
        2.0,
    );
    // Square is 40x40 from (40, 40).
    assert!(hit::hit_shape(&Point::new(60.0, 41.0), &shape, 5.0));
    assert!(hit::hit_shape(&Point::new(15.0, 15.0), &shape, 5.0));
    assert!(!hit::hit_shape(&Point::new(60.0, 60.0), &shape, 5.0));
}
