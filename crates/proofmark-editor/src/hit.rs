//! Pure geometric hit-testing predicates.
//!
//! Every function takes a query point and a tolerance in page units and
//! only reads geometry; misses are `false`/`None`, never errors. Callers
//! fall through category by category in priority order (font label,
//! annotation, text, image, selection bounds, shape, stroke) and walk
//! entities in reverse creation order so newer content wins.

use crate::model::{metrics, Annotation, FontLabel, Shape, ShapeKind, Stroke};
use proofmark_core::constants::LEADER_END_TOLERANCE_FACTOR;
use proofmark_core::{Bounds, Point};

/// Which part of an annotation a point landed on. The leader end is
/// checked first; it doubles as the drag handle for re-aiming the callout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationHit {
    LeaderEnd,
    Text,
}

/// Rect outlines are hit only near an edge; the interior stays
/// transparent so content behind the frame can be picked.
pub fn hit_rect_outline(p: &Point, bounds: &Bounds, tolerance: f64) -> bool {
    let within_y = p.y >= bounds.min_y - tolerance && p.y <= bounds.max_y + tolerance;
    let within_x = p.x >= bounds.min_x - tolerance && p.x <= bounds.max_x + tolerance;
    let on_left = (p.x - bounds.min_x).abs() < tolerance && within_y;
    let on_right = (p.x - bounds.max_x).abs() < tolerance && within_y;
    let on_top = (p.y - bounds.min_y).abs() < tolerance && within_x;
    let on_bottom = (p.y - bounds.max_y).abs() < tolerance && within_x;
    on_left || on_right || on_top || on_bottom
}

/// Ellipse perimeter test in normalized coordinates; the tolerance scales
/// by the smaller radius so thin ellipses stay pickable.
pub fn hit_ellipse_ring(p: &Point, center: Point, rx: f64, ry: f64, tolerance: f64) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let nx = (p.x - center.x) / rx;
    let ny = (p.y - center.y) / ry;
    let dist = (nx * nx + ny * ny).sqrt();
    (dist - 1.0).abs() < tolerance / rx.min(ry)
}

/// Distance from the point to the segment (projection clamped to [0, 1])
/// must fall under the tolerance.
pub fn hit_segment(p: &Point, a: &Point, b: &Point, tolerance: f64) -> bool {
    let len_sq = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if len_sq == 0.0 {
        return false;
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    p.distance_to(&proj) < tolerance
}

/// Applies the segment test to every consecutive vertex pair.
pub fn hit_polyline(p: &Point, points: &[Point], tolerance: f64) -> bool {
    points
        .windows(2)
        .any(|pair| hit_segment(p, &pair[0], &pair[1], tolerance))
}

/// Leader end first (at 1.5x tolerance), then the text block.
pub fn hit_annotation(p: &Point, annotation: &Annotation, tolerance: f64) -> Option<AnnotationHit> {
    let end = annotation.leader.end;
    if p.distance_to(&end) < tolerance * LEADER_END_TOLERANCE_FACTOR {
        return Some(AnnotationHit::LeaderEnd);
    }
    let bounds = metrics::annotation_text_bounds(annotation)?;
    if bounds.contains_with_padding(p, tolerance) {
        return Some(AnnotationHit::Text);
    }
    None
}

/// Font-designation caption box.
pub fn hit_font_label(p: &Point, label: &FontLabel, tolerance: f64) -> bool {
    metrics::font_label_bounds(label).contains_with_padding(p, tolerance)
}

/// Any stroke sample within the tolerance.
pub fn hit_stroke(p: &Point, stroke: &Stroke, tolerance: f64) -> bool {
    stroke.points.iter().any(|sp| sp.distance_to(p) < tolerance)
}

/// Dispatches on the shape kind, then falls back to its annotation's
/// leader line and text block so an annotated shape is pickable through
/// its callout too.
pub fn hit_shape(p: &Point, shape: &Shape, tolerance: f64) -> bool {
    let hit = match &shape.kind {
        ShapeKind::Rect { start, end } => {
            hit_rect_outline(p, &Bounds::from_corners(*start, *end), tolerance)
        }
        ShapeKind::Ellipse { start, end } => {
            let b = Bounds::from_corners(*start, *end);
            hit_ellipse_ring(p, b.center(), b.width() / 2.0, b.height() / 2.0, tolerance)
        }
        ShapeKind::Line { start, end }
        | ShapeKind::Arrow { start, end }
        | ShapeKind::DoubleArrow { start, end } => hit_segment(p, start, end, tolerance),
        ShapeKind::Polyline { points } => hit_polyline(p, points, tolerance),
        ShapeKind::Stamp { at, size, .. } => p.distance_to(at) < size / 2.0 + tolerance,
        ShapeKind::LabeledRect {
            start, end, leader, ..
        } => {
            let b = Bounds::from_corners(*start, *end);
            let side = b.width().min(b.height());
            let square = Bounds::new(b.min_x, b.min_y, b.min_x + side, b.min_y + side);
            hit_rect_outline(p, &square, tolerance)
                || hit_segment(p, &leader.start, &leader.end, tolerance)
        }
    };
    if hit {
        return true;
    }
    if let Some(ann) = &shape.annotation {
        if hit_segment(p, &ann.leader.start, &ann.leader.end, tolerance) {
            return true;
        }
        if let Some(bounds) = metrics::annotation_text_bounds(ann) {
            if bounds.contains_with_padding(p, tolerance) {
                return true;
            }
        }
    }
    false
}
