//! Translation of selected entities and leader-line re-anchoring.
//!
//! None of these operations snapshot history; callers commit once per
//! completed gesture. Ids that no longer resolve are filtered silently.

use crate::model::{metrics, AnchorTarget, Annotation};
use crate::scene::Scene;
use crate::selection::Selection;
use proofmark_core::constants::LEADER_TEXT_MARGIN;
use proofmark_core::{Color, EntityId, Point};
use smallvec::SmallVec;

/// The shape-boundary point a leader line should start from when aiming
/// at `toward`: nearest rect edge midpoint, angle-projected ellipse
/// perimeter point, or the fixed line midpoint.
pub fn leader_anchor(target: &AnchorTarget, toward: &Point) -> Point {
    match target {
        AnchorTarget::Rect(bounds) => {
            let center = bounds.center();
            let candidates: SmallVec<[Point; 4]> = SmallVec::from_buf([
                Point::new(center.x, bounds.min_y),
                Point::new(center.x, bounds.max_y),
                Point::new(bounds.min_x, center.y),
                Point::new(bounds.max_x, center.y),
            ]);
            nearest(&candidates, toward)
        }
        AnchorTarget::Ellipse { center, rx, ry } => {
            let angle = (toward.y - center.y).atan2(toward.x - center.x);
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        }
        AnchorTarget::Line { start, end } => {
            Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0)
        }
    }
}

/// The text-box side midpoint (with a small margin) nearest to `from` —
/// where the leader line should end against the annotation's text block.
pub fn leader_end_near_text(annotation: &Annotation, from: &Point) -> Point {
    let Some(bounds) = metrics::annotation_text_bounds(annotation) else {
        return Point::new(annotation.x, annotation.y);
    };
    let center = bounds.center();
    let candidates: SmallVec<[Point; 4]> = SmallVec::from_buf([
        Point::new(center.x, bounds.min_y - LEADER_TEXT_MARGIN),
        Point::new(center.x, bounds.max_y + LEADER_TEXT_MARGIN),
        Point::new(bounds.min_x - LEADER_TEXT_MARGIN, center.y),
        Point::new(bounds.max_x + LEADER_TEXT_MARGIN, center.y),
    ]);
    nearest(&candidates, from)
}

fn nearest(candidates: &[Point], to: &Point) -> Point {
    let mut best = candidates[0];
    let mut best_dist = f64::INFINITY;
    for p in candidates {
        let dist = to.distance_to(p);
        if dist < best_dist {
            best_dist = dist;
            best = *p;
        }
    }
    best
}

// ---- whole-selection moves ----

pub fn move_selected_strokes(scene: &mut Scene, selection: &mut Selection, dx: f64, dy: f64) {
    for id in selection.stroke_ids.clone() {
        if let Some(stroke) = scene.stroke_mut(id) {
            stroke.translate(dx, dy);
        }
    }
    selection.recompute_bounds(scene);
}

/// Moves selected shapes as wholes: geometry, leader line, and annotation
/// text travel together.
pub fn move_selected_shapes(scene: &mut Scene, selection: &mut Selection, dx: f64, dy: f64) {
    for id in selection.shape_ids.clone() {
        if let Some(shape) = scene.shape_mut(id) {
            shape.translate(dx, dy);
        }
    }
    selection.recompute_bounds(scene);
}

pub fn move_selected_texts(scene: &mut Scene, selection: &mut Selection, dx: f64, dy: f64) {
    for id in selection.text_ids.clone() {
        if let Some(text) = scene.text_mut(id) {
            text.translate(dx, dy);
        }
    }
    selection.recompute_bounds(scene);
}

pub fn move_selected_images(scene: &mut Scene, selection: &mut Selection, dx: f64, dy: f64) {
    for id in selection.image_ids.clone() {
        if let Some(image) = scene.image_mut(id) {
            image.translate(dx, dy);
        }
    }
    selection.recompute_bounds(scene);
}

// ---- annotation-only transforms ----

/// Moves a shape's annotation while the shape stays put.
///
/// The leader is re-derived rather than translated: a provisional end
/// (old end + delta) picks a boundary anchor, the anchor picks the
/// text-box side the leader should end on, and the refined end picks the
/// anchor once more so both stay mutually consistent as the text box
/// moves around the shape. Alignment follows the leader direction.
pub fn move_annotation_only(scene: &mut Scene, shape_id: EntityId, dx: f64, dy: f64) {
    let Some(shape) = scene.shape_mut(shape_id) else {
        return;
    };
    let Some(target) = shape.kind.anchor_target() else {
        return;
    };
    let Some(annotation) = shape.annotation.as_mut() else {
        return;
    };

    annotation.x += dx;
    annotation.y += dy;

    let provisional_end = annotation.leader.end.translated(dx, dy);
    let start = leader_anchor(&target, &provisional_end);
    let end = leader_end_near_text(annotation, &start);
    let start = leader_anchor(&target, &end);

    annotation.align = Annotation::align_for(&start, &end);
    annotation.leader.start = start;
    annotation.leader.end = end;
}

/// Drags only the leader end. The text block follows by the same delta
/// (its offset from the end is preserved) and the boundary anchor is
/// recomputed toward the new end.
pub fn move_leader_end(scene: &mut Scene, shape_id: EntityId, dx: f64, dy: f64) {
    let Some(shape) = scene.shape_mut(shape_id) else {
        return;
    };
    let Some(target) = shape.kind.anchor_target() else {
        return;
    };
    let Some(annotation) = shape.annotation.as_mut() else {
        return;
    };

    let end = annotation.leader.end.translated(dx, dy);
    let start = leader_anchor(&target, &end);
    let text_offset_x = annotation.x - annotation.leader.end.x;
    let text_offset_y = annotation.y - annotation.leader.end.y;

    annotation.x = end.x + text_offset_x;
    annotation.y = end.y + text_offset_y;
    annotation.align = Annotation::align_for(&start, &end);
    annotation.leader.start = start;
    annotation.leader.end = end;
}

/// Drags only a rect's font-designation caption.
pub fn move_font_label(scene: &mut Scene, shape_id: EntityId, dx: f64, dy: f64) {
    if let Some(label) = scene
        .shape_mut(shape_id)
        .and_then(|s| s.font_label.as_mut())
    {
        label.text_x += dx;
        label.text_y += dy;
    }
}

// ---- selection-wide edits ----

/// Recolors everything selected; an annotated shape recolors its callout
/// too, and an annotation-only selection recolors its owning shape.
pub fn update_selected_color(scene: &mut Scene, selection: &Selection, color: Color) -> bool {
    let mut changed = false;
    for id in &selection.stroke_ids {
        if let Some(stroke) = scene.stroke_mut(*id) {
            stroke.color = color;
            changed = true;
        }
    }
    let shape_targets = selection
        .shape_ids
        .iter()
        .copied()
        .chain(selection.annotation_shape);
    for id in shape_targets {
        if let Some(shape) = scene.shape_mut(id) {
            shape.color = color;
            if let Some(ann) = shape.annotation.as_mut() {
                ann.color = color;
            }
            changed = true;
        }
    }
    for id in &selection.text_ids {
        if let Some(text) = scene.text_mut(*id) {
            text.color = color;
            changed = true;
        }
    }
    changed
}

/// Removes every selected entity and clears the selection. Returns
/// whether anything was deleted.
pub fn delete_selected(scene: &mut Scene, selection: &mut Selection) -> bool {
    let removed = scene.remove_entities(
        &selection.stroke_ids,
        &selection.shape_ids,
        &selection.text_ids,
        &selection.image_ids,
    );
    selection.clear();
    removed
}
