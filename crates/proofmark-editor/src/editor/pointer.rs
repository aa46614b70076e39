//! Pointer entry points: raw events in, committed scene edits out.
//!
//! Exactly one gesture is in flight at a time (see [`Gesture`]); every
//! completed drag commits one history snapshot on pointer-up, never
//! during motion.

use super::gesture::{DragKind, Gesture, PointerInput, UiRequest};
use super::{Editor, Tool};
use crate::hit::AnnotationHit;
use crate::model::{aspect_fit, FontLabel, ImageElement, Shape, ShapeKind, Stroke, TextAlign};
use crate::transform;
use proofmark_core::constants::{
    ERASER_RADIUS_FACTOR, FONT_LABEL_PADDING, LABELED_RECT_LEADER_LENGTH, LABELED_RECT_OFFSET,
    MIN_AREA_SHAPE_SIZE, MIN_IMAGE_SIZE, MIN_LINE_SHAPE_SIZE, SELECTION_PADDING,
    SELECT_TOLERANCE,
};
use proofmark_core::{Bounds, Point};
use std::f64::consts::PI;
use tracing::trace;

/// Snaps a line endpoint to the nearest 45-degree ray from its start,
/// preserving the distance.
fn snap_line_endpoint(start: &Point, end: &Point) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);
    let snapped = (angle / (PI / 4.0)).round() * (PI / 4.0);
    Point::new(
        start.x + distance * snapped.cos(),
        start.y + distance * snapped.sin(),
    )
}

impl Editor {
    pub fn pointer_down(&mut self, input: PointerInput) -> Option<UiRequest> {
        let point = input.point();

        // The viewport collaborator owns panning.
        if self.tool() == Tool::Pan {
            return None;
        }

        // A leader that is following the pointer gets pinned by the next
        // press, wherever it lands.
        if let Gesture::LeaderFollow { shape_id, .. } = *self.gesture() {
            let anchor = self
                .scene()
                .shape(shape_id)
                .and_then(|s| s.kind.anchor_target())
                .map(|target| transform::leader_anchor(&target, &point));
            if let Some(leader_start) = anchor {
                self.set_gesture(Gesture::AwaitingAnnotationText {
                    shape_id,
                    leader_start,
                    leader_end: point,
                });
                self.touch();
                return Some(UiRequest::AnnotationText {
                    shape_id,
                    existing: None,
                });
            }
            self.set_gesture(Gesture::Idle);
            return None;
        }

        match self.tool() {
            Tool::Select => self.select_pointer_down(input, point),
            Tool::Text => {
                self.set_gesture(Gesture::AwaitingText {
                    pos: Some(point),
                    editing: None,
                });
                Some(UiRequest::TextEntry { existing: None })
            }
            Tool::Rect | Tool::Ellipse | Tool::Line | Tool::Arrow | Tool::DoubleArrow => {
                self.set_gesture(Gesture::DrawingShape {
                    start: point,
                    current: point,
                    annotated: false,
                });
                None
            }
            Tool::RectAnnotated | Tool::EllipseAnnotated | Tool::LineAnnotated => {
                self.set_gesture(Gesture::DrawingShape {
                    start: point,
                    current: point,
                    annotated: true,
                });
                None
            }
            Tool::LabeledRect => {
                self.set_gesture(Gesture::LabeledRectLeader {
                    leader_start: point,
                    current: point,
                });
                None
            }
            Tool::Polyline => {
                let double = self.register_click(input.timestamp_ms, point);
                match self.gesture_mut() {
                    Gesture::DrawingPolyline { vertices, .. } => {
                        if double && vertices.len() >= 2 {
                            self.finalize_polyline();
                        } else {
                            vertices.push(point);
                            self.touch();
                        }
                    }
                    _ => {
                        // A double-click over empty space starts a fresh
                        // polyline rather than finalizing anything.
                        self.set_gesture(Gesture::DrawingPolyline {
                            vertices: vec![point],
                            current: point,
                        });
                        self.touch();
                    }
                }
                None
            }
            Tool::Image => {
                if self.pending_image().is_some() {
                    self.set_gesture(Gesture::PlacingImage {
                        start: point,
                        current: point,
                    });
                    None
                } else {
                    Some(UiRequest::ImagePick)
                }
            }
            Tool::Stamp => {
                if let Some(kind) = self.stamp_kind() {
                    let shape = Shape::new(
                        ShapeKind::Stamp {
                            at: point,
                            kind,
                            size: kind.default_size(),
                        },
                        self.color(),
                        2.0,
                    );
                    let _ = self.add_shape(shape);
                }
                None
            }
            Tool::Pen | Tool::Marker => {
                self.set_gesture(Gesture::DrawingStroke {
                    points: vec![point],
                });
                None
            }
            Tool::Eraser => {
                let radius = self.stroke_width() * ERASER_RADIUS_FACTOR;
                let changed = self.scene_mut_internal().erase_at(&point, radius);
                self.set_gesture(Gesture::Erasing { changed });
                if changed {
                    self.touch();
                }
                None
            }
            Tool::Pan => None,
        }
    }

    /// Select-tool pointer-down: resolve what was pressed in priority
    /// order (font label, annotation, text, image, current selection
    /// bounds, shape) and either begin a drag or start a rubber band.
    fn select_pointer_down(&mut self, input: PointerInput, point: Point) -> Option<UiRequest> {
        let double = self.register_click(input.timestamp_ms, point);

        if double {
            if let Some(request) = self.try_open_editor_at(point) {
                return Some(request);
            }
        }

        // Font-label captions sit above everything else.
        let (scene, selection) = self.parts_mut();
        if let Some(shape_id) = selection.font_label_at(scene, &point, SELECT_TOLERANCE) {
            selection.set_font_label_shape(Some(shape_id));
            self.set_gesture(Gesture::DraggingSelection {
                kind: DragKind::FontLabel { shape_id },
                last: point,
            });
            self.touch();
            return None;
        }
        if selection.font_label_shape().is_some() {
            selection.set_font_label_shape(None);
        }

        // Annotation callouts: the leader-end handle starts a leader
        // drag, the text block an annotation drag.
        let (scene, selection) = self.parts_mut();
        if let Some((shape_id, hit)) = selection.annotation_at(scene, &point, SELECT_TOLERANCE) {
            selection.set_annotation_shape(Some(shape_id));
            let kind = match hit {
                AnnotationHit::LeaderEnd => DragKind::LeaderEnd { shape_id },
                AnnotationHit::Text => DragKind::Annotation { shape_id },
            };
            self.set_gesture(Gesture::DraggingSelection { kind, last: point });
            self.touch();
            return None;
        }

        let (scene, selection) = self.parts_mut();
        if selection.select_text_at(scene, &point, SELECT_TOLERANCE).is_some() {
            self.set_gesture(Gesture::DraggingSelection {
                kind: DragKind::Texts,
                last: point,
            });
            self.touch();
            return None;
        }

        let (scene, selection) = self.parts_mut();
        if selection.select_image_at(scene, &point, SELECT_TOLERANCE).is_some() {
            self.set_gesture(Gesture::DraggingSelection {
                kind: DragKind::Images,
                last: point,
            });
            self.touch();
            return None;
        }

        // Inside the existing selection's padded bounds: drag whatever
        // class is selected.
        let in_bounds = self
            .selection()
            .bounds()
            .map(|b| b.contains_with_padding(&point, SELECTION_PADDING))
            .unwrap_or(false);
        if in_bounds {
            let selection = self.selection();
            let kind = if !selection.image_ids().is_empty() {
                DragKind::Images
            } else if !selection.text_ids().is_empty() {
                DragKind::Texts
            } else if !selection.shape_ids().is_empty() {
                DragKind::Shapes
            } else {
                DragKind::Strokes
            };
            self.set_gesture(Gesture::DraggingSelection { kind, last: point });
            return None;
        }

        // A direct hit selects without starting a drag; the next press
        // inside the new bounds moves it.
        let (scene, selection) = self.parts_mut();
        if selection.select_shape_at(scene, &point, SELECT_TOLERANCE).is_some() {
            self.touch();
            return None;
        }

        // Empty space: sweep a rubber band.
        self.selection_mut_internal().clear();
        self.set_gesture(Gesture::RubberBand {
            start: point,
            current: point,
        });
        self.touch();
        None
    }

    /// Double-click editing: an existing text element or annotation
    /// reopens its entry dialog prefilled.
    fn try_open_editor_at(&mut self, point: Point) -> Option<UiRequest> {
        let (scene, selection) = self.parts_mut();
        if let Some(text_id) = selection.select_text_at(scene, &point, SELECT_TOLERANCE) {
            let existing = self.scene().text(text_id).cloned();
            self.set_gesture(Gesture::AwaitingText {
                pos: None,
                editing: Some(text_id),
            });
            return Some(UiRequest::TextEntry { existing });
        }

        let (scene, selection) = self.parts_mut();
        let annotation_hit = selection.annotation_at(scene, &point, SELECT_TOLERANCE);
        let shape_id = match annotation_hit {
            Some((id, AnnotationHit::Text)) => Some(id),
            _ => {
                let (scene, selection) = self.parts_mut();
                let picked = selection.select_shape_at(scene, &point, SELECT_TOLERANCE);
                picked.filter(|id| {
                    scene
                        .shape(*id)
                        .map(|s| s.annotation.is_some())
                        .unwrap_or(false)
                })
            }
        };
        if let Some(shape_id) = shape_id {
            if let Some(annotation) = self.scene().shape(shape_id).and_then(|s| s.annotation.clone()) {
                self.set_gesture(Gesture::AwaitingAnnotationText {
                    shape_id,
                    leader_start: annotation.leader.start,
                    leader_end: annotation.leader.end,
                });
                return Some(UiRequest::AnnotationText {
                    shape_id,
                    existing: Some(annotation),
                });
            }
        }
        None
    }

    pub fn pointer_move(&mut self, input: PointerInput) {
        let point = input.point();
        let shift = input.shift;
        let line_family = self.tool().is_line_family();

        match self.gesture_mut() {
            Gesture::DraggingSelection { kind, last } => {
                let dx = point.x - last.x;
                let dy = point.y - last.y;
                let kind = *kind;
                *last = point;
                trace!(?kind, dx, dy, "drag");
                let (scene, selection) = self.parts_mut();
                match kind {
                    DragKind::Strokes => {
                        transform::move_selected_strokes(scene, selection, dx, dy)
                    }
                    DragKind::Shapes => transform::move_selected_shapes(scene, selection, dx, dy),
                    DragKind::Texts => transform::move_selected_texts(scene, selection, dx, dy),
                    DragKind::Images => transform::move_selected_images(scene, selection, dx, dy),
                    DragKind::Annotation { shape_id } => {
                        transform::move_annotation_only(scene, shape_id, dx, dy)
                    }
                    DragKind::LeaderEnd { shape_id } => {
                        transform::move_leader_end(scene, shape_id, dx, dy)
                    }
                    DragKind::FontLabel { shape_id } => {
                        transform::move_font_label(scene, shape_id, dx, dy)
                    }
                }
                self.touch();
            }
            Gesture::RubberBand { current, .. } => {
                *current = point;
                self.touch();
            }
            Gesture::DrawingShape { start, current, .. } => {
                *current = if shift && line_family {
                    snap_line_endpoint(start, &point)
                } else {
                    point
                };
                self.touch();
            }
            Gesture::LabeledRectLeader {
                leader_start,
                current,
            } => {
                let leader_start = *leader_start;
                *current = point;
                let dist = point.distance_to(&leader_start);
                // Below the threshold the leader just previews; past it
                // the leader end is pinned at exactly 30 units along the
                // pointer direction and the square phase begins, its
                // start corner a further 5 units out.
                if dist >= LABELED_RECT_LEADER_LENGTH {
                    let ux = (point.x - leader_start.x) / dist;
                    let uy = (point.y - leader_start.y) / dist;
                    let leader_end = Point::new(
                        leader_start.x + ux * LABELED_RECT_LEADER_LENGTH,
                        leader_start.y + uy * LABELED_RECT_LEADER_LENGTH,
                    );
                    let rect_start = Point::new(
                        leader_end.x + ux * LABELED_RECT_OFFSET,
                        leader_end.y + uy * LABELED_RECT_OFFSET,
                    );
                    self.set_gesture(Gesture::LabeledRectSquare {
                        leader_start,
                        leader_end,
                        rect_start,
                        current: point,
                    });
                }
                self.touch();
            }
            Gesture::LabeledRectSquare { current, .. } => {
                *current = point;
                self.touch();
            }
            Gesture::LeaderFollow {
                shape_id,
                leader_end,
                ..
            } => {
                let shape_id = *shape_id;
                *leader_end = point;
                let anchor = self
                    .scene()
                    .shape(shape_id)
                    .and_then(|s| s.kind.anchor_target())
                    .map(|target| transform::leader_anchor(&target, &point));
                if let (Gesture::LeaderFollow { leader_start, .. }, Some(anchor)) =
                    (self.gesture_mut(), anchor)
                {
                    *leader_start = anchor;
                }
                self.touch();
            }
            Gesture::DrawingPolyline { current, .. } => {
                *current = point;
                self.touch();
            }
            Gesture::PlacingImage { current, .. } => {
                *current = point;
                self.touch();
            }
            Gesture::DrawingStroke { points } => {
                points.push(point);
                self.touch();
            }
            Gesture::Erasing { changed } => {
                let already = *changed;
                let radius = self.stroke_width() * ERASER_RADIUS_FACTOR;
                let erased = self.scene_mut_internal().erase_at(&point, radius);
                if let Gesture::Erasing { changed } = self.gesture_mut() {
                    *changed = already || erased;
                }
                if erased {
                    self.touch();
                }
            }
            Gesture::Idle
            | Gesture::AwaitingAnnotationText { .. }
            | Gesture::AwaitingLabel { .. }
            | Gesture::AwaitingText { .. } => {}
        }
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> Option<UiRequest> {
        let point = input.point();

        match std::mem::replace(self.gesture_mut(), Gesture::Idle) {
            Gesture::RubberBand { start, .. } => {
                let rect = Bounds::from_corners(start, point);
                let (scene, selection) = self.parts_mut();
                if rect.width() > MIN_AREA_SHAPE_SIZE && rect.height() > MIN_AREA_SHAPE_SIZE {
                    selection.select_strokes_in_rect(scene, &rect);
                    selection.select_shapes_in_rect(scene, &rect);
                } else {
                    // A tiny sweep is a click: shape first, then stroke.
                    if selection.select_shape_at(scene, &point, SELECT_TOLERANCE).is_none() {
                        selection.select_stroke_at(scene, &point, SELECT_TOLERANCE);
                    }
                }
                self.touch();
                None
            }
            Gesture::DraggingSelection { .. } => {
                // One snapshot per completed drag.
                self.save_to_history();
                self.touch();
                None
            }
            Gesture::LabeledRectLeader { .. } => {
                // Released before the leader reached full length: cancel.
                self.touch();
                None
            }
            Gesture::LabeledRectSquare {
                leader_start,
                leader_end,
                rect_start,
                current,
            } => {
                let w = (current.x - rect_start.x).abs();
                let h = (current.y - rect_start.y).abs();
                if w > MIN_AREA_SHAPE_SIZE && h > MIN_AREA_SHAPE_SIZE {
                    let min_x = rect_start.x.min(current.x);
                    let min_y = rect_start.y.min(current.y);
                    let side = w.min(h);
                    self.set_gesture(Gesture::AwaitingLabel {
                        leader: crate::model::LeaderLine::new(leader_start, leader_end),
                        rect: Bounds::new(min_x, min_y, min_x + side, min_y + side),
                    });
                    self.touch();
                    return Some(UiRequest::LabelChar);
                }
                self.touch();
                None
            }
            Gesture::PlacingImage { start, .. } => {
                let Some(pixels) = self.take_pending_image() else {
                    return None;
                };
                let (w, h) = aspect_fit(
                    pixels.width() as f64,
                    pixels.height() as f64,
                    point.x - start.x,
                    point.y - start.y,
                );
                if w.abs() > MIN_IMAGE_SIZE && h.abs() > MIN_IMAGE_SIZE {
                    let end = Point::new(start.x + w, start.y + h);
                    let _ = self.add_image(ImageElement::new(start, end, pixels));
                }
                self.touch();
                None
            }
            Gesture::DrawingShape {
                start,
                current,
                annotated,
            } => self.finish_shape(start, current, annotated, input),
            Gesture::DrawingStroke { points } => {
                if points.len() > 1 {
                    let stroke = match self.tool() {
                        Tool::Marker => Stroke::marker(points, self.color(), self.stroke_width()),
                        _ => Stroke::new(points, self.color(), self.stroke_width()),
                    };
                    let _ = self.add_stroke(stroke);
                }
                self.touch();
                None
            }
            Gesture::Erasing { changed } => {
                if changed {
                    self.save_to_history();
                }
                self.touch();
                None
            }
            // Multi-press gestures survive pointer-up untouched.
            other @ (Gesture::DrawingPolyline { .. }
            | Gesture::LeaderFollow { .. }
            | Gesture::AwaitingAnnotationText { .. }
            | Gesture::AwaitingLabel { .. }
            | Gesture::AwaitingText { .. }) => {
                self.set_gesture(other);
                None
            }
            Gesture::Idle => None,
        }
    }

    /// Commits a rubber-banded shape if it clears the minimum size, and
    /// for the annotated family hands off to the leader-follow phase.
    fn finish_shape(
        &mut self,
        start: Point,
        current: Point,
        annotated: bool,
        input: PointerInput,
    ) -> Option<UiRequest> {
        let tool = self.tool();
        let end = if input.shift && tool.is_line_family() {
            snap_line_endpoint(&start, &current)
        } else {
            current
        };
        let w = (end.x - start.x).abs();
        let h = (end.y - start.y).abs();
        let valid = if tool.is_line_family() {
            w > MIN_LINE_SHAPE_SIZE || h > MIN_LINE_SHAPE_SIZE
        } else {
            w > MIN_AREA_SHAPE_SIZE && h > MIN_AREA_SHAPE_SIZE
        };
        if !valid {
            self.touch();
            return None;
        }

        let kind = match tool {
            Tool::Rect | Tool::RectAnnotated => ShapeKind::Rect { start, end },
            Tool::Ellipse | Tool::EllipseAnnotated => ShapeKind::Ellipse { start, end },
            Tool::Line | Tool::LineAnnotated => ShapeKind::Line { start, end },
            Tool::Arrow => ShapeKind::Arrow { start, end },
            Tool::DoubleArrow => ShapeKind::DoubleArrow { start, end },
            _ => return None,
        };
        let mut shape = Shape::new(kind, self.color(), self.stroke_width());

        // A rect drawn with a font preset carries the font name as a
        // caption, placed just outside the drag-end corner.
        if tool == Tool::Rect {
            if let Some(font_name) = self.font_preset().map(str::to_owned) {
                let (align, text_x) = if end.x > start.x {
                    (TextAlign::Left, end.x + FONT_LABEL_PADDING)
                } else {
                    (TextAlign::Right, end.x - FONT_LABEL_PADDING)
                };
                let text_y = if end.y > start.y {
                    end.y + FONT_LABEL_PADDING
                } else {
                    end.y - FONT_LABEL_PADDING
                };
                shape.font_label = Some(FontLabel {
                    font_name,
                    text_x,
                    text_y,
                    align,
                });
            }
        }

        let added = self.add_shape(shape);
        if let (Ok(shape_id), true) = (added, annotated) {
            // Enter leader-follow: the callout's leader tracks the
            // pointer until the next press pins it.
            let anchor = self
                .scene()
                .shape(shape_id)
                .and_then(|s| s.kind.anchor_target())
                .map(|target| transform::leader_anchor(&target, &point_of(input)));
            if let Some(leader_start) = anchor {
                self.set_gesture(Gesture::LeaderFollow {
                    shape_id,
                    leader_start,
                    leader_end: point_of(input),
                });
            }
        }
        self.touch();
        None
    }
}

fn point_of(input: PointerInput) -> Point {
    Point::new(input.x, input.y)
}
