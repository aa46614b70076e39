//! The editor: one owned state container wiring scene, history,
//! selection, and the gesture machine behind an explicit mutation API.
//!
//! All scene mutation flows through here synchronously. Readers (the
//! renderer) watch `revision()` to learn when a repaint is due.

pub mod gesture;
mod pointer;

use crate::history::History;
use crate::model::{
    Annotation, ImageElement, LeaderLine, Shape, ShapeKind, StampKind, Stroke, TextElement,
};
use crate::scene::Scene;
use crate::selection::Selection;
use crate::transform;
use gesture::{Gesture, UiRequest};
use image::RgbaImage;
use proofmark_core::constants::{
    DEFAULT_STROKE_WIDTH, IMAGE_CENTER_MAX_HEIGHT, IMAGE_CENTER_MAX_WIDTH,
};
use proofmark_core::{Color, EntityId, Point, Result};
use std::sync::Arc;
use tracing::debug;

/// The active tool. Pan is listed for completeness; its scrolling lives in
/// the viewport collaborator, so the gesture machine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Pen,
    Marker,
    Eraser,
    Rect,
    Ellipse,
    Line,
    Arrow,
    DoubleArrow,
    RectAnnotated,
    EllipseAnnotated,
    LineAnnotated,
    Polyline,
    Text,
    Image,
    Stamp,
    LabeledRect,
    Pan,
}

impl Tool {
    /// Line-family tools share the endpoint snap and the looser minimum
    /// size rule.
    pub fn is_line_family(&self) -> bool {
        matches!(
            self,
            Tool::Line | Tool::Arrow | Tool::DoubleArrow | Tool::LineAnnotated
        )
    }

    pub fn is_annotated(&self) -> bool {
        matches!(
            self,
            Tool::RectAnnotated | Tool::EllipseAnnotated | Tool::LineAnnotated
        )
    }
}

pub struct Editor {
    scene: Scene,
    history: History,
    selection: Selection,
    tool: Tool,
    color: Color,
    stroke_width: f64,
    stamp_kind: Option<StampKind>,
    font_preset: Option<String>,
    pending_image: Option<Arc<RgbaImage>>,
    gesture: Gesture,
    last_click: Option<(f64, Point)>,
    revision: u64,
}

impl Editor {
    pub fn new(scene: Scene) -> Self {
        let history = History::new(&scene);
        Self {
            scene,
            history,
            selection: Selection::new(),
            tool: Tool::Pen,
            color: Color::BLACK,
            stroke_width: DEFAULT_STROKE_WIDTH,
            stamp_kind: None,
            font_preset: None,
            pending_image: None,
            gesture: Gesture::Idle,
            last_click: None,
            revision: 0,
        }
    }

    // ---- read access ----

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn stamp_kind(&self) -> Option<StampKind> {
        self.stamp_kind
    }

    pub fn font_preset(&self) -> Option<&str> {
        self.font_preset.as_deref()
    }

    pub fn pending_image(&self) -> Option<&Arc<RgbaImage>> {
        self.pending_image.as_ref()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Monotonic change counter; bumps on every mutation. The renderer
    /// repaints when it observes a new value.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }

    // ---- tool settings ----

    /// Switches tools. Any in-flight construction is abandoned and the
    /// selection is dropped, so no partial entity survives the switch.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.touch();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.touch();
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width;
        self.touch();
    }

    pub fn set_stamp_kind(&mut self, kind: Option<StampKind>) {
        self.stamp_kind = kind;
    }

    /// Selects the font preset that rect tools attach as a caption, or
    /// `None` to draw plain rects.
    pub fn set_font_preset(&mut self, name: Option<String>) {
        self.font_preset = name;
    }

    /// Escape: resets any in-progress construction without committing.
    /// Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if !self.gesture.is_idle() {
            debug!("gesture cancelled");
            self.gesture = Gesture::Idle;
            self.touch();
        }
    }

    // ---- history ----

    pub fn undo(&mut self) {
        if self.history.undo(&mut self.scene) {
            self.selection.prune(&self.scene);
            self.touch();
        }
    }

    pub fn redo(&mut self) {
        if self.history.redo(&mut self.scene) {
            self.selection.prune(&self.scene);
            self.touch();
        }
    }

    pub fn save_to_history(&mut self) {
        self.history.snapshot(&self.scene);
    }

    pub fn clear_history(&mut self) {
        self.history.clear(&self.scene);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    // ---- entity CRUD (each commits exactly one snapshot) ----

    pub fn add_stroke(&mut self, stroke: Stroke) -> Result<EntityId> {
        let id = self.scene.add_stroke(stroke)?;
        self.save_to_history();
        self.touch();
        Ok(id)
    }

    pub fn add_shape(&mut self, shape: Shape) -> Result<EntityId> {
        let id = self.scene.add_shape(shape)?;
        self.save_to_history();
        self.touch();
        Ok(id)
    }

    pub fn add_text(&mut self, text: TextElement) -> Result<EntityId> {
        let id = self.scene.add_text(text)?;
        self.save_to_history();
        self.touch();
        Ok(id)
    }

    pub fn add_image(&mut self, image: ImageElement) -> Result<EntityId> {
        let id = self.scene.add_image(image)?;
        self.save_to_history();
        self.touch();
        Ok(id)
    }

    pub fn update_text(
        &mut self,
        id: EntityId,
        text: String,
        vertical: bool,
        font_size: f64,
    ) -> bool {
        let Some(element) = self.scene.text_mut(id) else {
            return false;
        };
        element.text = text;
        element.vertical = vertical;
        element.font_size = font_size;
        self.save_to_history();
        self.touch();
        true
    }

    pub fn update_shape_annotation(&mut self, id: EntityId, annotation: Annotation) -> bool {
        if self.scene.set_shape_annotation(id, annotation) {
            self.save_to_history();
            self.touch();
            true
        } else {
            false
        }
    }

    /// Deletes everything selected in one undoable step.
    pub fn delete_selected(&mut self) {
        if transform::delete_selected(&mut self.scene, &mut self.selection) {
            self.save_to_history();
            self.touch();
        }
    }

    /// Recolors the selection (and makes the color current).
    pub fn update_selected_color(&mut self, color: Color) {
        if transform::update_selected_color(&mut self.scene, &self.selection, color) {
            self.color = color;
            self.save_to_history();
            self.touch();
        }
    }

    // ---- selection queries & setters ----

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.touch();
    }

    pub fn set_selected_stroke_ids(&mut self, ids: Vec<EntityId>) {
        self.selection.set_stroke_ids(&self.scene, ids);
        self.touch();
    }

    pub fn set_selected_shape_ids(&mut self, ids: Vec<EntityId>) {
        self.selection.set_shape_ids(&self.scene, ids);
        self.touch();
    }

    pub fn set_selected_text_ids(&mut self, ids: Vec<EntityId>) {
        self.selection.set_text_ids(&self.scene, ids);
        self.touch();
    }

    pub fn set_selected_image_ids(&mut self, ids: Vec<EntityId>) {
        self.selection.set_image_ids(&self.scene, ids);
        self.touch();
    }

    pub fn set_selected_annotation_shape(&mut self, id: Option<EntityId>) {
        self.selection.set_annotation_shape(id);
        self.touch();
    }

    pub fn select_stroke_at_point(&mut self, point: Point, tolerance: f64) -> Option<EntityId> {
        let found = self.selection.select_stroke_at(&self.scene, &point, tolerance);
        self.touch();
        found
    }

    pub fn select_shape_at_point(&mut self, point: Point, tolerance: f64) -> Option<EntityId> {
        let found = self.selection.select_shape_at(&self.scene, &point, tolerance);
        self.touch();
        found
    }

    pub fn select_text_at_point(&mut self, point: Point, tolerance: f64) -> Option<EntityId> {
        let found = self.selection.select_text_at(&self.scene, &point, tolerance);
        self.touch();
        found
    }

    pub fn select_image_at_point(&mut self, point: Point, tolerance: f64) -> Option<EntityId> {
        let found = self.selection.select_image_at(&self.scene, &point, tolerance);
        self.touch();
        found
    }

    pub fn select_strokes_in_rect(&mut self, rect: proofmark_core::Bounds) {
        self.selection.select_strokes_in_rect(&self.scene, &rect);
        self.touch();
    }

    pub fn select_shapes_in_rect(&mut self, rect: proofmark_core::Bounds) {
        self.selection.select_shapes_in_rect(&self.scene, &rect);
        self.touch();
    }

    pub fn select_images_in_rect(&mut self, rect: proofmark_core::Bounds) {
        self.selection.select_images_in_rect(&self.scene, &rect);
        self.touch();
    }

    // ---- transform actions ----
    //
    // These translate live geometry without snapshotting; callers commit
    // one snapshot per completed gesture (the pointer handlers do this on
    // pointer-up, programmatic callers via `save_to_history`).

    pub fn move_selected_strokes(&mut self, dx: f64, dy: f64) {
        let (scene, selection) = self.parts_mut();
        transform::move_selected_strokes(scene, selection, dx, dy);
        self.touch();
    }

    pub fn move_selected_shapes(&mut self, dx: f64, dy: f64) {
        let (scene, selection) = self.parts_mut();
        transform::move_selected_shapes(scene, selection, dx, dy);
        self.touch();
    }

    pub fn move_selected_texts(&mut self, dx: f64, dy: f64) {
        let (scene, selection) = self.parts_mut();
        transform::move_selected_texts(scene, selection, dx, dy);
        self.touch();
    }

    pub fn move_selected_images(&mut self, dx: f64, dy: f64) {
        let (scene, selection) = self.parts_mut();
        transform::move_selected_images(scene, selection, dx, dy);
        self.touch();
    }

    /// Moves a shape's callout while the shape stays put.
    pub fn move_annotation_only(&mut self, shape_id: EntityId, dx: f64, dy: f64) {
        transform::move_annotation_only(&mut self.scene, shape_id, dx, dy);
        self.touch();
    }

    /// Drags a callout's leader-end handle.
    pub fn move_leader_end(&mut self, shape_id: EntityId, dx: f64, dy: f64) {
        transform::move_leader_end(&mut self.scene, shape_id, dx, dy);
        self.touch();
    }

    /// Drags a rect's font-designation caption.
    pub fn move_font_label(&mut self, shape_id: EntityId, dx: f64, dy: f64) {
        transform::move_font_label(&mut self.scene, shape_id, dx, dy);
        self.touch();
    }

    // ---- layer & page management ----

    pub fn add_layer(&mut self) -> proofmark_core::LayerId {
        let id = self.scene.add_layer();
        self.save_to_history();
        self.touch();
        id
    }

    pub fn remove_layer(&mut self, id: proofmark_core::LayerId) {
        if self.scene.remove_layer(id) {
            self.selection.prune(&self.scene);
            self.save_to_history();
            self.touch();
        }
    }

    pub fn set_layer_visible(&mut self, id: proofmark_core::LayerId, visible: bool) {
        if self.scene.set_layer_visible(id, visible) {
            self.touch();
        }
    }

    pub fn set_layer_opacity(&mut self, id: proofmark_core::LayerId, opacity: f64) {
        if self.scene.set_layer_opacity(id, opacity) {
            self.touch();
        }
    }

    pub fn set_current_layer(&mut self, id: proofmark_core::LayerId) {
        self.scene.set_current_layer(id);
    }

    pub fn set_current_page(&mut self, index: usize) {
        if self.scene.set_current_page(index) {
            self.selection.clear();
            self.gesture = Gesture::Idle;
            self.touch();
        }
    }

    pub fn delete_current_page(&mut self) {
        if self.scene.delete_current_page() {
            self.selection.clear();
            self.save_to_history();
            self.touch();
        }
    }

    pub fn set_page_background(&mut self, index: usize, pixels: Arc<RgbaImage>) -> Result<()> {
        self.scene.set_page_background(index, pixels)?;
        self.touch();
        Ok(())
    }

    pub fn clear_drawings(&mut self) {
        self.scene.clear_drawings();
        self.selection.clear();
        self.save_to_history();
        self.touch();
    }

    // ---- annotation/label/text entry completions ----

    /// Completes annotation text entry. Attaches the callout to the
    /// pending shape and returns to idle; empty text is the
    /// collaborator's concern, not validated here.
    pub fn submit_annotation_text(&mut self, text: String, vertical: bool, font_size: f64) {
        let Gesture::AwaitingAnnotationText {
            shape_id,
            leader_start,
            leader_end,
        } = self.gesture
        else {
            return;
        };
        let annotation = Annotation {
            text,
            x: leader_end.x,
            y: leader_end.y,
            color: self.color,
            font_size,
            vertical,
            align: Annotation::align_for(&leader_start, &leader_end),
            leader: LeaderLine::new(leader_start, leader_end),
        };
        self.gesture = Gesture::Idle;
        self.update_shape_annotation(shape_id, annotation);
    }

    /// Abandons annotation entry. The base shape stays, unannotated.
    pub fn cancel_annotation_entry(&mut self) {
        if matches!(
            self.gesture,
            Gesture::AwaitingAnnotationText { .. } | Gesture::LeaderFollow { .. }
        ) {
            self.gesture = Gesture::Idle;
            self.touch();
        }
    }

    /// Completes the labeled-rect gesture with its one-character label.
    pub fn submit_label(&mut self, label: char) {
        let Gesture::AwaitingLabel { leader, rect } = self.gesture else {
            return;
        };
        self.gesture = Gesture::Idle;
        let shape = Shape::new(
            ShapeKind::LabeledRect {
                start: Point::new(rect.min_x, rect.min_y),
                end: Point::new(rect.max_x, rect.max_y),
                label,
                leader,
            },
            self.color,
            self.stroke_width,
        );
        let _ = self.add_shape(shape);
    }

    /// Abandons the labeled-rect gesture; nothing is committed.
    pub fn cancel_label_entry(&mut self) {
        if matches!(self.gesture, Gesture::AwaitingLabel { .. }) {
            self.gesture = Gesture::Idle;
            self.touch();
        }
    }

    /// Completes free-text entry: updates the element being edited or
    /// creates a new one at the requested position.
    pub fn submit_text(&mut self, text: String, vertical: bool, font_size: f64) {
        let Gesture::AwaitingText { pos, editing } = self.gesture else {
            return;
        };
        self.gesture = Gesture::Idle;
        match (editing, pos) {
            (Some(id), _) => {
                self.update_text(id, text, vertical, font_size);
            }
            (None, Some(pos)) => {
                let element =
                    TextElement::new(text, pos.x, pos.y, self.color, font_size, vertical);
                let _ = self.add_text(element);
            }
            (None, None) => {}
        }
    }

    pub fn cancel_text_entry(&mut self) {
        if matches!(self.gesture, Gesture::AwaitingText { .. }) {
            self.gesture = Gesture::Idle;
            self.touch();
        }
    }

    // ---- polyline extras ----

    /// Commits the in-progress polyline (if it has at least two
    /// vertices), closing it by repeating the first vertex.
    pub fn finalize_polyline(&mut self) {
        let Gesture::DrawingPolyline { vertices, .. } = &self.gesture else {
            return;
        };
        if vertices.len() < 2 {
            self.cancel_polyline();
            return;
        }
        let mut points = vertices.clone();
        points.push(points[0]);
        self.gesture = Gesture::Idle;
        let shape = Shape::new(ShapeKind::Polyline { points }, self.color, self.stroke_width);
        let _ = self.add_shape(shape);
    }

    /// Abandons the in-progress polyline.
    pub fn cancel_polyline(&mut self) {
        if matches!(self.gesture, Gesture::DrawingPolyline { .. }) {
            self.gesture = Gesture::Idle;
            self.touch();
        }
    }

    /// Drops the newest vertex; with one vertex left the polyline is
    /// cancelled outright.
    pub fn undo_last_vertex(&mut self) {
        let Gesture::DrawingPolyline { vertices, .. } = &mut self.gesture else {
            return;
        };
        if vertices.len() > 1 {
            vertices.pop();
            self.touch();
        } else {
            self.cancel_polyline();
        }
    }

    // ---- image placement ----

    /// Hands the editor a decoded image for the image tool to place.
    pub fn provide_image(&mut self, pixels: Arc<RgbaImage>) {
        self.pending_image = Some(pixels);
        self.touch();
    }

    pub fn cancel_image_input(&mut self) {
        self.pending_image = None;
        if matches!(self.gesture, Gesture::PlacingImage { .. }) {
            self.gesture = Gesture::Idle;
        }
        self.touch();
    }

    /// Places the pending image centered on the current page at a capped
    /// size, then switches to the select tool.
    pub fn place_image_at_center(&mut self) {
        let Some(pixels) = self.pending_image.take() else {
            return;
        };
        let (nat_w, nat_h) = (pixels.width() as f64, pixels.height() as f64);
        if nat_w <= 0.0 || nat_h <= 0.0 {
            return;
        }
        let mut width = IMAGE_CENTER_MAX_WIDTH.min(nat_w);
        let mut height = nat_h / nat_w * width;
        if height > IMAGE_CENTER_MAX_HEIGHT {
            height = IMAGE_CENTER_MAX_HEIGHT;
            width = nat_w / nat_h * height;
        }
        let page = self.scene.current_page();
        let start = Point::new((page.width - width) / 2.0, (page.height - height) / 2.0);
        let end = Point::new(start.x + width, start.y + height);
        let _ = self.add_image(ImageElement::new(start, end, pixels));
        self.set_tool(Tool::Select);
    }

    // ---- internals shared with the pointer handlers ----

    pub(crate) fn scene_mut_internal(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub(crate) fn selection_mut_internal(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Scene, &mut Selection) {
        (&mut self.scene, &mut self.selection)
    }

    pub(crate) fn set_gesture(&mut self, gesture: Gesture) {
        self.gesture = gesture;
    }

    pub(crate) fn gesture_mut(&mut self) -> &mut Gesture {
        &mut self.gesture
    }

    /// Double-click bookkeeping: true when this click lands within the
    /// 300 ms / 10 unit window of the previous one.
    pub(crate) fn register_click(&mut self, timestamp_ms: f64, point: Point) -> bool {
        let double = self
            .last_click
            .map(|(at, pos)| {
                timestamp_ms - at < proofmark_core::constants::DOUBLE_CLICK_MS
                    && point.distance_to(&pos)
                        < proofmark_core::constants::DOUBLE_CLICK_DISTANCE
            })
            .unwrap_or(false);
        self.last_click = Some((timestamp_ms, point));
        double
    }

    pub(crate) fn take_pending_image(&mut self) -> Option<Arc<RgbaImage>> {
        self.pending_image.take()
    }
}

pub use gesture::{DragKind, PointerInput};
