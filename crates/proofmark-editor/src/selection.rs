//! Selection state and point/rect selection operations.
//!
//! Selection sets are mutually exclusive across entity categories, with
//! two special single-shape selections: "annotation only" (the callout of
//! a shape, not the shape) and "font label only" (a rect's caption).
//! `bounds` is recomputed whenever the selection changes, never edited in
//! place.

use crate::hit::{self, AnnotationHit};
use crate::model::metrics;
use crate::scene::Scene;
use proofmark_core::{Bounds, EntityId, Point};

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub(crate) stroke_ids: Vec<EntityId>,
    pub(crate) shape_ids: Vec<EntityId>,
    pub(crate) text_ids: Vec<EntityId>,
    pub(crate) image_ids: Vec<EntityId>,
    pub(crate) annotation_shape: Option<EntityId>,
    pub(crate) font_label_shape: Option<EntityId>,
    pub(crate) bounds: Option<Bounds>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stroke_ids(&self) -> &[EntityId] {
        &self.stroke_ids
    }

    pub fn shape_ids(&self) -> &[EntityId] {
        &self.shape_ids
    }

    pub fn text_ids(&self) -> &[EntityId] {
        &self.text_ids
    }

    pub fn image_ids(&self) -> &[EntityId] {
        &self.image_ids
    }

    pub fn annotation_shape(&self) -> Option<EntityId> {
        self.annotation_shape
    }

    pub fn font_label_shape(&self) -> Option<EntityId> {
        self.font_label_shape
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.stroke_ids.is_empty()
            && self.shape_ids.is_empty()
            && self.text_ids.is_empty()
            && self.image_ids.is_empty()
            && self.annotation_shape.is_none()
            && self.font_label_shape.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drops ids that no longer resolve in the scene and refreshes the
    /// bounds. Stale ids are expected after undo or deletion and are
    /// filtered silently.
    pub fn prune(&mut self, scene: &Scene) {
        self.stroke_ids.retain(|id| scene.stroke(*id).is_some());
        self.shape_ids.retain(|id| scene.shape(*id).is_some());
        self.text_ids.retain(|id| scene.text(*id).is_some());
        self.image_ids.retain(|id| scene.image(*id).is_some());
        if let Some(id) = self.annotation_shape {
            if scene.shape(id).map(|s| s.annotation.is_none()).unwrap_or(true) {
                self.annotation_shape = None;
            }
        }
        if let Some(id) = self.font_label_shape {
            if scene.shape(id).map(|s| s.font_label.is_none()).unwrap_or(true) {
                self.font_label_shape = None;
            }
        }
        self.recompute_bounds(scene);
    }

    /// Recomputes the union box of everything selected.
    pub fn recompute_bounds(&mut self, scene: &Scene) {
        let mut bounds: Option<Bounds> = None;
        let mut merge = |b: Bounds| {
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        };
        for id in &self.stroke_ids {
            if let Some(b) = scene.stroke(*id).and_then(|s| s.bounds()) {
                merge(b);
            }
        }
        for id in &self.shape_ids {
            if let Some(shape) = scene.shape(*id) {
                merge(shape.bounds());
            }
        }
        for id in &self.text_ids {
            if let Some(text) = scene.text(*id) {
                merge(metrics::text_bounds(text));
            }
        }
        for id in &self.image_ids {
            if let Some(image) = scene.image(*id) {
                merge(image.bounds());
            }
        }
        self.bounds = bounds;
    }

    // ---- point selection ----
    //
    // Each picker walks visible entities in reverse creation order so the
    // most recently drawn wins, and replaces the other categories.

    pub fn select_stroke_at(
        &mut self,
        scene: &Scene,
        point: &Point,
        tolerance: f64,
    ) -> Option<EntityId> {
        let found = scene
            .visible_strokes()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|stroke| hit::hit_stroke(point, stroke, tolerance))
            .map(|s| s.id);
        match found {
            Some(id) => {
                self.clear();
                self.stroke_ids = vec![id];
                self.recompute_bounds(scene);
            }
            None => {
                self.stroke_ids.clear();
                self.recompute_bounds(scene);
            }
        }
        found
    }

    pub fn select_shape_at(
        &mut self,
        scene: &Scene,
        point: &Point,
        tolerance: f64,
    ) -> Option<EntityId> {
        let found = scene
            .visible_shapes()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|shape| hit::hit_shape(point, shape, tolerance))
            .map(|s| s.id);
        if let Some(id) = found {
            self.clear();
            self.shape_ids = vec![id];
            self.recompute_bounds(scene);
        }
        found
    }

    pub fn select_text_at(
        &mut self,
        scene: &Scene,
        point: &Point,
        tolerance: f64,
    ) -> Option<EntityId> {
        let found = scene
            .visible_texts()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|text| metrics::text_bounds(text).contains_with_padding(point, tolerance))
            .map(|t| t.id);
        if let Some(id) = found {
            self.clear();
            self.text_ids = vec![id];
            self.recompute_bounds(scene);
        }
        found
    }

    pub fn select_image_at(
        &mut self,
        scene: &Scene,
        point: &Point,
        tolerance: f64,
    ) -> Option<EntityId> {
        let found = scene
            .visible_images()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|image| image.bounds().contains_with_padding(point, tolerance))
            .map(|i| i.id);
        if let Some(id) = found {
            self.clear();
            self.image_ids = vec![id];
            self.recompute_bounds(scene);
        }
        found
    }

    /// Finds the topmost annotation whose leader end or text block is
    /// under the point. Only reports the hit; the caller decides whether
    /// to enter annotation-only selection.
    pub fn annotation_at(
        &self,
        scene: &Scene,
        point: &Point,
        tolerance: f64,
    ) -> Option<(EntityId, AnnotationHit)> {
        scene
            .visible_shapes()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find_map(|shape| {
                let ann = shape.annotation.as_ref()?;
                hit::hit_annotation(point, ann, tolerance).map(|hit| (shape.id, hit))
            })
    }

    /// Finds the topmost font-label caption under the point.
    pub fn font_label_at(
        &self,
        scene: &Scene,
        point: &Point,
        tolerance: f64,
    ) -> Option<EntityId> {
        scene
            .visible_shapes()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|shape| {
                shape
                    .font_label
                    .as_ref()
                    .map(|label| hit::hit_font_label(point, label, tolerance))
                    .unwrap_or(false)
            })
            .map(|s| s.id)
    }

    /// Enters annotation-only selection for a shape.
    pub fn set_annotation_shape(&mut self, id: Option<EntityId>) {
        self.clear();
        self.annotation_shape = id;
    }

    /// Enters font-label-only selection for a shape.
    pub fn set_font_label_shape(&mut self, id: Option<EntityId>) {
        self.clear();
        self.font_label_shape = id;
    }

    // ---- rect selection ----

    /// Selects strokes with any sample inside the rect, replacing the
    /// stroke selection.
    pub fn select_strokes_in_rect(&mut self, scene: &Scene, rect: &Bounds) {
        self.stroke_ids = scene
            .visible_strokes()
            .filter(|stroke| stroke.points.iter().any(|p| rect.contains(p)))
            .map(|s| s.id)
            .collect();
        self.recompute_bounds(scene);
    }

    /// Selects shapes whose base box intersects the rect, keeping any
    /// stroke selection made from the same rubber band.
    pub fn select_shapes_in_rect(&mut self, scene: &Scene, rect: &Bounds) {
        self.shape_ids = scene
            .visible_shapes()
            .filter(|shape| shape.kind.base_bounds().intersects(rect))
            .map(|s| s.id)
            .collect();
        self.recompute_bounds(scene);
    }

    /// Selects images fully contained in the rect, adding to the image
    /// selection.
    pub fn select_images_in_rect(&mut self, scene: &Scene, rect: &Bounds) {
        for image in scene.visible_images() {
            let b = image.bounds();
            let contained = b.min_x >= rect.min_x
                && b.max_x <= rect.max_x
                && b.min_y >= rect.min_y
                && b.max_y <= rect.max_y;
            if contained && !self.image_ids.contains(&image.id) {
                self.image_ids.push(image.id);
            }
        }
        self.recompute_bounds(scene);
    }

    // ---- explicit id setters ----

    pub fn set_stroke_ids(&mut self, scene: &Scene, ids: Vec<EntityId>) {
        self.clear();
        self.stroke_ids = ids;
        self.recompute_bounds(scene);
    }

    pub fn set_shape_ids(&mut self, scene: &Scene, ids: Vec<EntityId>) {
        self.clear();
        self.shape_ids = ids;
        self.recompute_bounds(scene);
    }

    pub fn set_text_ids(&mut self, scene: &Scene, ids: Vec<EntityId>) {
        self.clear();
        self.text_ids = ids;
        self.recompute_bounds(scene);
    }

    pub fn set_image_ids(&mut self, scene: &Scene, ids: Vec<EntityId>) {
        self.clear();
        self.image_ids = ids;
        self.recompute_bounds(scene);
    }
}
