//! The scene: pages, layers, and entity CRUD with referential integrity.
//!
//! The scene is a plain container. It never talks to history; callers that
//! want an edit to be undoable snapshot once after the mutation completes.

use crate::model::{Annotation, ImageElement, Layer, Page, Shape, Stroke, TextElement};
use image::RgbaImage;
use proofmark_core::{Bounds, EntityId, LayerId, Point, Result, SceneError};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pages: Vec<Page>,
    current_page: usize,
    current_layer: LayerId,
}

impl Scene {
    /// Builds a scene from pre-sized pages. The first page's first layer
    /// becomes current.
    pub fn new(pages: Vec<Page>) -> Result<Self> {
        let first_layer = pages
            .first()
            .and_then(|p| p.layers.first())
            .map(|l| l.id)
            .ok_or(SceneError::EmptyDocument)?;
        Ok(Self {
            pages,
            current_page: 0,
            current_layer: first_layer,
        })
    }

    /// Convenience constructor from page dimensions.
    pub fn with_page_sizes(sizes: &[(f64, f64)]) -> Result<Self> {
        Self::new(
            sizes
                .iter()
                .enumerate()
                .map(|(i, &(w, h))| Page::new(i + 1, w, h))
                .collect(),
        )
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_page]
    }

    pub fn current_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current_page]
    }

    pub fn current_layer_id(&self) -> LayerId {
        self.current_layer
    }

    /// Switches pages; out-of-range indices are ignored. The target
    /// page's first layer becomes current.
    pub fn set_current_page(&mut self, index: usize) -> bool {
        if index >= self.pages.len() {
            return false;
        }
        self.current_page = index;
        if let Some(layer) = self.pages[index].layers.first() {
            self.current_layer = layer.id;
        }
        true
    }

    /// Removes the current page, renumbering the remainder. Refused when
    /// only one page is left.
    pub fn delete_current_page(&mut self) -> bool {
        if self.pages.len() <= 1 {
            return false;
        }
        self.pages.remove(self.current_page);
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.number = i + 1;
        }
        if self.current_page >= self.pages.len() {
            self.current_page = self.pages.len() - 1;
        }
        if let Some(layer) = self.pages[self.current_page].layers.first() {
            self.current_layer = layer.id;
        }
        true
    }

    /// Installs the decoded background raster for a page. Backgrounds may
    /// arrive at any time (PDF pages render on demand).
    pub fn set_page_background(&mut self, index: usize, pixels: Arc<RgbaImage>) -> Result<()> {
        let count = self.pages.len();
        let page = self
            .pages
            .get_mut(index)
            .ok_or(SceneError::PageOutOfRange { index, count })?;
        page.background = Some(pixels);
        Ok(())
    }

    // ---- layers ----

    /// Adds a layer to the current page and makes it current.
    pub fn add_layer(&mut self) -> LayerId {
        let page = &mut self.pages[self.current_page];
        let layer = Layer::new(format!("Layer {}", page.layers.len() + 1));
        let id = layer.id;
        page.layers.push(layer);
        self.current_layer = id;
        debug!(layer = %id, "layer added");
        id
    }

    /// Removes a layer and its contents. Refused while it is the page's
    /// only layer; the current layer falls back to the last remaining.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let page = &mut self.pages[self.current_page];
        if page.layers.len() <= 1 {
            return false;
        }
        let before = page.layers.len();
        page.layers.retain(|l| l.id != id);
        if page.layers.len() == before {
            return false;
        }
        if self.current_layer == id {
            self.current_layer = page.layers[page.layers.len() - 1].id;
        }
        true
    }

    pub fn set_current_layer(&mut self, id: LayerId) -> bool {
        if self.pages[self.current_page].layer(id).is_some() {
            self.current_layer = id;
            true
        } else {
            false
        }
    }

    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.pages[self.current_page].layer_mut(id) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_layer_opacity(&mut self, id: LayerId, opacity: f64) -> bool {
        match self.pages[self.current_page].layer_mut(id) {
            Some(layer) => {
                layer.opacity = opacity.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    // ---- entity CRUD ----

    fn current_layer_mut(&mut self) -> Result<&mut Layer> {
        let page_index = self.current_page;
        let layer_id = self.current_layer;
        self.pages[page_index]
            .layer_mut(layer_id)
            .ok_or(SceneError::UnknownLayer {
                id: layer_id,
                page: page_index,
            })
    }

    /// Adds a stroke to the current layer, claiming it for that layer.
    pub fn add_stroke(&mut self, mut stroke: Stroke) -> Result<EntityId> {
        let layer_id = self.current_layer;
        let layer = self.current_layer_mut()?;
        stroke.layer = layer_id;
        let id = stroke.id;
        layer.strokes.push(stroke);
        debug!(stroke = %id, "stroke added");
        Ok(id)
    }

    pub fn add_shape(&mut self, mut shape: Shape) -> Result<EntityId> {
        let layer_id = self.current_layer;
        let layer = self.current_layer_mut()?;
        shape.layer = layer_id;
        let id = shape.id;
        layer.shapes.push(shape);
        debug!(shape = %id, "shape added");
        Ok(id)
    }

    pub fn add_text(&mut self, mut text: TextElement) -> Result<EntityId> {
        let layer_id = self.current_layer;
        let layer = self.current_layer_mut()?;
        text.layer = layer_id;
        let id = text.id;
        layer.texts.push(text);
        debug!(text = %id, "text added");
        Ok(id)
    }

    pub fn add_image(&mut self, mut image: ImageElement) -> Result<EntityId> {
        let layer_id = self.current_layer;
        let layer = self.current_layer_mut()?;
        image.layer = layer_id;
        let id = image.id;
        layer.images.push(image);
        debug!(image = %id, "image added");
        Ok(id)
    }

    // ---- queries ----
    //
    // The `visible_*` accessors are the effective-scene view: hit-testing
    // and display must only see content on visible layers. The `*_mut`
    // lookups are raw and also reach hidden layers, so that entities
    // selected before their layer was hidden can still be edited.

    pub fn visible_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.current_page()
            .visible_layers()
            .flat_map(|l| l.strokes.iter())
    }

    pub fn visible_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.current_page()
            .visible_layers()
            .flat_map(|l| l.shapes.iter())
    }

    pub fn visible_texts(&self) -> impl Iterator<Item = &TextElement> {
        self.current_page()
            .visible_layers()
            .flat_map(|l| l.texts.iter())
    }

    pub fn visible_images(&self) -> impl Iterator<Item = &ImageElement> {
        self.current_page()
            .visible_layers()
            .flat_map(|l| l.images.iter())
    }

    pub fn stroke(&self, id: EntityId) -> Option<&Stroke> {
        self.current_page()
            .layers
            .iter()
            .flat_map(|l| l.strokes.iter())
            .find(|s| s.id == id)
    }

    pub fn stroke_mut(&mut self, id: EntityId) -> Option<&mut Stroke> {
        self.current_page_mut()
            .layers
            .iter_mut()
            .flat_map(|l| l.strokes.iter_mut())
            .find(|s| s.id == id)
    }

    pub fn shape(&self, id: EntityId) -> Option<&Shape> {
        self.current_page()
            .layers
            .iter()
            .flat_map(|l| l.shapes.iter())
            .find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: EntityId) -> Option<&mut Shape> {
        self.current_page_mut()
            .layers
            .iter_mut()
            .flat_map(|l| l.shapes.iter_mut())
            .find(|s| s.id == id)
    }

    pub fn text(&self, id: EntityId) -> Option<&TextElement> {
        self.current_page()
            .layers
            .iter()
            .flat_map(|l| l.texts.iter())
            .find(|t| t.id == id)
    }

    pub fn text_mut(&mut self, id: EntityId) -> Option<&mut TextElement> {
        self.current_page_mut()
            .layers
            .iter_mut()
            .flat_map(|l| l.texts.iter_mut())
            .find(|t| t.id == id)
    }

    pub fn image(&self, id: EntityId) -> Option<&ImageElement> {
        self.current_page()
            .layers
            .iter()
            .flat_map(|l| l.images.iter())
            .find(|i| i.id == id)
    }

    pub fn image_mut(&mut self, id: EntityId) -> Option<&mut ImageElement> {
        self.current_page_mut()
            .layers
            .iter_mut()
            .flat_map(|l| l.images.iter_mut())
            .find(|i| i.id == id)
    }

    /// Attaches (or replaces) a shape's annotation. Unknown ids are
    /// ignored.
    pub fn set_shape_annotation(&mut self, id: EntityId, annotation: Annotation) -> bool {
        match self.shape_mut(id) {
            Some(shape) => {
                shape.annotation = Some(annotation);
                true
            }
            None => false,
        }
    }

    /// Removes entities by id across all layers of the current page.
    /// Returns whether anything was removed.
    pub fn remove_entities(
        &mut self,
        strokes: &[EntityId],
        shapes: &[EntityId],
        texts: &[EntityId],
        images: &[EntityId],
    ) -> bool {
        let mut removed = false;
        for layer in &mut self.current_page_mut().layers {
            let before = layer.strokes.len()
                + layer.shapes.len()
                + layer.texts.len()
                + layer.images.len();
            layer.strokes.retain(|s| !strokes.contains(&s.id));
            layer.shapes.retain(|s| !shapes.contains(&s.id));
            layer.texts.retain(|t| !texts.contains(&t.id));
            layer.images.retain(|i| !images.contains(&i.id));
            let after = layer.strokes.len()
                + layer.shapes.len()
                + layer.texts.len()
                + layer.images.len();
            removed |= after != before;
        }
        removed
    }

    /// Erases under a circular cursor: whole strokes with any sample in
    /// range go away, as do shapes whose bounding-box outline passes
    /// within `radius`. Returns whether anything was erased.
    pub fn erase_at(&mut self, point: &Point, radius: f64) -> bool {
        let mut changed = false;
        for layer in &mut self.current_page_mut().layers {
            if !layer.visible {
                continue;
            }
            let before_strokes = layer.strokes.len();
            layer
                .strokes
                .retain(|stroke| !stroke.points.iter().any(|p| p.distance_to(point) < radius));
            changed |= layer.strokes.len() != before_strokes;

            let before_shapes = layer.shapes.len();
            layer
                .shapes
                .retain(|shape| !outline_near(&shape.kind.base_bounds(), point, radius));
            changed |= layer.shapes.len() != before_shapes;
        }
        if changed {
            debug!(x = point.x, y = point.y, "erased content");
        }
        changed
    }

    /// Clears strokes, shapes, and texts from every layer of every page.
    /// Placed images survive.
    pub fn clear_drawings(&mut self) {
        for page in &mut self.pages {
            for layer in &mut page.layers {
                layer.strokes.clear();
                layer.shapes.clear();
                layer.texts.clear();
            }
        }
    }
}

/// True when `point` lies within `radius` of the box's outline (not its
/// interior), matching the eraser's rect-edge rule.
fn outline_near(bounds: &Bounds, point: &Point, radius: f64) -> bool {
    if !bounds.contains_with_padding(point, radius) {
        return false;
    }
    let on_left = (point.x - bounds.min_x).abs() < radius
        && point.y >= bounds.min_y
        && point.y <= bounds.max_y;
    let on_right = (point.x - bounds.max_x).abs() < radius
        && point.y >= bounds.min_y
        && point.y <= bounds.max_y;
    let on_top = (point.y - bounds.min_y).abs() < radius
        && point.x >= bounds.min_x
        && point.x <= bounds.max_x;
    let on_bottom = (point.y - bounds.max_y).abs() < radius
        && point.x >= bounds.min_x
        && point.x <= bounds.max_x;
    on_left || on_right || on_top || on_bottom
}
