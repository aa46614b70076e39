//! Placed raster images.

use image::RgbaImage;
use proofmark_core::{Bounds, EntityId, LayerId, Point};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn empty_pixels() -> Arc<RgbaImage> {
    Arc::new(RgbaImage::new(0, 0))
}

/// Fits a drag box to an image's natural proportions, keeping the drag
/// direction's sign on both axes.
pub fn aspect_fit(natural_w: f64, natural_h: f64, drag_w: f64, drag_h: f64) -> (f64, f64) {
    let aspect = natural_w / natural_h;
    if (drag_w / drag_h).abs() > aspect {
        (drag_h.abs() * aspect * drag_w.signum(), drag_h)
    } else {
        (drag_w, drag_w.abs() / aspect * drag_h.signum())
    }
}

/// A raster image placed on the page, stretched between two corners.
///
/// Pixels arrive already decoded from the image-loading collaborator and
/// are shared behind an `Arc`, so history snapshots clone a pointer, not
/// the bitmap. Serialized documents carry geometry only; the persistence
/// collaborator stores and restores pixel data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    pub id: EntityId,
    pub layer: LayerId,
    pub start: Point,
    pub end: Point,
    #[serde(skip, default = "empty_pixels")]
    pub pixels: Arc<RgbaImage>,
}

impl ImageElement {
    pub fn new(start: Point, end: Point, pixels: Arc<RgbaImage>) -> Self {
        Self {
            id: EntityId::new(),
            layer: LayerId::new(),
            start,
            end,
            pixels,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_corners(self.start, self.end)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.start = self.start.translated(dx, dy);
        self.end = self.end.translated(dx, dy);
    }
}
