//! Pages of the document being marked up.

use crate::model::Layer;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One page: its size, its layers, and the background raster supplied by
/// the page-image collaborator (absent until that collaborator delivers,
/// e.g. for PDF pages rendered on demand).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub layers: Vec<Layer>,
    #[serde(skip)]
    pub background: Option<Arc<RgbaImage>>,
}

impl Page {
    /// Creates a page with its default layer. Pages always own at least
    /// one layer.
    pub fn new(number: usize, width: f64, height: f64) -> Self {
        Self {
            number,
            width,
            height,
            layers: vec![Layer::new("Layer 1")],
            background: None,
        }
    }

    pub fn layer(&self, id: proofmark_core::LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: proofmark_core::LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }
}
