//! Layers group entities within a page.

use crate::model::{ImageElement, Shape, Stroke, TextElement};
use proofmark_core::LayerId;
use serde::{Deserialize, Serialize};

/// A named, toggleable group of entities. Invisible layers are excluded
/// from hit-testing and display but keep their contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub opacity: f64,
    pub strokes: Vec<Stroke>,
    pub shapes: Vec<Shape>,
    pub texts: Vec<TextElement>,
    pub images: Vec<ImageElement>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayerId::new(),
            name: name.into(),
            visible: true,
            opacity: 1.0,
            strokes: Vec::new(),
            shapes: Vec::new(),
            texts: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
            && self.shapes.is_empty()
            && self.texts.is_empty()
            && self.images.is_empty()
    }
}
