//! Free-standing text elements.

use proofmark_core::{Color, EntityId, LayerId};
use serde::{Deserialize, Serialize};

/// A text block placed directly on the page (not attached to any shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub id: EntityId,
    pub layer: LayerId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: Color,
    pub font_size: f64,
    pub vertical: bool,
}

impl TextElement {
    pub fn new(text: String, x: f64, y: f64, color: Color, font_size: f64, vertical: bool) -> Self {
        Self {
            id: EntityId::new(),
            layer: LayerId::new(),
            text,
            x,
            y,
            color,
            font_size,
            vertical,
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}
