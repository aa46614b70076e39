//! Leader-line callouts and font-designation captions.

use proofmark_core::{Color, Point};
use serde::{Deserialize, Serialize};

/// Horizontal placement of a text block relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Right,
}

/// Connector from a shape's boundary to a detached text block.
///
/// `start` always lies on the owning shape's boundary (rect edge midpoint,
/// ellipse perimeter point, or line midpoint); `end` is the anchor nearest
/// the text block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderLine {
    pub start: Point,
    pub end: Point,
}

impl LeaderLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> LeaderLine {
        LeaderLine {
            start: self.start.translated(dx, dy),
            end: self.end.translated(dx, dy),
        }
    }
}

/// A leader-line text callout attached to a shape.
///
/// `align` is derived from the leader direction (`end.x - start.x`), never
/// set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: Color,
    pub font_size: f64,
    pub vertical: bool,
    pub align: TextAlign,
    pub leader: LeaderLine,
}

impl Annotation {
    /// The alignment implied by a leader running from `start` to `end`.
    pub fn align_for(start: &Point, end: &Point) -> TextAlign {
        if end.x - start.x >= 0.0 {
            TextAlign::Left
        } else {
            TextAlign::Right
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        self.leader = self.leader.translated(dx, dy);
    }
}

/// Caption naming a font, attached to a rectangle marking a text region.
/// The caption can be dragged independently of its rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontLabel {
    pub font_name: String,
    pub text_x: f64,
    pub text_y: f64,
    pub align: TextAlign,
}
