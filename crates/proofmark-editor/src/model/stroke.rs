//! Freehand strokes.

use proofmark_core::constants::MARKER_OPACITY;
use proofmark_core::{Bounds, Color, EntityId, LayerId, Point};
use serde::{Deserialize, Serialize};

/// An ordered run of pointer samples drawn with the pen or marker tool.
/// Marker strokes render translucent and ignore pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: EntityId,
    pub layer: LayerId,
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f64,
    pub marker: bool,
    pub opacity: f64,
}

impl Stroke {
    pub fn new(points: Vec<Point>, color: Color, width: f64) -> Self {
        Self {
            id: EntityId::new(),
            layer: LayerId::new(),
            points,
            color,
            width,
            marker: false,
            opacity: 1.0,
        }
    }

    pub fn marker(points: Vec<Point>, color: Color, width: f64) -> Self {
        Self {
            marker: true,
            opacity: MARKER_OPACITY,
            ..Self::new(points, color, width)
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let mut b = Bounds::new(first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            b.include(*p);
        }
        Some(b)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }
}
