//! Geometric shapes and proofreading stamps.

use crate::model::metrics;
use crate::model::{Annotation, FontLabel, LeaderLine};
use proofmark_core::{Bounds, Color, EntityId, LayerId, Point};
use serde::{Deserialize, Serialize};

/// Proofreading stamp variants. Each carries the glyph it renders and its
/// conventional default size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StampKind {
    /// 済 — reviewed and done (circled).
    Done,
    /// ルビ — add ruby text (rounded box).
    Ruby,
    /// トル — delete.
    Delete,
    /// トルツメ — delete and close up.
    DeleteClose,
    /// トルママ — marked for deletion but kept.
    DeleteKeep,
    /// 全角アキ — insert full-width space.
    FullWidthSpace,
    /// 半角アキ — insert half-width space.
    HalfWidthSpace,
    /// 改行 — break the line.
    LineBreak,
    /// 小 — make the kana small (circled).
    SmallKana,
}

impl StampKind {
    pub fn glyph(&self) -> &'static str {
        match self {
            StampKind::Done => "済",
            StampKind::Ruby => "ルビ",
            StampKind::Delete => "トル",
            StampKind::DeleteClose => "トルツメ",
            StampKind::DeleteKeep => "トルママ",
            StampKind::FullWidthSpace => "全角アキ",
            StampKind::HalfWidthSpace => "半角アキ",
            StampKind::LineBreak => "改行",
            StampKind::SmallKana => "小",
        }
    }

    pub fn default_size(&self) -> f64 {
        match self {
            StampKind::Done => 28.0,
            StampKind::Delete | StampKind::SmallKana => 20.0,
            _ => 14.0,
        }
    }
}

/// Shape geometry, one variant per kind. Annotations and font labels are
/// attachments on [`Shape`], not extra variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect { start: Point, end: Point },
    Ellipse { start: Point, end: Point },
    Line { start: Point, end: Point },
    Arrow { start: Point, end: Point },
    DoubleArrow { start: Point, end: Point },
    /// Closed multi-vertex outline; the last point repeats the first.
    Polyline { points: Vec<Point> },
    Stamp { at: Point, kind: StampKind, size: f64 },
    /// Leader line, square outline, and a one-character label.
    LabeledRect {
        start: Point,
        end: Point,
        label: char,
        leader: LeaderLine,
    },
}

/// The base geometry an annotation's leader line anchors to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorTarget {
    Rect(Bounds),
    Ellipse { center: Point, rx: f64, ry: f64 },
    Line { start: Point, end: Point },
}

impl ShapeKind {
    /// Box spanned by the defining corner points (polyline: vertex hull).
    pub fn base_bounds(&self) -> Bounds {
        match self {
            ShapeKind::Rect { start, end }
            | ShapeKind::Ellipse { start, end }
            | ShapeKind::Line { start, end }
            | ShapeKind::Arrow { start, end }
            | ShapeKind::DoubleArrow { start, end }
            | ShapeKind::LabeledRect { start, end, .. } => Bounds::from_corners(*start, *end),
            ShapeKind::Polyline { points } => {
                let mut b = match points.first() {
                    Some(p) => Bounds::new(p.x, p.y, p.x, p.y),
                    None => Bounds::new(0.0, 0.0, 0.0, 0.0),
                };
                for p in points.iter().skip(1) {
                    b.include(*p);
                }
                b
            }
            ShapeKind::Stamp { at, size, .. } => {
                let half = size / 2.0;
                Bounds::new(at.x - half, at.y - half, at.x + half, at.y + half)
            }
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            ShapeKind::Rect { start, end }
            | ShapeKind::Ellipse { start, end }
            | ShapeKind::Line { start, end }
            | ShapeKind::Arrow { start, end }
            | ShapeKind::DoubleArrow { start, end } => {
                *start = start.translated(dx, dy);
                *end = end.translated(dx, dy);
            }
            ShapeKind::LabeledRect {
                start, end, leader, ..
            } => {
                *start = start.translated(dx, dy);
                *end = end.translated(dx, dy);
                *leader = leader.translated(dx, dy);
            }
            ShapeKind::Polyline { points } => {
                for p in points {
                    p.x += dx;
                    p.y += dy;
                }
            }
            ShapeKind::Stamp { at, .. } => *at = at.translated(dx, dy),
        }
    }

    /// Geometry a leader line can anchor to; `None` for kinds that never
    /// carry annotations.
    pub fn anchor_target(&self) -> Option<AnchorTarget> {
        match self {
            ShapeKind::Rect { start, end } => {
                Some(AnchorTarget::Rect(Bounds::from_corners(*start, *end)))
            }
            ShapeKind::Ellipse { start, end } => {
                let b = Bounds::from_corners(*start, *end);
                Some(AnchorTarget::Ellipse {
                    center: b.center(),
                    rx: b.width() / 2.0,
                    ry: b.height() / 2.0,
                })
            }
            ShapeKind::Line { start, end } => Some(AnchorTarget::Line {
                start: *start,
                end: *end,
            }),
            _ => None,
        }
    }
}

/// A drawable shape entity with optional annotation and font-label
/// attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: EntityId,
    pub layer: LayerId,
    pub color: Color,
    pub width: f64,
    pub kind: ShapeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_label: Option<FontLabel>,
}

impl Shape {
    pub fn new(kind: ShapeKind, color: Color, width: f64) -> Self {
        Self {
            id: EntityId::new(),
            layer: LayerId::new(),
            color,
            width,
            kind,
            annotation: None,
            font_label: None,
        }
    }

    /// Full display bounds: base geometry plus any attached leader line
    /// and annotation text block.
    pub fn bounds(&self) -> Bounds {
        let mut b = self.kind.base_bounds();
        if let Some(ann) = &self.annotation {
            b.include(ann.leader.start);
            b.include(ann.leader.end);
            if let Some(text_bounds) = metrics::annotation_text_bounds(ann) {
                b = b.union(&text_bounds);
            }
        }
        b
    }

    /// Moves the whole shape, carrying its annotation and font label.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.kind.translate(dx, dy);
        if let Some(ann) = &mut self.annotation {
            ann.translate(dx, dy);
        }
        if let Some(label) = &mut self.font_label {
            label.text_x += dx;
            label.text_y += dy;
        }
    }
}
