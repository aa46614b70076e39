//! Gesture state and pointer input types.
//!
//! A single enum holds the one in-flight interaction, so two gesture
//! machines can never be active at once and cancellation is one
//! assignment back to `Idle`.

use crate::model::{Annotation, LeaderLine, TextElement};
use proofmark_core::{Bounds, EntityId, Point};

/// A raw pointer event. The timestamp is supplied by the caller (wall
/// clock at event time); the double-click window is evaluated against
/// these reads only.
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    pub pressure: Option<f32>,
    pub shift: bool,
    pub timestamp_ms: f64,
}

impl PointerInput {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pressure: None,
            shift: false,
            timestamp_ms: 0.0,
        }
    }

    pub fn at(mut self, timestamp_ms: f64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn point(&self) -> Point {
        match self.pressure {
            Some(p) => Point::with_pressure(self.x, self.y, p),
            None => Point::new(self.x, self.y),
        }
    }
}

/// What an in-progress selection drag is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Strokes,
    Shapes,
    Texts,
    Images,
    /// The annotation text block of one shape (shape stays put).
    Annotation { shape_id: EntityId },
    /// The leader end handle of one shape's annotation.
    LeaderEnd { shape_id: EntityId },
    /// The font-designation caption of one rect.
    FontLabel { shape_id: EntityId },
}

/// The single in-flight interaction.
#[derive(Debug, Clone)]
pub enum Gesture {
    Idle,
    /// Pen or marker accumulation.
    DrawingStroke { points: Vec<Point> },
    /// Eraser drag; `changed` remembers whether anything was removed so
    /// pointer-up knows to commit a snapshot.
    Erasing { changed: bool },
    /// Select-tool rectangle sweep over empty space.
    RubberBand { start: Point, current: Point },
    /// Moving the current selection (or one annotation/caption).
    DraggingSelection { kind: DragKind, last: Point },
    /// Rubber-banding a new shape. `annotated` marks the annotated tool
    /// family, which chains into `LeaderFollow` on commit.
    DrawingShape {
        start: Point,
        current: Point,
        annotated: bool,
    },
    /// Annotated-shape phase 2: the leader line tracks the pointer until
    /// the next pointer-down fixes it.
    LeaderFollow {
        shape_id: EntityId,
        leader_start: Point,
        leader_end: Point,
    },
    /// Leader fixed; a text-entry request is out with the collaborator.
    AwaitingAnnotationText {
        shape_id: EntityId,
        leader_start: Point,
        leader_end: Point,
    },
    /// Labeled-rect phase 1: stretching the leader; nothing exists yet.
    LabeledRectLeader { leader_start: Point, current: Point },
    /// Labeled-rect phase 2: leader is fixed, square tracks the pointer.
    LabeledRectSquare {
        leader_start: Point,
        leader_end: Point,
        rect_start: Point,
        current: Point,
    },
    /// Square fixed; a one-character label request is out.
    AwaitingLabel { leader: LeaderLine, rect: Bounds },
    /// Click-by-click polyline construction.
    DrawingPolyline { vertices: Vec<Point>, current: Point },
    /// Dragging out the footprint for a pending image.
    PlacingImage { start: Point, current: Point },
    /// A free-text entry request is out; `editing` carries the id when
    /// re-editing an existing element.
    AwaitingText {
        pos: Option<Point>,
        editing: Option<EntityId>,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// A request to an external collaborator (modal UI), returned from the
/// pointer entry points. The collaborator answers through the matching
/// `submit_*`/`cancel_*` methods on the editor.
#[derive(Debug, Clone)]
pub enum UiRequest {
    /// Open annotation text entry; `existing` prefills when editing.
    AnnotationText {
        shape_id: EntityId,
        existing: Option<Annotation>,
    },
    /// Open single-character label entry for a labeled rect.
    LabelChar,
    /// Open free-text entry; `existing` prefills when editing.
    TextEntry { existing: Option<TextElement> },
    /// Ask the user to pick an image file for the image tool.
    ImagePick,
}
