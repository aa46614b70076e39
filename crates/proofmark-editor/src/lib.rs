//! # Proofmark Editor
//!
//! The interactive core of Proofmark: an in-memory vector scene over
//! paginated page images, geometric hit-testing, a multi-phase pointer
//! gesture engine, selection and transform (including leader-line
//! re-anchoring), snapshot undo/redo, and display-list shaping for the
//! raster painter.
//!
//! ## Architecture
//!
//! ```text
//! Editor (owned state container, pointer/keyboard entry points)
//!   ├── Scene (pages → layers → strokes/shapes/texts/images)
//!   ├── History (deep snapshots, 50 deep)
//!   ├── Selection (per-category id sets + bounds)
//!   └── Gesture (the one in-flight interaction)
//!
//! hit        pure geometric predicates
//! transform  move/re-anchor operations
//! display    scene + gesture state → display list (lyon paths, glyphs)
//! ```
//!
//! Everything is single-threaded and synchronous: pointer events mutate
//! the scene inside the handler, and each completed gesture commits
//! exactly one history snapshot. External collaborators supply decoded
//! page images and answer modal [`editor::gesture::UiRequest`]s.

pub mod display;
pub mod editor;
pub mod history;
pub mod hit;
pub mod model;
pub mod scene;
pub mod selection;
pub mod transform;

pub use display::{build as build_display_list, DisplayItem, DisplayList, GlyphRun};
pub use editor::gesture::{DragKind, Gesture, PointerInput, UiRequest};
pub use editor::{Editor, Tool};
pub use history::{History, HistoryEntry};
pub use hit::AnnotationHit;
pub use model::{
    Annotation, FontLabel, ImageElement, Layer, LeaderLine, Page, Shape, ShapeKind, StampKind,
    Stroke, TextAlign, TextElement,
};
pub use scene::Scene;
pub use selection::Selection;

// Re-export the shared fundamentals so dependents need only this crate.
pub use proofmark_core::{Bounds, Color, EntityId, LayerId, Point, Result, SceneError};
