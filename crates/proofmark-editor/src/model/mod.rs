//! Scene entity types: strokes, shapes, annotations, texts, images,
//! layers, and pages.

mod annotation;
mod image_element;
mod layer;
pub mod metrics;
mod page;
mod shape;
mod stroke;
mod text;

pub use annotation::{Annotation, FontLabel, LeaderLine, TextAlign};
pub use image_element::{aspect_fit, ImageElement};
pub use layer::Layer;
pub use page::Page;
pub use shape::{AnchorTarget, Shape, ShapeKind, StampKind};
pub use stroke::Stroke;
pub use text::TextElement;
