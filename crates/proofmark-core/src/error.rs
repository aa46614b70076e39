//! Error handling for Proofmark.
//!
//! Expected interaction edge cases (hit misses, undo at a boundary,
//! below-minimum shapes, ids that no longer resolve) are silent no-ops by
//! design; errors are reserved for referential-integrity violations.

use crate::ids::LayerId;
use thiserror::Error;

/// Scene-level error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// An entity referenced a layer that does not exist on the page.
    #[error("unknown layer {id} on page {page}")]
    UnknownLayer { id: LayerId, page: usize },

    /// A page index was out of range.
    #[error("no page at index {index} (document has {count})")]
    PageOutOfRange { index: usize, count: usize },

    /// The document has no pages at all.
    #[error("document has no pages")]
    EmptyDocument,
}

pub type Result<T> = std::result::Result<T, SceneError>;
