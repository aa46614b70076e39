//! Interaction constants shared by hit-testing, gestures, and display
//! shaping. All distances are in page units (pre-zoom pixels).

/// Hit tolerance used by the select tool for every pointer pick.
pub const SELECT_TOLERANCE: f64 = 10.0;

/// Padding drawn (and hit-tested) around selection bounds.
pub const SELECTION_PADDING: f64 = 5.0;

/// Leader-end handles are easier to grab than the rest of an annotation.
pub const LEADER_END_TOLERANCE_FACTOR: f64 = 1.5;

/// Gap between a leader-line end and the annotation text block.
pub const LEADER_TEXT_MARGIN: f64 = 6.0;

/// Two clicks within this window and distance count as a double-click.
pub const DOUBLE_CLICK_MS: f64 = 300.0;
pub const DOUBLE_CLICK_DISTANCE: f64 = 10.0;

/// Fixed leader length of a labeled rect, and the gap between the leader
/// end and the square's near corner.
pub const LABELED_RECT_LEADER_LENGTH: f64 = 30.0;
pub const LABELED_RECT_OFFSET: f64 = 5.0;

/// Area shapes below this edge length are discarded on pointer-up.
pub const MIN_AREA_SHAPE_SIZE: f64 = 5.0;
/// Line-family shapes need at least this much extent on one axis.
pub const MIN_LINE_SHAPE_SIZE: f64 = 2.0;
/// Placed images need at least this much extent on both axes.
pub const MIN_IMAGE_SIZE: f64 = 10.0;

/// Snapshot history keeps at most this many entries.
pub const HISTORY_DEPTH: usize = 50;

/// Eraser radius as a multiple of the current stroke width.
pub const ERASER_RADIUS_FACTOR: f64 = 2.0;

/// Marker strokes draw translucent and pressure-insensitive.
pub const MARKER_OPACITY: f64 = 0.3;

/// Text metrics heuristic: ASCII glyphs are narrower than full-width
/// glyphs, horizontal lines advance by 1.2em, vertical columns by 1.1em.
pub const ASCII_GLYPH_RATIO: f64 = 0.6;
pub const WIDE_GLYPH_RATIO: f64 = 1.0;
pub const LINE_HEIGHT_RATIO: f64 = 1.2;
pub const VERTICAL_COLUMN_RATIO: f64 = 1.1;

/// Font-label captions use a fixed size and an approximate glyph width.
pub const FONT_LABEL_SIZE: f64 = 16.0;
pub const FONT_LABEL_GLYPH_RATIO: f64 = 0.7;
pub const FONT_LABEL_PADDING: f64 = 5.0;

/// Centered image placement caps the initial footprint.
pub const IMAGE_CENTER_MAX_WIDTH: f64 = 200.0;
pub const IMAGE_CENTER_MAX_HEIGHT: f64 = 300.0;

/// Default pen width for a fresh editor.
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
