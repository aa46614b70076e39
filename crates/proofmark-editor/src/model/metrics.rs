//! Approximate text metrics shared by hit-testing, leader anchoring, and
//! display shaping.
//!
//! Glyph widths are a heuristic, not real font metrics: ASCII glyphs count
//! as 0.6em, everything else as 1.0em. The same numbers feed anchor
//! placement, so swapping in measured metrics would move every anchor.

use crate::model::{Annotation, FontLabel, TextAlign, TextElement};
use proofmark_core::constants::{
    ASCII_GLYPH_RATIO, FONT_LABEL_GLYPH_RATIO, FONT_LABEL_SIZE, LINE_HEIGHT_RATIO,
    VERTICAL_COLUMN_RATIO, WIDE_GLYPH_RATIO,
};
use proofmark_core::Bounds;

/// Approximate advance width of a single line of horizontal text.
pub fn line_width(line: &str, font_size: f64) -> f64 {
    line.chars()
        .map(|ch| {
            if ch.is_ascii() {
                font_size * ASCII_GLYPH_RATIO
            } else {
                font_size * WIDE_GLYPH_RATIO
            }
        })
        .sum()
}

/// Size of a text block: horizontal text flows down in 1.2em lines,
/// vertical text flows right-to-left in 1.1em columns.
pub fn block_size(text: &str, font_size: f64, vertical: bool) -> (f64, f64) {
    let lines: Vec<&str> = text.split('\n').collect();
    if vertical {
        let max_chars = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        let height = max_chars as f64 * font_size;
        let width = lines.len().max(1) as f64 * font_size * VERTICAL_COLUMN_RATIO;
        (width, height)
    } else {
        let width = lines
            .iter()
            .map(|line| line_width(line, font_size))
            .fold(font_size, f64::max);
        let height = lines.len() as f64 * font_size * LINE_HEIGHT_RATIO;
        (width, height)
    }
}

/// Bounding box of a text block anchored at (x, y).
///
/// Vertical text grows leftward from its first column; right-aligned
/// horizontal text grows leftward from its anchor.
pub fn block_bounds(
    text: &str,
    x: f64,
    y: f64,
    font_size: f64,
    vertical: bool,
    align: TextAlign,
) -> Bounds {
    let (width, height) = block_size(text, font_size, vertical);
    let min_x = if vertical {
        x - width + font_size / 2.0
    } else if align == TextAlign::Right {
        x - width
    } else {
        x
    };
    Bounds::new(min_x, y, min_x + width, y + height)
}

/// Bounding box of a free-standing text element.
pub fn text_bounds(text: &TextElement) -> Bounds {
    block_bounds(
        &text.text,
        text.x,
        text.y,
        text.font_size,
        text.vertical,
        TextAlign::Left,
    )
}

/// Bounding box of an annotation's text block, `None` when it has no text.
pub fn annotation_text_bounds(annotation: &Annotation) -> Option<Bounds> {
    if annotation.text.is_empty() {
        return None;
    }
    Some(block_bounds(
        &annotation.text,
        annotation.x,
        annotation.y,
        annotation.font_size,
        annotation.vertical,
        annotation.align,
    ))
}

/// Bounding box of a font-designation caption. Captions render at a fixed
/// size with a coarser width approximation than body text.
pub fn font_label_bounds(label: &FontLabel) -> Bounds {
    let width = label.font_name.chars().count() as f64 * FONT_LABEL_SIZE * FONT_LABEL_GLYPH_RATIO;
    let (min_x, max_x) = match label.align {
        TextAlign::Left => (label.text_x, label.text_x + width),
        TextAlign::Right => (label.text_x - width, label.text_x),
    };
    Bounds::new(
        min_x,
        label.text_y - FONT_LABEL_SIZE / 2.0,
        max_x,
        label.text_y + FONT_LABEL_SIZE / 2.0,
    )
}
