//! Read-only shaping of the scene (plus transient gesture state) into a
//! display list the raster painter consumes.
//!
//! Geometry is lowered to `lyon` paths; text is laid out into positioned
//! glyphs here, including the vertical-writing rules (rotated dashes and
//! brackets, punctuation nudged to the top-right corner of its cell), so
//! the painter only blits.

use crate::editor::gesture::Gesture;
use crate::editor::{Editor, Tool};
use crate::model::{
    metrics, Annotation, FontLabel, Layer, Shape, ShapeKind, StampKind, TextAlign, TextElement,
};
use crate::selection::Selection;
use image::RgbaImage;
use lyon::math::{point, vector, Angle, Box2D};
use lyon::path::builder::BorderRadii;
use lyon::path::{Path, Winding};
use proofmark_core::constants::{MARKER_OPACITY, SELECTION_PADDING};
use proofmark_core::{Bounds, Color, Point};
use std::sync::Arc;

/// Selection chrome color.
pub const ACCENT: Color = Color::rgb(0x00, 0x78, 0xd4);
/// Annotation/caption selection chrome color.
pub const ANNOTATION_ACCENT: Color = Color::rgb(0xff, 0x8c, 0x00);

/// Characters drawn rotated a quarter turn in vertical text.
const ROTATED_IN_VERTICAL: &[char] = &[
    'ー', '−', '―', '…', '(', ')', '（', '）', '[', ']', '「', '」', '～', '〜', '＝', '=',
];
/// Punctuation nudged toward the top-right of its cell in vertical text.
const VERTICAL_PUNCTUATION: &[char] = &['、', '。', '，', '．', '｡', '､'];

#[derive(Debug, Clone)]
pub struct PositionedGlyph {
    pub ch: char,
    pub x: f64,
    pub y: f64,
    /// Rotated a quarter turn (vertical-writing dashes and brackets).
    pub rotated: bool,
}

#[derive(Debug, Clone)]
pub struct GlyphRun {
    pub glyphs: Vec<PositionedGlyph>,
    pub color: Color,
    pub font_size: f64,
    pub bold: bool,
    /// Drawn with a white outline behind the fill so text stays readable
    /// over page content.
    pub outlined: bool,
    pub opacity: f64,
}

#[derive(Clone)]
pub enum DisplayItem {
    /// The page raster. Absent while the page image is still being
    /// produced; nothing else waits for it.
    Background { pixels: Arc<RgbaImage> },
    /// A freehand stroke. Samples keep their pressure so the painter can
    /// modulate width (markers ignore pressure and draw translucent).
    Stroke {
        points: Vec<Point>,
        color: Color,
        width: f64,
        marker: bool,
        opacity: f64,
    },
    /// Outline geometry lowered to a lyon path.
    Path {
        path: Path,
        color: Color,
        width: f64,
        opacity: f64,
        dashed: bool,
        filled: bool,
    },
    Glyphs(GlyphRun),
    Image {
        pixels: Arc<RgbaImage>,
        bounds: Bounds,
        opacity: f64,
        selected: bool,
    },
    /// Selection chrome around the given box (already padded).
    SelectionBox {
        bounds: Bounds,
        color: Color,
        handles: bool,
    },
    /// A square drag handle.
    Handle { at: Point, color: Color },
    /// A filled dot (leader-line origin marker).
    Dot { at: Point, radius: f64, color: Color },
}

#[derive(Clone, Default)]
pub struct DisplayList {
    pub page_width: f64,
    pub page_height: f64,
    pub items: Vec<DisplayItem>,
}

/// Builds the full display list for the editor's current page.
pub fn build(editor: &Editor) -> DisplayList {
    let scene = editor.scene();
    let page = scene.current_page();
    let selection = editor.selection();
    let mut list = DisplayList {
        page_width: page.width,
        page_height: page.height,
        items: Vec::new(),
    };

    if let Some(pixels) = &page.background {
        list.items.push(DisplayItem::Background {
            pixels: Arc::clone(pixels),
        });
    }

    for layer in page.visible_layers() {
        push_layer(&mut list, layer, selection);
    }

    push_gesture_preview(&mut list, editor);
    push_selection_chrome(&mut list, editor);
    list
}

fn push_layer(list: &mut DisplayList, layer: &Layer, selection: &Selection) {
    let opacity = layer.opacity;
    for stroke in &layer.strokes {
        let selected = selection.stroke_ids().contains(&stroke.id);
        list.items.push(DisplayItem::Stroke {
            points: stroke.points.clone(),
            color: if selected { ACCENT } else { stroke.color },
            width: stroke.width,
            marker: stroke.marker,
            opacity: if stroke.marker {
                stroke.opacity * opacity
            } else {
                opacity
            },
        });
    }
    for shape in &layer.shapes {
        let selected = selection.shape_ids().contains(&shape.id);
        push_shape(list, shape, selected, opacity);
    }
    for text in &layer.texts {
        let selected = selection.text_ids().contains(&text.id);
        push_text(list, text, selected, opacity);
    }
    for image in &layer.images {
        let selected = selection.image_ids().contains(&image.id);
        list.items.push(DisplayItem::Image {
            pixels: Arc::clone(&image.pixels),
            bounds: image.bounds(),
            opacity,
            selected,
        });
    }
}

fn push_shape(list: &mut DisplayList, shape: &Shape, selected: bool, opacity: f64) {
    let color = if selected { ACCENT } else { shape.color };
    match &shape.kind {
        ShapeKind::Stamp { at, kind, size } => {
            push_stamp(list, *at, *kind, *size, color, opacity);
        }
        kind => {
            list.items.push(DisplayItem::Path {
                path: shape_outline_path(kind, shape.width),
                color,
                width: shape.width,
                opacity,
                dashed: false,
                filled: false,
            });
            if let ShapeKind::LabeledRect {
                start,
                end,
                label,
                leader,
            } = kind
            {
                list.items.push(DisplayItem::Dot {
                    at: leader.start,
                    radius: shape.width.max(2.0),
                    color,
                });
                push_rect_label(list, start, end, *label, color, opacity);
            }
        }
    }
    if let Some(ann) = &shape.annotation {
        push_annotation(list, ann, opacity);
    }
    if let Some(label) = &shape.font_label {
        push_font_label(list, label, color, opacity);
    }
}

/// Lowers a shape outline to a path, arrowheads included. `stroke_width`
/// scales the arrowheads (never below 8 units).
pub fn shape_outline_path(kind: &ShapeKind, stroke_width: f64) -> Path {
    let head_len = (stroke_width * 3.0).max(8.0);
    let mut builder = Path::builder();
    match kind {
        ShapeKind::Rect { start, end } => {
            let b = Bounds::from_corners(*start, *end);
            builder.add_rectangle(
                &Box2D::new(
                    point(b.min_x as f32, b.min_y as f32),
                    point(b.max_x as f32, b.max_y as f32),
                ),
                Winding::Positive,
            );
        }
        ShapeKind::Ellipse { start, end } => {
            let b = Bounds::from_corners(*start, *end);
            let c = b.center();
            builder.add_ellipse(
                point(c.x as f32, c.y as f32),
                vector((b.width() / 2.0) as f32, (b.height() / 2.0) as f32),
                Angle::radians(0.0),
                Winding::Positive,
            );
        }
        ShapeKind::Line { start, end } => {
            builder.begin(point(start.x as f32, start.y as f32));
            builder.line_to(point(end.x as f32, end.y as f32));
            builder.end(false);
        }
        ShapeKind::Arrow { start, end } => {
            builder.begin(point(start.x as f32, start.y as f32));
            builder.line_to(point(end.x as f32, end.y as f32));
            builder.end(false);
            let angle = (end.y - start.y).atan2(end.x - start.x);
            for offset in [-std::f64::consts::FRAC_PI_6, std::f64::consts::FRAC_PI_6] {
                builder.begin(point(end.x as f32, end.y as f32));
                builder.line_to(point(
                    (end.x - head_len * (angle + offset).cos()) as f32,
                    (end.y - head_len * (angle + offset).sin()) as f32,
                ));
                builder.end(false);
            }
        }
        ShapeKind::DoubleArrow { start, end } => {
            builder.begin(point(start.x as f32, start.y as f32));
            builder.line_to(point(end.x as f32, end.y as f32));
            builder.end(false);
            let angle = (end.y - start.y).atan2(end.x - start.x);
            for offset in [-std::f64::consts::FRAC_PI_6, std::f64::consts::FRAC_PI_6] {
                builder.begin(point(end.x as f32, end.y as f32));
                builder.line_to(point(
                    (end.x - head_len * (angle + offset).cos()) as f32,
                    (end.y - head_len * (angle + offset).sin()) as f32,
                ));
                builder.end(false);
                builder.begin(point(start.x as f32, start.y as f32));
                builder.line_to(point(
                    (start.x + head_len * (angle + offset).cos()) as f32,
                    (start.y + head_len * (angle + offset).sin()) as f32,
                ));
                builder.end(false);
            }
        }
        ShapeKind::Polyline { points } => {
            if let Some((first, rest)) = points.split_first() {
                builder.begin(point(first.x as f32, first.y as f32));
                for p in rest {
                    builder.line_to(point(p.x as f32, p.y as f32));
                }
                builder.end(false);
            }
        }
        ShapeKind::LabeledRect {
            start, end, leader, ..
        } => {
            builder.begin(point(leader.start.x as f32, leader.start.y as f32));
            builder.line_to(point(leader.end.x as f32, leader.end.y as f32));
            builder.end(false);
            let b = Bounds::from_corners(*start, *end);
            let side = b.width().min(b.height());
            builder.add_rectangle(
                &Box2D::new(
                    point(b.min_x as f32, b.min_y as f32),
                    point((b.min_x + side) as f32, (b.min_y + side) as f32),
                ),
                Winding::Positive,
            );
        }
        ShapeKind::Stamp { .. } => {}
    }
    builder.build()
}

fn segment_path(a: &Point, b: &Point) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(a.x as f32, a.y as f32));
    builder.line_to(point(b.x as f32, b.y as f32));
    builder.end(false);
    builder.build()
}

fn rect_path(b: &Bounds) -> Path {
    let mut builder = Path::builder();
    builder.add_rectangle(
        &Box2D::new(
            point(b.min_x as f32, b.min_y as f32),
            point(b.max_x as f32, b.max_y as f32),
        ),
        Winding::Positive,
    );
    builder.build()
}

fn push_rect_label(
    list: &mut DisplayList,
    start: &Point,
    end: &Point,
    label: char,
    color: Color,
    opacity: f64,
) {
    let b = Bounds::from_corners(*start, *end);
    let side = b.width().min(b.height());
    let font_size = (side * 0.4).clamp(10.0, 16.0);
    let padding = 3.0;
    list.items.push(DisplayItem::Glyphs(GlyphRun {
        glyphs: vec![PositionedGlyph {
            ch: label,
            x: b.min_x + side - padding - font_size,
            y: b.min_y + side - padding - font_size,
            rotated: false,
        }],
        color,
        font_size,
        bold: true,
        outlined: true,
        opacity,
    }));
}

fn push_stamp(
    list: &mut DisplayList,
    at: Point,
    kind: StampKind,
    size: f64,
    color: Color,
    opacity: f64,
) {
    let glyph_size = match kind {
        StampKind::Done | StampKind::SmallKana => size * 0.6,
        StampKind::Ruby => size * 0.45,
        _ => size * 0.9,
    };
    match kind {
        StampKind::Done | StampKind::SmallKana => {
            let mut builder = Path::builder();
            builder.add_ellipse(
                point(at.x as f32, at.y as f32),
                vector((size / 2.0) as f32, (size / 2.0) as f32),
                Angle::radians(0.0),
                Winding::Positive,
            );
            list.items.push(DisplayItem::Path {
                path: builder.build(),
                color,
                width: if kind == StampKind::Done { 2.0 } else { 1.0 },
                opacity,
                dashed: false,
                filled: false,
            });
        }
        StampKind::Ruby => {
            let w = size * 1.8;
            let h = size * 0.9;
            let mut builder = Path::builder();
            builder.add_rounded_rectangle(
                &Box2D::new(
                    point((at.x - w / 2.0) as f32, (at.y - h / 2.0) as f32),
                    point((at.x + w / 2.0) as f32, (at.y + h / 2.0) as f32),
                ),
                &BorderRadii::new((size * 0.15) as f32),
                Winding::Positive,
            );
            list.items.push(DisplayItem::Path {
                path: builder.build(),
                color,
                width: 1.0,
                opacity,
                dashed: false,
                filled: false,
            });
        }
        _ => {}
    }
    let text = kind.glyph();
    let count = text.chars().count() as f64;
    let start_x = at.x - count * glyph_size / 2.0;
    let glyphs = text
        .chars()
        .enumerate()
        .map(|(i, ch)| PositionedGlyph {
            ch,
            x: start_x + i as f64 * glyph_size,
            y: at.y - glyph_size / 2.0,
            rotated: false,
        })
        .collect();
    list.items.push(DisplayItem::Glyphs(GlyphRun {
        glyphs,
        color,
        font_size: glyph_size,
        bold: true,
        outlined: true,
        opacity,
    }));
}

fn push_annotation(list: &mut DisplayList, ann: &Annotation, opacity: f64) {
    let color = ann.color;
    list.items.push(DisplayItem::Path {
        path: segment_path(&ann.leader.start, &ann.leader.end),
        color,
        width: 2.0,
        opacity,
        dashed: false,
        filled: false,
    });
    list.items.push(DisplayItem::Dot {
        at: ann.leader.start,
        radius: 3.0,
        color,
    });
    if !ann.text.is_empty() {
        list.items.push(DisplayItem::Glyphs(GlyphRun {
            glyphs: layout_text(&ann.text, ann.x, ann.y, ann.font_size, ann.vertical, ann.align),
            color,
            font_size: ann.font_size,
            bold: false,
            outlined: true,
            opacity,
        }));
    }
}

fn push_text(list: &mut DisplayList, text: &TextElement, selected: bool, opacity: f64) {
    if text.text.is_empty() {
        return;
    }
    list.items.push(DisplayItem::Glyphs(GlyphRun {
        glyphs: layout_text(
            &text.text,
            text.x,
            text.y,
            text.font_size,
            text.vertical,
            TextAlign::Left,
        ),
        color: if selected { ACCENT } else { text.color },
        font_size: text.font_size,
        bold: false,
        outlined: true,
        opacity,
    }));
}

fn push_font_label(list: &mut DisplayList, label: &FontLabel, color: Color, opacity: f64) {
    let bounds = metrics::font_label_bounds(label);
    list.items.push(DisplayItem::Glyphs(GlyphRun {
        glyphs: layout_text(
            &label.font_name,
            bounds.min_x,
            bounds.min_y,
            proofmark_core::constants::FONT_LABEL_SIZE,
            false,
            TextAlign::Left,
        ),
        color,
        font_size: proofmark_core::constants::FONT_LABEL_SIZE,
        bold: true,
        outlined: true,
        opacity,
    }));
}

/// Lays text out into positioned glyphs.
///
/// Horizontal lines advance 1.2em downward; right-aligned lines grow
/// leftward from the anchor. Vertical text runs top-to-bottom in
/// right-to-left 1.1em columns, rotating long dashes and brackets and
/// nudging punctuation into the top-right of its cell; spaces advance a
/// squeezed 0.3em.
pub fn layout_text(
    text: &str,
    x: f64,
    y: f64,
    font_size: f64,
    vertical: bool,
    align: TextAlign,
) -> Vec<PositionedGlyph> {
    let mut glyphs = Vec::new();
    if vertical {
        let column_advance = font_size * proofmark_core::constants::VERTICAL_COLUMN_RATIO;
        for (col, line) in text.split('\n').enumerate() {
            let column_x = x - col as f64 * column_advance;
            let mut cursor = 0.0;
            for ch in line.chars() {
                if ch == ' ' {
                    cursor += font_size * 0.3;
                    continue;
                }
                let cell_y = y + cursor + font_size / 2.0;
                if ROTATED_IN_VERTICAL.contains(&ch) {
                    glyphs.push(PositionedGlyph {
                        ch,
                        x: column_x,
                        y: cell_y,
                        rotated: true,
                    });
                } else if VERTICAL_PUNCTUATION.contains(&ch) {
                    glyphs.push(PositionedGlyph {
                        ch,
                        x: column_x + font_size * 0.7,
                        y: cell_y - font_size * 0.55,
                        rotated: false,
                    });
                } else {
                    glyphs.push(PositionedGlyph {
                        ch,
                        x: column_x,
                        y: cell_y,
                        rotated: false,
                    });
                }
                cursor += font_size;
            }
        }
    } else {
        let line_advance = font_size * proofmark_core::constants::LINE_HEIGHT_RATIO;
        for (row, line) in text.split('\n').enumerate() {
            let line_y = y + row as f64 * line_advance;
            let mut cursor = match align {
                TextAlign::Left => x,
                TextAlign::Right => x - metrics::line_width(line, font_size),
            };
            for ch in line.chars() {
                glyphs.push(PositionedGlyph {
                    ch,
                    x: cursor,
                    y: line_y,
                    rotated: false,
                });
                cursor += if ch.is_ascii() {
                    font_size * proofmark_core::constants::ASCII_GLYPH_RATIO
                } else {
                    font_size
                };
            }
        }
    }
    glyphs
}

// ---- transient gesture previews ----

fn push_gesture_preview(list: &mut DisplayList, editor: &Editor) {
    let color = editor.color();
    let width = editor.stroke_width();
    match editor.gesture() {
        Gesture::DrawingStroke { points } => {
            if points.len() > 1 {
                let marker = editor.tool() == Tool::Marker;
                list.items.push(DisplayItem::Stroke {
                    points: points.clone(),
                    color,
                    width,
                    marker,
                    opacity: if marker { MARKER_OPACITY } else { 1.0 },
                });
            }
        }
        Gesture::RubberBand { start, current } => {
            let b = Bounds::from_corners(*start, *current);
            list.items.push(DisplayItem::Path {
                path: rect_path(&b),
                color: ACCENT,
                width: 1.0,
                opacity: 1.0,
                dashed: true,
                filled: false,
            });
            list.items.push(DisplayItem::Path {
                path: rect_path(&b),
                color: ACCENT,
                width: 0.0,
                opacity: 0.1,
                dashed: false,
                filled: true,
            });
        }
        Gesture::DrawingShape { start, current, .. } => {
            if let Some(kind) = preview_kind(editor.tool(), *start, *current) {
                list.items.push(DisplayItem::Path {
                    path: shape_outline_path(&kind, width),
                    color,
                    width,
                    opacity: 1.0,
                    dashed: false,
                    filled: false,
                });
            }
        }
        Gesture::LabeledRectLeader {
            leader_start,
            current,
        } => {
            // Only preview once the leader has some length, so a bare
            // click shows nothing.
            if current.distance_to(leader_start) >= 10.0 {
                list.items.push(DisplayItem::Path {
                    path: segment_path(leader_start, current),
                    color,
                    width,
                    opacity: 1.0,
                    dashed: false,
                    filled: false,
                });
                list.items.push(DisplayItem::Dot {
                    at: *leader_start,
                    radius: width.max(2.0),
                    color,
                });
            }
        }
        Gesture::LabeledRectSquare {
            leader_start,
            leader_end,
            rect_start,
            current,
        } => {
            list.items.push(DisplayItem::Path {
                path: segment_path(leader_start, leader_end),
                color,
                width,
                opacity: 1.0,
                dashed: false,
                filled: false,
            });
            let b = Bounds::from_corners(*rect_start, *current);
            let side = b.width().min(b.height());
            if side > 0.0 {
                list.items.push(DisplayItem::Path {
                    path: rect_path(&Bounds::new(
                        b.min_x,
                        b.min_y,
                        b.min_x + side,
                        b.min_y + side,
                    )),
                    color,
                    width,
                    opacity: 1.0,
                    dashed: false,
                    filled: false,
                });
            }
            list.items.push(DisplayItem::Dot {
                at: *leader_start,
                radius: width.max(2.0),
                color,
            });
        }
        Gesture::LeaderFollow {
            leader_start,
            leader_end,
            ..
        } => {
            list.items.push(DisplayItem::Path {
                path: segment_path(leader_start, leader_end),
                color,
                width: 2.0,
                opacity: 1.0,
                dashed: true,
                filled: false,
            });
            list.items.push(DisplayItem::Dot {
                at: *leader_start,
                radius: 3.0,
                color,
            });
        }
        Gesture::DrawingPolyline { vertices, current } => {
            if vertices.len() >= 2 {
                list.items.push(DisplayItem::Path {
                    path: shape_outline_path(
                        &ShapeKind::Polyline {
                            points: vertices.clone(),
                        },
                        width,
                    ),
                    color,
                    width,
                    opacity: 1.0,
                    dashed: false,
                    filled: false,
                });
            }
            if let Some(last) = vertices.last() {
                list.items.push(DisplayItem::Path {
                    path: segment_path(last, current),
                    color,
                    width,
                    opacity: 1.0,
                    dashed: true,
                    filled: false,
                });
            }
            for v in vertices {
                list.items.push(DisplayItem::Dot {
                    at: *v,
                    radius: 4.0,
                    color,
                });
            }
        }
        Gesture::PlacingImage { start, current } => {
            if let Some(pixels) = editor.pending_image() {
                // Preview with the same aspect fit the commit applies.
                let (w, h) = crate::model::aspect_fit(
                    pixels.width() as f64,
                    pixels.height() as f64,
                    current.x - start.x,
                    current.y - start.y,
                );
                let b = Bounds::from_corners(*start, Point::new(start.x + w, start.y + h));
                list.items.push(DisplayItem::Image {
                    pixels: Arc::clone(pixels),
                    bounds: b,
                    opacity: 1.0,
                    selected: false,
                });
                list.items.push(DisplayItem::Path {
                    path: rect_path(&b),
                    color: Color::BLACK,
                    width: 1.0,
                    opacity: 1.0,
                    dashed: true,
                    filled: false,
                });
            }
        }
        _ => {}
    }
}

fn preview_kind(tool: Tool, start: Point, end: Point) -> Option<ShapeKind> {
    Some(match tool {
        Tool::Rect | Tool::RectAnnotated => ShapeKind::Rect { start, end },
        Tool::Ellipse | Tool::EllipseAnnotated => ShapeKind::Ellipse { start, end },
        Tool::Line | Tool::LineAnnotated => ShapeKind::Line { start, end },
        Tool::Arrow => ShapeKind::Arrow { start, end },
        Tool::DoubleArrow => ShapeKind::DoubleArrow { start, end },
        _ => return None,
    })
}

// ---- selection chrome ----

fn push_selection_chrome(list: &mut DisplayList, editor: &Editor) {
    let scene = editor.scene();
    let selection = editor.selection();

    if let Some(bounds) = selection.bounds() {
        if !selection.is_empty() {
            let padded = Bounds::new(
                bounds.min_x - SELECTION_PADDING,
                bounds.min_y - SELECTION_PADDING,
                bounds.max_x + SELECTION_PADDING,
                bounds.max_y + SELECTION_PADDING,
            );
            list.items.push(DisplayItem::SelectionBox {
                bounds: padded,
                color: ACCENT,
                handles: true,
            });
            return;
        }
    }

    if let Some(shape_id) = selection.annotation_shape() {
        if let Some(ann) = scene.shape(shape_id).and_then(|s| s.annotation.as_ref()) {
            if let Some(text_bounds) = metrics::annotation_text_bounds(ann) {
                list.items.push(DisplayItem::SelectionBox {
                    bounds: Bounds::new(
                        text_bounds.min_x - SELECTION_PADDING,
                        text_bounds.min_y - SELECTION_PADDING,
                        text_bounds.max_x + SELECTION_PADDING,
                        text_bounds.max_y + SELECTION_PADDING,
                    ),
                    color: ANNOTATION_ACCENT,
                    handles: false,
                });
            }
            list.items.push(DisplayItem::Handle {
                at: ann.leader.end,
                color: ANNOTATION_ACCENT,
            });
        }
    }

    if let Some(shape_id) = selection.font_label_shape() {
        if let Some(label) = scene.shape(shape_id).and_then(|s| s.font_label.as_ref()) {
            let bounds = metrics::font_label_bounds(label);
            list.items.push(DisplayItem::SelectionBox {
                bounds: Bounds::new(
                    bounds.min_x - 4.0,
                    bounds.min_y - 4.0,
                    bounds.max_x + 4.0,
                    bounds.max_y + 4.0,
                ),
                color: ANNOTATION_ACCENT,
                handles: false,
            });
        }
    }
}
