// File: crates/chart-core/src/scene.rs
// Summary: Renderer-agnostic display list for one frame: candles, volume, drawings, preview.

use crate::drawing::{Drawing, DrawingPoint, Shape, ToolType, DEFAULT_COLOR};
use crate::geometry::{PointF, RectF};
use crate::session::Frame;
use crate::transform::CoordinateTransform;

pub const CANDLE_UP: Rgba = Rgba::new(40, 200, 120, 255);
pub const CANDLE_DOWN: Rgba = Rgba::new(220, 80, 80, 255);
pub const HANDLE_OUTLINE: Rgba = Rgba::new(15, 17, 23, 255);

const STROKE_WIDTH: f64 = 1.5;
const SELECTED_STROKE_WIDTH: f64 = 2.0;
const HANDLE_RADIUS: f64 = 4.0;
const TAG_WIDTH: f64 = 6.0;
const TAG_HEIGHT: f64 = 16.0;
const TAG_GAP: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self { Self { r, g, b, a } }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        match hex.len() {
            6 => {
                let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
                Some(Self::new(byte(0)?, byte(2)?, byte(4)?, 255))
            }
            3 => Some(Self::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255)),
            _ => None,
        }
    }

    /// Parse a drawing color, falling back to the default palette color.
    pub fn from_drawing_color(s: &str) -> Self {
        Self::parse_hex(s)
            .or_else(|| Self::parse_hex(DEFAULT_COLOR))
            .unwrap_or(Self::new(59, 130, 246, 255))
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { a: (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    pub dashed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Line { from: PointF, to: PointF, stroke: StrokeStyle },
    Rect { rect: RectF, fill: Option<Rgba>, stroke: Option<StrokeStyle> },
    /// Selection handle: filled circle with a thin outline.
    Handle { center: PointF, radius: f64, fill: Rgba },
    /// Small marker in the right margin at a selected horizontal line's price. Not clipped to
    /// the plot.
    Tag { rect: RectF, fill: Rgba },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn len(&self) -> usize { self.primitives.len() }
    pub fn is_empty(&self) -> bool { self.primitives.is_empty() }
}

/// Build the display list for `frame`. `drawings` are the frame scope's drawings in insertion order.
pub fn build_scene(frame: &Frame, drawings: &[&Drawing], t: &CoordinateTransform<'_>) -> Scene {
    let mut out = Vec::new();
    push_candles(&mut out, t);
    for d in drawings {
        let selected = frame.selected.as_ref() == Some(&d.id);
        push_drawing(&mut out, d, selected, t);
    }
    push_preview(&mut out, frame, t);
    Scene { primitives: out }
}

fn push_candles(out: &mut Vec<Primitive>, t: &CoordinateTransform<'_>) {
    let layout = *t.layout();
    let body_w = (t.candle_spacing() * 0.7).clamp(1.0, 40.0);
    let base = t.bounds().start;
    for (k, c) in t.visible().iter().enumerate() {
        let x = t.index_to_pixel_x((base + k) as f64);
        let color = if c.is_up() { CANDLE_UP } else { CANDLE_DOWN };
        let wick = StrokeStyle { color, width: 1.0, dashed: false };
        out.push(Primitive::Line {
            from: PointF::new(x, t.price_to_pixel_y(c.high)),
            to: PointF::new(x, t.price_to_pixel_y(c.low)),
            stroke: wick,
        });
        let y_o = t.price_to_pixel_y(c.open);
        let y_c = t.price_to_pixel_y(c.close);
        let top = y_o.min(y_c);
        let bottom = y_o.max(y_c).max(top + 1.0);
        let half = body_w * 0.5;
        out.push(Primitive::Rect { rect: RectF::from_ltrb(x - half, top, x + half, bottom), fill: Some(color), stroke: None });

        let h = t.volume_to_pixel_height(c.volume);
        if h > 0.0 {
            let vb = layout.volume_bottom();
            out.push(Primitive::Rect {
                rect: RectF::from_ltrb(x - half, vb - h, x + half, vb),
                fill: Some(color.with_opacity(0.4)),
                stroke: None,
            });
        }
    }
}

fn push_drawing(out: &mut Vec<Primitive>, d: &Drawing, selected: bool, t: &CoordinateTransform<'_>) {
    let color = Rgba::from_drawing_color(&d.color);
    let width = if selected { SELECTED_STROKE_WIDTH } else { STROKE_WIDTH };
    match d.shape {
        Shape::HorizontalLine { at } => {
            let layout = t.layout();
            let y = t.price_to_pixel_y(at.price);
            let from = PointF::new(layout.plot_left(), y);
            let to = PointF::new(layout.plot_right(), y);
            out.push(Primitive::Line { from, to, stroke: StrokeStyle { color, width, dashed: !selected } });
            if selected {
                out.push(Primitive::Tag {
                    rect: RectF::from_ltrb(
                        to.x + TAG_GAP,
                        y - TAG_HEIGHT * 0.5,
                        to.x + TAG_GAP + TAG_WIDTH,
                        y + TAG_HEIGHT * 0.5,
                    ),
                    fill: color,
                });
                push_handles(out, &[from, to], color);
            }
        }
        Shape::Trendline { from, to } => {
            let (Some(a), Some(b)) = (t.point_to_pixel(&from), t.point_to_pixel(&to)) else { return };
            out.push(Primitive::Line { from: a, to: b, stroke: StrokeStyle { color, width, dashed: false } });
            if selected {
                push_handles(out, &[a, b], color);
            }
        }
        Shape::Rectangle { a, b } => {
            let (Some(a), Some(b)) = (t.point_to_pixel(&a), t.point_to_pixel(&b)) else { return };
            let rect = RectF::from_corners(a, b);
            out.push(Primitive::Rect {
                rect,
                fill: Some(color.with_opacity(0.08)),
                stroke: Some(StrokeStyle { color, width, dashed: false }),
            });
            if selected {
                push_handles(out, &rect.corners(), color);
            }
        }
    }
}

fn push_handles(out: &mut Vec<Primitive>, centers: &[PointF], fill: Rgba) {
    for &center in centers {
        out.push(Primitive::Handle { center, radius: HANDLE_RADIUS, fill });
    }
}

fn push_preview(out: &mut Vec<Primitive>, frame: &Frame, t: &CoordinateTransform<'_>) {
    let (Some(tool), Some(preview)) = (frame.active_tool, frame.preview) else { return };
    let color = Rgba::from_drawing_color(&frame.color);
    let layout = t.layout();
    let hline = |p: &DrawingPoint, opacity: f64| {
        let y = t.price_to_pixel_y(p.price);
        Primitive::Line {
            from: PointF::new(layout.plot_left(), y),
            to: PointF::new(layout.plot_right(), y),
            stroke: StrokeStyle { color: color.with_opacity(opacity), width: STROKE_WIDTH, dashed: true },
        }
    };

    if frame.pending.is_empty() {
        // Guide under the cursor before the first click.
        if tool == ToolType::HorizontalLine {
            out.push(hline(&preview, 0.5));
        }
        return;
    }

    let stroke = StrokeStyle { color: color.with_opacity(0.7), width: STROKE_WIDTH, dashed: true };
    let first = frame.pending[0];
    match tool {
        ToolType::HorizontalLine => out.push(hline(&first, 0.7)),
        ToolType::Trendline => {
            if let (Some(a), Some(b)) = (t.point_to_pixel(&first), t.point_to_pixel(&preview)) {
                out.push(Primitive::Line { from: a, to: b, stroke });
            }
        }
        ToolType::Rectangle => {
            if let (Some(a), Some(b)) = (t.point_to_pixel(&first), t.point_to_pixel(&preview)) {
                out.push(Primitive::Rect {
                    rect: RectF::from_corners(a, b),
                    fill: Some(color.with_opacity(0.05)),
                    stroke: Some(stroke),
                });
            }
        }
    }
}
