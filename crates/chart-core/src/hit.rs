// File: crates/chart-core/src/hit.rs
// Summary: Hit-testing drawings against a pointer position using the current transform.

use crate::drawing::{Drawing, DrawingId, Shape};
use crate::geometry::{distance_to_segment, PointF, RectF};
use crate::transform::CoordinateTransform;
use crate::types::HIT_PAD;

/// Id of the drawing under `pointer`, newest first; `None` when nothing is hit.
///
/// `drawings` is in insertion order.
pub fn hit_test(pointer: PointF, drawings: &[&Drawing], transform: &CoordinateTransform<'_>) -> Option<DrawingId> {
    hit_test_with_pad(pointer, drawings, transform, HIT_PAD)
}

pub fn hit_test_with_pad(
    pointer: PointF,
    drawings: &[&Drawing],
    transform: &CoordinateTransform<'_>,
    pad: f64,
) -> Option<DrawingId> {
    drawings
        .iter()
        .rev()
        .find(|d| hits(pointer, &d.shape, transform, pad))
        .map(|d| d.id.clone())
}

fn hits(p: PointF, shape: &Shape, t: &CoordinateTransform<'_>, pad: f64) -> bool {
    match shape {
        Shape::HorizontalLine { at } => {
            let layout = t.layout();
            let y = t.price_to_pixel_y(at.price);
            RectF::from_ltrb(layout.plot_left(), y - pad, layout.plot_right(), y + pad).contains(p)
        }
        Shape::Trendline { from, to } => match (t.point_to_pixel(from), t.point_to_pixel(to)) {
            (Some(a), Some(b)) => distance_to_segment(p, a, b) <= pad,
            _ => false,
        },
        Shape::Rectangle { a, b } => match (t.point_to_pixel(a), t.point_to_pixel(b)) {
            // Stroke only: inside the padded outline but not deep inside the body.
            (Some(a), Some(b)) => {
                let r = RectF::from_corners(a, b);
                let outer = r.outset(pad);
                let inner = r.outset(-pad);
                let in_body = inner.width() > 0.0
                    && inner.height() > 0.0
                    && p.x > inner.left
                    && p.x < inner.right
                    && p.y > inner.top
                    && p.y < inner.bottom;
                outer.contains(p) && !in_body
            }
            _ => false,
        },
    }
}
