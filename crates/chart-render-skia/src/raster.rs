// File: crates/chart-render-skia/src/raster.rs
// Summary: Skia drawing of scene primitives and PNG encoding.

use std::path::Path;

use anyhow::{anyhow, Result};
use skia_safe as skia;
use tracing::debug;

use chart_core::scene::{StrokeStyle, HANDLE_OUTLINE};
use chart_core::{ChartLayout, Primitive, Rgba, Scene};

use crate::RenderOptions;

fn color(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn fill_paint(c: Rgba) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color(c));
    paint
}

fn stroke_paint(s: &StrokeStyle, dash: &[f32; 2]) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(s.width as f32);
    paint.set_color(color(s.color));
    if s.dashed {
        paint.set_path_effect(skia::PathEffect::dash(dash, 0.0));
    }
    paint
}

fn pt(p: chart_core::geometry::PointF) -> skia::Point {
    skia::Point::new(p.x as f32, p.y as f32)
}

fn sk_rect(r: chart_core::geometry::RectF) -> skia::Rect {
    skia::Rect::from_ltrb(r.left as f32, r.top as f32, r.right as f32, r.bottom as f32)
}

fn draw_scene(canvas: &skia::Canvas, scene: &Scene, opts: &RenderOptions) {
    for prim in &scene.primitives {
        match *prim {
            Primitive::Line { from, to, stroke } => {
                canvas.draw_line(pt(from), pt(to), &stroke_paint(&stroke, &opts.dash));
            }
            Primitive::Rect { rect, fill, stroke } => {
                let r = sk_rect(rect);
                if let Some(fill) = fill {
                    canvas.draw_rect(r, &fill_paint(fill));
                }
                if let Some(stroke) = stroke {
                    canvas.draw_rect(r, &stroke_paint(&stroke, &opts.dash));
                }
            }
            Primitive::Handle { center, radius, fill } => {
                let outline = StrokeStyle { color: HANDLE_OUTLINE, width: 1.0, dashed: false };
                canvas.draw_circle(pt(center), radius as f32, &fill_paint(fill));
                canvas.draw_circle(pt(center), radius as f32, &stroke_paint(&outline, &opts.dash));
            }
            Primitive::Tag { .. } => {}
        }
    }
}

/// Margin markers, drawn after the plot clip is lifted.
fn draw_tags(canvas: &skia::Canvas, scene: &Scene) {
    for prim in &scene.primitives {
        if let Primitive::Tag { rect, fill } = *prim {
            canvas.draw_round_rect(sk_rect(rect), 2.0, 2.0, &fill_paint(fill));
        }
    }
}

/// Render `scene` and return PNG bytes.
pub fn render_png(scene: &Scene, layout: &ChartLayout, opts: &RenderOptions) -> Result<Vec<u8>> {
    let mut surface = skia::surfaces::raster_n32_premul((opts.width as i32, opts.height as i32))
        .ok_or_else(|| anyhow!("failed to create raster surface"))?;
    let canvas = surface.canvas();
    canvas.clear(color(opts.background));

    canvas.save();
    if opts.clip_to_plot {
        let plot = skia::Rect::from_ltrb(
            layout.plot_left() as f32,
            layout.price_top() as f32,
            layout.plot_right() as f32,
            layout.volume_bottom() as f32,
        );
        canvas.clip_rect(plot, skia::ClipOp::Intersect, true);
    }
    draw_scene(canvas, scene, opts);
    canvas.restore();
    draw_tags(canvas, scene);

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow!("encode PNG failed"))?;
    debug!(primitives = scene.len(), bytes = data.len(), "scene rasterized");
    Ok(data.as_bytes().to_vec())
}

/// Render `scene` to a PNG file, creating parent directories.
pub fn render_to_png(scene: &Scene, layout: &ChartLayout, opts: &RenderOptions, path: impl AsRef<Path>) -> Result<()> {
    let bytes = render_png(scene, layout, opts)?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
