// File: crates/chart-render-skia/src/lib.rs
// Summary: Renders a chart scene (display list) to PNG with a Skia CPU raster surface.
// Notes:
// - Without the `raster` feature only the options type is available, so hosts can carry
//   render settings without linking Skia.

use chart_core::{ChartLayout, Rgba};

#[cfg(feature = "raster")]
mod raster;
#[cfg(feature = "raster")]
pub use raster::{render_png, render_to_png};

/// Whether this build can rasterize.
pub const fn raster_enabled() -> bool { cfg!(feature = "raster") }

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    /// On/off lengths for dashed strokes, in pixels.
    pub dash: [f32; 2],
    /// Clip primitives to the plot area (price area plus volume band).
    pub clip_to_plot: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: chart_core::types::WIDTH,
            height: chart_core::types::HEIGHT,
            background: Rgba::new(18, 18, 20, 255), // near-black
            dash: [6.0, 4.0],
            clip_to_plot: true,
        }
    }
}

impl RenderOptions {
    /// Options sized to `layout`.
    pub fn for_layout(layout: &ChartLayout) -> Self {
        Self { width: layout.width, height: layout.height, ..Self::default() }
    }
}
