// File: crates/chart-core/src/view.rs
// Visible index window over the candle series: zoom toward the pointer, drag-to-pan, clamping.

use tracing::debug;

use crate::types::{ChartLayout, MIN_VISIBLE_CANDLES, ZOOM_FACTOR};

/// Inclusive index range `[start, end]` into the current series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewBounds {
    pub start: usize,
    pub end: usize,
}

impl ViewBounds {
    pub const fn new(start: usize, end: usize) -> Self { Self { start, end } }
    /// Number of candles in the window.
    pub const fn count(&self) -> usize { self.end - self.start + 1 }
}

/// Enforce the viewport invariants on a proposed window for a series of `len` candles.
///
/// The window is first widened to `MIN_VISIBLE_CANDLES` around its midpoint, then shifted
/// into `[0, len - 1]` keeping its width; a window wider than the series becomes the whole
/// series. Idempotent.
pub fn clamp(start: i64, end: i64, len: usize) -> ViewBounds {
    if len == 0 {
        return ViewBounds::new(0, 0);
    }
    let last = len as i64 - 1;
    let min_width = MIN_VISIBLE_CANDLES as i64 - 1;
    let (mut s, mut e) = if end < start { (end, start) } else { (start, end) };
    if e - s < min_width {
        let mid = s + (e - s) / 2;
        s = mid - min_width / 2;
        e = s + min_width;
    }
    let width = e - s;
    if width >= last {
        return ViewBounds::new(0, last as usize);
    }
    if s < 0 {
        s = 0;
        e = width;
    }
    if e > last {
        e = last;
        s = last - width;
    }
    ViewBounds::new(s as usize, e as usize)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    /// Pan in progress: pointer x and window at the moment the drag began.
    Dragging { origin_x: f64, origin: ViewBounds },
}

/// Viewport over a series of `len` candles. Owned by the chart session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    bounds: ViewBounds,
    len: usize,
    drag: DragState,
}

impl Viewport {
    /// Full-range viewport for a series of `len` candles.
    pub fn new(len: usize) -> Self {
        Self { bounds: clamp(0, len as i64 - 1, len), len, drag: DragState::Idle }
    }

    pub fn bounds(&self) -> ViewBounds { self.bounds }
    pub fn series_len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn is_dragging(&self) -> bool { matches!(self.drag, DragState::Dragging { .. }) }

    /// Show the whole series.
    pub fn reset(&mut self) {
        self.bounds = clamp(0, self.len as i64 - 1, self.len);
        self.drag = DragState::Idle;
    }

    /// Re-target to a series of a different length and reset.
    pub fn reset_to(&mut self, len: usize) {
        self.len = len;
        self.reset();
        debug!(len, start = self.bounds.start, end = self.bounds.end, "viewport reset");
    }

    /// Set the window directly (clamped).
    pub fn set_bounds(&mut self, start: i64, end: i64) {
        self.bounds = clamp(start, end, self.len);
    }

    /// Grow (`delta > 0`) or shrink (`delta < 0`) the window by `delta` candles, split around
    /// `pivot_ratio` (0 = left edge, 1 = right edge) so the side nearer the pivot moves less.
    pub fn zoom(&mut self, pivot_ratio: f64, delta: f64) {
        if self.len == 0 || !delta.is_finite() || delta == 0.0 {
            return;
        }
        let p = if pivot_ratio.is_finite() { pivot_ratio.clamp(0.0, 1.0) } else { 0.5 };
        // At least one whole candle per step so small windows still move.
        let delta = delta.signum() * delta.abs().max(1.0);
        let start = (self.bounds.start as f64 - delta * p).round() as i64;
        let end = (self.bounds.end as f64 + delta * (1.0 - p)).round() as i64;
        self.bounds = clamp(start, end, self.len);
    }

    /// One wheel step at `pivot_ratio`; positive `notches` zoom out, negative zoom in.
    pub fn zoom_notches(&mut self, pivot_ratio: f64, notches: f64) {
        let delta = self.bounds.count() as f64 * ZOOM_FACTOR * notches;
        self.zoom(pivot_ratio, delta);
    }

    /// Shift the window by `delta_candles` (rounded to whole candles).
    pub fn pan(&mut self, delta_candles: f64) {
        if self.len == 0 || !delta_candles.is_finite() {
            return;
        }
        let d = delta_candles.round() as i64;
        self.bounds = clamp(self.bounds.start as i64 + d, self.bounds.end as i64 + d, self.len);
    }

    /// Convert a horizontal drag in pixels to candles; dragging right reveals earlier candles.
    pub fn pixels_to_candles(&self, dx_px: f64, layout: &ChartLayout) -> f64 {
        let plot_w = layout.plot_width().max(1.0);
        -dx_px / plot_w * self.bounds.count() as f64
    }

    /// Zoom one wheel step around the pointer's horizontal position.
    pub fn zoom_at_pixel(&mut self, notches: f64, cursor_x: f64, layout: &ChartLayout) {
        let plot_w = layout.plot_width().max(1.0);
        let ratio = ((cursor_x - layout.plot_left()) / plot_w).clamp(0.0, 1.0);
        self.zoom_notches(ratio, notches);
    }

    pub fn begin_drag(&mut self, x: f64) {
        self.drag = DragState::Dragging { origin_x: x, origin: self.bounds };
    }

    /// Pan relative to the drag origin; sub-candle motion accumulates across events.
    pub fn drag_to(&mut self, x: f64, layout: &ChartLayout) {
        if let DragState::Dragging { origin_x, origin } = self.drag {
            self.bounds = origin;
            let d = self.pixels_to_candles(x - origin_x, layout);
            self.pan(d);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }
}
