// File: crates/chart-core/src/types.rs
// Summary: Shared layout types and constants (surface size, margins, volume band, interaction tuning).

/// Default surface width in pixels.
pub const WIDTH: u32 = 1024;
/// Default surface height in pixels.
pub const HEIGHT: u32 = 640;

/// Smallest number of candles the viewport may show.
pub const MIN_VISIBLE_CANDLES: usize = 10;
/// Fraction of the visible window added or removed per wheel notch.
pub const ZOOM_FACTOR: f64 = 0.1;
/// Extra pixels around a drawing's stroke that still count as a hit.
pub const HIT_PAD: f64 = 5.0;
/// Price axis padding as a fraction of the visible price range, applied on each side.
pub const PRICE_PADDING: f64 = 0.05;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(10, 60, 10, 30)
    }
}

/// Pixel geometry of the chart surface.
///
/// The plot spans `[insets.left, width - insets.right]` horizontally. Vertically the price
/// area starts at `insets.top` and is followed by a volume band of `volume_height` pixels,
/// then the bottom inset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub insets: Insets,
    pub volume_height: u32,
}

impl ChartLayout {
    pub fn new(width: u32, height: u32, insets: Insets, volume_height: u32) -> Self {
        Self { width, height, insets, volume_height }
    }

    pub fn plot_left(&self) -> f64 { self.insets.left as f64 }
    pub fn plot_right(&self) -> f64 { self.width as f64 - self.insets.right as f64 }
    /// Plot width in pixels; never negative.
    pub fn plot_width(&self) -> f64 { (self.plot_right() - self.plot_left()).max(0.0) }
    pub fn price_top(&self) -> f64 { self.insets.top as f64 }
    /// Height of the price area; zero when the surface is too small.
    pub fn price_height(&self) -> f64 {
        (self.height as f64 - self.insets.vsum() as f64 - self.volume_height as f64).max(0.0)
    }
    pub fn price_bottom(&self) -> f64 { self.price_top() + self.price_height() }
    pub fn volume_top(&self) -> f64 { self.price_bottom() }
    pub fn volume_bottom(&self) -> f64 { self.volume_top() + self.volume_height as f64 }

    /// Whether a pixel lies inside the plot (price area plus volume band).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.plot_left() && x <= self.plot_right() && y >= self.price_top() && y <= self.volume_bottom()
    }
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT, Insets::default(), 80)
    }
}
