// File: crates/chart-core/src/scale.rs
// Summary: Index (X) and price (Y) scale transforms between data space and pixels.

use crate::types::PRICE_PADDING;

/// Logical X coordinate: a (possibly fractional) candle index.
pub type Logical = f64;
/// Value Y coordinate: a price.
pub type Value = f64;

/// Horizontal scale mapping the inclusive index range `[start, end]` onto `[left_px, right_px]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexScale {
    pub left_px: f64,
    pub right_px: f64,
    pub start: usize,
    pub end: usize,
}

impl IndexScale {
    pub fn new(left_px: f64, right_px: f64, start: usize, end: usize) -> Self {
        Self { left_px, right_px, start, end: end.max(start) }
    }

    /// Pixels between two adjacent candles; the full plot width for a one-candle window.
    pub fn spacing(&self) -> f64 {
        let span = (self.end - self.start) as f64;
        if span < 1.0 { self.right_px - self.left_px } else { (self.right_px - self.left_px) / span }
    }

    #[inline]
    pub fn to_px(&self, i: Logical) -> f64 {
        if self.end == self.start {
            return (self.left_px + self.right_px) * 0.5;
        }
        let span = (self.end - self.start) as f64;
        self.left_px + (i - self.start as f64) / span * (self.right_px - self.left_px)
    }

    /// Fractional index under `px`; unclamped.
    #[inline]
    pub fn from_px(&self, px: f64) -> Logical {
        let width = self.right_px - self.left_px;
        if self.end == self.start || width.abs() < 1e-12 {
            return self.start as f64;
        }
        let span = (self.end - self.start) as f64;
        self.start as f64 + (px - self.left_px) / width * span
    }

    /// Nearest whole index under `px`, clamped to `[start, end]`.
    pub fn nearest(&self, px: f64) -> usize {
        let i = self.from_px(px).round();
        if !i.is_finite() || i <= self.start as f64 { return self.start; }
        if i >= self.end as f64 { return self.end; }
        i as usize
    }
}

/// Vertical price scale mapping `[vmin, vmax]` onto `[bottom_px, top_px]` (higher price, smaller y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceScale {
    pub top_px: f64,
    pub bottom_px: f64,
    pub vmin: Value,
    pub vmax: Value,
}

impl PriceScale {
    pub fn new_linear(top_px: f64, bottom_px: f64, vmin: Value, vmax: Value) -> Self {
        Self { top_px, bottom_px, vmin, vmax }
    }

    /// Scale over `[lo, hi]` widened by `PRICE_PADDING` of the range on each side.
    pub fn padded(top_px: f64, bottom_px: f64, lo: Value, hi: Value) -> Self {
        let pad = (hi - lo) * PRICE_PADDING;
        Self::new_linear(top_px, bottom_px, lo - pad, hi + pad)
    }

    #[inline]
    pub fn to_px(&self, y: Value) -> f64 {
        let span = self.vmax - self.vmin;
        if span.abs() < 1e-12 {
            return (self.top_px + self.bottom_px) * 0.5;
        }
        self.bottom_px - (y - self.vmin) / span * (self.bottom_px - self.top_px)
    }

    #[inline]
    pub fn from_px(&self, py: f64) -> Value {
        let height = self.bottom_px - self.top_px;
        if height.abs() < 1e-12 {
            return self.vmin;
        }
        self.vmin + (self.bottom_px - py) / height * (self.vmax - self.vmin)
    }
}
