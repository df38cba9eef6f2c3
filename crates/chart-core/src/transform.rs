// File: crates/chart-core/src/transform.rs
// Summary: Coordinate transform between candle index, pixels and (time, price) for one frame.
// Notes:
// - The X axis is candle index, not wall-clock time, so gaps in the series do not distort
//   the layout. Times are resolved to indices by binary search over the visible candles.
// - Everything here is total: out-of-range input clamps, empty input yields degenerate
//   but finite results.

use crate::drawing::DrawingPoint;
use crate::geometry::{lerp, PointF};
use crate::scale::{IndexScale, PriceScale};
use crate::series::{max_volume, price_extent, Candle, CandleSeries};
use crate::types::ChartLayout;
use crate::view::ViewBounds;

/// Pixel mapping for the current layout and visible window. Cheap to rebuild per frame.
#[derive(Clone, Debug)]
pub struct CoordinateTransform<'a> {
    layout: ChartLayout,
    index: IndexScale,
    price: PriceScale,
    visible: &'a [Candle],
    max_volume: f64,
}

impl<'a> CoordinateTransform<'a> {
    pub fn new(layout: ChartLayout, series: &'a CandleSeries, bounds: ViewBounds) -> Self {
        let visible = series.window(bounds.start, bounds.end);
        let end = if visible.is_empty() { bounds.start } else { bounds.start + visible.len() - 1 };
        let index = IndexScale::new(layout.plot_left(), layout.plot_right(), bounds.start, end);
        let (lo, hi) = price_extent(visible).unwrap_or((0.0, 0.0));
        let price = PriceScale::padded(layout.price_top(), layout.price_bottom(), lo, hi);
        Self { layout, index, price, visible, max_volume: max_volume(visible) }
    }

    pub fn layout(&self) -> &ChartLayout { &self.layout }
    pub fn bounds(&self) -> ViewBounds { ViewBounds::new(self.index.start, self.index.end) }
    pub fn visible(&self) -> &'a [Candle] { self.visible }
    /// Padded `(min, max)` of the price axis.
    pub fn price_range(&self) -> (f64, f64) { (self.price.vmin, self.price.vmax) }
    /// Pixels between adjacent candles.
    pub fn candle_spacing(&self) -> f64 { self.index.spacing() }

    pub fn index_to_pixel_x(&self, i: f64) -> f64 { self.index.to_px(i) }
    pub fn price_to_pixel_y(&self, p: f64) -> f64 { self.price.to_px(p) }
    /// Nearest visible index under `x`.
    pub fn pixel_to_index(&self, x: f64) -> usize { self.index.nearest(x) }
    pub fn pixel_to_price(&self, y: f64) -> f64 { self.price.from_px(y) }

    /// Pixel x of timestamp `t`, pinned to the window edge when `t` is outside it and
    /// interpolated by index between bracketing candles. `None` only with no visible candles.
    pub fn time_to_pixel_x(&self, t: i64) -> Option<f64> {
        let v = self.visible;
        let first = v.first()?;
        let last = v[v.len() - 1];
        let base = self.index.start as f64;
        if t <= first.time {
            return Some(self.index.to_px(base));
        }
        if t >= last.time {
            return Some(self.index.to_px(base + (v.len() - 1) as f64));
        }
        // First candle with time >= t; 1..len-1 given the edge checks above.
        let k = v.partition_point(|c| c.time < t);
        if v[k].time == t {
            return Some(self.index.to_px(base + k as f64));
        }
        let (t1, t2) = (v[k - 1].time, v[k].time);
        let ratio = (t - t1) as f64 / (t2 - t1) as f64;
        let x1 = self.index.to_px(base + (k - 1) as f64);
        let x2 = self.index.to_px(base + k as f64);
        Some(lerp(x1, x2, ratio))
    }

    /// Data-space point under a pixel: time of the nearest visible candle, price by inverse scale.
    pub fn pixel_to_point(&self, x: f64, y: f64) -> Option<DrawingPoint> {
        let i = self.pixel_to_index(x);
        let candle = self.visible.get(i - self.index.start)?;
        Some(DrawingPoint::new(self.pixel_to_price(y), candle.time))
    }

    /// Pixel position of a data point; `None` with no visible candles.
    pub fn point_to_pixel(&self, p: &DrawingPoint) -> Option<PointF> {
        let x = self.time_to_pixel_x(p.time)?;
        Some(PointF::new(x, self.price_to_pixel_y(p.price)))
    }

    /// Height of a volume bar in the volume band, scaled to the tallest visible bar.
    pub fn volume_to_pixel_height(&self, volume: f64) -> f64 {
        if self.max_volume <= 0.0 { return 0.0; }
        (volume / self.max_volume).clamp(0.0, 1.0) * self.layout.volume_height as f64
    }
}
