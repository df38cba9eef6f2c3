// File: crates/chart-core/src/series.rs
// Summary: Candle model and the immutable, time-ordered candle series the chart reads from.
// Notes:
// - A series is supplied wholesale by the data-fetch collaborator and never patched.
// - Each constructed series carries a generation id; a changed id is the reset signal
//   for viewport and pending drawing points.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

static NEXT_SERIES_ID: AtomicU64 = AtomicU64::new(1);

/// One OHLCV bucket. `time` is unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Try to construct a candle enforcing OHLC invariants:
    /// l <= min(o,c) and h >= max(o,c), and l <= h.
    pub fn try_new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Result<Self, SeriesError> {
        let lo = open.min(close);
        let hi = open.max(close);
        if low > lo { return Err(SeriesError::InvalidOhlc { time, reason: "low above min(open,close)" }); }
        if high < hi { return Err(SeriesError::InvalidOhlc { time, reason: "high below max(open,close)" }); }
        if low > high { return Err(SeriesError::InvalidOhlc { time, reason: "low above high" }); }
        Ok(Self { time, open, high, low, close, volume })
    }

    pub fn is_up(&self) -> bool { self.close >= self.open }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("candle at {time} has invalid OHLC: {reason}")]
    InvalidOhlc { time: i64, reason: &'static str },
    #[error("timestamps not strictly ascending at index {index} ({prev} then {next})")]
    Unordered { index: usize, prev: i64, next: i64 },
}

/// Opaque identity of a candle series instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeriesId(u64);

/// Immutable ordered candle sequence for one instrument/interval.
/// Cloning is cheap and preserves identity.
#[derive(Clone, Debug)]
pub struct CandleSeries {
    id: SeriesId,
    candles: Arc<[Candle]>,
}

impl CandleSeries {
    /// Build a series, rejecting unsorted or duplicate timestamps.
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        for (i, w) in candles.windows(2).enumerate() {
            if w[1].time <= w[0].time {
                return Err(SeriesError::Unordered { index: i + 1, prev: w[0].time, next: w[1].time });
            }
        }
        Ok(Self::from_sorted(candles))
    }

    /// Build a series from data the caller already guarantees is sorted and unique.
    pub fn from_sorted(candles: Vec<Candle>) -> Self {
        Self { id: SeriesId(NEXT_SERIES_ID.fetch_add(1, Ordering::Relaxed)), candles: candles.into() }
    }

    pub fn empty() -> Self { Self::from_sorted(Vec::new()) }

    pub fn id(&self) -> SeriesId { self.id }
    pub fn len(&self) -> usize { self.candles.len() }
    pub fn is_empty(&self) -> bool { self.candles.is_empty() }
    pub fn candles(&self) -> &[Candle] { &self.candles }
    pub fn get(&self, index: usize) -> Option<&Candle> { self.candles.get(index) }

    /// Candles in the inclusive index range, clipped to the series.
    pub fn window(&self, start: usize, end: usize) -> &[Candle] {
        if self.candles.is_empty() || start > end { return &[]; }
        let end = end.min(self.candles.len() - 1);
        if start > end { return &[]; }
        &self.candles[start..=end]
    }
}

/// Lowest low and highest high over `candles`, or `None` when empty.
pub fn price_extent(candles: &[Candle]) -> Option<(f64, f64)> {
    if candles.is_empty() { return None; }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for c in candles {
        lo = lo.min(c.low);
        hi = hi.max(c.high);
    }
    Some((lo, hi))
}

/// Highest volume over `candles` (0 when empty).
pub fn max_volume(candles: &[Candle]) -> f64 {
    candles.iter().fold(0.0f64, |m, c| m.max(c.volume))
}
