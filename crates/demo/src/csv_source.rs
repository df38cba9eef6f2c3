// File: crates/demo/src/csv_source.rs
// Summary: Candle input for the demo: Binance-like OHLCV CSV, or a deterministic synthetic walk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate};
use tracing::{debug, info, warn};

use chart_core::{Candle, CandleSeries};

/// Candle file named on the command line. A missing `x.csv` falls back to a sibling `x.cvs`
/// (and the other way round), a common typo in exported data sets.
pub fn locate_csv(arg: &str) -> Result<PathBuf> {
    let named = PathBuf::from(arg);
    if named.is_file() {
        return Ok(named);
    }
    let sibling = match named.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("csv") => Some(named.with_extension("cvs")),
        Some("cvs") => Some(named.with_extension("csv")),
        _ => None,
    };
    match sibling {
        Some(alt) if alt.is_file() => {
            debug!(requested = %named.display(), using = %alt.display(), "candle file extension swapped");
            Ok(alt)
        }
        _ => bail!("candle file not found: {}", named.display()),
    }
}

/// Load OHLCV rows. Rows without a parseable time or OHLC, or violating OHLC bounds, are skipped.
pub fn load_ohlc_csv(path: &Path) -> Result<Vec<Candle>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    debug!(?headers, "csv headers");

    let idx = |names: &[&str]| -> Option<usize> { headers.iter().position(|h| names.contains(&h.as_str())) };

    let i_time = idx(&["time", "timestamp", "open_time", "date", "datetime"]);
    let i_open = idx(&["open", "o"]);
    let i_high = idx(&["high", "h"]);
    let i_low = idx(&["low", "l"]);
    let i_close = idx(&["close", "c", "adj_close", "close_price"]);
    let i_volume = idx(&["volume", "v", "vol"]);

    let Some(i_time) = i_time else { bail!("no time column in {}", path.display()) };
    if i_open.is_none() || i_high.is_none() || i_low.is_none() || i_close.is_none() {
        bail!("could not find one of open/high/low/close columns in {}", path.display());
    }

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let parse = |i: Option<usize>| -> Option<f64> { i.and_then(|ix| rec.get(ix)).and_then(|s| s.trim().parse::<f64>().ok()) };
        let time = rec.get(i_time).and_then(parse_time);
        let volume = parse(i_volume).unwrap_or(0.0);
        let candle = match (time, parse(i_open), parse(i_high), parse(i_low), parse(i_close)) {
            (Some(t), Some(o), Some(h), Some(l), Some(c)) => Candle::try_new(t, o, h, l, c, volume).ok(),
            _ => None,
        };
        match candle {
            Some(c) => out.push(c),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "csv rows skipped");
    }
    Ok(out)
}

/// Unix seconds from epoch seconds, epoch milliseconds, RFC 3339 or a `YYYY-MM-DD` date.
pub fn parse_time(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch ms -> sec
        return Some(if n > 10_i64.pow(12) { n / 1000 } else { n });
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

/// Sort by time and drop duplicate timestamps (first row wins), then build the series.
pub fn into_series(mut candles: Vec<Candle>) -> Result<CandleSeries> {
    candles.sort_by_key(|c| c.time);
    let before = candles.len();
    candles.dedup_by_key(|c| c.time);
    if candles.len() != before {
        warn!(dropped = before - candles.len(), "duplicate timestamps dropped");
    }
    Ok(CandleSeries::new(candles)?)
}

/// Deterministic random walk of `n` hourly candles.
pub fn synthetic_walk(n: usize) -> Vec<Candle> {
    let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed >> 11) as f64 / (1u64 << 53) as f64
    };
    let start = 1_700_000_000i64;
    let mut price = 100.0f64;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let open = price;
        let close = (open * (1.0 + (next() - 0.5) * 0.04)).max(1.0);
        let high = open.max(close) * (1.0 + next() * 0.01);
        let low = open.min(close) * (1.0 - next() * 0.01);
        let volume = 1_000.0 + next() * 9_000.0;
        out.push(Candle { time: start + i as i64 * 3_600, open, high, low, close, volume });
        price = close;
    }
    info!(n, "synthetic candles generated");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_in_common_formats() {
        assert_eq!(parse_time("1700000000"), Some(1_700_000_000));
        assert_eq!(parse_time("1700000000123"), Some(1_700_000_000));
        assert_eq!(parse_time("2023-11-14T22:13:20Z"), Some(1_700_000_000));
        assert_eq!(parse_time("1970-01-02"), Some(86_400));
        assert_eq!(parse_time("yesterday"), None);
    }

    #[test]
    fn csv_rows_become_sorted_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candles.csv");
        std::fs::write(
            &path,
            "Timestamp,Open,High,Low,Close,Volume\n\
             200,2,3,1,2.5,10\n\
             100,1,2,0.5,1.5,20\n\
             100,1,2,0.5,1.5,20\n\
             300,5,4,1,2,30\n\
             bad,1,2,0.5,1.5,20\n",
        )
        .unwrap();
        let candles = load_ohlc_csv(&path).unwrap();
        assert_eq!(candles.len(), 3);
        let series = into_series(candles).unwrap();
        let times: Vec<i64> = series.candles().iter().map(|c| c.time).collect();
        assert_eq!(times, vec![100, 200]);
    }

    #[test]
    fn misspelled_extension_falls_back_to_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("btc.cvs");
        std::fs::write(&real, "time,open,high,low,close\n").unwrap();
        let asked = dir.path().join("btc.csv");
        assert_eq!(locate_csv(asked.to_str().unwrap()).unwrap(), real);
        assert!(locate_csv(dir.path().join("eth.csv").to_str().unwrap()).is_err());
    }

    #[test]
    fn synthetic_walk_is_a_valid_series() {
        let series = into_series(synthetic_walk(500)).unwrap();
        assert_eq!(series.len(), 500);
        assert!(series.candles().iter().all(|c| c.low <= c.open.min(c.close) && c.high >= c.open.max(c.close)));
    }
}
