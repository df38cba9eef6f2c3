// File: crates/chart-core/tests/viewport.rs
// Purpose: Viewport clamping, zoom/pan behaviour and the minimum visible window.

use chart_core::{clamp, ChartLayout, Insets, ViewBounds, Viewport, MIN_VISIBLE_CANDLES};

fn layout() -> ChartLayout {
    ChartLayout::new(1010, 600, Insets::new(10, 0, 10, 10), 80)
}

fn assert_invariants(b: ViewBounds, len: usize) {
    assert!(b.start <= b.end);
    assert!(b.end < len.max(1));
    if len >= MIN_VISIBLE_CANDLES {
        assert!(b.end - b.start >= MIN_VISIBLE_CANDLES - 1, "{b:?}");
    } else if len > 0 {
        assert_eq!(b, ViewBounds::new(0, len - 1));
    }
}

#[test]
fn clamp_is_idempotent() {
    for len in [0usize, 1, 5, 9, 10, 11, 100] {
        for s in (-30i64..130).step_by(7) {
            for e in (-30i64..130).step_by(5) {
                let once = clamp(s, e, len);
                let twice = clamp(once.start as i64, once.end as i64, len);
                assert_eq!(once, twice, "len={len} s={s} e={e}");
                assert_invariants(once, len);
            }
        }
    }
}

#[test]
fn clamp_recentres_narrow_windows() {
    assert_eq!(clamp(50, 52, 100), ViewBounds::new(47, 56));
    assert_eq!(clamp(0, 2, 100), ViewBounds::new(0, 9));
    assert_eq!(clamp(98, 99, 100), ViewBounds::new(90, 99));
}

#[test]
fn clamp_preserves_width_when_pinned() {
    assert_eq!(clamp(-5, 14, 100), ViewBounds::new(0, 19));
    assert_eq!(clamp(90, 109, 100), ViewBounds::new(80, 99));
    assert_eq!(clamp(-10, 200, 100), ViewBounds::new(0, 99));
}

#[test]
fn new_viewport_spans_series() {
    assert_eq!(Viewport::new(100).bounds(), ViewBounds::new(0, 99));
    assert_eq!(Viewport::new(3).bounds(), ViewBounds::new(0, 2));
    assert!(Viewport::new(0).is_empty());
}

#[test]
fn drag_left_half_width_pans_forward_by_half_window() {
    let mut v = Viewport::new(100);
    v.set_bounds(40, 59);
    v.begin_drag(600.0);
    v.drag_to(100.0, &layout());
    assert_eq!(v.bounds(), ViewBounds::new(50, 69));
    v.end_drag();
    assert!(!v.is_dragging());
}

#[test]
fn pan_stops_at_series_end() {
    let mut v = Viewport::new(100);
    v.set_bounds(75, 94);
    v.begin_drag(600.0);
    v.drag_to(100.0, &layout());
    assert_eq!(v.bounds(), ViewBounds::new(80, 99));
}

#[test]
fn drag_right_reveals_earlier_candles() {
    let mut v = Viewport::new(100);
    v.set_bounds(40, 59);
    let d = v.pixels_to_candles(250.0, &layout());
    assert!((d + 5.0).abs() < 1e-9);
    v.pan(d);
    assert_eq!(v.bounds(), ViewBounds::new(35, 54));
}

#[test]
fn small_drag_steps_accumulate() {
    let mut v = Viewport::new(100);
    v.set_bounds(40, 59);
    v.begin_drag(500.0);
    v.drag_to(490.0, &layout());
    assert_eq!(v.bounds().start, 40);
    v.drag_to(480.0, &layout());
    v.drag_to(470.0, &layout());
    assert_eq!(v.bounds().start, 41);
}

#[test]
fn zoom_keeps_pivot_side_fixed() {
    let mut v = Viewport::new(100);
    v.zoom(0.0, -10.0);
    assert_eq!(v.bounds(), ViewBounds::new(0, 89));

    let mut v = Viewport::new(100);
    v.zoom(1.0, -10.0);
    assert_eq!(v.bounds(), ViewBounds::new(10, 99));

    let mut v = Viewport::new(100);
    v.zoom(0.5, -10.0);
    assert_eq!(v.bounds(), ViewBounds::new(5, 94));
}

#[test]
fn zoom_out_past_series_shows_everything() {
    let mut v = Viewport::new(100);
    v.set_bounds(40, 59);
    for _ in 0..50 {
        v.zoom_notches(0.3, 1.0);
    }
    assert_eq!(v.bounds(), ViewBounds::new(0, 99));
}

#[test]
fn zoom_in_bottoms_out_at_minimum_window() {
    let mut v = Viewport::new(100);
    for _ in 0..100 {
        v.zoom_notches(0.5, -1.0);
    }
    assert_eq!(v.bounds().count(), MIN_VISIBLE_CANDLES);
    // and can zoom back out from there
    v.zoom_notches(0.5, 1.0);
    assert!(v.bounds().count() > MIN_VISIBLE_CANDLES);
}

#[test]
fn zoom_at_pixel_uses_pointer_ratio() {
    let mut v = Viewport::new(100);
    v.zoom_at_pixel(-1.0, 1010.0, &layout());
    assert_eq!(v.bounds(), ViewBounds::new(10, 99));
}

#[test]
fn short_series_cannot_zoom() {
    let mut v = Viewport::new(5);
    v.zoom(0.5, -3.0);
    assert_eq!(v.bounds(), ViewBounds::new(0, 4));
    v.zoom(0.5, 3.0);
    assert_eq!(v.bounds(), ViewBounds::new(0, 4));
    v.pan(2.0);
    assert_eq!(v.bounds(), ViewBounds::new(0, 4));
}

#[test]
fn minimum_window_survives_any_sequence() {
    let mut v = Viewport::new(250);
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    for _ in 0..2_000 {
        let r = next();
        let amount = (r % 400) as f64 / 10.0 - 20.0;
        if r & 1 == 0 {
            let pivot = ((r >> 8) % 101) as f64 / 100.0;
            v.zoom(pivot, amount);
        } else {
            v.pan(amount);
        }
        assert_invariants(v.bounds(), 250);
    }
}

#[test]
fn reset_to_new_length() {
    let mut v = Viewport::new(100);
    v.set_bounds(10, 30);
    v.reset_to(40);
    assert_eq!(v.bounds(), ViewBounds::new(0, 39));
    assert_eq!(v.series_len(), 40);
}
