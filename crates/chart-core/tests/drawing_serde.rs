// File: crates/chart-core/tests/drawing_serde.rs
// Purpose: Flat JSON form of drawings shared by the local blob and the remote API.

use chart_core::{Drawing, DrawingId, DrawingPoint, Scope, Shape, ToolType};
use serde_json::json;

#[test]
fn drawing_serializes_to_flat_record() {
    let mut d = Drawing::new(
        Shape::Rectangle { a: DrawingPoint::new(10.0, 100), b: DrawingPoint::new(20.0, 200) },
        "#ef4444",
        Scope::new("BTC-USDT", "1h"),
    );
    d.id = DrawingId::from("abc");
    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(v["id"], "abc");
    assert_eq!(v["toolType"], "rectangle");
    assert_eq!(v["points"], json!([{ "price": 10.0, "time": 100 }, { "price": 20.0, "time": 200 }]));
    assert_eq!(v["color"], "#ef4444");
    assert_eq!(v["instrumentKey"], "BTC-USDT");
    assert_eq!(v["interval"], "1h");
    assert!(v["createdAt"].is_string());
}

#[test]
fn drawing_parses_server_record() {
    let v = json!({
        "id": "srv-1",
        "toolType": "horizontal-line",
        "points": [{ "price": 50.0, "time": 1700000000 }],
        "color": "#3b82f6",
        "instrumentKey": "AAPL",
        "interval": "1d",
        "createdAt": "2024-01-02T03:04:05Z"
    });
    let d: Drawing = serde_json::from_value(v).unwrap();
    assert_eq!(d.id.as_str(), "srv-1");
    assert_eq!(d.tool_type(), ToolType::HorizontalLine);
    assert_eq!(d.shape, Shape::HorizontalLine { at: DrawingPoint::new(50.0, 1_700_000_000) });
    assert_eq!(d.scope, Scope::new("AAPL", "1d"));
}

#[test]
fn json_round_trip_preserves_drawing() {
    let d = Drawing::new(
        Shape::Trendline { from: DrawingPoint::new(1.5, 1), to: DrawingPoint::new(2.5, 2) },
        "#22c55e",
        Scope::new("ETH", "15m"),
    );
    let s = serde_json::to_string(&d).unwrap();
    let back: Drawing = serde_json::from_str(&s).unwrap();
    assert_eq!(back, d);
}

#[test]
fn wrong_point_count_is_rejected() {
    let v = json!({
        "id": "x", "toolType": "trendline", "points": [{ "price": 1.0, "time": 1 }],
        "color": "#fff", "instrumentKey": "A", "interval": "1d", "createdAt": "2024-01-01T00:00:00Z"
    });
    let err = serde_json::from_value::<Drawing>(v).unwrap_err();
    assert!(err.to_string().contains("trendline needs 2 point(s), got 1"), "{err}");
}

#[test]
fn unknown_tool_is_rejected() {
    let v = json!({
        "id": "x", "toolType": "fibonacci", "points": [],
        "color": "#fff", "instrumentKey": "A", "interval": "1d", "createdAt": "2024-01-01T00:00:00Z"
    });
    let err = serde_json::from_value::<Drawing>(v).unwrap_err();
    assert!(err.to_string().contains("unknown tool type 'fibonacci'"), "{err}");
}

#[test]
fn tool_type_parses_from_wire_names() {
    for t in ToolType::all() {
        assert_eq!(t.as_str().parse::<ToolType>().unwrap(), *t);
    }
    assert!("ray".parse::<ToolType>().is_err());
}
