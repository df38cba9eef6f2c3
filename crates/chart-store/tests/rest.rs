// File: crates/chart-store/tests/rest.rs
// Purpose: Request URLs and bodies produced by the REST drawings client (no network).

use chart_core::{Drawing, DrawingId, DrawingPoint, Scope, Shape};
use chart_store::{NewDrawing, RestDrawingsClient};
use serde_json::json;

#[test]
fn scheme_is_added_when_missing() {
    assert_eq!(RestDrawingsClient::new("localhost:8080").base_url(), "http://localhost:8080");
    assert_eq!(RestDrawingsClient::new("https://charts.example.com/api/").base_url(), "https://charts.example.com/api");
}

#[test]
fn list_url_carries_scope_query() {
    let client = RestDrawingsClient::new("http://localhost:8080");
    let url = client.list_url(&Scope::new("NSE_EQ|INE002A01018", "1d")).unwrap();
    assert_eq!(url.path(), "/drawings");
    assert_eq!(url.query(), Some("instrumentKey=NSE_EQ%7CINE002A01018&interval=1d"));
}

#[test]
fn delete_url_escapes_id() {
    let client = RestDrawingsClient::new("http://localhost:8080/api");
    let url = client.drawing_url(&DrawingId::from("a b/c")).unwrap();
    assert_eq!(url.as_str(), "http://localhost:8080/api/drawings/a%20b%2Fc");
}

#[test]
fn create_body_omits_server_fields() {
    let d = Drawing::new(
        Shape::Trendline { from: DrawingPoint::new(1.0, 10), to: DrawingPoint::new(2.0, 20) },
        "#f59e0b",
        Scope::new("AAPL", "1h"),
    );
    let body = serde_json::to_value(NewDrawing::from(&d)).unwrap();
    assert_eq!(
        body,
        json!({
            "toolType": "trendline",
            "points": [{ "price": 1.0, "time": 10 }, { "price": 2.0, "time": 20 }],
            "color": "#f59e0b",
            "instrumentKey": "AAPL",
            "interval": "1h"
        })
    );
}
