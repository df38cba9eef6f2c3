// File: crates/chart-store/tests/local.rs
// Purpose: Anonymous-mode store behaviour against file and in-memory key-value storage.

use chart_core::{
    Annotations, Candle, CandleSeries, ChartLayout, ChartSession, Drawing, DrawingId, DrawingPoint, Insets,
    PointerEvent, Scope, Shape, ToolType,
};
use chart_store::{AnnotationStore, FileKeyValue, KeyValue, MemoryKeyValue, StoreMode, STORAGE_KEY};

fn scope() -> Scope {
    Scope::new("BTC-USDT", "1h")
}

fn hline(price: f64, scope: Scope) -> Drawing {
    Drawing::new(Shape::HorizontalLine { at: DrawingPoint::new(price, 1_000) }, "#3b82f6", scope)
}

#[test]
fn drawings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AnnotationStore::open(FileKeyValue::new(dir.path()));
    assert_eq!(store.mode(), StoreMode::Anonymous);
    store.add(hline(100.0, scope()));
    store.add(hline(200.0, Scope::new("ETH-USDT", "1h")));
    let ids: Vec<DrawingId> = store.all().iter().map(|d| d.id.clone()).collect();
    drop(store);

    let reopened = AnnotationStore::open(FileKeyValue::new(dir.path()));
    let back: Vec<DrawingId> = reopened.all().iter().map(|d| d.id.clone()).collect();
    assert_eq!(back, ids);
    assert_eq!(reopened.list_for(&scope()).len(), 1);
    assert!(dir.path().join("chart-drawings.json").exists());
}

#[test]
fn every_mutation_rewrites_blob() {
    let mut store = AnnotationStore::open(MemoryKeyValue::new());
    let d = hline(100.0, scope());
    let id = d.id.clone();
    store.add(d);
    let blob = store.kv().get(STORAGE_KEY).unwrap().unwrap();
    assert!(blob.contains(id.as_str()));

    store.remove(&id);
    let blob = store.kv().get(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(blob, "[]");
}

#[test]
fn load_is_noop_while_anonymous() {
    let mut store = AnnotationStore::open(MemoryKeyValue::new());
    store.load(&scope());
    assert_eq!(store.pending_requests(), 0);
    assert_eq!(store.sync(), 0);
}

#[test]
fn removing_unknown_id_is_noop() {
    let mut store = AnnotationStore::open(MemoryKeyValue::new());
    store.add(hline(100.0, scope()));
    store.remove(&DrawingId::from("missing"));
    store.remove(&DrawingId::from("missing"));
    assert_eq!(store.all().len(), 1);
}

#[test]
fn identical_content_is_not_deduplicated() {
    let mut store = AnnotationStore::open(MemoryKeyValue::new());
    store.add(hline(100.0, scope()));
    store.add(hline(100.0, scope()));
    let listed = store.list_for(&scope());
    assert_eq!(listed.len(), 2);
    assert_ne!(listed[0].id, listed[1].id);
}

#[test]
fn list_keeps_insertion_order() {
    let mut store = AnnotationStore::open(MemoryKeyValue::new());
    let other = Scope::new("ETH-USDT", "1h");
    for (i, s) in [scope(), other.clone(), scope(), scope()].into_iter().enumerate() {
        store.add(hline(i as f64, s));
    }
    let prices: Vec<f64> = store.list_for(&scope()).iter().map(|d| d.points()[0].price).collect();
    assert_eq!(prices, vec![0.0, 2.0, 3.0]);
}

#[test]
fn clear_only_touches_its_scope() {
    let mut store = AnnotationStore::open(MemoryKeyValue::new());
    let other = Scope::new("BTC-USDT", "4h");
    store.add(hline(1.0, scope()));
    store.add(hline(2.0, other.clone()));
    store.add(hline(3.0, scope()));
    store.clear(&scope());
    assert!(store.list_for(&scope()).is_empty());
    assert_eq!(store.list_for(&other).len(), 1);

    let reopened = AnnotationStore::open(store.kv().clone());
    assert_eq!(reopened.all().len(), 1);
}

#[test]
fn unreadable_blob_starts_empty() {
    let mut kv = MemoryKeyValue::new();
    kv.set(STORAGE_KEY, "{not json").unwrap();
    let mut store = AnnotationStore::open(kv);
    assert!(store.all().is_empty());
    store.add(hline(1.0, scope()));
    assert_eq!(store.all().len(), 1);
}

#[test]
fn file_store_reads_missing_key_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let mut kv = FileKeyValue::new(dir.path().join("nested"));
    assert!(kv.get("absent").unwrap().is_none());
    kv.set("k", "v").unwrap();
    assert_eq!(kv.get("k").unwrap().as_deref(), Some("v"));
    kv.remove("k").unwrap();
    kv.remove("k").unwrap();
    assert!(kv.get("k").unwrap().is_none());
}

#[test]
fn session_draws_through_the_store() {
    let candles: Vec<Candle> = (0..50)
        .map(|i| {
            let c = 100.0 + i as f64;
            Candle { time: i * 60, open: c, high: c + 1.0, low: c - 1.0, close: c, volume: 1.0 }
        })
        .collect();
    let layout = ChartLayout::new(800, 500, Insets::new(0, 0, 0, 0), 100);
    let mut session = ChartSession::new(layout, scope(), CandleSeries::new(candles).unwrap());
    let mut store = AnnotationStore::open(MemoryKeyValue::new());

    session.select_tool(ToolType::HorizontalLine);
    session.handle_pointer(PointerEvent::Down { x: 400.0, y: 200.0 }, &mut store);
    assert_eq!(Annotations::list_for(&store, &scope()).len(), 1);

    session.cancel();
    session.handle_pointer(PointerEvent::Down { x: 100.0, y: 200.0 }, &mut store);
    assert!(session.selected().is_some());
    session.delete_selected(&mut store);
    assert!(store.all().is_empty());
    assert_eq!(store.kv().get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
}
