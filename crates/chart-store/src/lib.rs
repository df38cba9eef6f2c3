// File: crates/chart-store/src/lib.rs
// Summary: Annotation store entry point; exports the key-value blob, remote API port, REST client and store.

pub mod error;
pub mod kv;
pub mod api;
pub mod rest;
pub mod store;

pub use error::StoreError;
pub use kv::{FileKeyValue, KeyValue, MemoryKeyValue, STORAGE_KEY};
pub use api::{DrawingsApi, NewDrawing};
pub use rest::RestDrawingsClient;
pub use store::{AnnotationStore, StoreMode};
