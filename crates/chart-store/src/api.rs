// File: crates/chart-store/src/api.rs
// Summary: Port to the per-user remote drawings service.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use chart_core::{Drawing, DrawingId, DrawingPoint, Scope, ToolType};

/// Body of a create request; the server assigns `id` and `createdAt`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDrawing {
    pub tool_type: ToolType,
    pub points: Vec<DrawingPoint>,
    pub color: String,
    pub instrument_key: String,
    pub interval: String,
}

impl From<&Drawing> for NewDrawing {
    fn from(d: &Drawing) -> Self {
        Self {
            tool_type: d.tool_type(),
            points: d.points(),
            color: d.color.clone(),
            instrument_key: d.scope.instrument_key.clone(),
            interval: d.scope.interval.clone(),
        }
    }
}

impl NewDrawing {
    pub fn scope(&self) -> Scope {
        Scope::new(self.instrument_key.clone(), self.interval.clone())
    }
}

#[async_trait]
pub trait DrawingsApi: Send + Sync {
    /// The user's drawings for `scope`, oldest first.
    async fn list(&self, scope: &Scope) -> Result<Vec<Drawing>>;
    /// Persist a drawing and return the stored record.
    async fn create(&self, drawing: &NewDrawing) -> Result<Drawing>;
    async fn delete(&self, id: &DrawingId) -> Result<()>;
}
