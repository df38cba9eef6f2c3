// File: crates/chart-core/src/drawing.rs
// Summary: Drawing model anchored in data space (price/time), tool kinds, scopes and the
//          annotation collection trait the chart session writes through.
// Notes:
// - Geometry is a closed sum type; every stage (transform, hit-test, scene) matches on it
//   exhaustively.
// - The serialized form is the flat record shared by the local blob and the remote API:
//   `{ id, toolType, points, color, instrumentKey, interval, createdAt }`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Preset drawing colors; the first one is the default.
pub const DRAWING_COLORS: [&str; 8] = [
    "#3b82f6", // blue
    "#ef4444", // red
    "#22c55e", // green
    "#f59e0b", // amber
    "#8b5cf6", // violet
    "#ec4899", // pink
    "#06b6d4", // cyan
    "#ffffff", // white
];

pub const DEFAULT_COLOR: &str = DRAWING_COLORS[0];

#[derive(Debug, Error, PartialEq)]
pub enum DrawingError {
    #[error("{tool} needs {expected} point(s), got {got}")]
    PointCount { tool: ToolType, expected: usize, got: usize },
    #[error("unknown tool type '{0}'")]
    UnknownTool(String),
}

/// A location in data space, independent of pixel geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawingPoint {
    pub price: f64,
    /// Unix seconds.
    pub time: i64,
}

impl DrawingPoint {
    pub const fn new(price: f64, time: i64) -> Self { Self { price, time } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolType {
    HorizontalLine,
    Trendline,
    Rectangle,
}

impl ToolType {
    /// Points a completed drawing of this kind carries.
    pub const fn point_count(self) -> usize {
        match self {
            ToolType::HorizontalLine => 1,
            ToolType::Trendline | ToolType::Rectangle => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ToolType::HorizontalLine => "horizontal-line",
            ToolType::Trendline => "trendline",
            ToolType::Rectangle => "rectangle",
        }
    }

    pub fn all() -> &'static [ToolType] {
        &[ToolType::HorizontalLine, ToolType::Trendline, ToolType::Rectangle]
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ToolType {
    type Err = DrawingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DrawingError::UnknownTool(s.to_string()))
    }
}

/// Geometry of a drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Spans the whole visible time axis at `at.price`; `at.time` is informational only.
    HorizontalLine { at: DrawingPoint },
    Trendline { from: DrawingPoint, to: DrawingPoint },
    /// Two opposite corners.
    Rectangle { a: DrawingPoint, b: DrawingPoint },
}

impl Shape {
    /// Build the shape for `tool` from exactly `tool.point_count()` points.
    pub fn from_points(tool: ToolType, points: &[DrawingPoint]) -> Result<Self, DrawingError> {
        let expected = tool.point_count();
        if points.len() != expected {
            return Err(DrawingError::PointCount { tool, expected, got: points.len() });
        }
        Ok(match tool {
            ToolType::HorizontalLine => Shape::HorizontalLine { at: points[0] },
            ToolType::Trendline => Shape::Trendline { from: points[0], to: points[1] },
            ToolType::Rectangle => Shape::Rectangle { a: points[0], b: points[1] },
        })
    }

    pub fn tool_type(&self) -> ToolType {
        match self {
            Shape::HorizontalLine { .. } => ToolType::HorizontalLine,
            Shape::Trendline { .. } => ToolType::Trendline,
            Shape::Rectangle { .. } => ToolType::Rectangle,
        }
    }

    pub fn points(&self) -> Vec<DrawingPoint> {
        match *self {
            Shape::HorizontalLine { at } => vec![at],
            Shape::Trendline { from, to } => vec![from, to],
            Shape::Rectangle { a, b } => vec![a, b],
        }
    }
}

/// Opaque, globally unique drawing id. Locally generated ids are UUIDs; server ids are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingId(String);

impl DrawingId {
    pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for DrawingId {
    fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for DrawingId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// `(instrument, interval)` pair that partitions drawings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope {
    pub instrument_key: String,
    pub interval: String,
}

impl Scope {
    pub fn new(instrument_key: impl Into<String>, interval: impl Into<String>) -> Self {
        Self { instrument_key: instrument_key.into(), interval: interval.into() }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.instrument_key, self.interval)
    }
}

/// A persisted annotation. Immutable once created; redrawing replaces it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DrawingRecord", into = "DrawingRecord")]
pub struct Drawing {
    pub id: DrawingId,
    pub shape: Shape,
    pub color: String,
    pub scope: Scope,
    pub created_at: DateTime<Utc>,
}

impl Drawing {
    /// New drawing with a fresh id, stamped now.
    pub fn new(shape: Shape, color: impl Into<String>, scope: Scope) -> Self {
        Self { id: DrawingId::generate(), shape, color: color.into(), scope, created_at: Utc::now() }
    }

    pub fn tool_type(&self) -> ToolType { self.shape.tool_type() }
    pub fn points(&self) -> Vec<DrawingPoint> { self.shape.points() }
    pub fn in_scope(&self, scope: &Scope) -> bool { &self.scope == scope }
}

/// Flat wire/storage form of [`Drawing`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRecord {
    pub id: DrawingId,
    pub tool_type: String,
    pub points: Vec<DrawingPoint>,
    pub color: String,
    pub instrument_key: String,
    pub interval: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DrawingRecord> for Drawing {
    type Error = DrawingError;

    fn try_from(r: DrawingRecord) -> Result<Self, Self::Error> {
        let tool: ToolType = r.tool_type.parse()?;
        let shape = Shape::from_points(tool, &r.points)?;
        Ok(Self {
            id: r.id,
            shape,
            color: r.color,
            scope: Scope::new(r.instrument_key, r.interval),
            created_at: r.created_at,
        })
    }
}

impl From<Drawing> for DrawingRecord {
    fn from(d: Drawing) -> Self {
        Self {
            id: d.id,
            tool_type: d.shape.tool_type().as_str().to_string(),
            points: d.shape.points(),
            color: d.color,
            instrument_key: d.scope.instrument_key,
            interval: d.scope.interval,
            created_at: d.created_at,
        }
    }
}

/// Drawing collection the chart session reads from and writes through.
///
/// `list_for` yields a scope's drawings in insertion order.
pub trait Annotations {
    fn list_for(&self, scope: &Scope) -> Vec<&Drawing>;
    fn add(&mut self, drawing: Drawing);
    /// Removing an absent id is a no-op.
    fn remove(&mut self, id: &DrawingId);
}

/// Plain in-memory collection (no persistence).
impl Annotations for Vec<Drawing> {
    fn list_for(&self, scope: &Scope) -> Vec<&Drawing> {
        self.iter().filter(|d| d.in_scope(scope)).collect()
    }

    fn add(&mut self, drawing: Drawing) {
        self.push(drawing);
    }

    fn remove(&mut self, id: &DrawingId) {
        self.retain(|d| &d.id != id);
    }
}
