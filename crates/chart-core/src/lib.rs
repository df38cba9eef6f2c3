// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the viewport, coordinate transform, drawing tools and hit-testing API.

pub mod series;
pub mod types;
pub mod geometry;
pub mod scale;
pub mod view;
pub mod transform;
pub mod drawing;
pub mod tool;
pub mod hit;
pub mod session;
pub mod scene;

pub use series::{Candle, CandleSeries, SeriesError, SeriesId};
pub use types::{ChartLayout, Insets, MIN_VISIBLE_CANDLES};
pub use view::{clamp, ViewBounds, Viewport};
pub use transform::CoordinateTransform;
pub use drawing::{Annotations, Drawing, DrawingError, DrawingId, DrawingPoint, Scope, Shape, ToolType, DRAWING_COLORS};
pub use tool::{ToolPhase, ToolState};
pub use hit::hit_test;
pub use session::{ChartSession, Frame, KeyCommand, PointerEvent};
pub use scene::{build_scene, Primitive, Rgba, Scene};
