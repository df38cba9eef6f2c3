// File: crates/chart-core/src/session.rs
// Summary: Chart session state (viewport, tool, selection) and pointer/key input wiring.
// Notes:
// - The session owns all per-chart mutable state; transforms are rebuilt from it on demand.
// - Input handlers never fail: speculative or out-of-range events are ignored or clamped.

use tracing::debug;

use crate::drawing::{Annotations, Drawing, DrawingId, DrawingPoint, Scope, ToolType};
use crate::geometry::PointF;
use crate::hit::hit_test;
use crate::series::CandleSeries;
use crate::tool::{ToolPhase, ToolState};
use crate::transform::CoordinateTransform;
use crate::types::ChartLayout;
use crate::view::{ViewBounds, Viewport};

/// Pointer input in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// Positive `notches` zoom out, negative zoom in.
    Wheel { x: f64, y: f64, notches: f64 },
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    /// Cancel the active tool and clear the selection.
    Escape,
    /// Delete the selected drawing.
    Delete,
}

/// Read-only snapshot handed to the render layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub scope: Scope,
    pub bounds: ViewBounds,
    pub active_tool: Option<ToolType>,
    pub pending: Vec<DrawingPoint>,
    pub preview: Option<DrawingPoint>,
    pub selected: Option<DrawingId>,
    pub color: String,
}

pub struct ChartSession {
    layout: ChartLayout,
    scope: Scope,
    series: CandleSeries,
    viewport: Viewport,
    tool: ToolState,
    selected: Option<DrawingId>,
}

impl ChartSession {
    pub fn new(layout: ChartLayout, scope: Scope, series: CandleSeries) -> Self {
        let viewport = Viewport::new(series.len());
        Self { layout, scope, series, viewport, tool: ToolState::new(), selected: None }
    }

    pub fn layout(&self) -> &ChartLayout { &self.layout }
    pub fn scope(&self) -> &Scope { &self.scope }
    pub fn series(&self) -> &CandleSeries { &self.series }
    pub fn viewport(&self) -> &Viewport { &self.viewport }
    pub fn viewport_mut(&mut self) -> &mut Viewport { &mut self.viewport }
    pub fn tool(&self) -> &ToolState { &self.tool }
    pub fn selected(&self) -> Option<&DrawingId> { self.selected.as_ref() }

    /// Swap in a new series. A different series identity resets the viewport and drops pending
    /// points; a different scope also clears the selection.
    pub fn set_series(&mut self, scope: Scope, series: CandleSeries) {
        if series.id() != self.series.id() {
            self.viewport.reset_to(series.len());
            self.tool.discard_pending();
        }
        if scope != self.scope {
            self.selected = None;
        }
        debug!(%scope, len = series.len(), "series changed");
        self.scope = scope;
        self.series = series;
    }

    pub fn resize(&mut self, layout: ChartLayout) {
        self.layout = layout;
    }

    pub fn transform(&self) -> CoordinateTransform<'_> {
        CoordinateTransform::new(self.layout, &self.series, self.viewport.bounds())
    }

    /// Activate a tool (toggles off when already active). Clears the selection.
    pub fn select_tool(&mut self, tool: ToolType) {
        self.tool.select_tool(tool);
        if self.tool.active().is_some() {
            self.selected = None;
        }
    }

    pub fn select_color(&mut self, color: impl Into<String>) {
        self.tool.select_color(color);
    }

    pub fn cancel(&mut self) {
        self.tool.cancel();
    }

    pub fn set_preview(&mut self, point: Option<DrawingPoint>) {
        self.tool.set_preview(point);
    }

    /// Add a data-space point to the active tool; a completed drawing goes to `store`.
    pub fn add_point<A: Annotations + ?Sized>(&mut self, point: DrawingPoint, store: &mut A) -> Option<Drawing> {
        let drawing = self.tool.add_point(point, &self.scope)?;
        store.add(drawing.clone());
        Some(drawing)
    }

    /// Select a drawing (deactivating any tool), or clear the selection with `None`.
    pub fn select(&mut self, id: Option<DrawingId>) {
        if id.is_some() {
            self.tool.cancel();
        }
        self.selected = id;
    }

    /// Remove the selected drawing from `store` and clear the selection.
    pub fn delete_selected<A: Annotations + ?Sized>(&mut self, store: &mut A) -> Option<DrawingId> {
        let id = self.selected.take()?;
        store.remove(&id);
        debug!(%id, "selected drawing deleted");
        Some(id)
    }

    pub fn handle_pointer<A: Annotations + ?Sized>(&mut self, event: PointerEvent, store: &mut A) {
        match event {
            PointerEvent::Down { x, y } => {
                if !self.layout.contains(x, y) {
                    return;
                }
                let hit = {
                    let t = self.transform();
                    hit_test(PointF::new(x, y), &store.list_for(&self.scope), &t)
                };
                if let Some(id) = hit {
                    // Also leaves any active tool.
                    self.select(Some(id));
                    return;
                }
                self.selected = None;
                if self.tool.active().is_some() {
                    let point = self.transform().pixel_to_point(x, y);
                    if let Some(point) = point {
                        self.add_point(point, store);
                    }
                } else {
                    self.viewport.begin_drag(x);
                }
            }
            PointerEvent::Move { x, y } => {
                if self.viewport.is_dragging() {
                    self.viewport.drag_to(x, &self.layout);
                } else if self.tool.active().is_some() {
                    let point = if self.layout.contains(x, y) { self.transform().pixel_to_point(x, y) } else { None };
                    self.tool.set_preview(point);
                }
            }
            PointerEvent::Up { .. } => self.viewport.end_drag(),
            PointerEvent::Wheel { x, notches, .. } => self.viewport.zoom_at_pixel(notches, x, &self.layout),
            PointerEvent::Leave => {
                self.viewport.end_drag();
                self.tool.set_preview(None);
            }
        }
    }

    pub fn handle_key<A: Annotations + ?Sized>(&mut self, key: KeyCommand, store: &mut A) {
        match key {
            KeyCommand::Escape => {
                self.tool.cancel();
                self.selected = None;
            }
            KeyCommand::Delete => {
                self.delete_selected(store);
            }
        }
    }

    pub fn phase(&self) -> ToolPhase { self.tool.phase() }

    pub fn frame(&self) -> Frame {
        Frame {
            scope: self.scope.clone(),
            bounds: self.viewport.bounds(),
            active_tool: self.tool.active(),
            pending: self.tool.pending().to_vec(),
            preview: self.tool.preview(),
            selected: self.selected.clone(),
            color: self.tool.color().to_string(),
        }
    }
}
