// File: crates/chart-core/src/tool.rs
// Summary: Annotation tool state machine: collects clicks into a completed drawing.

use tracing::debug;

use crate::drawing::{Drawing, DrawingPoint, Scope, Shape, ToolType, DEFAULT_COLOR};

/// Where the tool machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolPhase {
    /// No active tool.
    Idle,
    /// Active tool, no pending points.
    ToolSelected(ToolType),
    /// Active tool with `1..k-1` pending points.
    Collecting(ToolType, usize),
}

#[derive(Clone, Debug)]
pub struct ToolState {
    active: Option<ToolType>,
    pending: Vec<DrawingPoint>,
    preview: Option<DrawingPoint>,
    color: String,
}

impl Default for ToolState {
    fn default() -> Self { Self::new() }
}

impl ToolState {
    pub fn new() -> Self {
        Self { active: None, pending: Vec::new(), preview: None, color: DEFAULT_COLOR.to_string() }
    }

    pub fn phase(&self) -> ToolPhase {
        match self.active {
            None => ToolPhase::Idle,
            Some(t) if self.pending.is_empty() => ToolPhase::ToolSelected(t),
            Some(t) => ToolPhase::Collecting(t, self.pending.len()),
        }
    }

    pub fn active(&self) -> Option<ToolType> { self.active }
    pub fn pending(&self) -> &[DrawingPoint] { &self.pending }
    pub fn preview(&self) -> Option<DrawingPoint> { self.preview }
    pub fn color(&self) -> &str { &self.color }

    /// Activate `tool`, discarding pending points; selecting the active tool again deselects it.
    pub fn select_tool(&mut self, tool: ToolType) {
        self.pending.clear();
        self.preview = None;
        if self.active == Some(tool) {
            self.active = None;
            debug!(%tool, "tool deselected");
        } else {
            self.active = Some(tool);
            debug!(%tool, "tool selected");
        }
    }

    /// Append a point. Once the tool's point count is reached, returns the completed drawing
    /// for `scope` and stays on the same tool. Without an active tool this does nothing.
    pub fn add_point(&mut self, point: DrawingPoint, scope: &Scope) -> Option<Drawing> {
        let tool = self.active?;
        self.pending.push(point);
        if self.pending.len() < tool.point_count() {
            return None;
        }
        let points = std::mem::take(&mut self.pending);
        self.preview = None;
        let shape = Shape::from_points(tool, &points[..tool.point_count()]).ok()?;
        let drawing = Drawing::new(shape, self.color.clone(), scope.clone());
        debug!(id = %drawing.id, %tool, %scope, "drawing completed");
        Some(drawing)
    }

    /// Non-committing point used only to render the in-progress shape.
    pub fn set_preview(&mut self, point: Option<DrawingPoint>) {
        self.preview = point;
    }

    /// Back to idle, discarding pending points and preview.
    pub fn cancel(&mut self) {
        self.active = None;
        self.pending.clear();
        self.preview = None;
    }

    /// Drop pending points and preview but keep the active tool.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
        self.preview = None;
    }

    /// Color for the next completed drawing; existing drawings keep theirs.
    pub fn select_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }
}
