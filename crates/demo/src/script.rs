// File: crates/demo/src/script.rs
// Summary: Scripted pointer/keyboard session replayed against the chart, in plot-relative coordinates.

use chart_core::{ChartLayout, KeyCommand, PointerEvent, ToolType, DRAWING_COLORS};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Tool(ToolType),
    Color(&'static str),
    Pointer(PointerEvent),
    Key(KeyCommand),
}

/// Plot-relative position to surface pixels; `fy` is relative to the price area.
fn at(layout: &ChartLayout, fx: f64, fy: f64) -> (f64, f64) {
    (layout.plot_left() + fx * layout.plot_width(), layout.price_top() + fy * layout.price_height())
}

fn down(layout: &ChartLayout, fx: f64, fy: f64) -> Step {
    let (x, y) = at(layout, fx, fy);
    Step::Pointer(PointerEvent::Down { x, y })
}

fn hover(layout: &ChartLayout, fx: f64, fy: f64) -> Step {
    let (x, y) = at(layout, fx, fy);
    Step::Pointer(PointerEvent::Move { x, y })
}

fn up(layout: &ChartLayout, fx: f64, fy: f64) -> Step {
    let (x, y) = at(layout, fx, fy);
    Step::Pointer(PointerEvent::Up { x, y })
}

fn wheel(layout: &ChartLayout, fx: f64, notches: f64) -> Step {
    let (x, y) = at(layout, fx, 0.5);
    Step::Pointer(PointerEvent::Wheel { x, y, notches })
}

/// Zoom in, pan, draw one of each tool, then select the horizontal line.
pub fn session_script(layout: &ChartLayout) -> Vec<Step> {
    let mut steps = vec![
        wheel(layout, 0.7, -1.0),
        wheel(layout, 0.7, -1.0),
        wheel(layout, 0.7, -1.0),
        // drag right to reveal earlier candles
        down(layout, 0.45, 0.5),
        hover(layout, 0.5, 0.5),
        hover(layout, 0.6, 0.5),
        up(layout, 0.6, 0.5),
    ];
    steps.extend([
        Step::Tool(ToolType::HorizontalLine),
        Step::Color(DRAWING_COLORS[3]),
        hover(layout, 0.5, 0.35),
        down(layout, 0.5, 0.3),
        Step::Tool(ToolType::Trendline),
        Step::Color(DRAWING_COLORS[1]),
        down(layout, 0.2, 0.8),
        hover(layout, 0.6, 0.4),
        down(layout, 0.75, 0.25),
        Step::Tool(ToolType::Rectangle),
        Step::Color(DRAWING_COLORS[2]),
        down(layout, 0.3, 0.45),
        hover(layout, 0.5, 0.5),
        down(layout, 0.55, 0.65),
        Step::Key(KeyCommand::Escape),
        down(layout, 0.1, 0.3),
        up(layout, 0.1, 0.3),
    ]);
    steps
}
