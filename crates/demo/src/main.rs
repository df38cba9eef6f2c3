// File: crates/demo/src/main.rs
// Summary: Demo loads OHLC candles, replays a scripted chart session with drawing tools, persists the
//          drawings (locally, or remotely when configured) and renders the final frame to PNG.

mod config;
mod csv_source;
mod script;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

use chart_core::{build_scene, ChartSession, Scope};
use chart_store::{AnnotationStore, FileKeyValue, KeyValue, RestDrawingsClient};

use crate::config::Config;
use crate::script::{session_script, Step};

const SYNTHETIC_CANDLES: usize = 300;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_logger(&config)?;

    let candles = match std::env::args().nth(1) {
        Some(raw) => {
            let path = csv_source::locate_csv(&raw)?;
            info!(path = %path.display(), "loading candles");
            csv_source::load_ohlc_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?
        }
        None => csv_source::synthetic_walk(SYNTHETIC_CANDLES),
    };
    if candles.is_empty() {
        anyhow::bail!("no candles loaded, check headers/delimiter.");
    }
    let series = csv_source::into_series(candles)?;
    info!(candles = series.len(), "series ready");

    let scope = config.chart.scope();
    let layout = config.layout.chart_layout();

    let mut store = AnnotationStore::open(FileKeyValue::new(&config.storage.dir));
    if let Some(url) = &config.remote.url {
        let mut client = RestDrawingsClient::new(url);
        if let Some(token) = &config.remote.token {
            client = client.with_token(token.clone());
        }
        store.authenticate(Arc::new(client), Handle::current());
    }
    store.load(&scope);
    store.flush().await;
    info!(%scope, existing = store.list_for(&scope).len(), authenticated = store.is_authenticated(), "store ready");

    let mut session = ChartSession::new(layout, scope.clone(), series);
    for step in session_script(&layout) {
        match step {
            Step::Tool(tool) => session.select_tool(tool),
            Step::Color(color) => session.select_color(color),
            Step::Pointer(event) => session.handle_pointer(event, &mut store),
            Step::Key(key) => session.handle_key(key, &mut store),
        }
        store.sync();
    }
    store.flush().await;

    let bounds = session.viewport().bounds();
    info!(start = bounds.start, end = bounds.end, selected = ?session.selected().map(|id| id.to_string()), "session replayed");
    print_drawings(&store, &scope);

    let transform = session.transform();
    let drawings = store.list_for(&scope);
    let scene = build_scene(&session.frame(), &drawings, &transform);
    render(&scene, &session, &config)?;
    Ok(())
}

fn init_logger(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.logging.levels()));
    let subscriber = SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Setting default subscriber failed")
}

fn print_drawings<K: KeyValue>(store: &AnnotationStore<K>, scope: &Scope) {
    let drawings = store.list_for(scope);
    println!("{} drawing(s) for {scope}", drawings.len());
    for d in drawings {
        let points = d
            .points()
            .iter()
            .map(|p| format!("({:.4} @ {})", p.price, p.time))
            .collect::<Vec<_>>()
            .join(" -> ");
        println!("  {:<38} {:<16} {} {}", d.id.as_str(), d.tool_type().as_str(), d.color, points);
    }
}

#[cfg(feature = "raster")]
fn render(scene: &chart_core::Scene, session: &ChartSession, config: &Config) -> Result<()> {
    use chart_render_skia::{render_to_png, RenderOptions};

    let opts = RenderOptions::for_layout(session.layout());
    render_to_png(scene, session.layout(), &opts, &config.output.png)?;
    println!("Wrote {}", config.output.png.display());
    Ok(())
}

#[cfg(not(feature = "raster"))]
fn render(scene: &chart_core::Scene, _session: &ChartSession, config: &Config) -> Result<()> {
    tracing::warn!(
        primitives = scene.len(),
        output = %config.output.png.display(),
        raster = chart_render_skia::raster_enabled(),
        "built without the `raster` feature, skipping PNG output"
    );
    Ok(())
}
