// File: crates/demo/src/config.rs
// Summary: Demo configuration: embedded defaults, optional user file, CHART_* environment overrides.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Environment, File, FileFormat};
use serde::Deserialize;

use chart_core::{ChartLayout, Insets, Scope};

/// Optional user file, looked up in the working directory (any format `config` supports).
pub const USER_CONFIG: &str = "chart-demo";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub logging: Logging,
    pub chart: Chart,
    pub layout: Layout,
    pub storage: Storage,
    pub remote: Remote,
    pub output: Output,
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    level: String,
    #[serde(default)]
    crates: HashMap<String, String>,
}

impl Logging {
    /// `EnvFilter` directives: the default level followed by per-crate overrides.
    pub fn levels(&self) -> String {
        let mut crate_levels = self
            .crates
            .iter()
            .map(|(lib, loglevel)| format!("{lib}={loglevel}"))
            .collect::<Vec<_>>();
        crate_levels.sort();
        if crate_levels.is_empty() {
            return self.level.clone();
        }
        format!("{},{}", self.level, crate_levels.join(","))
    }
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub instrument_key: String,
    pub interval: String,
}

impl Chart {
    pub fn scope(&self) -> Scope {
        Scope::new(self.instrument_key.clone(), self.interval.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub volume_height: u32,
}

impl Layout {
    pub fn chart_layout(&self) -> ChartLayout {
        let insets = Insets::new(self.margin_left, self.margin_right, self.margin_top, self.margin_bottom);
        ChartLayout::new(self.width, self.height, insets, self.volume_height)
    }
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
pub struct Remote {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Output {
    pub png: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        config::Config::builder()
            .add_source(File::from_str(include_str!("../config.yml"), FileFormat::Yaml))
            .add_source(File::with_name(USER_CONFIG).required(false))
            .add_source(
                Environment::with_prefix("CHART")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Error during config creation")?
            .try_deserialize()
            .context("Error during config deserialization")
    }
}
