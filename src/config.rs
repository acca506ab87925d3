//! Command-line arguments and the layered solver settings.

use crate::error::AppError;
use clap::{ArgGroup, Parser, ValueEnum};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use forge_core::DEFAULT_MAXIMUM_TRIES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Prefix of environment variables overriding solver settings.
pub const ENV_PREFIX: &str = "VOXEL_FORGE_";

/// Log level for everything except progress reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Log level for progress reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

/// Configuration for the Voxel Forge application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["exemplar", "tiles"])))]
pub struct AppConfig {
    /// Plain-text exemplar grid. One layer builds the 2D overlapping model,
    /// several layers (separated by blank lines) build the 3D tiled model.
    #[arg(short, long, value_name = "FILE")]
    pub exemplar: Option<PathBuf>,

    /// RON catalogue of authored tiles and their neighbors.
    #[arg(short, long, value_name = "FILE")]
    pub tiles: Option<PathBuf>,

    /// Edge length of extracted patterns (exemplar input only).
    #[arg(short = 'n', long)]
    pub pattern_size: Option<usize>,

    /// Output width in cells.
    #[arg(long)]
    pub width: Option<usize>,

    /// Output height in cells.
    #[arg(long)]
    pub height: Option<usize>,

    /// Output depth in cells.
    #[arg(long)]
    pub depth: Option<usize>,

    /// Optional seed for the random number generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Full restarts allowed before giving up.
    #[arg(long)]
    pub maximum_tries: Option<u32>,

    /// Consecutive rollbacks allowed before a restart.
    #[arg(long)]
    pub max_propagation_tries: Option<u32>,

    /// Also sample quarter-turned patterns.
    #[arg(long, default_value_t = false)]
    pub rotation: bool,

    /// Also sample mirrored patterns (2D only).
    #[arg(long, default_value_t = false)]
    pub symmetry: bool,

    /// Fraction in [0, 1) by which the empty pattern's weight is reduced.
    #[arg(long)]
    pub avoid_empty_pattern: Option<f64>,

    /// Path to save the generated output grid.
    #[arg(short, long, value_name = "FILE", default_value = "output.txt")]
    pub output_path: PathBuf,

    /// TOML file with solver settings. Flags and `VOXEL_FORGE_*` variables
    /// take precedence over it.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cancel the run after this long (e.g., "30s", "2m").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub time_limit: Option<Duration>,

    /// Report progress updates every specified interval (e.g., "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,

    /// Global log level; RUST_LOG directives still apply on top.
    #[arg(long, value_enum, default_value_t = GlobalLogLevel::Info)]
    pub log_level: GlobalLogLevel,

    /// Log level used for progress reports.
    #[arg(long, value_enum, default_value_t = ProgressLogLevel::Info)]
    pub progress_log_level: ProgressLogLevel,
}

/// Solver settings after merging defaults, the TOML file, the environment
/// and the command line, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Edge length of extracted patterns.
    pub pattern_size: usize,
    /// Output width.
    pub width: usize,
    /// Output height.
    pub height: usize,
    /// Output depth.
    pub depth: usize,
    /// Generator seed; random when unset.
    pub seed: Option<u64>,
    /// Full restarts allowed.
    pub maximum_tries: u32,
    /// Consecutive rollbacks allowed.
    pub max_propagation_tries: u32,
    /// Sample quarter turns.
    pub rotation: bool,
    /// Sample mirror images.
    pub symmetry: bool,
    /// Weight reduction of the empty pattern.
    pub avoid_empty_pattern: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            pattern_size: 3,
            width: 10,
            height: 10,
            depth: 1,
            seed: None,
            maximum_tries: DEFAULT_MAXIMUM_TRIES,
            max_propagation_tries: 0,
            rotation: false,
            symmetry: false,
            avoid_empty_pattern: 0.0,
        }
    }
}

impl SolverSettings {
    /// `(width, height, depth)` of the output.
    pub const fn output_size(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum_tries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_propagation_tries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rotation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    symmetry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avoid_empty_pattern: Option<f64>,
}

impl From<&AppConfig> for CliOverrides {
    fn from(config: &AppConfig) -> Self {
        Self {
            pattern_size: config.pattern_size,
            width: config.width,
            height: config.height,
            depth: config.depth,
            seed: config.seed,
            maximum_tries: config.maximum_tries,
            max_propagation_tries: config.max_propagation_tries,
            // Boolean flags can only switch an option on.
            rotation: config.rotation.then_some(true),
            symmetry: config.symmetry.then_some(true),
            avoid_empty_pattern: config.avoid_empty_pattern,
        }
    }
}

impl AppConfig {
    /// Merges defaults, the optional TOML file, `VOXEL_FORGE_*` variables
    /// and explicit flags into the settings of this run.
    pub fn solver_settings(&self) -> Result<SolverSettings, AppError> {
        let mut figment = Figment::from(Serialized::defaults(SolverSettings::default()));
        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let settings: SolverSettings = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(CliOverrides::from(self)))
            .extract()?;
        log::debug!("Resolved solver settings: {settings:?}");
        Ok(settings)
    }
}
