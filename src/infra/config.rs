//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use crate::infra::error::BoardingError;
use crate::services::policy::PolicyKind;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum RenderMode {
    None,
    Terminal,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::None => "none",
            RenderMode::Terminal => "terminal",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CabinConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_seats_per_row")]
    pub seats_per_row: usize,
}

impl Default for CabinConfig {
    fn default() -> Self {
        Self { rows: default_rows(), seats_per_row: default_seats_per_row() }
    }
}

fn default_rows() -> usize {
    10
}

fn default_seats_per_row() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Episodes to play back to back
    #[serde(default = "default_episodes")]
    pub episodes: u64,
    #[serde(default = "default_policy")]
    pub policy: PolicyKind,
    /// Seed for the random policy
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_render")]
    pub render: RenderMode,
    /// Frame rate of the interactive viewer in autoplay
    #[serde(default = "default_render_fps")]
    pub render_fps: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            episodes: default_episodes(),
            policy: default_policy(),
            seed: 0,
            render: default_render(),
            render_fps: default_render_fps(),
        }
    }
}

fn default_episodes() -> u64 {
    1
}

fn default_policy() -> PolicyKind {
    PolicyKind::Random
}

fn default_render() -> RenderMode {
    RenderMode::None
}

fn default_render_fps() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct EgressConfig {
    /// Write episode summaries to `file`
    #[serde(default)]
    pub enabled: bool,
    /// File path for episode egress (JSONL format)
    #[serde(default = "default_egress_file")]
    pub file: String,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self { enabled: false, file: default_egress_file() }
    }
}

fn default_egress_file() -> String {
    "episodes.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub cabin: CabinConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub egress: EgressConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    rows: usize,
    seats_per_row: usize,
    episodes: u64,
    policy: PolicyKind,
    seed: u64,
    render: RenderMode,
    render_fps: u32,
    egress_enabled: bool,
    egress_file: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            rows: toml_config.cabin.rows,
            seats_per_row: toml_config.cabin.seats_per_row,
            episodes: toml_config.run.episodes,
            policy: toml_config.run.policy,
            seed: toml_config.run.seed,
            render: toml_config.run.render,
            render_fps: toml_config.run.render_fps,
            egress_enabled: toml_config.egress.enabled,
            egress_file: toml_config.egress.file,
            config_file,
        }
    }

    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        // Check for --config argument
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        // Check CONFIG_FILE environment variable
        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration from a path, falling back to defaults
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "config_fallback_to_defaults");
                Self::default()
            }
        }
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load(args: &[String]) -> Self {
        Self::load_from_path(Self::resolve_config_path(args))
    }

    /// Reject cabin shapes the simulation cannot build
    pub fn validate(&self) -> Result<(), BoardingError> {
        if self.rows == 0 || self.seats_per_row == 0 {
            return Err(BoardingError::InvalidDimensions {
                rows: self.rows,
                seats_per_row: self.seats_per_row,
            });
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn seats_per_row(&self) -> usize {
        self.seats_per_row
    }

    pub fn total_seats(&self) -> usize {
        self.rows * self.seats_per_row
    }

    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn render(&self) -> RenderMode {
        self.render
    }

    pub fn render_fps(&self) -> u32 {
        self.render_fps
    }

    pub fn egress_enabled(&self) -> bool {
        self.egress_enabled
    }

    pub fn egress_file(&self) -> &str {
        &self.egress_file
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    // Builder methods for command line overrides

    pub fn with_cabin(mut self, rows: usize, seats_per_row: usize) -> Self {
        self.rows = rows;
        self.seats_per_row = seats_per_row;
        self
    }

    pub fn with_episodes(mut self, episodes: u64) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_render(mut self, render: RenderMode) -> Self {
        self.render = render;
        self
    }

    pub fn with_egress_file(mut self, file: &str) -> Self {
        self.egress_enabled = true;
        self.egress_file = file.to_string();
        self
    }
}
