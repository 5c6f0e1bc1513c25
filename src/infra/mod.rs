//! Infrastructure - configuration, errors, and metrics
//!
//! This module contains infrastructure concerns:
//! - `config` - Application configuration (TOML loading, defaults)
//! - `error` - Typed errors returned by the simulation
//! - `metrics` - Per-episode statistics and summaries

pub mod config;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use config::{Config, RenderMode};
pub use error::BoardingError;
pub use metrics::{EpisodeStats, EpisodeSummary};
