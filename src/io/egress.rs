//! Episode egress - writes episode summaries to file
//!
//! Summaries are written in JSONL format (one JSON object per line)
//! to the file specified in config.

use crate::infra::metrics::EpisodeSummary;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

/// Egress writer for episode summaries
pub struct Egress {
    file_path: String,
}

impl Egress {
    pub fn new(file_path: &str) -> Self {
        info!(file_path = %file_path, "egress_initialized");
        Self { file_path: file_path.to_string() }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Write a summary to the egress file
    /// Returns true if successful, false otherwise
    pub fn write_summary(&self, summary: &EpisodeSummary) -> bool {
        match self.append_line(&summary.to_json()) {
            Ok(()) => {
                debug!(episode = %summary.episode, "episode_egressed");
                true
            }
            Err(e) => {
                error!(
                    episode = %summary.episode,
                    file = %self.file_path,
                    error = %e,
                    "episode_egress_failed"
                );
                false
            }
        }
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
