//! Per-episode statistics and summary reporting
//!
//! `EpisodeStats` is fed one `TickReport` per tick and one call per
//! controller action. `summary()` produces a serializable snapshot that is
//! logged and written to egress at the end of an episode.

use crate::domain::types::SeatNumber;
use crate::services::simulation::TickReport;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::info;

/// Accumulated counters for one episode
#[derive(Debug, Default, Clone)]
pub struct EpisodeStats {
    actions: u64,
    ticks: u64,
    total_reward: i64,
    /// Occupant-ticks spent in each status
    moving_ticks: u64,
    stalled_ticks: u64,
    stowing_ticks: u64,
    seated: usize,
    /// Ticks each passenger spent stalled, keyed by seat
    stall_ticks_by_seat: FxHashMap<SeatNumber, u64>,
}

impl EpisodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn record_action(&mut self) {
        self.actions += 1;
    }

    pub fn record_tick(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.total_reward += report.reward;
        self.moving_ticks += report.moving as u64;
        self.stalled_ticks += report.stalled as u64;
        self.stowing_ticks += report.stowing as u64;
        self.seated += report.seated.len();
        for seat in &report.stalled_seats {
            *self.stall_ticks_by_seat.entry(*seat).or_default() += 1;
        }
    }

    pub fn actions(&self) -> u64 {
        self.actions
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn total_reward(&self) -> i64 {
        self.total_reward
    }

    pub fn seated(&self) -> usize {
        self.seated
    }

    pub fn stall_ticks(&self, seat: SeatNumber) -> u64 {
        self.stall_ticks_by_seat.get(&seat).copied().unwrap_or(0)
    }

    /// Passenger with the most stalled ticks; ties go to the lower seat
    pub fn most_stalled(&self) -> Option<(SeatNumber, u64)> {
        self.stall_ticks_by_seat
            .iter()
            .map(|(&seat, &ticks)| (seat, ticks))
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    }

    pub fn summary(&self, episode: u64, policy: &str) -> EpisodeSummary {
        let occupant_ticks = self.moving_ticks + self.stalled_ticks + self.stowing_ticks;
        let stall_ratio = if occupant_ticks > 0 {
            self.stalled_ticks as f64 / occupant_ticks as f64
        } else {
            0.0
        };
        let (most_stalled_seat, most_stalled_ticks) = match self.most_stalled() {
            Some((seat, ticks)) => (Some(seat.0), ticks),
            None => (None, 0),
        };

        EpisodeSummary {
            episode,
            policy: policy.to_string(),
            actions: self.actions,
            ticks: self.ticks,
            total_reward: self.total_reward,
            moving_ticks: self.moving_ticks,
            stalled_ticks: self.stalled_ticks,
            stowing_ticks: self.stowing_ticks,
            seated: self.seated,
            stall_ratio,
            most_stalled_seat,
            most_stalled_ticks,
        }
    }
}

/// End-of-episode snapshot
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    pub episode: u64,
    pub policy: String,
    pub actions: u64,
    pub ticks: u64,
    pub total_reward: i64,
    pub moving_ticks: u64,
    pub stalled_ticks: u64,
    pub stowing_ticks: u64,
    pub seated: usize,
    /// Stalled occupant-ticks over all occupant-ticks
    pub stall_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_stalled_seat: Option<usize>,
    pub most_stalled_ticks: u64,
}

impl EpisodeSummary {
    pub fn log(&self) {
        info!(
            episode = %self.episode,
            policy = %self.policy,
            actions = %self.actions,
            ticks = %self.ticks,
            total_reward = %self.total_reward,
            seated = %self.seated,
            stall_ratio = format!("{:.3}", self.stall_ratio),
            most_stalled_seat = ?self.most_stalled_seat,
            "episode_finished"
        );
    }

    /// Single-line JSON for egress
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
