//! RL environment - gym-like interface around the boarding simulation
//!
//! Discrete action space of size `rows` (which lobby row to release),
//! observation of length `2 * total_seats` with values in
//! `[-1, total_seats - 1]`, and an action mask for invalid rows.

use crate::infra::config::Config;
use crate::infra::error::BoardingError;
use crate::infra::metrics::EpisodeStats;
use crate::services::observer::{BoardingSnapshot, NoopObserver, TickObserver};
use crate::services::simulation::{BoardingSimulation, Observation, TickReport};
use serde::Serialize;
use tracing::{debug, info};

/// Step result from the environment
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Next observation
    pub observation: Observation,
    /// Summed reward of every tick the action triggered
    pub reward: i64,
    /// Lobby and aisle both empty
    pub terminated: bool,
    /// Never set: episode length is bounded by the seat count
    pub truncated: bool,
    /// Additional info
    pub info: StepInfo,
}

/// Additional information from a step
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepInfo {
    /// Ticks run by this action
    pub ticks: usize,
    /// Actions taken this episode, including this one
    pub actions_taken: u64,
    pub in_lobby: usize,
    pub in_aisle: usize,
    pub seated: usize,
}

/// Feeds episode statistics, then forwards to the caller's observer
struct Recording<'a, 'o> {
    stats: &'a mut EpisodeStats,
    inner: &'a mut (dyn TickObserver + 'o),
}

impl TickObserver for Recording<'_, '_> {
    fn on_tick(&mut self, report: &TickReport, snapshot: &BoardingSnapshot<'_>) {
        self.stats.record_tick(report);
        self.inner.on_tick(report, snapshot);
    }
}

/// Single-agent boarding environment
pub struct BoardingEnv {
    sim: BoardingSimulation,
    stats: EpisodeStats,
    episode: u64,
}

impl BoardingEnv {
    pub fn new(rows: usize, seats_per_row: usize) -> Result<Self, BoardingError> {
        Ok(Self {
            sim: BoardingSimulation::new(rows, seats_per_row)?,
            stats: EpisodeStats::new(),
            episode: 0,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, BoardingError> {
        Self::new(config.rows(), config.seats_per_row())
    }

    /// Start a new episode and return its initial observation
    pub fn reset(&mut self) -> Observation {
        self.sim.reset();
        self.stats.reset();
        self.episode += 1;
        info!(
            episode = %self.episode,
            rows = %self.sim.num_rows(),
            seats_per_row = %self.sim.seats_per_row(),
            "episode_started"
        );
        self.sim.observation()
    }

    /// Take a step releasing the next passenger of lobby `row`
    pub fn step(&mut self, row: usize) -> Result<StepResult, BoardingError> {
        self.step_observed(row, &mut NoopObserver)
    }

    /// Same as `step`, reporting every tick to `observer` (the render hook)
    pub fn step_observed(
        &mut self,
        row: usize,
        observer: &mut dyn TickObserver,
    ) -> Result<StepResult, BoardingError> {
        let mut recording = Recording { stats: &mut self.stats, inner: observer };
        let outcome = self.sim.step_observed(row, &mut recording)?;
        self.stats.record_action();

        let info = StepInfo {
            ticks: outcome.ticks,
            actions_taken: self.stats.actions(),
            in_lobby: self.sim.in_lobby(),
            in_aisle: self.sim.in_aisle(),
            seated: self.sim.seated(),
        };
        debug!(
            row = %row,
            reward = %outcome.reward,
            ticks = %info.ticks,
            in_lobby = %info.in_lobby,
            in_aisle = %info.in_aisle,
            seated = %info.seated,
            "step"
        );

        Ok(StepResult {
            observation: self.sim.observation(),
            reward: outcome.reward,
            terminated: outcome.terminated,
            truncated: false,
            info,
        })
    }

    pub fn action_mask(&self) -> Vec<bool> {
        self.sim.action_mask()
    }

    /// Size of the discrete action space
    pub fn action_count(&self) -> usize {
        self.sim.num_rows()
    }

    pub fn observation_len(&self) -> usize {
        2 * self.sim.total_seats()
    }

    /// Inclusive `(low, high)` bounds of every observation entry
    pub fn observation_bounds(&self) -> (i32, i32) {
        (-1, self.sim.total_seats() as i32 - 1)
    }

    pub fn observation(&self) -> Observation {
        self.sim.observation()
    }

    pub fn is_terminated(&self) -> bool {
        self.sim.is_terminated()
    }

    /// Episodes started so far (1-based after the first reset)
    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    /// Current simulation state (for rendering)
    pub fn simulation(&self) -> &BoardingSimulation {
        &self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces() {
        let env = BoardingEnv::new(10, 5).unwrap();
        assert_eq!(env.action_count(), 10);
        assert_eq!(env.observation_len(), 100);
        assert_eq!(env.observation_bounds(), (-1, 49));
    }

    #[test]
    fn test_from_config() {
        let config = Config::default().with_cabin(4, 3);
        let env = BoardingEnv::from_config(&config).unwrap();
        assert_eq!(env.action_count(), 4);
        assert!(BoardingEnv::from_config(&Config::default().with_cabin(4, 0)).is_err());
    }

    #[test]
    fn test_reset_returns_padded_observation() {
        let mut env = BoardingEnv::new(2, 2).unwrap();
        let observation = env.reset();
        assert_eq!(observation, vec![-1; 8]);
        assert_eq!(env.episode(), 1);
        assert_eq!(env.action_mask(), vec![true, true]);
    }

    #[test]
    fn test_step_reports_info_and_stats() {
        let mut env = BoardingEnv::new(2, 1).unwrap();
        env.reset();

        let first = env.step(0).unwrap();
        assert!(!first.terminated);
        assert!(!first.truncated);
        assert_eq!(first.info.ticks, 1);
        assert_eq!(first.info.in_lobby, 1);
        assert_eq!(first.info.in_aisle, 1);

        let second = env.step(1).unwrap();
        assert!(second.terminated);
        assert_eq!(second.info.seated, 2);
        assert_eq!(second.info.actions_taken, 2);

        let stats = env.stats();
        assert_eq!(stats.actions(), 2);
        assert_eq!(stats.ticks(), (first.info.ticks + second.info.ticks) as u64);
        assert_eq!(stats.total_reward(), first.reward + second.reward);
        assert_eq!(stats.seated(), 2);
    }

    #[test]
    fn test_invalid_step_leaves_stats_untouched() {
        let mut env = BoardingEnv::new(2, 1).unwrap();
        env.reset();
        assert!(env.step(5).is_err());
        assert_eq!(env.stats().actions(), 0);
        assert_eq!(env.stats().ticks(), 0);
    }

    #[test]
    fn test_reset_clears_stats() {
        let mut env = BoardingEnv::new(1, 1).unwrap();
        env.reset();
        env.step(0).unwrap();
        env.reset();
        assert_eq!(env.stats().actions(), 0);
        assert_eq!(env.episode(), 2);
        assert!(!env.is_terminated());
    }
}
