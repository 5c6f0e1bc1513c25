//! Boarding simulation - headless episode runner
//!
//! Plays episodes of the boarding environment with a built-in controller,
//! optionally rendering every tick to the terminal and appending episode
//! summaries to a JSONL file.
//!
//! Module structure:
//! - `domain/` - Core types (Passenger, Seat, Cabin)
//! - `services/` - Simulation logic (Lobby, AisleLine, BoardingEnv, policies)
//! - `infra/` - Infrastructure (Config, errors, episode statistics)
//! - `io/` - Output adapters (terminal renderer, egress)

use anyhow::Context;
use boarding_sim::infra::{Config, RenderMode};
use boarding_sim::io::{Egress, TerminalRenderer};
use boarding_sim::services::{BoardingEnv, NoopObserver, PolicyKind, TickObserver};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Boarding simulation - plays episodes with a built-in boarding policy
#[derive(Parser, Debug)]
#[command(name = "boarding-sim", version, about)]
struct Args {
    /// Path to TOML configuration file (default: $CONFIG_FILE or config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of cabin rows
    #[arg(long)]
    rows: Option<usize>,

    /// Seats in each row
    #[arg(long)]
    seats_per_row: Option<usize>,

    /// Episodes to play
    #[arg(short, long)]
    episodes: Option<u64>,

    /// Boarding policy
    #[arg(short, long, value_enum)]
    policy: Option<PolicyKind>,

    /// Seed for the random policy
    #[arg(long)]
    seed: Option<u64>,

    /// Render mode
    #[arg(long, value_enum)]
    render: Option<RenderMode>,

    /// Append episode summaries to this JSONL file
    #[arg(long)]
    egress: Option<String>,
}

impl Args {
    fn apply(&self, mut config: Config) -> Config {
        if self.rows.is_some() || self.seats_per_row.is_some() {
            let rows = self.rows.unwrap_or(config.rows());
            let seats_per_row = self.seats_per_row.unwrap_or(config.seats_per_row());
            config = config.with_cabin(rows, seats_per_row);
        }
        if let Some(episodes) = self.episodes {
            config = config.with_episodes(episodes);
        }
        if let Some(policy) = self.policy {
            config = config.with_policy(policy);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(render) = self.render {
            config = config.with_render(render);
        }
        if let Some(file) = &self.egress {
            config = config.with_egress_file(file);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    // Default: INFO, use RUST_LOG=debug for per-step events
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    let args = Args::parse();
    info!(git_hash = %env!("GIT_HASH"), "boarding-sim starting");

    let config_path = args.config.clone().unwrap_or_else(|| Config::resolve_config_path(&[]));
    let config = args.apply(Config::load_from_path(&config_path));
    config.validate().context("invalid cabin configuration")?;

    info!(
        config_file = %config.config_file(),
        rows = %config.rows(),
        seats_per_row = %config.seats_per_row(),
        episodes = %config.episodes(),
        policy = %config.policy().as_str(),
        seed = %config.seed(),
        render = %config.render().as_str(),
        egress_enabled = %config.egress_enabled(),
        "config_loaded"
    );

    run(&config)
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut env = BoardingEnv::from_config(config)?;
    let mut policy = config.policy().build(config.seed());
    let egress = config.egress_enabled().then(|| Egress::new(config.egress_file()));

    let mut renderer = match config.render() {
        RenderMode::Terminal => Some(TerminalRenderer::stdout()),
        RenderMode::None => None,
    };
    let mut noop = NoopObserver;

    let mut total_reward = 0i64;
    for _ in 0..config.episodes() {
        env.reset();
        if let Some(renderer) = renderer.as_mut() {
            renderer.show_reset(env.episode(), &env.simulation().snapshot());
        }
        while !env.is_terminated() {
            let Some(row) = policy.choose(&env.action_mask()) else {
                // Lobby empty but aisle not drained cannot happen after a step
                warn!(episode = %env.episode(), "no_valid_action");
                break;
            };
            let observer: &mut dyn TickObserver = match renderer.as_mut() {
                Some(renderer) => renderer,
                None => &mut noop,
            };
            let result = env
                .step_observed(row, observer)
                .with_context(|| format!("step failed in episode {}", env.episode()))?;
            if result.terminated {
                break;
            }
        }

        let summary = env.stats().summary(env.episode(), policy.name());
        summary.log();
        total_reward += summary.total_reward;
        if let Some(egress) = &egress {
            egress.write_summary(&summary);
        }
    }

    info!(
        episodes = %config.episodes(),
        policy = %policy.name(),
        total_reward = %total_reward,
        "run_complete"
    );
    Ok(())
}
