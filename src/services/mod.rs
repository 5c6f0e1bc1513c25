//! Services - boarding logic and state management
//!
//! This module contains the core simulation services:
//! - `lobby` - Passengers waiting to be called, grouped by row
//! - `aisle` - Single-file queue from the door to the last row
//! - `simulation` - Tick loop, reward, observation and action mask
//! - `env` - Gym-style environment wrapper
//! - `observer` - Per-tick hook for renderers and collectors
//! - `policy` - Controllers choosing which row boards next

pub mod aisle;
pub mod env;
pub mod lobby;
pub mod observer;
pub mod policy;
pub mod simulation;

// Re-export commonly used types
pub use aisle::AisleLine;
pub use env::{BoardingEnv, StepInfo, StepResult};
pub use lobby::{Lobby, LobbyRow};
pub use observer::{BoardingSnapshot, FrameRecorder, NoopObserver, TickFrame, TickObserver};
pub use policy::{BoardingPolicy, PolicyKind};
pub use simulation::{BoardingSimulation, Observation, StepOutcome, TickReport};
