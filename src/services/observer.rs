//! Tick observation hook
//!
//! The simulation hands every observer a read-only view of the cabin, aisle
//! and lobby after each tick. Renderers and statistics collectors plug in
//! here; the simulation never waits on them.

use crate::domain::Cabin;
use crate::services::aisle::AisleLine;
use crate::services::lobby::Lobby;
use crate::services::simulation::TickReport;
use std::collections::VecDeque;

/// Read-only view of the simulation state
#[derive(Debug, Clone, Copy)]
pub struct BoardingSnapshot<'a> {
    pub tick: u64,
    pub cabin: &'a Cabin,
    pub aisle: &'a AisleLine,
    pub lobby: &'a Lobby,
}

impl BoardingSnapshot<'_> {
    pub fn in_lobby(&self) -> usize {
        self.lobby.count_passengers()
    }

    pub fn in_aisle(&self) -> usize {
        self.aisle.passenger_count()
    }

    pub fn seated(&self) -> usize {
        self.cabin.seated_count()
    }
}

/// Trait for observing the simulation tick by tick
pub trait TickObserver {
    /// Called after the seating attempts and aisle advance of every tick
    fn on_tick(&mut self, report: &TickReport, snapshot: &BoardingSnapshot<'_>);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TickObserver for NoopObserver {
    fn on_tick(&mut self, _report: &TickReport, _snapshot: &BoardingSnapshot<'_>) {}
}

/// Owned copy of the state after one tick
#[derive(Debug, Clone)]
pub struct TickFrame {
    pub report: TickReport,
    pub cabin: Cabin,
    pub aisle: AisleLine,
    pub lobby: Lobby,
}

impl TickFrame {
    pub fn capture(report: &TickReport, snapshot: &BoardingSnapshot<'_>) -> Self {
        Self {
            report: report.clone(),
            cabin: snapshot.cabin.clone(),
            aisle: snapshot.aisle.clone(),
            lobby: snapshot.lobby.clone(),
        }
    }

    pub fn snapshot(&self) -> BoardingSnapshot<'_> {
        BoardingSnapshot {
            tick: self.report.tick,
            cabin: &self.cabin,
            aisle: &self.aisle,
            lobby: &self.lobby,
        }
    }
}

/// Queues every tick so a viewer can replay them at its own frame rate
///
/// A single action can run many ticks (the drain after the lobby empties);
/// the recorder keeps all of them in order.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: VecDeque<TickFrame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Oldest frame not yet shown
    pub fn pop_front(&mut self) -> Option<TickFrame> {
        self.frames.pop_front()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl TickObserver for FrameRecorder {
    fn on_tick(&mut self, report: &TickReport, snapshot: &BoardingSnapshot<'_>) {
        self.frames.push_back(TickFrame::capture(report, snapshot));
    }
}
