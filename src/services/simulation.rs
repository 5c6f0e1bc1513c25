//! Boarding simulation orchestrator
//!
//! One controller action releases one passenger from the chosen lobby row
//! into the aisle tail, then:
//! - while the lobby still has passengers: exactly one tick runs
//! - once the lobby is empty: ticks run until the aisle drains
//!
//! A tick is all seating attempts for aisle slots alongside cabin rows,
//! followed by one aisle advance. Reward per tick is `moving - stalled`,
//! counted over the aisle after the advance.

use crate::domain::{Cabin, PassengerStatus, SeatNumber, SeatingOutcome};
use crate::infra::error::BoardingError;
use crate::services::aisle::AisleLine;
use crate::services::lobby::Lobby;
use crate::services::observer::{BoardingSnapshot, NoopObserver, TickObserver};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Flat `(seat, status)` pairs padded with `-1`, length `2 * total_seats`
pub type Observation = Vec<i32>;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick counter after this tick (1-based)
    pub tick: u64,
    pub reward: i64,
    pub moving: usize,
    pub stalled: usize,
    pub stowing: usize,
    /// Seats filled during this tick's seating attempts
    pub seated: SmallVec<[SeatNumber; 4]>,
    /// Passengers left STALLED by this tick's advance
    pub stalled_seats: SmallVec<[SeatNumber; 8]>,
}

/// Result of one controller action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Summed reward over every tick the action triggered
    pub reward: i64,
    pub ticks: usize,
    pub terminated: bool,
}

#[derive(Debug, Clone)]
pub struct BoardingSimulation {
    cabin: Cabin,
    lobby: Lobby,
    aisle: AisleLine,
    ticks_elapsed: u64,
}

impl BoardingSimulation {
    pub fn new(num_rows: usize, seats_per_row: usize) -> Result<Self, BoardingError> {
        if num_rows == 0 || seats_per_row == 0 {
            return Err(BoardingError::InvalidDimensions { rows: num_rows, seats_per_row });
        }
        Ok(Self {
            cabin: Cabin::new(num_rows, seats_per_row),
            lobby: Lobby::new(num_rows, seats_per_row),
            aisle: AisleLine::new(num_rows),
            ticks_elapsed: 0,
        })
    }

    /// Put every passenger back in the lobby and clear cabin and aisle
    pub fn reset(&mut self) {
        let num_rows = self.num_rows();
        let seats_per_row = self.seats_per_row();
        self.cabin = Cabin::new(num_rows, seats_per_row);
        self.lobby = Lobby::new(num_rows, seats_per_row);
        self.aisle = AisleLine::new(num_rows);
        self.ticks_elapsed = 0;
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.cabin.num_rows()
    }

    #[inline]
    pub fn seats_per_row(&self) -> usize {
        self.cabin.seats_per_row()
    }

    #[inline]
    pub fn total_seats(&self) -> usize {
        self.cabin.total_seats()
    }

    pub fn cabin(&self) -> &Cabin {
        &self.cabin
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn aisle(&self) -> &AisleLine {
        &self.aisle
    }

    #[inline]
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    pub fn in_lobby(&self) -> usize {
        self.lobby.count_passengers()
    }

    pub fn in_aisle(&self) -> usize {
        self.aisle.passenger_count()
    }

    pub fn seated(&self) -> usize {
        self.cabin.seated_count()
    }

    /// Episode ends once nobody is waiting and the aisle is empty
    pub fn is_terminated(&self) -> bool {
        self.lobby.is_empty() && !self.aisle.has_active_passengers()
    }

    /// One entry per lobby row, true iff that row can be released
    pub fn action_mask(&self) -> Vec<bool> {
        self.lobby.action_mask()
    }

    /// Check an action without touching any state
    pub fn validate_action(&self, row: usize) -> Result<(), BoardingError> {
        let num_rows = self.num_rows();
        if row >= num_rows {
            return Err(BoardingError::RowOutOfRange { row, num_rows });
        }
        if self.is_terminated() {
            return Err(BoardingError::EpisodeFinished);
        }
        if !self.lobby.has_waiting(row) {
            return Err(BoardingError::EmptyLobbyRow { row });
        }
        Ok(())
    }

    /// Release the next passenger from lobby `row` and advance the simulation
    pub fn step(&mut self, row: usize) -> Result<StepOutcome, BoardingError> {
        self.step_observed(row, &mut NoopObserver)
    }

    /// Same as `step`, reporting every tick to `observer`
    pub fn step_observed(
        &mut self,
        row: usize,
        observer: &mut dyn TickObserver,
    ) -> Result<StepOutcome, BoardingError> {
        self.validate_action(row)?;
        let passenger =
            self.lobby.remove_passenger(row).ok_or(BoardingError::EmptyLobbyRow { row })?;
        debug!(row = %row, seat = %passenger.seat, "passenger_released");
        self.aisle.enqueue(passenger);

        let mut reward = 0;
        let mut ticks = 0;
        if !self.lobby.is_empty() {
            reward = self.run_tick(observer).reward;
            ticks = 1;
        } else {
            // No choices left: drain the aisle without controller input
            while self.aisle.has_active_passengers() {
                reward += self.run_tick(observer).reward;
                ticks += 1;
            }
        }

        Ok(StepOutcome { reward, ticks, terminated: self.is_terminated() })
    }

    /// Run a single tick with no release
    pub fn tick(&mut self) -> TickReport {
        self.run_tick(&mut NoopObserver)
    }

    fn run_tick(&mut self, observer: &mut dyn TickObserver) -> TickReport {
        let seated = self.attempt_seating();
        self.aisle.advance_one_step();
        self.ticks_elapsed += 1;

        let moving = self.aisle.moving_count();
        let stalled_seats: SmallVec<[SeatNumber; 8]> = self
            .aisle
            .passengers()
            .filter(|p| p.status == PassengerStatus::Stalled)
            .map(|p| p.seat)
            .collect();
        let stalled = stalled_seats.len();

        let report = TickReport {
            tick: self.ticks_elapsed,
            reward: moving as i64 - stalled as i64,
            moving,
            stalled,
            stowing: self.aisle.count_with_status(PassengerStatus::Stowing),
            seated,
            stalled_seats,
        };
        trace!(
            tick = %report.tick,
            moving = %report.moving,
            stalled = %report.stalled,
            stowing = %report.stowing,
            reward = %report.reward,
            "tick"
        );

        observer.on_tick(&report, &self.snapshot());
        report
    }

    fn attempt_seating(&mut self) -> SmallVec<[SeatNumber; 4]> {
        let mut seated = SmallVec::new();
        let rows = self.cabin.rows_mut();
        let slots = self.aisle.cabin_slots_mut();
        for (row, slot) in rows.iter_mut().zip(slots.iter_mut()) {
            if let SeatingOutcome::Seated(seat) = row.try_seat(slot) {
                debug!(seat = %seat, row = %row.index(), "passenger_seated");
                seated.push(seat);
            }
        }
        seated
    }

    /// `moving - stalled` over the aisle as it stands now
    pub fn current_reward(&self) -> i64 {
        self.aisle.moving_count() as i64 - self.aisle.stalled_count() as i64
    }

    /// Aisle passengers front to back as `(seat, status code)` pairs
    pub fn observation(&self) -> Observation {
        let len = 2 * self.total_seats();
        let mut observation = Vec::with_capacity(len);
        for passenger in self.aisle.passengers() {
            observation.push(passenger.seat.0 as i32);
            observation.push(passenger.status.code());
        }
        observation.resize(len, -1);
        observation
    }

    pub fn snapshot(&self) -> BoardingSnapshot<'_> {
        BoardingSnapshot {
            tick: self.ticks_elapsed,
            cabin: &self.cabin,
            aisle: &self.aisle,
            lobby: &self.lobby,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conserved(sim: &BoardingSimulation) -> bool {
        sim.in_lobby() + sim.in_aisle() + sim.seated() == sim.total_seats()
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            BoardingSimulation::new(0, 5).unwrap_err(),
            BoardingError::InvalidDimensions { rows: 0, seats_per_row: 5 }
        );
        assert!(BoardingSimulation::new(3, 0).is_err());
    }

    #[test]
    fn test_initial_state() {
        let sim = BoardingSimulation::new(3, 2).unwrap();
        assert_eq!(sim.in_lobby(), 6);
        assert_eq!(sim.in_aisle(), 0);
        assert_eq!(sim.seated(), 0);
        assert!(!sim.is_terminated());
        assert_eq!(sim.observation(), vec![-1; 12]);
    }

    #[test]
    fn test_out_of_range_action_rejected_without_mutation() {
        let mut sim = BoardingSimulation::new(3, 1).unwrap();
        let err = sim.step(3).unwrap_err();
        assert_eq!(err, BoardingError::RowOutOfRange { row: 3, num_rows: 3 });
        assert_eq!(sim.in_lobby(), 3);
        assert_eq!(sim.ticks_elapsed(), 0);
    }

    #[test]
    fn test_empty_row_action_rejected_without_mutation() {
        let mut sim = BoardingSimulation::new(3, 1).unwrap();
        sim.step(1).unwrap();
        let ticks = sim.ticks_elapsed();
        let observation = sim.observation();

        assert_eq!(sim.step(1).unwrap_err(), BoardingError::EmptyLobbyRow { row: 1 });
        assert_eq!(sim.ticks_elapsed(), ticks);
        assert_eq!(sim.observation(), observation);
    }

    #[test]
    fn test_interactive_phase_runs_one_tick() {
        let mut sim = BoardingSimulation::new(3, 1).unwrap();
        let outcome = sim.step(2).unwrap();
        assert_eq!(outcome.ticks, 1);
        assert!(!outcome.terminated);
        // Passenger entered slot 2 and walked in: one moving, nobody stalled
        assert_eq!(outcome.reward, 1);
        assert_eq!(sim.aisle().slots()[2].as_ref().unwrap().seat, SeatNumber(2));
        assert!(conserved(&sim));
    }

    #[test]
    fn test_two_row_episode_terminates() {
        let mut sim = BoardingSimulation::new(2, 1).unwrap();

        let first = sim.step(0).unwrap();
        assert_eq!(first.ticks, 1);
        assert!(!first.terminated);
        assert!(conserved(&sim));

        let second = sim.step(1).unwrap();
        assert!(second.terminated);
        assert!(second.ticks > 1);
        assert!(sim.is_terminated());
        assert_eq!(sim.seated(), 2);
        assert!(sim.cabin().is_full());
        assert_eq!(sim.in_lobby(), 0);
        assert!(!sim.aisle().has_active_passengers());
        assert_eq!(sim.observation(), vec![-1; 4]);
    }

    #[test]
    fn test_step_after_termination() {
        let mut sim = BoardingSimulation::new(1, 1).unwrap();
        assert!(sim.step(0).unwrap().terminated);
        assert_eq!(sim.step(0).unwrap_err(), BoardingError::EpisodeFinished);
    }

    #[test]
    fn test_single_seat_drain_reward() {
        // Tick 1: enters slot 0, moving (+1). Tick 2: stows, stowing (0).
        // Tick 3: seated, aisle empty (0).
        let mut sim = BoardingSimulation::new(1, 1).unwrap();
        let outcome = sim.step(0).unwrap();
        assert_eq!(outcome.ticks, 3);
        assert_eq!(outcome.reward, 1);
    }

    #[test]
    fn test_stow_takes_exactly_one_tick() {
        let mut sim = BoardingSimulation::new(1, 2).unwrap();
        sim.step(0).unwrap(); // releases seat 1 into slot 0

        let report = sim.tick();
        assert_eq!(report.stowing, 1);
        assert!(report.seated.is_empty());
        let stowing = sim.aisle().slots()[0].as_ref().unwrap();
        assert_eq!(stowing.status, PassengerStatus::Stowing);
        assert!(!stowing.has_luggage);

        let report = sim.tick();
        assert_eq!(report.seated.as_slice(), &[SeatNumber(1)]);
        assert_eq!(sim.seated(), 1);
    }

    #[test]
    fn test_observation_encodes_aisle_order() {
        let mut sim = BoardingSimulation::new(3, 1).unwrap();
        sim.step(0).unwrap();
        sim.step(2).unwrap();

        let observation = sim.observation();
        assert_eq!(observation.len(), 6);
        // Seat 0 is ahead of seat 2 in the aisle
        assert_eq!(&observation[..4], &[0, PassengerStatus::Moving.code(), 2, 0]);
        assert_eq!(&observation[4..], &[-1, -1]);
    }

    #[test]
    fn test_observer_sees_every_tick() {
        #[derive(Default)]
        struct Recorder {
            ticks: Vec<u64>,
        }

        impl TickObserver for Recorder {
            fn on_tick(&mut self, report: &TickReport, snapshot: &BoardingSnapshot<'_>) {
                assert_eq!(report.tick, snapshot.tick);
                self.ticks.push(report.tick);
            }
        }

        let mut sim = BoardingSimulation::new(2, 1).unwrap();
        let mut recorder = Recorder::default();

        sim.step_observed(1, &mut recorder).unwrap();
        let outcome = sim.step_observed(0, &mut recorder).unwrap();

        assert_eq!(recorder.ticks.len(), 1 + outcome.ticks);
        assert_eq!(*recorder.ticks.last().unwrap(), sim.ticks_elapsed());
    }

    #[test]
    fn test_reset_restores_lobby() {
        let mut sim = BoardingSimulation::new(2, 2).unwrap();
        sim.step(0).unwrap();
        sim.step(1).unwrap();
        sim.reset();
        assert_eq!(sim.in_lobby(), 4);
        assert_eq!(sim.in_aisle(), 0);
        assert_eq!(sim.seated(), 0);
        assert_eq!(sim.ticks_elapsed(), 0);
        assert_eq!(sim.action_mask(), vec![true, true]);
    }
}
