//! Property/invariant tests for the boarding simulation
//!
//! Every tick is audited through a `TickObserver`:
//! - passengers are conserved across lobby, aisle and seats
//! - every seat holds its own passenger and nobody appears twice
//! - aisle order matches release order (no overtaking)
//! - inside the cabin a passenger moves at most one slot per tick
//! - a passenger is seen STOWING before being SEATED
//!
//! Generated rollouts run the same audit over random cabins and seeds.

use boarding_sim::domain::{Passenger, PassengerStatus, SeatNumber};
use boarding_sim::services::policy::{BackToFrontPolicy, RandomPolicy};
use boarding_sim::services::{
    AisleLine, BoardingEnv, BoardingPolicy, BoardingSimulation, BoardingSnapshot, TickObserver,
    TickReport,
};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct Auditor {
    /// Seats in the order their passengers entered the aisle
    released: Vec<SeatNumber>,
    positions: HashMap<SeatNumber, usize>,
    stowed: HashSet<SeatNumber>,
    rewards: Vec<i64>,
}

impl Auditor {
    fn release_rank(&self, seat: SeatNumber) -> usize {
        self.released
            .iter()
            .position(|&s| s == seat)
            .unwrap_or_else(|| panic!("{} is in the aisle but was never released", seat))
    }
}

impl TickObserver for Auditor {
    fn on_tick(&mut self, report: &TickReport, snapshot: &BoardingSnapshot<'_>) {
        let total = snapshot.cabin.total_seats();

        // Conservation
        assert_eq!(snapshot.in_lobby() + snapshot.in_aisle() + snapshot.seated(), total);

        // Single occupancy: every passenger exactly once
        let mut seen = HashSet::new();
        for row in snapshot.lobby.rows() {
            for p in row.passengers() {
                assert_eq!(p.row, row.row());
                assert!(seen.insert(p.seat), "{} duplicated", p.seat);
            }
        }
        for p in snapshot.aisle.passengers() {
            assert!(seen.insert(p.seat), "{} duplicated", p.seat);
            assert_ne!(p.status, PassengerStatus::Seated);
        }
        for row in snapshot.cabin.rows() {
            for seat in row.seats() {
                if let Some(p) = seat.occupant() {
                    assert_eq!(p.seat, seat.number());
                    assert_eq!(p.status, PassengerStatus::Seated);
                    assert!(!p.has_luggage);
                    assert!(seen.insert(p.seat), "{} duplicated", p.seat);
                }
            }
        }
        assert_eq!(seen.len(), total);
        assert!(seen.iter().all(|s| s.0 < total));

        // Stow before seat
        for seat in &report.seated {
            assert!(self.stowed.contains(seat), "{} seated without stowing", seat);
        }

        // No overtaking, at most one slot per tick inside the cabin
        let cabin_len = snapshot.aisle.cabin_len();
        let mut last_rank = None;
        let mut positions = HashMap::new();
        for (index, slot) in snapshot.aisle.slots().iter().enumerate() {
            let Some(p) = slot else { continue };
            let rank = self.release_rank(p.seat);
            if let Some(prev) = last_rank {
                assert!(rank > prev, "{} overtook someone", p.seat);
            }
            last_rank = Some(rank);

            if let Some(&old) = self.positions.get(&p.seat) {
                if old <= cabin_len {
                    assert!(index == old || index + 1 == old, "{} jumped {} -> {}", p.seat, old, index);
                }
            }
            if p.status == PassengerStatus::Stowing {
                assert!(index < cabin_len);
                assert_eq!(p.row, index);
                self.stowed.insert(p.seat);
            }
            positions.insert(p.seat, index);
        }
        self.positions = positions;

        // Reward is computed over the aisle after the advance
        let moving = snapshot.aisle.moving_count() as i64;
        let stalled = snapshot.aisle.stalled_count() as i64;
        assert_eq!(report.reward, moving - stalled);
        self.rewards.push(report.reward);
    }
}

/// Play one episode with `policy`, auditing every tick
fn audited_episode(
    sim: &mut BoardingSimulation,
    policy: &mut dyn BoardingPolicy,
) -> (Auditor, i64, usize) {
    let mut auditor = Auditor::default();
    let mut total_reward = 0;
    let mut actions = 0;
    let (low, high) = (-1, sim.total_seats() as i32 - 1);

    while !sim.is_terminated() {
        let mask = sim.action_mask();
        let row = policy.choose(&mask).expect("a valid row while the lobby is non-empty");
        assert!(mask[row]);

        // The lobby releases the last passenger listed for the row
        let released = sim.lobby().rows()[row].passengers().last().map(|p| p.seat);
        auditor.released.push(released.expect("row has a waiting passenger"));
        let outcome = sim.step_observed(row, &mut auditor).unwrap();

        total_reward += outcome.reward;
        actions += 1;
        assert!(outcome.ticks >= 1);

        let observation = sim.observation();
        assert_eq!(observation.len(), 2 * sim.total_seats());
        assert!(observation.iter().all(|&v| (low..=high).contains(&v)));
    }
    (auditor, total_reward, actions)
}

#[test]
fn reward_plus_two_when_two_move_and_none_stall() {
    let mut sim = BoardingSimulation::new(3, 1).unwrap();
    assert_eq!(sim.step(0).unwrap().reward, 1);

    // P00 steps forward and P01 fills the slot it left
    let outcome = sim.step(1).unwrap();
    assert_eq!(outcome.ticks, 1);
    assert_eq!(outcome.reward, 2);
    assert_eq!(sim.aisle().moving_count(), 2);
    assert_eq!(sim.aisle().stalled_count(), 0);
}

#[test]
fn reward_minus_three_when_three_stall_behind_a_stower() {
    let mut stower = Passenger::new(SeatNumber(0), 1);
    stower.status = PassengerStatus::Stowing;

    let mut aisle = AisleLine::new(1);
    aisle.enqueue(stower);
    for seat in 1..4 {
        aisle.enqueue(Passenger::new(SeatNumber(seat), 1));
    }
    aisle.advance_one_step();

    let moving = aisle.moving_count() as i64;
    let stalled = aisle.stalled_count() as i64;
    assert_eq!((moving, stalled), (0, 3));
    assert_eq!(moving - stalled, -3);
}

#[test]
fn empty_advance_is_idempotent() {
    let mut aisle = AisleLine::new(3);
    aisle.advance_one_step();
    aisle.advance_one_step();
    assert_eq!(aisle.len(), 3);
    assert!(!aisle.has_active_passengers());
    assert_eq!(aisle.moving_count() as i64 - aisle.stalled_count() as i64, 0);
}

#[test]
fn two_by_one_terminates_after_second_release() {
    let mut env = BoardingEnv::new(2, 1).unwrap();
    env.reset();
    assert!(!env.step(0).unwrap().terminated);
    let last = env.step(1).unwrap();
    assert!(last.terminated);
    assert_eq!(last.info.seated, 2);
    assert!(last.observation.iter().all(|&v| v == -1));
}

#[test]
fn mask_empties_as_rows_are_released() {
    let mut env = BoardingEnv::new(3, 1).unwrap();
    env.reset();
    assert_eq!(env.action_mask(), vec![true, true, true]);
    env.step(0).unwrap();
    assert_eq!(env.action_mask(), vec![false, true, true]);
    env.step(1).unwrap();
    env.step(2).unwrap();
    assert_eq!(env.action_mask(), vec![false, false, false]);
    assert!(env.is_terminated());
}

#[test]
fn lobby_releases_highest_seat_of_a_row_first() {
    let mut sim = BoardingSimulation::new(2, 3).unwrap();
    sim.step(1).unwrap();
    let first = sim.aisle().passengers().next().unwrap();
    assert_eq!(first.seat, SeatNumber(5));
}

#[test]
fn back_to_front_full_episode_is_audited() {
    let mut sim = BoardingSimulation::new(10, 5).unwrap();
    let mut policy = BackToFrontPolicy;
    let (auditor, total_reward, actions) = audited_episode(&mut sim, &mut policy);

    assert_eq!(actions, 50);
    assert_eq!(sim.seated(), 50);
    assert_eq!(auditor.stowed.len(), 50);
    assert_eq!(auditor.rewards.iter().sum::<i64>(), total_reward);
    assert_eq!(auditor.rewards.len() as u64, sim.ticks_elapsed());
}

#[test]
fn same_seed_same_episode() {
    let run = |seed| {
        let mut sim = BoardingSimulation::new(6, 4).unwrap();
        let mut policy = RandomPolicy::new(seed);
        audited_episode(&mut sim, &mut policy).0.rewards
    };
    assert_eq!(run(11), run(11));
}

proptest! {
    #[test]
    fn generated_rollout_respects_core_invariants(
        seed in any::<u64>(),
        rows in 1usize..9,
        seats_per_row in 1usize..7,
    ) {
        let mut sim = BoardingSimulation::new(rows, seats_per_row).unwrap();
        let mut policy = RandomPolicy::new(seed);
        let (auditor, total_reward, actions) = audited_episode(&mut sim, &mut policy);

        let total = rows * seats_per_row;
        prop_assert_eq!(actions, total);
        prop_assert!(sim.is_terminated());
        prop_assert_eq!(sim.seated(), total);
        prop_assert_eq!(auditor.stowed.len(), total);
        prop_assert_eq!(auditor.rewards.iter().sum::<i64>(), total_reward);
        prop_assert!(sim.action_mask().iter().all(|&ok| !ok));
        prop_assert!(sim.step(0).is_err());
    }
}
