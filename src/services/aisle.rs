//! Single-file aisle queue
//!
//! Slot 0 is the front of the cabin (row 0). Slots `0..cabin_len` are the
//! aisle proper, one per cabin row; slots beyond that are the queue still
//! waiting to enter the plane.
//!
//! Key behaviors:
//! - New passengers always join at the tail
//! - `advance_one_step()` moves each passenger at most one slot, front to back
//! - A STOWING passenger never moves and blocks everyone behind it
//! - Nobody overtakes: aisle order is fixed for the whole episode
//! - Empty slots outside the cabin are dropped after every advance

use crate::domain::types::{Passenger, PassengerStatus};

#[derive(Debug, Clone)]
pub struct AisleLine {
    /// Number of slots alongside cabin rows
    cabin_len: usize,
    slots: Vec<Option<Passenger>>,
}

impl AisleLine {
    pub fn new(cabin_len: usize) -> Self {
        Self { cabin_len, slots: (0..cabin_len).map(|_| None).collect() }
    }

    /// Append a passenger behind everyone currently in line
    pub fn enqueue(&mut self, passenger: Passenger) {
        self.slots.push(Some(passenger));
    }

    /// True iff at least one slot is occupied
    pub fn has_active_passengers(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    #[inline]
    pub fn cabin_len(&self) -> usize {
        self.cabin_len
    }

    /// Stored length, including the queue outside the cabin
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<Passenger>] {
        &self.slots
    }

    /// Slots alongside cabin rows, for seating attempts
    pub(crate) fn cabin_slots_mut(&mut self) -> &mut [Option<Passenger>] {
        let end = self.cabin_len.min(self.slots.len());
        &mut self.slots[..end]
    }

    /// Occupied slots front to back
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.slots.iter().flatten()
    }

    /// Passengers still outside the cabin, front to back
    pub fn waiting_outside(&self) -> impl Iterator<Item = &Passenger> {
        self.slots.iter().skip(self.cabin_len).flatten()
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers().count()
    }

    pub fn count_with_status(&self, status: PassengerStatus) -> usize {
        self.passengers().filter(|p| p.status == status).count()
    }

    pub fn moving_count(&self) -> usize {
        self.count_with_status(PassengerStatus::Moving)
    }

    pub fn stalled_count(&self) -> usize {
        self.count_with_status(PassengerStatus::Stalled)
    }

    /// Advance the line by one tick
    ///
    /// Single front-to-back pass: a passenger steps into the slot ahead iff
    /// that slot is empty at the moment it is visited. Each passenger is
    /// visited once, so nobody moves more than one slot per tick.
    pub fn advance_one_step(&mut self) {
        for i in 1..self.slots.len() {
            let (front, back) = self.slots.split_at_mut(i);
            let Some(passenger) = back[0].as_mut() else {
                continue;
            };
            if passenger.status == PassengerStatus::Stowing {
                continue;
            }

            let ahead = &mut front[i - 1];
            if ahead.is_none() {
                passenger.status = PassengerStatus::Moving;
                *ahead = back[0].take();
            } else {
                passenger.status = PassengerStatus::Stalled;
            }
        }

        self.compact_queue();
    }

    /// Drop empty slots outside the cabin
    fn compact_queue(&mut self) {
        if self.slots.len() <= self.cabin_len {
            return;
        }
        let queue = self.slots.split_off(self.cabin_len);
        self.slots.extend(queue.into_iter().filter(Option::is_some));
    }
}
