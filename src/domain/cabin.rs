//! Cabin seating model
//!
//! A `Cabin` is a fixed grid of `CabinRow`s, each holding `seats_per_row`
//! seats. Seating is a two-phase hand-off from an aisle slot:
//! - first attempt with luggage: the passenger stows and stays in the aisle
//! - second attempt: the passenger leaves the aisle slot and takes the seat

use crate::domain::types::{Passenger, PassengerStatus, SeatNumber};
use smallvec::SmallVec;

/// Result of a seating attempt for one aisle slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatingOutcome {
    /// Slot empty, or the occupant's seat is not in this row
    NotHere,
    /// Occupant spent this tick stowing luggage and is still in the aisle
    Stowing,
    /// Occupant moved from the aisle into its seat
    Seated(SeatNumber),
}

/// A single seat
#[derive(Debug, Clone)]
pub struct Seat {
    number: SeatNumber,
    row: usize,
    occupant: Option<Passenger>,
}

impl Seat {
    pub fn new(number: SeatNumber, row: usize) -> Self {
        Self { number, row, occupant: None }
    }

    #[inline]
    pub fn number(&self) -> SeatNumber {
        self.number
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn occupant(&self) -> Option<&Passenger> {
        self.occupant.as_ref()
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Attempt to seat the passenger held in `slot`
    ///
    /// Panics if the passenger's seat number is not this seat's number or
    /// the seat is already taken; routing guarantees neither happens.
    pub fn seat_passenger(&mut self, slot: &mut Option<Passenger>) -> SeatingOutcome {
        let Some(mut passenger) = slot.take() else {
            return SeatingOutcome::NotHere;
        };

        assert_eq!(
            passenger.seat, self.number,
            "seat {} offered to passenger for seat {}",
            self.number, passenger.seat
        );

        if passenger.has_luggage {
            passenger.status = PassengerStatus::Stowing;
            passenger.has_luggage = false;
            *slot = Some(passenger);
            return SeatingOutcome::Stowing;
        }

        assert!(self.occupant.is_none(), "seat {} is already occupied", self.number);

        passenger.status = PassengerStatus::Seated;
        self.occupant = Some(passenger);
        SeatingOutcome::Seated(self.number)
    }

    /// Label used by the renderers: `Sxx` when empty, `Pxx` when occupied
    pub fn label(&self) -> String {
        match &self.occupant {
            Some(passenger) => passenger.label(),
            None => format!("S{:02}", self.number.0),
        }
    }
}

/// One cabin row; membership is fixed at construction
#[derive(Debug, Clone)]
pub struct CabinRow {
    index: usize,
    seats: SmallVec<[Seat; 6]>,
}

impl CabinRow {
    pub fn new(index: usize, seats_per_row: usize) -> Self {
        let seats = (0..seats_per_row)
            .map(|i| Seat::new(SeatNumber(index * seats_per_row + i), index))
            .collect();
        Self { index, seats }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Try to seat whoever stands in the aisle slot next to this row
    ///
    /// Passengers bound for another row are left untouched.
    pub fn try_seat(&mut self, slot: &mut Option<Passenger>) -> SeatingOutcome {
        let Some(passenger) = slot.as_ref() else {
            return SeatingOutcome::NotHere;
        };
        if passenger.row != self.index {
            return SeatingOutcome::NotHere;
        }

        let seat_number = passenger.seat;
        match self.seats.iter_mut().find(|seat| seat.number == seat_number) {
            Some(seat) => seat.seat_passenger(slot),
            None => SeatingOutcome::NotHere,
        }
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_occupied()).count()
    }
}

/// The whole cabin
#[derive(Debug, Clone)]
pub struct Cabin {
    rows: Vec<CabinRow>,
    seats_per_row: usize,
}

impl Cabin {
    pub fn new(num_rows: usize, seats_per_row: usize) -> Self {
        let rows = (0..num_rows).map(|row| CabinRow::new(row, seats_per_row)).collect();
        Self { rows, seats_per_row }
    }

    pub fn rows(&self) -> &[CabinRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [CabinRow] {
        &mut self.rows
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn seats_per_row(&self) -> usize {
        self.seats_per_row
    }

    #[inline]
    pub fn total_seats(&self) -> usize {
        self.rows.len() * self.seats_per_row
    }

    pub fn seated_count(&self) -> usize {
        self.rows.iter().map(CabinRow::seated_count).sum()
    }

    pub fn is_full(&self) -> bool {
        self.seated_count() == self.total_seats()
    }
}
