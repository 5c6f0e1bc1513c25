//! Shared types for the boarding simulation

use serde::Serialize;

/// Newtype wrapper for seat numbers to provide type safety
///
/// Seat numbers run `0..rows * seats_per_row`, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(transparent)]
pub struct SeatNumber(pub usize);

impl SeatNumber {
    /// Cabin row holding this seat
    #[inline]
    pub fn row(self, seats_per_row: usize) -> usize {
        self.0 / seats_per_row
    }
}

impl std::fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Passenger lifecycle status
///
/// The discriminant is the status code used in observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerStatus {
    Moving = 0,
    Stalled = 1,
    Stowing = 2,
    Seated = 3,
}

impl PassengerStatus {
    /// Integer ordinal used in the observation encoding
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PassengerStatus::Moving => "MOVING",
            PassengerStatus::Stalled => "STALLED",
            PassengerStatus::Stowing => "STOWING",
            PassengerStatus::Seated => "SEATED",
        }
    }
}

impl std::fmt::Display for PassengerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A passenger waiting in the lobby, walking the aisle, or seated
///
/// Status transitions are applied by whichever container holds the
/// passenger (aisle sweep, seating routine), never by the passenger itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    pub seat: SeatNumber,
    pub row: usize,
    pub has_luggage: bool,
    pub status: PassengerStatus,
}

impl Passenger {
    #[inline]
    pub fn new(seat: SeatNumber, seats_per_row: usize) -> Self {
        Self {
            seat,
            row: seat.row(seats_per_row),
            has_luggage: true,
            status: PassengerStatus::Moving,
        }
    }

    /// Short label, e.g. `P07`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Passenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{:02}", self.seat.0)
    }
}
