//! Domain models - passengers, seats and the cabin
//!
//! This module contains the value types the simulation moves around:
//! - `Passenger` - seat assignment, luggage flag and lifecycle status
//! - `PassengerStatus` - MOVING / STALLED / STOWING / SEATED
//! - `SeatNumber` - row-major seat index
//! - `Seat`, `CabinRow`, `Cabin` - fixed seat containers

pub mod cabin;
pub mod types;

// Re-export commonly used types at module level
pub use cabin::{Cabin, CabinRow, Seat, SeatingOutcome};
pub use types::{Passenger, PassengerStatus, SeatNumber};
