//! Pre-boarding lobby, partitioned by destination row
//!
//! Each `LobbyRow` is filled once at reset in ascending seat order and
//! released from the end, so passengers leave a row in descending seat order.

use crate::domain::types::{Passenger, SeatNumber};

/// Passengers waiting for one cabin row
#[derive(Debug, Clone)]
pub struct LobbyRow {
    row: usize,
    passengers: Vec<Passenger>,
}

impl LobbyRow {
    pub fn new(row: usize, seats_per_row: usize) -> Self {
        let passengers = (0..seats_per_row)
            .map(|i| Passenger::new(SeatNumber(row * seats_per_row + i), seats_per_row))
            .collect();
        Self { row, passengers }
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    /// Release the most recently added passenger
    fn pop(&mut self) -> Option<Passenger> {
        self.passengers.pop()
    }
}

/// The whole lobby
#[derive(Debug, Clone)]
pub struct Lobby {
    rows: Vec<LobbyRow>,
}

impl Lobby {
    pub fn new(num_rows: usize, seats_per_row: usize) -> Self {
        let rows = (0..num_rows).map(|row| LobbyRow::new(row, seats_per_row)).collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[LobbyRow] {
        &self.rows
    }

    /// Remove the next passenger waiting for `row`
    ///
    /// Returns `None` if the row is out of range or already empty; callers
    /// consult `action_mask()` first.
    pub fn remove_passenger(&mut self, row: usize) -> Option<Passenger> {
        self.rows.get_mut(row)?.pop()
    }

    /// Total passengers still waiting across all rows
    pub fn count_passengers(&self) -> usize {
        self.rows.iter().map(LobbyRow::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(LobbyRow::is_empty)
    }

    /// Whether `row` still has a waiting passenger
    pub fn has_waiting(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(|r| !r.is_empty())
    }

    /// One entry per lobby row, true iff that row can still release someone
    pub fn action_mask(&self) -> Vec<bool> {
        self.rows.iter().map(|r| !r.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_filled_in_seat_order() {
        let lobby = Lobby::new(3, 2);
        assert_eq!(lobby.count_passengers(), 6);
        let seats: Vec<usize> = lobby.rows()[1].passengers().iter().map(|p| p.seat.0).collect();
        assert_eq!(seats, vec![2, 3]);
        assert!(lobby.rows()[1].passengers().iter().all(|p| p.row == 1));
    }

    #[test]
    fn test_remove_is_last_in_first_out() {
        let mut lobby = Lobby::new(2, 3);
        assert_eq!(lobby.remove_passenger(1).unwrap().seat, SeatNumber(5));
        assert_eq!(lobby.remove_passenger(1).unwrap().seat, SeatNumber(4));
        assert_eq!(lobby.remove_passenger(1).unwrap().seat, SeatNumber(3));
        assert!(lobby.remove_passenger(1).is_none());
        assert_eq!(lobby.count_passengers(), 3);
    }

    #[test]
    fn test_out_of_range_row() {
        let mut lobby = Lobby::new(2, 1);
        assert!(lobby.remove_passenger(2).is_none());
        assert!(!lobby.has_waiting(2));
        assert_eq!(lobby.count_passengers(), 2);
    }

    #[test]
    fn test_action_mask_tracks_empty_rows() {
        let mut lobby = Lobby::new(3, 1);
        assert_eq!(lobby.action_mask(), vec![true, true, true]);

        lobby.remove_passenger(1);
        assert_eq!(lobby.action_mask(), vec![true, false, true]);
        assert!(!lobby.is_empty());

        lobby.remove_passenger(0);
        lobby.remove_passenger(2);
        assert_eq!(lobby.action_mask(), vec![false, false, false]);
        assert!(lobby.is_empty());
    }
}
