//! Error taxonomy for the boarding core
//!
//! All variants are caller contract violations. Rejected actions leave the
//! simulation untouched.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardingError {
    #[error("row {row} is out of range (cabin has {num_rows} rows)")]
    RowOutOfRange { row: usize, num_rows: usize },
    #[error("lobby row {row} has no waiting passengers")]
    EmptyLobbyRow { row: usize },
    #[error("invalid cabin dimensions: {rows} rows x {seats_per_row} seats per row")]
    InvalidDimensions { rows: usize, seats_per_row: usize },
    #[error("episode already finished; reset before stepping")]
    EpisodeFinished,
}
