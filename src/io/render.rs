//! Plain-text cabin rendering
//!
//! Layout, one block per tick:
//!
//! ```text
//!        Seats        | Aisle Line
//! S00 S01 S02 | P05 MOVING
//! S03 P04 S05 |
//!
//! Line entering plane:
//! P07 STALLED
//!
//! Lobby:
//! P06 P08
//! ```

use crate::services::observer::{BoardingSnapshot, TickObserver};
use crate::services::simulation::TickReport;
use std::fmt::Write as _;
use std::io::{self, Write};
use tracing::warn;

/// Render the current state as text
pub fn render(snapshot: &BoardingSnapshot<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^19} | Aisle Line", "Seats");

    let slots = snapshot.aisle.slots();
    for row in snapshot.cabin.rows() {
        let seats: Vec<String> = row.seats().iter().map(|seat| seat.label()).collect();
        out.push_str(&seats.join(" "));
        match slots.get(row.index()) {
            Some(Some(passenger)) => {
                let _ = write!(out, " | {} {}", passenger, passenger.status);
            }
            Some(None) => out.push_str(" |"),
            None => {}
        }
        out.push('\n');
    }

    out.push_str("\nLine entering plane:\n");
    for passenger in snapshot.aisle.waiting_outside() {
        let _ = writeln!(out, "{} {}", passenger, passenger.status);
    }

    out.push_str("\nLobby:\n");
    for row in snapshot.lobby.rows().iter().filter(|row| !row.is_empty()) {
        let labels: Vec<String> = row.passengers().iter().map(|p| p.label()).collect();
        out.push_str(&labels.join(" "));
        out.push('\n');
    }
    out
}

/// Prints every tick to a writer (stdout by default)
pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    failed: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the freshly reset cabin before the first action
    pub fn show_reset(&mut self, episode: u64, snapshot: &BoardingSnapshot<'_>) {
        let header = format!("Episode {}", episode);
        self.emit(&header, snapshot);
    }

    fn emit(&mut self, header: &str, snapshot: &BoardingSnapshot<'_>) {
        if self.failed {
            return;
        }
        if let Err(e) = self.write_frame(header, snapshot) {
            // Stop rendering after the first failed write
            warn!(error = %e, "render_write_failed");
            self.failed = true;
        }
    }

    fn write_frame(&mut self, header: &str, snapshot: &BoardingSnapshot<'_>) -> io::Result<()> {
        writeln!(self.out, "{}", header)?;
        writeln!(self.out, "{}", render(snapshot))?;
        self.out.flush()
    }
}

impl<W: Write> TickObserver for TerminalRenderer<W> {
    fn on_tick(&mut self, report: &TickReport, snapshot: &BoardingSnapshot<'_>) {
        let header = format!("Tick {} Reward: {}", report.tick, report.reward);
        self.emit(&header, snapshot);
    }
}
