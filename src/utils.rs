//! Utility functions for presenting tournament state

use crate::types::{Pairing, Standing};
use std::fmt::Write;

/// Render standings as a fixed-width text table, best first
pub fn format_standings(standings: &[Standing]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<20} {:>4} {:>4} {:>4} {:>4} {:>6}  {}",
        "ID", "Name", "W", "L", "T", "M", "OMW", "Bye"
    );
    for s in standings {
        let _ = writeln!(
            out,
            "{:>4}  {:<20} {:>4} {:>4} {:>4} {:>4} {:>6.3}  {}",
            s.player_id,
            s.name,
            s.wins,
            s.losses,
            s.ties,
            s.matches,
            s.opponent_match_win,
            if s.had_bye { "yes" } else { "" }
        );
    }
    out
}

/// One pairing per line
pub fn format_pairings(pairings: &[Pairing]) -> String {
    pairings
        .iter()
        .map(|p| format!("{}\n", p))
        .collect()
}
