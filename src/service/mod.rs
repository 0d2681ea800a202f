//! Tournament coordination services
//!
//! The director runs tournaments against an injected storage; the simulation
//! helpers drive it with rosters and random outcomes.

pub mod director;
pub mod simulation;

pub use director::{RecordedResult, RoundReport, TournamentDirector};
pub use simulation::{simulate_rounds, RandomResults, Roster, RosterEntry};
