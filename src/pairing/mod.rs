//! Round pairing for the Swiss system
//!
//! This module turns standings and match history into the next round's
//! pairings, including bye selection for odd fields.

pub mod bye;
pub mod engine;

// Re-export commonly used types
pub use bye::{has_had_bye, select_bye};
pub use engine::{PairingEngine, RoundOutcome, RoundPairing, SwissPairingEngine};
