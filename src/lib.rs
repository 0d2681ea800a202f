//! Swiss Room - Swiss-system tournament service
//!
//! This crate tracks players and match results for Swiss-system tournaments
//! and pairs each round by standings, avoiding rematches and handing out at
//! most one bye per player.

pub mod config;
pub mod error;
pub mod pairing;
pub mod registration;
pub mod service;
pub mod standings;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, TournamentError};
pub use types::*;

// Re-export key components
pub use pairing::{PairingEngine, RoundOutcome, RoundPairing, SwissPairingEngine};
pub use service::TournamentDirector;
pub use storage::{InMemoryTournamentStorage, TournamentStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
