//! Error types for the tournament service
//!
//! Domain failures are modelled as `TournamentError` and carried through the
//! crate-wide anyhow `Result`. Callers that need to tell cases apart use
//! `downcast_ref::<TournamentError>()`.

use crate::types::PlayerId;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific tournament scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TournamentError {
    #[error("Invalid match result '{value}': expected win, lose or tie")]
    InvalidMatchResult { value: String },

    #[error("Player id {player_id} is already taken")]
    DuplicatePlayerId { player_id: PlayerId },

    #[error("Could not assign a unique id to '{name}' after {attempts} attempts")]
    RegistrationExhausted { name: String, attempts: u32 },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: PlayerId },

    #[error("Odd field of {players} players but every player has already had a bye")]
    ByePoolExhausted { players: usize },

    #[error("Player {player_id} already received a bye in tournament {tournament}")]
    ByeAlreadyAwarded {
        player_id: PlayerId,
        tournament: String,
    },

    #[error("Players {player_id} and {opponent_id} already met in tournament {tournament}")]
    RematchRejected {
        player_id: PlayerId,
        opponent_id: PlayerId,
        tournament: String,
    },

    #[error("Invalid match report: {reason}")]
    InvalidMatchReport { reason: String },

    #[error(
        "Round in {tournament} stopped after {recorded_matches} recorded matches (bye: {bye:?})"
    )]
    RoundInterrupted {
        tournament: String,
        bye: Option<PlayerId>,
        recorded_matches: usize,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl TournamentError {
    /// Returns the `TournamentError` behind an anyhow error, if there is one
    pub fn from_anyhow(error: &anyhow::Error) -> Option<&TournamentError> {
        error.downcast_ref::<TournamentError>()
    }
}
