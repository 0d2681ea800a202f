//! Tournament storage interface and implementations
//!
//! This module defines the interface for persisting players and match
//! records. Standings and played-opponent sets are derived from what the
//! storage returns, so an implementation only has to provide the primitive
//! queries and inserts.

pub mod memory;

pub use memory::InMemoryTournamentStorage;

use crate::config::TieBreak;
use crate::error::Result;
use crate::standings::{compute_played_opponents, compute_standings};
use crate::types::{MatchRecord, MatchReport, PlayedOpponents, Player, PlayerId, Standing};
use async_trait::async_trait;

/// Trait for tournament storage operations
///
/// `None` filters mean "every tournament" / "every player".
#[async_trait]
pub trait TournamentStorage: Send + Sync {
    /// Insert a player. Fails with `DuplicatePlayerId` if the id is taken.
    async fn insert_player(&self, player: Player) -> Result<()>;

    /// Players in registration order
    async fn fetch_players(&self, tournament: Option<String>) -> Result<Vec<Player>>;

    async fn count_players(&self, tournament: Option<String>) -> Result<usize>;

    /// Delete one player (or all) together with every match they appear in.
    /// Returns the number of players removed.
    async fn delete_players(&self, player_id: Option<PlayerId>) -> Result<usize>;

    /// Returns the number of match records removed
    async fn delete_matches(&self, tournament: Option<String>) -> Result<usize>;

    /// Write a match and its mirrored record. Both become visible together
    /// or neither does.
    async fn record_match(&self, report: MatchReport) -> Result<()>;

    /// Write a bye win for the player. At most one per tournament.
    async fn record_bye(&self, tournament: &str, player_id: PlayerId) -> Result<()>;

    /// All records of a tournament in insertion order
    async fn fetch_matches(&self, tournament: &str) -> Result<Vec<MatchRecord>>;

    /// Standings of a tournament ranked by `tie_break`. Records that tie
    /// under it stay in registration order.
    async fn fetch_standings(
        &self,
        tournament: &str,
        tie_break: TieBreak,
    ) -> Result<Vec<Standing>> {
        let players = self.fetch_players(Some(tournament.to_string())).await?;
        let matches = self.fetch_matches(tournament).await?;
        Ok(compute_standings(&players, &matches, tie_break))
    }

    /// Opponents each player of the tournament has faced
    async fn fetch_played_opponents(&self, tournament: &str) -> Result<PlayedOpponents> {
        let matches = self.fetch_matches(tournament).await?;
        Ok(compute_played_opponents(&matches))
    }
}
