//! In-memory tournament storage

use crate::error::{Result, TournamentError};
use crate::storage::TournamentStorage;
use crate::types::{
    MatchRecord, MatchReport, MatchResult, Player, PlayerId, BYE_PLAYER_ID,
};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct StorageState {
    players: Vec<Player>,
    matches: Vec<MatchRecord>,
}

/// In-memory storage keeping players and match records in insertion order
#[derive(Debug, Default)]
pub struct InMemoryTournamentStorage {
    state: RwLock<StorageState>,
    allow_rematches: bool,
}

impl InMemoryTournamentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept repeat matches between the same two players
    pub fn with_rematches(allow_rematches: bool) -> Self {
        Self {
            state: RwLock::new(StorageState::default()),
            allow_rematches,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StorageState>> {
        self.state.read().map_err(|_| {
            TournamentError::InternalError {
                message: "Failed to acquire storage read lock".to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StorageState>> {
        self.state.write().map_err(|_| {
            TournamentError::InternalError {
                message: "Failed to acquire storage write lock".to_string(),
            }
            .into()
        })
    }

    fn ensure_player(state: &StorageState, player_id: PlayerId) -> Result<()> {
        if state.players.iter().any(|p| p.id == player_id) {
            Ok(())
        } else {
            Err(TournamentError::PlayerNotFound { player_id }.into())
        }
    }
}

#[async_trait]
impl TournamentStorage for InMemoryTournamentStorage {
    async fn insert_player(&self, player: Player) -> Result<()> {
        if player.id == BYE_PLAYER_ID {
            return Err(TournamentError::DuplicatePlayerId {
                player_id: player.id,
            }
            .into());
        }

        let mut state = self.write()?;
        if state.players.iter().any(|p| p.id == player.id) {
            return Err(TournamentError::DuplicatePlayerId {
                player_id: player.id,
            }
            .into());
        }

        debug!("Stored player {} ({})", player.id, player.name);
        state.players.push(player);
        Ok(())
    }

    async fn fetch_players(&self, tournament: Option<String>) -> Result<Vec<Player>> {
        let state = self.read()?;
        Ok(state
            .players
            .iter()
            .filter(|p| tournament.is_none() || p.tournament == tournament)
            .cloned()
            .collect())
    }

    async fn count_players(&self, tournament: Option<String>) -> Result<usize> {
        let state = self.read()?;
        Ok(state
            .players
            .iter()
            .filter(|p| tournament.is_none() || p.tournament == tournament)
            .count())
    }

    async fn delete_players(&self, player_id: Option<PlayerId>) -> Result<usize> {
        let mut state = self.write()?;
        let removed = match player_id {
            None => {
                let removed = state.players.len();
                state.players.clear();
                state.matches.clear();
                removed
            }
            Some(id) => {
                let before = state.players.len();
                state.players.retain(|p| p.id != id);
                state
                    .matches
                    .retain(|m| m.player_id != id && m.opponent_id != id);
                before - state.players.len()
            }
        };

        info!("Deleted {} player(s)", removed);
        Ok(removed)
    }

    async fn delete_matches(&self, tournament: Option<String>) -> Result<usize> {
        let mut state = self.write()?;
        let before = state.matches.len();
        match tournament {
            None => state.matches.clear(),
            Some(code) => state.matches.retain(|m| m.tournament != code),
        }
        let removed = before - state.matches.len();

        info!("Deleted {} match record(s)", removed);
        Ok(removed)
    }

    async fn record_match(&self, report: MatchReport) -> Result<()> {
        if report.player_id == report.opponent_id {
            return Err(TournamentError::InvalidMatchReport {
                reason: format!("player {} cannot play themselves", report.player_id),
            }
            .into());
        }
        if report.opponent_id == BYE_PLAYER_ID || report.player_id == BYE_PLAYER_ID {
            return Err(TournamentError::InvalidMatchReport {
                reason: "byes are recorded with record_bye".to_string(),
            }
            .into());
        }

        // Validation and both inserts happen under one write lock
        let mut state = self.write()?;
        Self::ensure_player(&state, report.player_id)?;
        Self::ensure_player(&state, report.opponent_id)?;

        if !self.allow_rematches
            && state.matches.iter().any(|m| {
                m.tournament == report.tournament
                    && m.involves_pair(report.player_id, report.opponent_id)
            })
        {
            return Err(TournamentError::RematchRejected {
                player_id: report.player_id,
                opponent_id: report.opponent_id,
                tournament: report.tournament,
            }
            .into());
        }

        let record = MatchRecord::new(
            report.tournament,
            report.player_id,
            report.opponent_id,
            report.result,
        );
        let mirror = record.mirrored();
        debug!(
            "Recorded {} {} vs {} in {}",
            record.player_id, record.result, record.opponent_id, record.tournament
        );
        state.matches.push(record);
        state.matches.push(mirror);
        Ok(())
    }

    async fn record_bye(&self, tournament: &str, player_id: PlayerId) -> Result<()> {
        let mut state = self.write()?;
        Self::ensure_player(&state, player_id)?;

        if state
            .matches
            .iter()
            .any(|m| m.tournament == tournament && m.player_id == player_id && m.is_bye())
        {
            return Err(TournamentError::ByeAlreadyAwarded {
                player_id,
                tournament: tournament.to_string(),
            }
            .into());
        }

        debug!("Recorded bye for {} in {}", player_id, tournament);
        state.matches.push(MatchRecord::new(
            tournament,
            player_id,
            BYE_PLAYER_ID,
            MatchResult::Win,
        ));
        Ok(())
    }

    async fn fetch_matches(&self, tournament: &str) -> Result<Vec<MatchRecord>> {
        let state = self.read()?;
        Ok(state
            .matches
            .iter()
            .filter(|m| m.tournament == tournament)
            .cloned()
            .collect())
    }
}
