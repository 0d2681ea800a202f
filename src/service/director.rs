//! Tournament director
//!
//! The director is the caller side of the pairing engine: it registers
//! players, reports results, and runs rounds against an injected storage.
//! All writes and pairing computations for one tournament are serialised
//! through a per-tournament lock so each round sees every result committed
//! before it.

use crate::config::{AppConfig, PairingConfig, PartialRoundPolicy};
use crate::error::{Result, TournamentError};
use crate::pairing::{PairingEngine, RoundOutcome, RoundPairing, SwissPairingEngine};
use crate::registration::PlayerRegistrar;
use crate::storage::TournamentStorage;
use crate::types::{
    MatchReport, MatchResult, Pairing, Player, PlayerId, Standing, TournamentId, BYE_PLAYER_ID,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, warn};

/// A match result recorded while playing a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedResult {
    pub player_id: PlayerId,
    pub opponent_id: PlayerId,
    pub result: MatchResult,
}

/// What happened when a round was played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub tournament: TournamentId,
    pub pairing: RoundPairing,
    /// Player that received the bye, if it was recorded
    pub bye: Option<PlayerId>,
    /// Results written to storage, in pairing order
    pub results: Vec<RecordedResult>,
    /// False when an aborted round was discarded
    pub committed: bool,
}

/// Coordinates storage, registration and pairing for tournaments
pub struct TournamentDirector {
    storage: Arc<dyn TournamentStorage>,
    engine: Arc<dyn PairingEngine>,
    registrar: PlayerRegistrar,
    pairing_config: PairingConfig,
    round_locks: Mutex<HashMap<TournamentId, Arc<AsyncMutex<()>>>>,
}

impl TournamentDirector {
    /// Create a director with a Swiss engine built from configuration
    pub fn new(storage: Arc<dyn TournamentStorage>, config: &AppConfig) -> Self {
        let engine = Arc::new(SwissPairingEngine::with_config(&config.pairing));
        Self::with_engine(
            storage,
            engine,
            PlayerRegistrar::from_settings(&config.registration),
            config.pairing.clone(),
        )
    }

    /// Create with a custom engine and registrar
    pub fn with_engine(
        storage: Arc<dyn TournamentStorage>,
        engine: Arc<dyn PairingEngine>,
        registrar: PlayerRegistrar,
        pairing_config: PairingConfig,
    ) -> Self {
        Self {
            storage,
            engine,
            registrar,
            pairing_config,
            round_locks: Mutex::new(HashMap::new()),
        }
    }

    fn round_lock(&self, tournament: &str) -> Result<Arc<AsyncMutex<()>>> {
        let mut locks = self
            .round_locks
            .lock()
            .map_err(|_| TournamentError::InternalError {
                message: "Failed to acquire round lock table".to_string(),
            })?;
        Ok(locks
            .entry(tournament.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone())
    }

    /// Hold every known tournament's round lock, taken in code order.
    /// Used by deletes that can reach across tournaments.
    async fn lock_all_rounds(&self) -> Result<Vec<OwnedMutexGuard<()>>> {
        let mut locks: Vec<(TournamentId, Arc<AsyncMutex<()>>)> = {
            let table = self
                .round_locks
                .lock()
                .map_err(|_| TournamentError::InternalError {
                    message: "Failed to acquire round lock table".to_string(),
                })?;
            table
                .iter()
                .map(|(code, lock)| (code.clone(), lock.clone()))
                .collect()
        };
        locks.sort_by(|a, b| a.0.cmp(&b.0));

        let mut guards = Vec::with_capacity(locks.len());
        for (_, lock) in locks {
            guards.push(lock.lock_owned().await);
        }
        Ok(guards)
    }

    /// Register a player and let the registrar pick the id
    pub async fn register_player(&self, tournament: &str, name: &str) -> Result<PlayerId> {
        let lock = self.round_lock(tournament)?;
        let _guard = lock.lock().await;
        self.registrar
            .register(self.storage.as_ref(), tournament, name)
            .await
    }

    /// Register a player under a caller-chosen id. Collisions are not retried.
    pub async fn register_player_with_id(
        &self,
        tournament: &str,
        player_id: PlayerId,
        name: &str,
    ) -> Result<()> {
        let lock = self.round_lock(tournament)?;
        let _guard = lock.lock().await;
        self.storage
            .insert_player(Player::new(player_id, name, Some(tournament.to_string())))
            .await?;
        info!("{} has been registered for tournament {}", name, tournament);
        Ok(())
    }

    /// Number of players in `tournament`, or in every tournament for `None`
    pub async fn count_players(&self, tournament: Option<&str>) -> Result<usize> {
        self.storage
            .count_players(tournament.map(str::to_string))
            .await
    }

    /// Delete one player (or all) and their matches.
    ///
    /// A player's matches may span tournaments, so this waits for every
    /// round in progress to finish.
    pub async fn delete_players(&self, player_id: Option<PlayerId>) -> Result<usize> {
        let _guards = self.lock_all_rounds().await?;
        self.storage.delete_players(player_id).await
    }

    /// Delete the matches of one tournament, or of every tournament for `None`
    pub async fn delete_matches(&self, tournament: Option<&str>) -> Result<usize> {
        match tournament {
            Some(code) => {
                let lock = self.round_lock(code)?;
                let _guard = lock.lock().await;
                self.storage.delete_matches(Some(code.to_string())).await
            }
            None => {
                let _guards = self.lock_all_rounds().await?;
                self.storage.delete_matches(None).await
            }
        }
    }

    /// Record a match result given as text ("win", "lose" or "tie").
    ///
    /// The result is validated before anything is written. A bye can be
    /// reported against the sentinel opponent with result "win".
    pub async fn report_match(
        &self,
        tournament: &str,
        player_id: PlayerId,
        opponent_id: PlayerId,
        result: &str,
    ) -> Result<()> {
        let result: MatchResult = result.parse()?;

        let lock = self.round_lock(tournament)?;
        let _guard = lock.lock().await;

        if opponent_id == BYE_PLAYER_ID {
            if result != MatchResult::Win {
                return Err(TournamentError::InvalidMatchReport {
                    reason: format!("a bye must be a win, got {}", result),
                }
                .into());
            }
            return self.storage.record_bye(tournament, player_id).await;
        }

        self.storage
            .record_match(MatchReport {
                tournament: tournament.to_string(),
                player_id,
                opponent_id,
                result,
            })
            .await?;
        info!(
            "Match recorded in {}: {} {} vs {}",
            tournament, player_id, result, opponent_id
        );
        Ok(())
    }

    /// Award a bye outside of `play_round`
    pub async fn award_bye(&self, tournament: &str, player_id: PlayerId) -> Result<()> {
        let lock = self.round_lock(tournament)?;
        let _guard = lock.lock().await;
        self.storage.record_bye(tournament, player_id).await
    }

    /// Ranked standings using the configured tie break
    pub async fn standings(&self, tournament: &str) -> Result<Vec<Standing>> {
        self.storage
            .fetch_standings(tournament, self.pairing_config.tie_break)
            .await
    }

    async fn pair_locked(&self, tournament: &str) -> Result<RoundPairing> {
        let standings = self
            .storage
            .fetch_standings(tournament, self.pairing_config.tie_break)
            .await?;
        let played = self.storage.fetch_played_opponents(tournament).await?;
        self.engine.pair_round(&standings, &played)
    }

    /// Pairings for the next round of `tournament`
    pub async fn compute_pairings(&self, tournament: &str) -> Result<RoundPairing> {
        let lock = self.round_lock(tournament)?;
        let _guard = lock.lock().await;
        self.pair_locked(tournament).await
    }

    /// Pair a round and record its results.
    ///
    /// The bye is recorded first, then each match with the result `decide`
    /// returns for its first player. An aborted round is recorded or dropped
    /// according to the configured [`PartialRoundPolicy`].
    ///
    /// Writes are not rolled back. If storage fails mid-round the error is
    /// wrapped in [`TournamentError::RoundInterrupted`], which names the bye
    /// and the number of matches already recorded; the storage error stays
    /// in the error chain.
    pub async fn play_round<F>(&self, tournament: &str, mut decide: F) -> Result<RoundReport>
    where
        F: FnMut(&Pairing) -> MatchResult + Send,
    {
        let lock = self.round_lock(tournament)?;
        let _guard = lock.lock().await;

        let pairing = self.pair_locked(tournament).await?;
        let mut report = RoundReport {
            tournament: tournament.to_string(),
            pairing: pairing.clone(),
            bye: None,
            results: Vec::new(),
            committed: true,
        };

        if let RoundOutcome::Aborted { stranded_player } = pairing.outcome {
            warn!(
                "Round in {} aborted at player {} after {} pairings",
                tournament,
                stranded_player,
                pairing.pairings.len()
            );
            if self.pairing_config.partial_round_policy == PartialRoundPolicy::Discard {
                report.committed = false;
                return Ok(report);
            }
        }

        for entry in &pairing.pairings {
            match entry {
                Pairing::Bye { player_id, .. } => {
                    if let Err(e) = self.storage.record_bye(tournament, *player_id).await {
                        return Err(Self::interrupted(e, &report));
                    }
                    report.bye = Some(*player_id);
                }
                Pairing::Match {
                    player1_id,
                    player2_id,
                    ..
                } => {
                    let result = decide(entry);
                    let recorded = self
                        .storage
                        .record_match(MatchReport {
                            tournament: tournament.to_string(),
                            player_id: *player1_id,
                            opponent_id: *player2_id,
                            result,
                        })
                        .await;
                    if let Err(e) = recorded {
                        return Err(Self::interrupted(e, &report));
                    }
                    report.results.push(RecordedResult {
                        player_id: *player1_id,
                        opponent_id: *player2_id,
                        result,
                    });
                }
            }
        }

        info!(
            "Round of Swiss complete in {}: {} matches, bye: {:?}",
            tournament,
            report.results.len(),
            report.bye
        );
        Ok(report)
    }

    fn interrupted(error: anyhow::Error, report: &RoundReport) -> anyhow::Error {
        warn!(
            "Round in {} interrupted after {} matches, bye: {:?}: {}",
            report.tournament,
            report.results.len(),
            report.bye,
            error
        );
        error.context(TournamentError::RoundInterrupted {
            tournament: report.tournament.clone(),
            bye: report.bye,
            recorded_matches: report.results.len(),
        })
    }
}
