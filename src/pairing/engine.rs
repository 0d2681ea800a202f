//! Swiss pairing engine
//!
//! Builds the next round from a standings snapshot and the opponents each
//! player has already faced. The construction is greedy and deterministic:
//! the highest-ranked unpaired player takes the first eligible opponent below
//! them in the standings.

use crate::config::{PairingConfig, TieBreak};
use crate::error::{Result, TournamentError};
use crate::pairing::bye::select_bye;
use crate::standings::rank_standings;
use crate::types::{Pairing, PlayedOpponents, PlayerId, Standing};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How round construction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Every player is covered by a pairing or the bye
    Complete,
    /// `stranded_player` has already played everyone left in the pool.
    /// The pairings formed before that point are still returned.
    Aborted { stranded_player: PlayerId },
}

/// Pairings for one round plus how construction ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPairing {
    /// Bye first (if any), then matches in standings order
    pub pairings: Vec<Pairing>,
    pub outcome: RoundOutcome,
}

impl RoundPairing {
    pub fn is_complete(&self) -> bool {
        self.outcome == RoundOutcome::Complete
    }

    /// Number of players covered, counting a bye as one
    pub fn players_covered(&self) -> usize {
        self.pairings.iter().map(|p| p.player_ids().len()).sum()
    }

    pub fn bye(&self) -> Option<&Pairing> {
        self.pairings.iter().find(|p| p.is_bye())
    }

    pub fn matches(&self) -> impl Iterator<Item = &Pairing> {
        self.pairings.iter().filter(|p| !p.is_bye())
    }
}

/// Trait for round pairing algorithms
pub trait PairingEngine: Send + Sync {
    /// Pair the next round.
    ///
    /// Fails only when the field is odd and nobody is eligible for the bye.
    /// Running out of legal opponents is reported through
    /// [`RoundOutcome::Aborted`], not as an error.
    fn pair_round(&self, standings: &[Standing], played: &PlayedOpponents)
        -> Result<RoundPairing>;
}

/// Standings-ordered greedy Swiss pairing
#[derive(Debug, Clone, Default)]
pub struct SwissPairingEngine {
    tie_break: TieBreak,
}

impl SwissPairingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &PairingConfig) -> Self {
        Self {
            tie_break: config.tie_break,
        }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    fn has_played(played: &PlayedOpponents, player: PlayerId, opponent: PlayerId) -> bool {
        played
            .get(&player)
            .is_some_and(|opponents| opponents.contains(&opponent))
            || played
                .get(&opponent)
                .is_some_and(|opponents| opponents.contains(&player))
    }
}

impl PairingEngine for SwissPairingEngine {
    fn pair_round(
        &self,
        standings: &[Standing],
        played: &PlayedOpponents,
    ) -> Result<RoundPairing> {
        let mut pool: Vec<Standing> = standings.to_vec();
        rank_standings(&mut pool, self.tie_break);

        let mut pairings = Vec::with_capacity(pool.len() / 2 + 1);

        if pool.len() % 2 == 1 {
            let idx = select_bye(&pool, played, self.tie_break).ok_or(
                TournamentError::ByePoolExhausted {
                    players: pool.len(),
                },
            )?;
            let bye_player = pool.remove(idx);
            debug!(
                "Bye goes to player {} ({})",
                bye_player.player_id, bye_player.name
            );
            pairings.push(Pairing::bye(&bye_player));
        }

        while !pool.is_empty() {
            let top = &pool[0];
            let opponent_idx = pool
                .iter()
                .skip(1)
                .position(|candidate| {
                    !Self::has_played(played, top.player_id, candidate.player_id)
                })
                .map(|pos| pos + 1);

            let Some(opponent_idx) = opponent_idx else {
                warn!(
                    "Player {} has played every remaining opponent; returning {} pairings",
                    top.player_id,
                    pairings.len()
                );
                return Ok(RoundPairing {
                    pairings,
                    outcome: RoundOutcome::Aborted {
                        stranded_player: top.player_id,
                    },
                });
            };

            let opponent = pool.remove(opponent_idx);
            let player = pool.remove(0);
            debug!("Paired {} vs {}", player.player_id, opponent.player_id);
            pairings.push(Pairing::between(&player, &opponent));
        }

        info!("Paired a full round of {} entries", pairings.len());
        Ok(RoundPairing {
            pairings,
            outcome: RoundOutcome::Complete,
        })
    }
}
