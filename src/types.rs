//! Common types used throughout the tournament service

use crate::error::TournamentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Unique identifier for players
pub type PlayerId = u32;

/// Short code identifying a tournament (e.g. "WOW")
pub type TournamentId = String;

/// Opponent id recorded for a bye. Never assigned to a real player.
pub const BYE_PLAYER_ID: PlayerId = 0;

/// Display name used for the bye side of a pairing
pub const BYE_NAME: &str = "BYE";

/// Opponents already faced, keyed by player. Includes `BYE_PLAYER_ID` for
/// players that have had a bye.
pub type PlayedOpponents = HashMap<PlayerId, HashSet<PlayerId>>;

/// Outcome of a match from the perspective of the reporting player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Lose,
    Tie,
}

impl MatchResult {
    pub const ALL: [MatchResult; 3] = [MatchResult::Win, MatchResult::Lose, MatchResult::Tie];

    /// The same match seen from the opponent's side
    pub fn mirrored(self) -> Self {
        match self {
            MatchResult::Win => MatchResult::Lose,
            MatchResult::Lose => MatchResult::Win,
            MatchResult::Tie => MatchResult::Tie,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Lose => "lose",
            MatchResult::Tie => "tie",
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchResult {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Ok(MatchResult::Win),
            "lose" => Ok(MatchResult::Lose),
            "tie" => Ok(MatchResult::Tie),
            _ => Err(TournamentError::InvalidMatchResult {
                value: s.to_string(),
            }),
        }
    }
}

/// A registered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Tournament the player is entered in, if any
    pub tournament: Option<TournamentId>,
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, tournament: Option<TournamentId>) -> Self {
        Self {
            id,
            name: name.into(),
            tournament,
            registered_at: Utc::now(),
        }
    }
}

/// One side of a reported match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub tournament: TournamentId,
    pub player_id: PlayerId,
    pub opponent_id: PlayerId,
    pub result: MatchResult,
    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(
        tournament: impl Into<TournamentId>,
        player_id: PlayerId,
        opponent_id: PlayerId,
        result: MatchResult,
    ) -> Self {
        Self {
            tournament: tournament.into(),
            player_id,
            opponent_id,
            result,
            recorded_at: Utc::now(),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.opponent_id == BYE_PLAYER_ID
    }

    /// The opponent's half of this record
    pub fn mirrored(&self) -> Self {
        Self {
            tournament: self.tournament.clone(),
            player_id: self.opponent_id,
            opponent_id: self.player_id,
            result: self.result.mirrored(),
            recorded_at: self.recorded_at,
        }
    }

    /// True if this record is one half of a match between `a` and `b`
    pub fn involves_pair(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.player_id == a && self.opponent_id == b)
            || (self.player_id == b && self.opponent_id == a)
    }
}

/// A match result reported by a caller, validated before anything is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub tournament: TournamentId,
    pub player_id: PlayerId,
    pub opponent_id: PlayerId,
    pub result: MatchResult,
}

/// Read-only ranked view of a player, derived from match history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub matches: u32,
    /// Mean match-win rate of the opponents faced
    pub opponent_match_win: f64,
    pub had_bye: bool,
}

impl Standing {
    /// A fresh standing with no matches played
    pub fn new(player_id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
            wins: 0,
            losses: 0,
            ties: 0,
            matches: 0,
            opponent_match_win: 0.0,
            had_bye: false,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.wins as f64 / self.matches as f64
        }
    }
}

/// One entry of a round's pairing list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pairing {
    Bye {
        player_id: PlayerId,
        player_name: String,
    },
    Match {
        player1_id: PlayerId,
        player1_name: String,
        player2_id: PlayerId,
        player2_name: String,
    },
}

impl Pairing {
    pub fn bye(standing: &Standing) -> Self {
        Pairing::Bye {
            player_id: standing.player_id,
            player_name: standing.name.clone(),
        }
    }

    pub fn between(first: &Standing, second: &Standing) -> Self {
        Pairing::Match {
            player1_id: first.player_id,
            player1_name: first.name.clone(),
            player2_id: second.player_id,
            player2_name: second.name.clone(),
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Pairing::Bye { .. })
    }

    /// Real players covered by this pairing
    pub fn player_ids(&self) -> Vec<PlayerId> {
        match self {
            Pairing::Bye { player_id, .. } => vec![*player_id],
            Pairing::Match {
                player1_id,
                player2_id,
                ..
            } => vec![*player1_id, *player2_id],
        }
    }

    /// Row form `(id1, name1, id2, name2)`; a bye reads `(id, name, 0, "BYE")`
    pub fn to_row(&self) -> (PlayerId, String, PlayerId, String) {
        match self {
            Pairing::Bye {
                player_id,
                player_name,
            } => (
                *player_id,
                player_name.clone(),
                BYE_PLAYER_ID,
                BYE_NAME.to_string(),
            ),
            Pairing::Match {
                player1_id,
                player1_name,
                player2_id,
                player2_name,
            } => (
                *player1_id,
                player1_name.clone(),
                *player2_id,
                player2_name.clone(),
            ),
        }
    }
}

impl std::fmt::Display for Pairing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (id1, name1, id2, name2) = self.to_row();
        write!(f, "{} ({}) vs {} ({})", name1, id1, name2, id2)
    }
}
