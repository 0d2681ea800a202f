//! Pairing rule configuration

use crate::error::TournamentError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering used for standings and for choosing the bye
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Wins only; equal records keep registration order
    WinsOnly,
    /// Wins, then opponent match-win
    #[default]
    WinsThenOmw,
}

impl FromStr for TieBreak {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wins_only" => Ok(TieBreak::WinsOnly),
            "wins_then_omw" => Ok(TieBreak::WinsThenOmw),
            _ => Err(TournamentError::ConfigurationError {
                message: format!("Unknown tie break '{}'", s),
            }),
        }
    }
}

/// What to do with a round that could not be completed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialRoundPolicy {
    /// Record the pairings that were formed
    #[default]
    Commit,
    /// Record nothing and leave the round to the operator
    Discard,
}

impl FromStr for PartialRoundPolicy {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "commit" => Ok(PartialRoundPolicy::Commit),
            "discard" => Ok(PartialRoundPolicy::Discard),
            _ => Err(TournamentError::ConfigurationError {
                message: format!("Unknown partial round policy '{}'", s),
            }),
        }
    }
}

/// Settings consumed by the pairing engine and the director
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    pub tie_break: TieBreak,
    pub partial_round_policy: PartialRoundPolicy,
    /// Let storage accept a second match between the same two players
    pub allow_rematches: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tie_break() {
        assert_eq!("wins_only".parse::<TieBreak>().unwrap(), TieBreak::WinsOnly);
        assert_eq!(
            "WINS_THEN_OMW".parse::<TieBreak>().unwrap(),
            TieBreak::WinsThenOmw
        );
        assert!("omw_first".parse::<TieBreak>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = PairingConfig::default();
        assert_eq!(config.tie_break, TieBreak::WinsThenOmw);
        assert_eq!(config.partial_round_policy, PartialRoundPolicy::Commit);
        assert!(!config.allow_rematches);
    }
}
