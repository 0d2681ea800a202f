//! Roster loading and simulated match outcomes for demo tournaments

use crate::error::Result;
use crate::service::director::{RoundReport, TournamentDirector};
use crate::types::{MatchResult, Pairing, PlayerId};
use anyhow::{anyhow, Context};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A player to sign up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Tournament code; the simulation default is used when absent
    pub tournament: Option<String>,
    /// Fixed id; assigned by the registrar when absent
    pub id: Option<PlayerId>,
    pub name: String,
}

/// List of players loaded from TOML (`[[players]]` tables)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub players: Vec<RosterEntry>,
}

impl Roster {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| anyhow!("Invalid roster: {}", e))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    /// Eleven players with fixed ids in tournament `code`
    pub fn demo(code: &str) -> Self {
        let names = [
            "New Guy",
            "Old Guy",
            "Rich Guy",
            "Poor Guy",
            "Tall Guy",
            "Short Guy",
            "Small Guy",
            "Big Guy",
            "Good Guy",
            "Bad Guy",
            "Cool Guy",
        ];
        Self {
            players: names
                .iter()
                .zip(101..)
                .map(|(name, id)| RosterEntry {
                    tournament: Some(code.to_string()),
                    id: Some(id),
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    /// Register every entry; returns the ids in roster order
    pub async fn sign_up(
        &self,
        director: &TournamentDirector,
        default_tournament: &str,
    ) -> Result<Vec<PlayerId>> {
        let mut ids = Vec::with_capacity(self.players.len());
        for entry in &self.players {
            let tournament = entry.tournament.as_deref().unwrap_or(default_tournament);
            let id = match entry.id {
                Some(id) => {
                    director
                        .register_player_with_id(tournament, id, &entry.name)
                        .await?;
                    id
                }
                None => director.register_player(tournament, &entry.name).await?,
            };
            ids.push(id);
        }
        info!("Signed up {} players", ids.len());
        Ok(ids)
    }
}

/// Uniformly random win/lose/tie outcomes
#[derive(Debug)]
pub struct RandomResults {
    rng: StdRng,
}

impl RandomResults {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn next_result(&mut self) -> MatchResult {
        *MatchResult::ALL
            .choose(&mut self.rng)
            .unwrap_or(&MatchResult::Tie)
    }
}

/// Play `rounds` rounds with random outcomes, stopping early at the first
/// round that could not be completed
pub async fn simulate_rounds(
    director: &TournamentDirector,
    tournament: &str,
    rounds: u32,
    results: &mut RandomResults,
) -> Result<Vec<RoundReport>> {
    let mut reports = Vec::new();
    for round in 1..=rounds {
        let report = director
            .play_round(tournament, |_: &Pairing| results.next_result())
            .await?;
        let complete = report.pairing.is_complete();
        info!("Round {} of {} played in {}", round, rounds, tournament);
        reports.push(report);
        if !complete {
            break;
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_toml() {
        let roster = Roster::from_toml_str(
            r#"
            [[players]]
            tournament = "WOW"
            id = 101
            name = "New Guy"

            [[players]]
            name = "Walk In"
            "#,
        )
        .unwrap();

        assert_eq!(roster.players.len(), 2);
        assert_eq!(roster.players[0].id, Some(101));
        assert_eq!(roster.players[1].tournament, None);
        assert_eq!(roster.players[1].id, None);
    }

    #[test]
    fn test_demo_roster() {
        let roster = Roster::demo("WOW");
        assert_eq!(roster.players.len(), 11);
        assert_eq!(roster.players[0].id, Some(101));
        assert_eq!(roster.players[10].id, Some(111));
        assert_eq!(roster.players[10].name, "Cool Guy");
    }

    #[test]
    fn test_seeded_results_repeat() {
        let mut a = RandomResults::new(Some(3));
        let mut b = RandomResults::new(Some(3));
        let first: Vec<_> = (0..16).map(|_| a.next_result()).collect();
        let second: Vec<_> = (0..16).map(|_| b.next_result()).collect();
        assert_eq!(first, second);
    }
}
