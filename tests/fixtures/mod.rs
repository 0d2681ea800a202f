//! Test fixtures shared by the integration tests

use std::collections::HashSet;
use std::sync::Arc;
use swiss_room::config::{AppConfig, PairingConfig};
use swiss_room::types::{MatchRecord, PlayerId};
use swiss_room::{InMemoryTournamentStorage, TournamentDirector};

/// Director over fresh in-memory storage, plus direct access to the storage
pub fn create_test_system(
    pairing: PairingConfig,
) -> (Arc<TournamentDirector>, Arc<InMemoryTournamentStorage>) {
    let config = AppConfig {
        pairing,
        ..AppConfig::default()
    };
    let storage = Arc::new(InMemoryTournamentStorage::with_rematches(
        config.pairing.allow_rematches,
    ));
    let director = Arc::new(TournamentDirector::new(storage.clone(), &config));
    (director, storage)
}

/// Register `names` in order and return their ids
pub async fn register_field(
    director: &TournamentDirector,
    tournament: &str,
    names: &[&str],
) -> Vec<PlayerId> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        ids.push(director.register_player(tournament, name).await.unwrap());
    }
    ids
}

/// Panics if any unordered pair of real players met more than once
pub fn assert_no_rematches(matches: &[MatchRecord]) {
    let mut seen = HashSet::new();
    for record in matches.iter().filter(|m| !m.is_bye()) {
        // each match is stored twice; count only the lower-id side
        if record.player_id > record.opponent_id {
            continue;
        }
        assert!(
            seen.insert((record.player_id, record.opponent_id)),
            "rematch between {} and {}",
            record.player_id,
            record.opponent_id
        );
    }
}

/// Panics if any player has more than one bye
pub fn assert_single_byes(matches: &[MatchRecord]) {
    let mut seen = HashSet::new();
    for record in matches.iter().filter(|m| m.is_bye()) {
        assert!(
            seen.insert(record.player_id),
            "player {} received a second bye",
            record.player_id
        );
    }
}
