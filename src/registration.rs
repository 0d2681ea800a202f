//! Player registration with bounded id-collision retry
//!
//! Ids come from an [`IdGenerator`]. If storage reports the id as taken the
//! registrar draws a new one, up to a fixed number of attempts, and then gives
//! up with `RegistrationExhausted`.

use crate::config::{IdStrategy, RegistrationSettings};
use crate::error::{Result, TournamentError};
use crate::storage::TournamentStorage;
use crate::types::{Player, PlayerId, BYE_PLAYER_ID};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

/// Source of candidate player ids. Must never yield `BYE_PLAYER_ID`.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> PlayerId;
}

/// Hands out 1, 2, 3, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU32,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: PlayerId) -> Self {
        Self {
            next: AtomicU32::new(first.max(1)),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> PlayerId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        if id == BYE_PLAYER_ID {
            // wrapped around
            self.next.fetch_add(1, Ordering::Relaxed)
        } else {
            id
        }
    }
}

/// Uniformly random ids in `1..=max_id`
#[derive(Debug)]
pub struct RandomIdGenerator {
    rng: Mutex<StdRng>,
    max_id: PlayerId,
}

impl RandomIdGenerator {
    pub fn new(max_id: PlayerId) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            max_id: max_id.max(1),
        }
    }

    pub fn seeded(seed: u64, max_id: PlayerId) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            max_id: max_id.max(1),
        }
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> PlayerId {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(1..=self.max_id),
            Err(poisoned) => poisoned.into_inner().gen_range(1..=self.max_id),
        }
    }
}

/// Build the generator selected in configuration
pub fn id_generator_for(settings: &RegistrationSettings) -> Box<dyn IdGenerator> {
    match settings.id_strategy {
        IdStrategy::Sequential => Box::new(SequentialIdGenerator::new()),
        IdStrategy::Random => Box::new(RandomIdGenerator::new(PlayerId::MAX)),
    }
}

/// Registers players, retrying on id collisions
pub struct PlayerRegistrar {
    ids: Box<dyn IdGenerator>,
    max_attempts: u32,
}

impl PlayerRegistrar {
    pub fn new(ids: Box<dyn IdGenerator>, max_attempts: u32) -> Self {
        Self {
            ids,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_settings(settings: &RegistrationSettings) -> Self {
        Self::new(id_generator_for(settings), settings.max_attempts)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Register `name` in `tournament` and return the assigned id
    pub async fn register(
        &self,
        storage: &dyn TournamentStorage,
        tournament: &str,
        name: &str,
    ) -> Result<PlayerId> {
        for attempt in 1..=self.max_attempts {
            let id = self.ids.next_id();
            let player = Player::new(id, name, Some(tournament.to_string()));

            match storage.insert_player(player).await {
                Ok(()) => {
                    info!("{} has been registered for tournament {} as {}", name, tournament, id);
                    return Ok(id);
                }
                Err(e)
                    if matches!(
                        TournamentError::from_anyhow(&e),
                        Some(TournamentError::DuplicatePlayerId { .. })
                    ) =>
                {
                    warn!(
                        "Id {} already taken (attempt {}/{})",
                        id, attempt, self.max_attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(TournamentError::RegistrationExhausted {
            name: name.to_string(),
            attempts: self.max_attempts,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryTournamentStorage;

    /// Always proposes the same id
    struct FixedIdGenerator(PlayerId);

    impl IdGenerator for FixedIdGenerator {
        fn next_id(&self) -> PlayerId {
            self.0
        }
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);

        let from_zero = SequentialIdGenerator::starting_at(0);
        assert_eq!(from_zero.next_id(), 1);
    }

    #[test]
    fn test_seeded_random_ids_repeat() {
        let a = RandomIdGenerator::seeded(7, 1000);
        let b = RandomIdGenerator::seeded(7, 1000);
        for _ in 0..20 {
            let id = a.next_id();
            assert_eq!(id, b.next_id());
            assert!((1..=1000).contains(&id));
        }
    }

    #[tokio::test]
    async fn test_register_assigns_ids() {
        let storage = InMemoryTournamentStorage::new();
        let registrar = PlayerRegistrar::new(Box::new(SequentialIdGenerator::new()), 100);

        assert_eq!(registrar.register(&storage, "WOW", "New Guy").await.unwrap(), 1);
        assert_eq!(registrar.register(&storage, "WOW", "Old Guy").await.unwrap(), 2);
        assert_eq!(
            storage.count_players(Some("WOW".to_string())).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_retries_past_taken_ids() {
        let storage = InMemoryTournamentStorage::new();
        for id in 1..=3 {
            storage
                .insert_player(Player::new(id, "Existing", None))
                .await
                .unwrap();
        }

        let registrar = PlayerRegistrar::new(Box::new(SequentialIdGenerator::new()), 100);
        assert_eq!(registrar.register(&storage, "WOW", "Late").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let storage = InMemoryTournamentStorage::new();
        storage
            .insert_player(Player::new(5, "Taken", None))
            .await
            .unwrap();

        let registrar = PlayerRegistrar::new(Box::new(FixedIdGenerator(5)), 100);
        let err = registrar
            .register(&storage, "WOW", "Unlucky")
            .await
            .unwrap_err();

        assert_eq!(
            TournamentError::from_anyhow(&err),
            Some(&TournamentError::RegistrationExhausted {
                name: "Unlucky".to_string(),
                attempts: 100,
            })
        );
        assert_eq!(storage.count_players(None).await.unwrap(), 1);
    }
}
