//! Performance benchmarks for round pairing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use swiss_room::config::AppConfig;
use swiss_room::service::{simulate_rounds, RandomResults};
use swiss_room::types::{PlayedOpponents, PlayerId, Standing};
use swiss_room::{InMemoryTournamentStorage, PairingEngine, SwissPairingEngine, TournamentDirector};

/// A field of `size` players halfway through a tournament, with every
/// player having met its neighbours in registration order
fn mid_tournament_field(size: u32) -> (Vec<Standing>, PlayedOpponents) {
    let standings = (1..=size)
        .map(|id| Standing {
            wins: id % 5,
            matches: 4,
            opponent_match_win: (id % 7) as f64 / 7.0,
            ..Standing::new(id, format!("player_{}", id))
        })
        .collect();

    let mut played = PlayedOpponents::new();
    for id in 1..=size {
        for offset in 1..=2 {
            let other: PlayerId = (id + offset - 1) % size + 1;
            if other != id {
                played.entry(id).or_default().insert(other);
                played.entry(other).or_default().insert(id);
            }
        }
    }
    (standings, played)
}

fn bench_pair_round(c: &mut Criterion) {
    let engine = SwissPairingEngine::new();

    for size in [16u32, 128, 1024] {
        let (standings, played) = mid_tournament_field(size);
        c.bench_function(&format!("pair_round_{}_players", size), |b| {
            b.iter(|| black_box(engine.pair_round(&standings, &played)))
        });
    }
}

fn bench_simulated_tournament(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("simulate_5_rounds_64_players", |b| {
        b.iter(|| {
            rt.block_on(async {
                let config = AppConfig::default();
                let storage = Arc::new(InMemoryTournamentStorage::new());
                let director = TournamentDirector::new(storage, &config);
                for i in 0..64 {
                    let _ = director
                        .register_player("BENCH", &format!("player_{}", i))
                        .await;
                }

                let mut results = RandomResults::new(Some(42));
                black_box(simulate_rounds(&director, "BENCH", 5, &mut results).await)
            })
        })
    });
}

criterion_group!(benches, bench_pair_round, bench_simulated_tournament);
criterion_main!(benches);
