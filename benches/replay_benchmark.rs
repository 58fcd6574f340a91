//! Performance benchmarks for record and replay
//!
//! Measures three stages on the same random-agent game:
//!
//! 1. **Record** - play a live game with the recorder attached
//! 2. **Codec** - encode the replay to text and decode it again
//! 3. **Replay** - re-drive a fresh game from the decoded replay

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hsgame_rs::{
    core::Deck,
    game::{RandomAgent, VerbosityLevel},
    loader::DeckLoader,
    replay::{decode, RecordingGame, Replay, ReplayPlayer},
    Result,
};
use std::path::PathBuf;
use std::time::Duration;

const MAX_TURNS: u32 = 60;

/// Decks loaded once for every benchmark
struct BenchmarkSetup {
    decks: [Deck; 2],
}

impl BenchmarkSetup {
    fn load() -> Result<Self> {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_decks");
        Ok(BenchmarkSetup {
            decks: [
                DeckLoader::load_deck(&dir.join("mage_missiles.dck"))?,
                DeckLoader::load_deck(&dir.join("druid_wild.dck"))?,
            ],
        })
    }
}

fn record_game(setup: &BenchmarkSetup, seed: u64) -> Result<Replay> {
    let mut session = RecordingGame::new(setup.decks.clone(), seed);
    session.game_mut().logger.set_verbosity(VerbosityLevel::Silent);
    let mut agent1 = RandomAgent::with_seed(seed);
    let mut agent2 = RandomAgent::with_seed(seed + 1);
    session.play(&mut agent1, &mut agent2, MAX_TURNS)?;
    session.finish()
}

fn replay_game(replay: Replay) -> Result<usize> {
    let mut player = ReplayPlayer::new(replay)?.with_turn_limit(MAX_TURNS);
    player.game_mut().logger.set_verbosity(VerbosityLevel::Silent);
    Ok(player.run()?.actions_applied)
}

fn bench_replay(c: &mut Criterion) {
    let setup = match BenchmarkSetup::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load decks: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("replay");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    let replay = record_game(&setup, seed).expect("warmup game should record");
    let text = replay.to_text().expect("replay should encode");
    println!("\nWarmup game (seed {}):", seed);
    println!("  Actions: {}", replay.actions.len());
    println!("  Turns: {}", replay.turn_count());
    println!("  Random values: {}", replay.random.len());
    println!("  Replay text: {} bytes", text.len());

    group.bench_with_input(BenchmarkId::new("record", seed), &seed, |b, &seed| {
        b.iter(|| record_game(&setup, black_box(seed)).expect("game should record"));
    });

    group.bench_function(BenchmarkId::new("codec", seed), |b| {
        b.iter(|| {
            let encoded = black_box(&replay).to_text().expect("replay should encode");
            decode(&encoded).expect("replay should decode")
        });
    });

    group.bench_function(BenchmarkId::new("replay", seed), |b| {
        b.iter(|| replay_game(black_box(replay.clone())).expect("replay should run"));
    });

    group.finish();
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
