//! Asteroid Field headless runner
//!
//! Plays the autopilot for a fixed number of frames and prints a JSON summary.
//!
//! Usage: `asteroid-field [seed] [frames] [config.json]`

use serde::Serialize;

use asteroid_field::GameConfig;
use asteroid_field::sim::{DestroyCause, EntityKind, GameEvent, GamePhase, GameState, TickInput, tick};

const DEFAULT_SEED: u64 = 1;
const DEFAULT_FRAMES: u64 = 60 * 60;

/// Tallies gathered from the event stream
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    phase: Option<GamePhase>,
    score: u64,
    wave: u32,
    lives: u8,
    rounds: u32,
    waves_cleared: u32,
    lives_lost: u32,
    asteroids_shot: u32,
    saucers_shot: u32,
    hyperspace_jumps: u32,
    best_score: u64,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted => self.rounds += 1,
            GameEvent::WaveCleared { .. } => self.waves_cleared += 1,
            GameEvent::LifeLost { .. } => self.lives_lost += 1,
            GameEvent::ShipJumped { .. } => self.hyperspace_jumps += 1,
            GameEvent::ScoreChanged { score, .. } => self.best_score = self.best_score.max(*score),
            GameEvent::EntityDestroyed {
                kind,
                cause: DestroyCause::Shot,
                ..
            } => match kind {
                EntityKind::Asteroid => self.asteroids_shot += 1,
                EntityKind::Saucer => self.saucers_shot += 1,
                _ => {}
            },
            GameEvent::WaveStarted { wave, asteroids } => {
                log::info!("Wave {} started with {} asteroids", wave, asteroids);
            }
            GameEvent::GameOver { score, wave } => {
                log::info!("Game over at wave {} with {} points", wave, score);
            }
            _ => {}
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = parse_arg(args.next(), "seed", DEFAULT_SEED);
    let frames = parse_arg(args.next(), "frames", DEFAULT_FRAMES);
    let mut config = match args.next() {
        Some(path) => GameConfig::load(path),
        None => GameConfig::default(),
    };
    config.saucer_schedule.enabled = true;

    log::info!("Asteroid Field starting: seed {}, {} frames", seed, frames);

    let mut state = GameState::new(seed, config);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut summary = RunSummary {
        seed,
        frames,
        ..Default::default()
    };

    for _ in 0..frames {
        tick(&mut state, &input);
        for event in state.drain_events() {
            summary.record(&event);
        }
    }

    summary.phase = Some(state.phase());
    summary.score = state.progression.score;
    summary.wave = state.progression.wave;
    summary.lives = state.progression.lives;

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize run summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; nothing to run here
}

fn parse_arg(arg: Option<String>, name: &str, default: u64) -> u64 {
    match arg {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("Invalid {} {:?} ({}), using {}", name, raw, e, default);
            default
        }),
        None => default,
    }
}
