//! Shape Shooter headless runner
//!
//! Plays a seeded session on autopilot and prints the final state as JSON.
//!
//! Usage: `shape-shooter [tuning.json] [seed] [ticks]`

use std::process::ExitCode;

use shape_shooter::Tuning;
use shape_shooter::sim::{EventSink, GameEvent, GamePhase, GameState, TickInput, tick};

/// Logs events and their sound cues, and keeps a tally
#[derive(Default)]
struct LogSink {
    events: usize,
    kills: usize,
}

impl EventSink for LogSink {
    fn emit(&mut self, event: GameEvent) {
        self.events += 1;
        if matches!(event, GameEvent::EnemyKilled { .. }) {
            self.kills += 1;
        }
        match event.sound() {
            Some(cue) => log::trace!("{:?} -> {} ({} Hz, {} ms)", event, cue.key, cue.frequency_hz, cue.duration_ms),
            None => log::trace!("{:?}", event),
        }
    }
}

/// Run on autopilot until `ticks` elapse or the player dies
fn play(state: &mut GameState, ticks: u64, sink: &mut LogSink) {
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    for _ in 0..ticks {
        tick(state, &input, sink);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Shape Shooter (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) if path != "-" => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        _ => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(6_000);

    let mut state = GameState::with_tuning(seed, tuning);
    let mut sink = LogSink::default();
    play(&mut state, ticks, &mut sink);

    log::info!(
        "Session over after {} ticks: score={} level={} kills={} events={}",
        state.time_ticks,
        state.score,
        state.level,
        sink.kills,
        sink.events
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}
