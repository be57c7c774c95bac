//! Discrete events the simulation reports to its presentation layer
//!
//! The core never plays sound. It emits events; each event may carry a
//! [`SoundCue`] the collaborator can turn into audio (and throttle).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;

/// Logical sound: a key for custom samples plus a beep fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoundCue {
    pub key: &'static str,
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

impl SoundCue {
    const fn beep(key: &'static str, frequency_hz: u32, duration_ms: u32) -> Self {
        Self {
            key,
            frequency_hz,
            duration_ms,
        }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AttackFired { origin: Vec2, velocity: Vec2 },
    EnemyKilled { kind: EnemyKind, pos: Vec2 },
    ShieldBlocked { rings_left: u32 },
    ShieldRestored { rings: u32 },
    PlayerDamaged { health: i32 },
    ShrapnelTriggered { pos: Vec2, shards: u32 },
    ExplosiveShrapnel { pos: Vec2, shards: u32 },
    ChainLightningStruck { targets: u32 },
    BlackHoleSpawned { pos: Vec2, radius: f32 },
    BlackHoleDetonated { pos: Vec2, affected: u32 },
    MinionSummoned { pos: Vec2 },
    MinionFired { pos: Vec2 },
    LevelUp { level: u32 },
    UpgradeOffered { choices: Vec<String> },
    UpgradeAccepted { key: String },
    EnemiesSpawned { count: u32 },
    GameOver { score: u64 },
}

impl GameEvent {
    /// Audio cue for this event, if it has one
    pub fn sound(&self) -> Option<SoundCue> {
        let cue = match self {
            GameEvent::AttackFired { .. } => SoundCue::beep("attack", 400, 50),
            GameEvent::EnemyKilled { .. } => SoundCue::beep("enemy_killed", 250, 20),
            GameEvent::ShieldBlocked { .. } => SoundCue::beep("shield_block", 1200, 50),
            GameEvent::ShrapnelTriggered { .. } => SoundCue::beep("shrapnel", 800, 25),
            GameEvent::ExplosiveShrapnel { .. } => SoundCue::beep("explosive_shrapnel", 120, 200),
            GameEvent::ChainLightningStruck { .. } => SoundCue::beep("chain_lightning", 1000, 30),
            GameEvent::BlackHoleDetonated { .. } => SoundCue::beep("black_hole_detonate", 80, 200),
            GameEvent::PlayerDamaged { .. } => SoundCue::beep("player_hit", 200, 100),
            GameEvent::MinionFired { .. } => SoundCue::beep("minion_fire", 600, 20),
            GameEvent::LevelUp { .. } => SoundCue::beep("level_up", 880, 120),
            GameEvent::GameOver { .. } => SoundCue::beep("game_over", 150, 400),
            _ => return None,
        };
        Some(cue)
    }
}

/// Receiver for simulation events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}
