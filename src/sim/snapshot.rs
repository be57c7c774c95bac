//! Read-only render view of the game state
//!
//! Presentation code draws from a snapshot and never touches the live state.

use glam::Vec2;
use serde::Serialize;

use super::enemy::EnemyKind;
use super::player::Shield;
use super::state::{EntityId, GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: f32,
    pub health: i32,
    pub shield: Shield,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: f32,
    pub health: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    /// Drawn in a different color on the way home
    pub returning: bool,
    pub mini_fork: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlackHoleView {
    pub pos: Vec2,
    pub radius: f32,
    pub rings: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub arena: Vec2,
    pub time_ms: u64,
    pub score: u64,
    pub level: u32,
    pub xp: u32,
    pub xp_for_next_level: u32,
    pub can_fire: bool,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub shards: Vec<Vec2>,
    pub black_holes: Vec<BlackHoleView>,
    pub minions: Vec<Vec2>,
    pub minion_projectiles: Vec<Vec2>,
    /// Chain and fork lines currently on screen
    pub bolts: Vec<(Vec2, Vec2)>,
    pub upgrade_offer: Vec<String>,
    pub active_upgrades: Vec<String>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            arena: self.arena,
            time_ms: self.time_ms,
            score: self.score,
            level: self.level,
            xp: self.xp,
            xp_for_next_level: self.xp_for_next_level,
            can_fire: self.can_fire(),
            player: PlayerView {
                pos: self.player.pos,
                size: self.player.size,
                health: self.player.health,
                shield: self.player.shield,
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    size: e.size,
                    health: e.health,
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    returning: p.is_returning(),
                    mini_fork: !p.is_main(),
                })
                .collect(),
            shards: self.shards.iter().map(|s| s.pos).collect(),
            black_holes: self
                .black_holes
                .iter()
                .map(|b| BlackHoleView {
                    pos: b.pos,
                    radius: b.radius,
                    rings: b.rings.clone(),
                })
                .collect(),
            minions: self.minions.iter().map(|m| m.pos).collect(),
            minion_projectiles: self.minion_projectiles.iter().map(|s| s.pos).collect(),
            bolts: self.bolts.iter().map(|b| (b.from, b.to)).collect(),
            upgrade_offer: self.upgrade_offer.clone(),
            active_upgrades: self.active_upgrades.clone(),
        }
    }
}
