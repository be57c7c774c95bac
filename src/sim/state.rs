//! Game state and core simulation types
//!
//! Everything the simulation needs to advance lives here, including the
//! seeded RNG, so a run is reproducible from its seed and input sequence.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::black_hole::BlackHole;
use super::enemy::{Enemy, EnemyKind};
use super::events::{EventSink, GameEvent};
use super::minion::{Minion, MinionProjectile};
use super::player::Player;
use super::projectile::Projectile;
use super::shard::Shard;
use super::weapon::{self, WeaponStats};
use crate::Tuning;
use crate::consts::*;

/// Stable identity for enemies and other entities
pub type EntityId = u32;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level-up offer on screen, waiting for `accept_upgrade`
    UpgradeSelect,
    /// Player died
    GameOver,
}

/// A particle for the death poof effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left
    pub life: u32,
}

/// A lightning line drawn between two strike points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightningBolt {
    pub from: Vec2,
    pub to: Vec2,
    /// Fork lines are drawn thinner
    pub fork: bool,
    pub ttl_ms: u32,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Arena (render surface) size
    pub arena: Vec2,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Time played in milliseconds (paused time excluded)
    pub time_ms: u64,
    pub score: u64,
    pub xp: u32,
    pub level: u32,
    pub xp_for_next_level: u32,
    pub player: Player,
    /// Active enemies (spawn order)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub shards: Vec<Shard>,
    pub black_holes: Vec<BlackHole>,
    pub minions: Vec<Minion>,
    pub minion_projectiles: Vec<MinionProjectile>,
    /// Owned upgrade keys in acquisition order
    pub active_upgrades: Vec<String>,
    /// Derived from `tuning.base_weapon` and `active_upgrades`
    pub stats: WeaponStats,
    /// Keys offered at the last level-up
    pub upgrade_offer: Vec<String>,
    /// Time until the next shot is allowed
    pub attack_cooldown_ms: i32,
    /// Time since the last enemy batch
    pub respawn_elapsed_ms: u32,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    #[serde(skip)]
    pub bolts: Vec<LightningBolt>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game state with the given seed and balance table
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::from_rng(seed, Pcg32::seed_from_u64(seed), tuning)
    }

    /// Build a fresh run that draws from `rng`, opening wave included
    fn from_rng(seed: u64, rng: Pcg32, tuning: Tuning) -> Self {
        let arena = Vec2::new(tuning.arena_width, tuning.arena_height);
        let stats = tuning.base_weapon;
        let xp_for_next_level = tuning.xp_first_level;
        let mut state = Self {
            seed,
            rng,
            tuning,
            arena,
            phase: GamePhase::Playing,
            time_ticks: 0,
            time_ms: 0,
            score: 0,
            xp: 0,
            level: 0,
            xp_for_next_level,
            player: Player::new(arena / 2.0),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            shards: Vec::new(),
            black_holes: Vec::new(),
            minions: Vec::new(),
            minion_projectiles: Vec::new(),
            active_upgrades: Vec::new(),
            stats,
            upgrade_offer: Vec::new(),
            attack_cooldown_ms: 0,
            respawn_elapsed_ms: 0,
            particles: Vec::new(),
            bolts: Vec::new(),
            next_id: 1,
        };

        super::tick::spawn_initial_enemies(&mut state);

        state
    }

    /// An empty arena with no enemies, for scripted scenarios
    pub fn empty(seed: u64) -> Self {
        let mut state = Self::new(seed);
        state.enemies.clear();
        state
    }

    /// Start over: new player, fresh enemies, no upgrades. The RNG stream
    /// continues so consecutive runs differ.
    pub fn restart(&mut self) {
        let rng = self.rng.clone();
        let arena = self.arena;
        let mut tuning = self.tuning.clone();
        tuning.arena_width = arena.x;
        tuning.arena_height = arena.y;
        *self = Self::from_rng(self.seed, rng, tuning);
        log::info!("Game restarted");
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Follow a render surface resize
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.arena = Vec2::new(width, height);
        }
    }

    /// Is `pos` inside the arena rectangle?
    pub fn in_arena(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.arena.x && pos.y >= 0.0 && pos.y <= self.arena.y
    }

    /// Spawn a tracked enemy
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, kind, pos));
        id
    }

    /// A main (non mini-fork) projectile is in flight or on its way home
    pub fn has_main_projectile(&self) -> bool {
        self.projectiles.iter().any(|p| p.is_main())
    }

    /// Whether a fire command issued now would be accepted
    pub fn can_fire(&self) -> bool {
        self.phase == GamePhase::Playing
            && self.attack_cooldown_ms <= 0
            && !self.has_main_projectile()
    }

    /// Recompute derived weapon stats from the owned upgrades
    pub fn recompute_stats(&mut self) {
        self.stats = weapon::compute_stats(&self.tuning.base_weapon, &self.active_upgrades);
    }

    /// Score and XP for one kill
    pub fn award_kill(&mut self, kind: EnemyKind, pos: Vec2, sink: &mut dyn EventSink) {
        self.score += 1;
        sink.emit(GameEvent::EnemyKilled { kind, pos });
        self.add_xp(kind.xp_reward(), sink);
    }

    /// Add XP and level up when the threshold is crossed
    pub fn add_xp(&mut self, amount: u32, sink: &mut dyn EventSink) {
        self.xp += amount;
        if self.xp < self.xp_for_next_level {
            return;
        }

        self.xp -= self.xp_for_next_level;
        self.level += 1;
        self.xp_for_next_level =
            ((self.xp_for_next_level as f32) * self.tuning.xp_level_multiplier) as u32;
        log::info!(
            "Level up! level={} next={}xp",
            self.level,
            self.xp_for_next_level
        );
        sink.emit(GameEvent::LevelUp { level: self.level });

        // One offer at a time, and never over a pause or a finished run
        if self.phase == GamePhase::Playing {
            super::tick::offer_upgrades(self, sink);
        }
    }

    /// Spawn a death poof at `pos`
    pub fn spawn_poof(&mut self, pos: Vec2) {
        for i in 0..POOF_PARTICLE_COUNT {
            let angle = std::f32::consts::TAU * i as f32 / POOF_PARTICLE_COUNT as f32;
            self.particles.push(Particle {
                pos,
                vel: crate::unit_from_angle(angle) * POOF_PARTICLE_SPEED,
                life: POOF_PARTICLE_LIFE,
            });
        }
    }

    /// Draw a lightning line for a short time
    pub fn spawn_bolt(&mut self, from: Vec2, to: Vec2, fork: bool) {
        self.bolts.push(LightningBolt {
            from,
            to,
            fork,
            ttl_ms: BOLT_DISPLAY_MS,
        });
    }

    /// Advance cosmetic effects one tick
    pub fn update_effects(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);

        for bolt in &mut self.bolts {
            bolt.ttl_ms = bolt.ttl_ms.saturating_sub(TICK_MS);
        }
        self.bolts.retain(|b| b.ttl_ms > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::NullSink;

    #[test]
    fn test_new_state() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, PLAYER_START_HEALTH);
        assert_eq!(state.player.pos, Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0));
        assert_eq!(state.enemies.len(), INITIAL_ENEMY_COUNT as usize);
        assert!(state.can_fire());
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut state = GameState::empty(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_xp_levels_up_once() {
        let mut state = GameState::empty(1);
        let mut events = Vec::new();
        state.add_xp(9, &mut events);
        assert_eq!(state.level, 0);

        state.add_xp(3, &mut events);
        assert_eq!(state.level, 1);
        assert_eq!(state.xp, 2);
        assert_eq!(state.xp_for_next_level, 12);
        assert_eq!(state.phase, GamePhase::UpgradeSelect);
        assert_eq!(state.upgrade_offer.len(), UPGRADE_CHOICES);
        assert!(events.contains(&GameEvent::LevelUp { level: 1 }));
    }

    #[test]
    fn test_award_kill_scores_by_kind() {
        let mut state = GameState::empty(1);
        state.award_kill(EnemyKind::Triangle, Vec2::ZERO, &mut NullSink);
        assert_eq!(state.score, 1);
        assert_eq!(state.xp, 3);
    }

    #[test]
    fn test_effects_expire() {
        let mut state = GameState::empty(1);
        state.spawn_poof(Vec2::new(10.0, 10.0));
        state.spawn_bolt(Vec2::ZERO, Vec2::ONE, false);
        assert_eq!(state.particles.len(), POOF_PARTICLE_COUNT as usize);

        for _ in 0..3 {
            state.update_effects();
        }
        assert!(state.bolts.is_empty());
        for _ in 0..POOF_PARTICLE_LIFE {
            state.update_effects();
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut state = GameState::new(3);
        state.score = 42;
        state.level = 4;
        state.active_upgrades.push("shield".to_string());
        state.resize(800.0, 600.0);
        state.restart();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 0);
        assert!(state.active_upgrades.is_empty());
        assert_eq!(state.arena, Vec2::new(800.0, 600.0));
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_restart_draws_a_new_wave() {
        let first = GameState::new(3);
        let mut state = GameState::new(3);
        state.restart();

        let positions = |s: &GameState| s.enemies.iter().map(|e| e.pos).collect::<Vec<_>>();
        assert_eq!(state.enemies.len(), first.enemies.len());
        assert_ne!(positions(&state), positions(&first));
        assert_eq!(state.seed, 3);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(5);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.enemies.len(), state.enemies.len());
        assert_eq!(back.seed, 5);
    }
}
