//! Shape Shooter - combat simulation core for a ricochet arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (projectiles, black holes, collisions, game state)
//! - `tuning`: Data-driven game balance loaded from JSON
//!
//! Rendering, input plumbing and audio playback live outside this crate. The
//! core receives a [`sim::TickInput`] every tick and reports what happened
//! through a [`sim::EventSink`].

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed logical timestep in milliseconds
    pub const TICK_MS: u32 = 50;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 600.0;
    pub const ARENA_HEIGHT: f32 = 400.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_ACCELERATION: f32 = 3.5;
    pub const PLAYER_MAX_SPEED: f32 = 6.0;
    /// Velocity multiplier applied every tick (lower = more friction)
    pub const PLAYER_FRICTION: f32 = 0.70;
    pub const PLAYER_START_HEALTH: i32 = 1;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 20.0;
    pub const INITIAL_ENEMY_COUNT: u32 = 10;
    pub const MAX_ENEMY_COUNT: u32 = 150;
    pub const RESPAWN_BATCH_SIZE: u32 = 20;
    pub const RESPAWN_INTERVAL_MS: u32 = 10_000;
    pub const RESPAWN_INTERVAL_MIN_MS: u32 = 3_000;
    /// Respawn interval reduction per minute played
    pub const RESPAWN_INTERVAL_STEP_MS: u32 = 2_000;
    /// How far outside the arena edge new enemies may appear
    pub const SPAWN_MARGIN: f32 = 200.0;

    /// Projectile-enemy hit distance (center to center)
    pub const COLLISION_DISTANCE: f32 = 30.0;
    pub const COLLISION_DISTANCE_SQ: f32 = COLLISION_DISTANCE * COLLISION_DISTANCE;
    /// Base flight time before a projectile turns around
    pub const PROJECTILE_RETURN_TIME_MS: i32 = 500;
    /// Flight time bought by each ricochet
    pub const BOUNCE_TIME_CREDIT_MS: i32 = 500;
    /// Attack range above which flight time scales with range
    pub const PROJECTILE_BASE_RANGE: f32 = 500.0;
    /// Flight-time slack for long range shots
    pub const LONG_RANGE_TIME_FACTOR: f32 = 1.5;
    /// Speed of a projectile flying home (px per tick)
    pub const PROJECTILE_RETURN_SPEED: f32 = 50.0;
    /// Distance to the player at which a returning projectile is caught
    pub const PROJECTILE_CATCH_RADIUS: f32 = 15.0;
    pub const ATTACK_COOLDOWN_MS: i32 = 500;

    /// Chain lightning
    pub const CHAIN_BASE_RANGE: f32 = 150.0;
    pub const CHAIN_RANGE_PER_LEVEL: f32 = 60.0;
    pub const CHAIN_RANGE_FALLOFF: f32 = 0.8;
    pub const BOLT_DISPLAY_MS: u32 = 150;

    /// Shrapnel
    pub const SHRAPNEL_CONE_DEGREES: f32 = 60.0;
    pub const SHARD_SPEED: f32 = 8.0;
    pub const SHARD_LIFETIME_MS: u32 = 1_000;
    pub const SHARD_FRICTION: f32 = 0.98;

    /// Black hole
    pub const BLACK_HOLE_TRIGGER_CHANCE: f32 = 0.15;
    pub const BLACK_HOLE_BASE_RADIUS: f32 = 40.0;
    pub const BLACK_HOLE_RADIUS_PER_LEVEL: f32 = 20.0;
    pub const BLACK_HOLE_PULL_STRENGTH: f32 = 15.0;
    /// Pull never drops below this fraction of full strength
    pub const BLACK_HOLE_MIN_PULL_FACTOR: f32 = 0.33;
    pub const BLACK_HOLE_PULL_DURATION_MS: u32 = 3_000;
    pub const BLACK_HOLE_FLING_SPEED: f32 = 12.0;
    pub const BLACK_HOLE_FLING_TICKS: u32 = 20;
    pub const BLACK_HOLE_RING_INTERVAL_TICKS: u32 = 8;
    pub const BLACK_HOLE_RING_SHRINK: f32 = 2.0;

    /// Shield
    pub const SHIELD_MAX_RINGS: u32 = 3;
    pub const SHIELD_COOLDOWN_MS: i32 = 5_000;
    pub const SHIELD_PUSH_RADIUS: f32 = 150.0;
    pub const SHIELD_PUSH_SPEED: f32 = 2.5;
    pub const SHIELD_PUSH_TICKS: u32 = 16;
    pub const SHIELD_IMMUNITY_TICKS: u32 = 10;

    /// Minions
    pub const MINION_SPAWN_DISTANCE: f32 = 50.0;
    pub const MINION_EDGE_MARGIN: f32 = 15.0;
    pub const MINION_SPEED: f32 = 4.0;
    pub const MINION_LEASH: f32 = 60.0;
    pub const MINION_RANGE: f32 = 250.0;
    pub const MINION_FIRE_COOLDOWN_MS: i32 = 1_000;
    pub const MINION_PROJECTILE_SPEED: f32 = 10.0;
    pub const MINION_PROJECTILE_LIFETIME_MS: u32 = 1_500;

    /// Death poof particles
    pub const POOF_PARTICLE_COUNT: u32 = 5;
    pub const POOF_PARTICLE_SPEED: f32 = 3.0;
    pub const POOF_PARTICLE_LIFE: u32 = 15;

    /// Leveling
    pub const XP_FIRST_LEVEL: u32 = 10;
    pub const XP_LEVEL_MULTIPLIER: f32 = 1.2;
    pub const UPGRADE_CHOICES: usize = 3;
}

/// Distance and unit direction from `from` to `to`.
///
/// Coincident points yield `(0.0, Vec2::ZERO)` rather than NaN.
#[inline]
pub fn distance_and_direction(from: Vec2, to: Vec2) -> (f32, Vec2) {
    let delta = to - from;
    let dist = delta.length();
    if dist == 0.0 {
        (0.0, Vec2::ZERO)
    } else {
        (dist, delta / dist)
    }
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
