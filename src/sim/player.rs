//! The player's ship and its shield

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Shield state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shield {
    /// No shield upgrade owned
    #[default]
    Offline,
    /// Shield is up with this many rings left
    Active { rings: u32 },
    /// All rings popped, waiting to come back up
    Recharging { cooldown_ms: i32 },
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub health: i32,
    pub shield: Shield,
    /// Rings granted by upgrades (0-3)
    pub shield_level: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: PLAYER_SIZE,
            health: PLAYER_START_HEALTH,
            shield: Shield::Offline,
            shield_level: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Accelerate along `direction`, clamp speed, apply friction and keep
    /// the body inside the arena.
    pub fn step(&mut self, direction: Vec2, speed_bonus: f32, arena: Vec2) {
        let direction = direction.normalize_or_zero();
        self.vel += direction * PLAYER_ACCELERATION;

        let max_speed = PLAYER_MAX_SPEED + speed_bonus;
        let speed = self.vel.length();
        if speed > max_speed {
            self.vel = self.vel / speed * max_speed;
        }

        self.vel *= PLAYER_FRICTION;

        let half = self.size / 2.0;
        let max = (arena - Vec2::splat(half)).max(Vec2::splat(half));
        self.pos = (self.pos + self.vel).clamp(Vec2::splat(half), max);
    }

    pub fn shield_active(&self) -> bool {
        matches!(self.shield, Shield::Active { .. })
    }

    pub fn shield_rings(&self) -> u32 {
        match self.shield {
            Shield::Active { rings } => rings,
            _ => 0,
        }
    }

    pub fn shield_cooldown_ms(&self) -> i32 {
        match self.shield {
            Shield::Recharging { cooldown_ms } => cooldown_ms,
            _ => 0,
        }
    }

    /// Raise the shield with a full set of rings (no-op while already up)
    pub fn activate_shield(&mut self) {
        if self.shield_level > 0 && !self.shield_active() {
            self.shield = Shield::Active {
                rings: self.shield_level,
            };
        }
    }

    /// Sync to a new shield level from the upgrade stats.
    ///
    /// A raised shield is refilled when the level changed; a lowered one is
    /// raised immediately.
    pub fn set_shield_level(&mut self, level: u32) {
        let level = level.min(SHIELD_MAX_RINGS);
        if level == 0 {
            return;
        }
        let old_level = self.shield_level;
        self.shield_level = level;
        match self.shield {
            Shield::Active { .. } if old_level != level => {
                self.shield = Shield::Active { rings: level };
            }
            Shield::Active { .. } => {}
            _ => self.activate_shield(),
        }
    }

    /// Pop one ring. Returns true if the shield went down.
    pub fn pop_shield_ring(&mut self) -> bool {
        if let Shield::Active { rings } = self.shield {
            let rings = rings.saturating_sub(1);
            if rings == 0 {
                self.shield = Shield::Recharging {
                    cooldown_ms: SHIELD_COOLDOWN_MS,
                };
                return true;
            }
            self.shield = Shield::Active { rings };
        }
        false
    }

    /// Count down the recharge timer. Returns true when the shield came back up.
    pub fn update_shield(&mut self, dt_ms: u32) -> bool {
        if let Shield::Recharging { cooldown_ms } = self.shield {
            let remaining = cooldown_ms - dt_ms as i32;
            if remaining <= 0 {
                self.shield = Shield::Recharging { cooldown_ms: 0 };
                self.activate_shield();
                return self.shield_active();
            }
            self.shield = Shield::Recharging {
                cooldown_ms: remaining,
            };
        }
        false
    }
}
