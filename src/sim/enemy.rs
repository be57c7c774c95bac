//! Enemy shapes and the external forces that can override their movement

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::EntityId;
use crate::consts::*;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Square chaser, dies to any hit
    Basic,
    /// Medium speed, five hits
    Triangle,
    /// Slow tank, eight hits
    Pentagon,
}

impl EnemyKind {
    /// Hits needed to kill a fresh enemy of this kind
    pub fn max_health(self) -> u32 {
        match self {
            EnemyKind::Basic => 1,
            EnemyKind::Triangle => 5,
            EnemyKind::Pentagon => 8,
        }
    }

    /// XP awarded on death
    pub fn xp_reward(self) -> u32 {
        match self {
            EnemyKind::Basic => 1,
            EnemyKind::Triangle => 3,
            EnemyKind::Pentagon => 7,
        }
    }

    /// Seek speed toward the player (px per tick)
    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Basic => 5.0,
            EnemyKind::Triangle => 4.0,
            EnemyKind::Pentagon => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Triangle => "triangle",
            EnemyKind::Pentagon => "pentagon",
        }
    }
}

/// A velocity imposed on an enemy for a number of ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impulse {
    pub velocity: Vec2,
    pub ticks_left: u32,
}

impl Impulse {
    pub fn new(velocity: Vec2, ticks: u32) -> Self {
        Self {
            velocity,
            ticks_left: ticks,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    /// Remaining hits; the enemy is dead at 0
    pub health: u32,
    /// Shield knockback, takes priority over everything
    #[serde(default)]
    pub push: Option<Impulse>,
    /// Black hole pull or detonation fling
    #[serde(default)]
    pub pull: Option<Impulse>,
    /// Ticks during which this enemy cannot touch the player again
    #[serde(default)]
    pub shield_immunity: u32,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: ENEMY_SIZE,
            health: kind.max_health(),
            push: None,
            pull: None,
            shield_immunity: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn is_pulled(&self) -> bool {
        self.pull.is_some()
    }

    pub fn is_pushed(&self) -> bool {
        self.push.is_some()
    }

    /// Apply damage, clamping at zero. Returns true when this call killed it.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    /// Set (or refresh) the pull channel
    pub fn apply_pull(&mut self, velocity: Vec2, ticks: u32) {
        self.pull = Some(Impulse::new(velocity, ticks));
    }

    pub fn apply_push(&mut self, velocity: Vec2, ticks: u32) {
        self.push = Some(Impulse::new(velocity, ticks));
    }

    /// Advance one tick: push beats pull beats seeking the target.
    pub fn step_toward(&mut self, target: Vec2) {
        if let Some(push) = self.push.as_mut() {
            self.pos += push.velocity;
            push.ticks_left = push.ticks_left.saturating_sub(1);
            if push.ticks_left == 0 {
                self.push = None;
            }
            return;
        }

        if let Some(pull) = self.pull.as_mut() {
            self.pos += pull.velocity;
            pull.ticks_left = pull.ticks_left.saturating_sub(1);
            if pull.ticks_left == 0 {
                self.pull = None;
            }
            return;
        }

        let (dist, dir) = crate::distance_and_direction(self.pos, target);
        if dist > 0.0 {
            // Don't overshoot the player center
            self.pos += dir * self.kind.speed().min(dist);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_by_kind() {
        assert_eq!(Enemy::new(1, EnemyKind::Basic, Vec2::ZERO).health, 1);
        assert_eq!(Enemy::new(2, EnemyKind::Triangle, Vec2::ZERO).health, 5);
        assert_eq!(Enemy::new(3, EnemyKind::Pentagon, Vec2::ZERO).health, 8);
    }

    #[test]
    fn test_take_damage_clamps_and_reports_kill_once() {
        let mut enemy = Enemy::new(1, EnemyKind::Triangle, Vec2::ZERO);
        assert!(!enemy.take_damage(4));
        assert_eq!(enemy.health, 1);
        assert!(enemy.take_damage(2));
        assert_eq!(enemy.health, 0);
        // Already dead - no second kill
        assert!(!enemy.take_damage(1));
    }

    #[test]
    fn test_seek_moves_at_kind_speed() {
        let mut enemy = Enemy::new(1, EnemyKind::Pentagon, Vec2::new(100.0, 0.0));
        enemy.step_toward(Vec2::ZERO);
        assert!((enemy.pos.x - 97.0).abs() < 1e-4);
        assert!(enemy.pos.y.abs() < 1e-4);
    }

    #[test]
    fn test_push_overrides_pull_and_seek() {
        let mut enemy = Enemy::new(1, EnemyKind::Basic, Vec2::new(100.0, 100.0));
        enemy.apply_pull(Vec2::new(-10.0, 0.0), 5);
        enemy.apply_push(Vec2::new(0.0, 2.5), 1);

        enemy.step_toward(Vec2::ZERO);
        assert_eq!(enemy.pos, Vec2::new(100.0, 102.5));
        assert!(!enemy.is_pushed());
        assert!(enemy.is_pulled());

        enemy.step_toward(Vec2::ZERO);
        assert_eq!(enemy.pos, Vec2::new(90.0, 102.5));
        assert_eq!(enemy.pull.map(|p| p.ticks_left), Some(4));
    }

    #[test]
    fn test_pull_decays_after_one_tick() {
        let mut enemy = Enemy::new(1, EnemyKind::Basic, Vec2::new(50.0, 0.0));
        enemy.apply_pull(Vec2::new(0.0, 5.0), 1);
        enemy.step_toward(Vec2::ZERO);
        assert!(!enemy.is_pulled());
        // Back to seeking
        enemy.step_toward(Vec2::ZERO);
        assert!(enemy.pos.x < 50.0);
    }
}
