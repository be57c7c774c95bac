//! Black hole area effect
//!
//! Spawned by projectile hits. Pulls nearby enemies in for a few seconds, then
//! collapses: everything still inside takes damage and is flung outward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::check_distance;
use super::combat::sweep_dead;
use super::events::{EventSink, GameEvent};
use super::state::{EntityId, GameState};
use crate::consts::*;

/// Lifecycle of a black hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackHolePhase {
    /// Just created, not yet updated
    Forming,
    Pulling,
    /// Detonated; removed at the end of the tick
    Collapsed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackHole {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    /// Upgrade level at spawn (drives detonation damage)
    pub level: u32,
    pub time_alive_ms: u32,
    pub phase: BlackHolePhase,
    /// Radii of the shrinking decorative rings
    pub rings: Vec<f32>,
    ring_timer: u32,
}

impl BlackHole {
    pub fn new(id: EntityId, pos: Vec2, level: u32) -> Self {
        Self {
            id,
            pos,
            radius: radius_for_level(level),
            level,
            time_alive_ms: 0,
            phase: BlackHolePhase::Forming,
            rings: Vec::new(),
            ring_timer: 0,
        }
    }

    pub fn detonation_damage(&self) -> u32 {
        if self.level >= 5 { 2 } else { 1 }
    }

    /// Enemies strictly inside the radius and not sitting on the center
    fn in_reach(&self, enemy_pos: Vec2) -> bool {
        let (inside, dist_sq) = check_distance(self.pos, enemy_pos, self.radius);
        inside && dist_sq > 0.0
    }

    /// Advance one tick. Returns false once it has detonated.
    pub fn update(&mut self, state: &mut GameState, sink: &mut dyn EventSink) -> bool {
        if self.phase == BlackHolePhase::Collapsed {
            return false;
        }

        self.time_alive_ms += TICK_MS;
        if self.phase == BlackHolePhase::Forming {
            self.phase = BlackHolePhase::Pulling;
        }

        for enemy in &mut state.enemies {
            if !self.in_reach(enemy.pos) {
                continue;
            }
            let (dist, dir) = crate::distance_and_direction(enemy.pos, self.pos);
            let factor = (1.0 - dist / self.radius).max(BLACK_HOLE_MIN_PULL_FACTOR);
            enemy.apply_pull(dir * BLACK_HOLE_PULL_STRENGTH * factor, 1);
        }

        self.update_rings();

        if self.time_alive_ms >= BLACK_HOLE_PULL_DURATION_MS {
            self.detonate(state, sink);
            return false;
        }

        true
    }

    fn update_rings(&mut self) {
        self.ring_timer += 1;
        if self.ring_timer >= BLACK_HOLE_RING_INTERVAL_TICKS {
            self.ring_timer = 0;
            self.rings.push(self.radius);
        }
        for ring in &mut self.rings {
            *ring -= BLACK_HOLE_RING_SHRINK;
        }
        self.rings.retain(|r| *r > 0.0);
    }

    fn detonate(&mut self, state: &mut GameState, sink: &mut dyn EventSink) {
        let damage = self.detonation_damage();
        let mut affected = 0;

        for enemy in &mut state.enemies {
            if !self.in_reach(enemy.pos) {
                continue;
            }
            enemy.take_damage(damage);
            let (_, dir) = crate::distance_and_direction(self.pos, enemy.pos);
            enemy.apply_pull(dir * BLACK_HOLE_FLING_SPEED, BLACK_HOLE_FLING_TICKS);
            affected += 1;
        }

        let killed = sweep_dead(state, sink);
        self.rings.clear();
        self.phase = BlackHolePhase::Collapsed;

        log::info!(
            "Black hole #{} detonated: {} affected, {} killed",
            self.id,
            affected,
            killed
        );
        sink.emit(GameEvent::BlackHoleDetonated {
            pos: self.pos,
            affected,
        });
    }
}

pub fn radius_for_level(level: u32) -> f32 {
    BLACK_HOLE_BASE_RADIUS + BLACK_HOLE_RADIUS_PER_LEVEL * level as f32
}

/// Roll for a black hole at `pos`. At most one may exist at a time.
pub fn try_spawn(state: &mut GameState, pos: Vec2, level: u32, sink: &mut dyn EventSink) -> bool {
    if level == 0 || !state.black_holes.is_empty() {
        return false;
    }

    let chance = BLACK_HOLE_TRIGGER_CHANCE * level as f32;
    if state.rng.random::<f32>() >= chance {
        return false;
    }

    let id = state.next_entity_id();
    let hole = BlackHole::new(id, pos, level);
    log::debug!("Black hole #{} spawned, radius {}", id, hole.radius);
    sink.emit(GameEvent::BlackHoleSpawned {
        pos,
        radius: hole.radius,
    });
    state.black_holes.push(hole);
    true
}
