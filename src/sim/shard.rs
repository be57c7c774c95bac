//! Shrapnel shards
//!
//! Short-lived fragments thrown off by projectile hits. Shards slow down
//! with friction and die on their first hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::check_distance;
use super::combat::strike_enemy;
use super::events::{EventSink, GameEvent};
use super::state::GameState;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shard {
    pub pos: Vec2,
    pub vel: Vec2,
    pub time_alive_ms: u32,
    /// Bursts into a ring of plain shards on hit
    pub explosive: bool,
}

impl Shard {
    pub fn new(pos: Vec2, vel: Vec2, explosive: bool) -> Self {
        Self {
            pos,
            vel,
            time_alive_ms: 0,
            explosive,
        }
    }

    /// Advance one tick. Returns false when the shard is spent.
    pub fn update(&mut self, state: &mut GameState, sink: &mut dyn EventSink) -> bool {
        self.time_alive_ms += TICK_MS;
        self.pos += self.vel;
        self.vel *= SHARD_FRICTION;

        let hit = state
            .enemies
            .iter()
            .position(|e| check_distance(self.pos, e.pos, COLLISION_DISTANCE).0);
        if let Some(index) = hit {
            let center = state.enemies[index].pos;
            strike_enemy(state, index, 1, sink);
            if self.explosive {
                spawn_explosive_burst(state, center, sink);
            }
            return false;
        }

        self.time_alive_ms < SHARD_LIFETIME_MS
    }
}

/// Throw `1 + level` shards in a cone around `incoming`
pub fn spawn_shrapnel(state: &mut GameState, pos: Vec2, incoming: Vec2, level: u32, sink: &mut dyn EventSink) {
    if level == 0 {
        return;
    }

    let count = 1 + level;
    let heading = incoming.y.atan2(incoming.x);
    let spread = SHRAPNEL_CONE_DEGREES.to_radians();
    let start = heading - spread / 2.0;
    let step = spread / (count - 1) as f32;
    let explosive = state.stats.explosive_shrapnel > 0;

    for i in 0..count {
        let angle = start + step * i as f32;
        state.shards.push(Shard::new(
            pos,
            crate::unit_from_angle(angle) * SHARD_SPEED,
            explosive,
        ));
    }

    sink.emit(GameEvent::ShrapnelTriggered { pos, shards: count });
}

/// Ring of plain shards from an explosive shard
fn spawn_explosive_burst(state: &mut GameState, pos: Vec2, sink: &mut dyn EventSink) {
    let level = state.stats.explosive_shrapnel;
    let count = 3 + 2 * level;
    let speed = 4.0 + 1.5 * level as f32;

    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        state
            .shards
            .push(Shard::new(pos, crate::unit_from_angle(angle) * speed, false));
    }

    sink.emit(GameEvent::ExplosiveShrapnel { pos, shards: count });
}
