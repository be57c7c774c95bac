//! Minions: small turrets that follow the player and snipe nearby enemies

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{check_distance, find_nearest_unstruck, index_of};
use super::combat::strike_enemy;
use super::events::{EventSink, GameEvent};
use super::state::{EntityId, GameState};
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minion {
    pub id: EntityId,
    pub pos: Vec2,
    pub target: Option<EntityId>,
    pub fire_cooldown_ms: i32,
}

impl Minion {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            target: None,
            fire_cooldown_ms: MINION_FIRE_COOLDOWN_MS,
        }
    }

    /// Advance one tick. Minions live until the run ends.
    pub fn update(&mut self, state: &mut GameState, sink: &mut dyn EventSink) -> bool {
        let (dist, dir) = crate::distance_and_direction(self.pos, state.player.pos);
        if dist > MINION_LEASH {
            self.pos += dir * MINION_SPEED.min(dist - MINION_LEASH);
        }

        let in_range = self
            .target
            .and_then(|id| index_of(&state.enemies, id))
            .is_some_and(|i| check_distance(self.pos, state.enemies[i].pos, MINION_RANGE).0);
        if !in_range {
            self.target = find_nearest_unstruck(self.pos, &state.enemies, &Default::default(), Some(MINION_RANGE))
                .map(|i| state.enemies[i].id);
        }

        self.fire_cooldown_ms -= TICK_MS as i32;
        if self.fire_cooldown_ms > 0 {
            return true;
        }

        let Some(target_pos) = self
            .target
            .and_then(|id| index_of(&state.enemies, id))
            .map(|i| state.enemies[i].pos)
        else {
            return true;
        };

        let (_, aim) = crate::distance_and_direction(self.pos, target_pos);
        let id = state.next_entity_id();
        state
            .minion_projectiles
            .push(MinionProjectile::new(id, self.pos, aim * MINION_PROJECTILE_SPEED));
        self.fire_cooldown_ms = MINION_FIRE_COOLDOWN_MS;
        sink.emit(GameEvent::MinionFired { pos: self.pos });

        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionProjectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub time_alive_ms: u32,
}

impl MinionProjectile {
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            time_alive_ms: 0,
        }
    }

    /// Fly straight; one strike and it is gone
    pub fn update(&mut self, state: &mut GameState, sink: &mut dyn EventSink) -> bool {
        self.time_alive_ms += TICK_MS;
        self.pos += self.vel;

        let hit = state
            .enemies
            .iter()
            .position(|e| check_distance(self.pos, e.pos, COLLISION_DISTANCE).0);
        if let Some(index) = hit {
            strike_enemy(state, index, 1, sink);
            return false;
        }

        self.time_alive_ms < MINION_PROJECTILE_LIFETIME_MS && state.in_arena(self.pos)
    }
}

/// Summon a minion at a random spot around the player
pub fn spawn_minion(state: &mut GameState, sink: &mut dyn EventSink) -> EntityId {
    let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
    let margin = Vec2::splat(MINION_EDGE_MARGIN);
    let max = (state.arena - margin).max(margin);
    let pos = (state.player.pos + crate::unit_from_angle(angle) * MINION_SPAWN_DISTANCE).clamp(margin, max);

    let id = state.next_entity_id();
    state.minions.push(Minion::new(id, pos));
    log::info!("Minion #{} summoned at ({:.0}, {:.0})", id, pos.x, pos.y);
    sink.emit(GameEvent::MinionSummoned { pos });
    id
}
