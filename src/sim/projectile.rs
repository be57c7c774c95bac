//! The player's projectile
//!
//! A projectile seeks enemies, ricochets between them, may set off chain
//! lightning and black holes, and finally flies back to the player. Only one
//! main projectile exists at a time; its return re-arms the weapon.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::black_hole;
use super::collision::{find_nearest_unstruck, index_of};
use super::combat::strike_enemy;
use super::enemy::Enemy;
use super::events::{EventSink, GameEvent};
use super::shard::spawn_shrapnel;
use super::state::{EntityId, GameState};
use super::weapon::WeaponStats;
use crate::consts::*;

/// Flight state. Once returning, a projectile never seeks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flight {
    Seeking,
    Returning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Fired by the player
    Main,
    /// Child spawned off a struck enemy: strikes once, never chains
    MiniFork,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub flight: Flight,
    pub role: Role,
    /// Weapon stats captured at launch
    pub stats: WeaponStats,
    /// Enemies this projectile already struck
    pub hit_enemies: BTreeSet<EntityId>,
    /// Homing / ricochet target
    pub target: Option<EntityId>,
    pub bounces: u32,
    /// Bounces buy time by pushing this back
    pub time_alive_ms: i32,
    pub timeout_ms: i32,
    pub distance_traveled: f32,
}

impl Projectile {
    /// Launch from `origin`, initially homing on the nearest enemy
    pub fn new(id: EntityId, origin: Vec2, vel: Vec2, stats: &WeaponStats, enemies: &[Enemy]) -> Self {
        let target = find_nearest_unstruck(origin, enemies, &BTreeSet::new(), None).map(|i| enemies[i].id);
        Self {
            id,
            pos: origin,
            vel,
            flight: Flight::Seeking,
            role: Role::Main,
            stats: *stats,
            hit_enemies: BTreeSet::new(),
            target,
            bounces: 0,
            time_alive_ms: 0,
            timeout_ms: flight_timeout_ms(stats),
            distance_traveled: 0.0,
        }
    }

    pub fn is_main(&self) -> bool {
        self.role == Role::Main
    }

    pub fn is_returning(&self) -> bool {
        self.flight == Flight::Returning
    }

    fn start_return(&mut self) {
        if self.flight == Flight::Seeking {
            log::debug!(
                "Projectile #{} returning after {} bounces, {:.0}px",
                self.id,
                self.bounces,
                self.distance_traveled
            );
        }
        self.flight = Flight::Returning;
    }

    /// Motionless child projectile at a struck enemy.
    ///
    /// It inherits everything this projectile has struck, keeps the struck
    /// enemy as its target and never chains.
    pub fn spawn_mini_fork(&self, id: EntityId, struck: &Enemy) -> Projectile {
        let mut hit_enemies = self.hit_enemies.clone();
        hit_enemies.insert(struck.id);

        let mut stats = self.stats;
        stats.chain_lightning = 0;

        Projectile {
            id,
            pos: struck.pos,
            vel: Vec2::ZERO,
            flight: Flight::Seeking,
            role: Role::MiniFork,
            stats,
            hit_enemies,
            target: Some(struck.id),
            bounces: 0,
            time_alive_ms: 0,
            timeout_ms: flight_timeout_ms(&stats),
            distance_traveled: 0.0,
        }
    }

    /// Advance one tick. Returns false when the projectile should be removed.
    pub fn update(&mut self, state: &mut GameState, sink: &mut dyn EventSink) -> bool {
        self.time_alive_ms += TICK_MS as i32;
        if self.time_alive_ms >= self.timeout_ms {
            self.start_return();
        }

        if self.flight == Flight::Returning {
            return self.fly_home(state.player.pos);
        }

        self.steer(&state.enemies);

        self.pos += self.vel;
        self.distance_traveled += self.vel.length();
        if self.distance_traveled > self.stats.attack_range {
            self.start_return();
        }

        let hit = find_nearest_unstruck(
            self.pos,
            &state.enemies,
            &self.hit_enemies,
            Some(COLLISION_DISTANCE),
        );
        if let Some(index) = hit {
            self.on_hit(index, state, sink);
            return true;
        }

        // Leaving the arena only kills a projectile that is still out hunting
        self.flight == Flight::Returning || state.in_arena(self.pos)
    }

    /// Blend toward the homing target, re-acquiring if it died
    fn steer(&mut self, enemies: &[Enemy]) {
        let Some(target) = self.target else {
            return;
        };

        match index_of(enemies, target) {
            Some(i) => {
                let (_, dir) = crate::distance_and_direction(self.pos, enemies[i].pos);
                let desired = dir * self.stats.projectile_speed;
                self.vel += (desired - self.vel) * self.stats.homing;
            }
            None => {
                self.target = find_nearest_unstruck(self.pos, enemies, &self.hit_enemies, None)
                    .map(|i| enemies[i].id);
            }
        }
    }

    fn fly_home(&mut self, player_pos: Vec2) -> bool {
        let (dist, dir) = crate::distance_and_direction(self.pos, player_pos);
        if dist < PROJECTILE_CATCH_RADIUS {
            return false;
        }
        self.pos += dir * PROJECTILE_RETURN_SPEED.min(dist);
        true
    }

    fn on_hit(&mut self, index: usize, state: &mut GameState, sink: &mut dyn EventSink) {
        let Some(strike) = strike_enemy(state, index, 1, sink) else {
            return;
        };

        if self.stats.shrapnel > 0 {
            spawn_shrapnel(state, strike.pos, self.vel, self.stats.shrapnel, sink);
        }

        self.hit_enemies.insert(strike.id);

        if self.stats.black_hole > 0 {
            black_hole::try_spawn(state, strike.pos, self.stats.black_hole, sink);
        }

        if self.stats.chain_lightning > 0 && self.role == Role::Main && self.bounces == 0 {
            self.chain_lightning(strike.pos, state, sink);
            self.start_return();
            return;
        }

        if self.role == Role::MiniFork {
            self.start_return();
            return;
        }

        self.bounces += 1;
        self.time_alive_ms -= BOUNCE_TIME_CREDIT_MS;
        if self.bounces > self.stats.bounces {
            self.start_return();
            return;
        }

        match find_nearest_unstruck(self.pos, &state.enemies, &self.hit_enemies, None) {
            Some(i) => {
                let next = &state.enemies[i];
                let (_, dir) = crate::distance_and_direction(self.pos, next.pos);
                self.vel = dir * self.stats.projectile_speed;
                self.target = Some(next.id);
            }
            None => self.start_return(),
        }
    }

    /// Strike a shrinking-range path of nearby enemies from `start`, forking
    /// off every other link.
    fn chain_lightning(&mut self, start: Vec2, state: &mut GameState, sink: &mut dyn EventSink) {
        let level = self.stats.chain_lightning;
        let base_range = CHAIN_BASE_RANGE + CHAIN_RANGE_PER_LEVEL * level as f32;

        let path = chain_path(start, &state.enemies, &mut self.hit_enemies, level, base_range);
        if path.is_empty() {
            return;
        }

        let mut from = start;
        for &(_, pos) in &path {
            state.spawn_bolt(from, pos, false);
            from = pos;
        }
        log::debug!("Chain lightning from #{} struck {} targets", self.id, path.len());
        sink.emit(GameEvent::ChainLightningStruck {
            targets: path.len() as u32,
        });

        let fork_range = base_range * CHAIN_RANGE_FALLOFF;
        for (n, &(id, pos)) in path.iter().enumerate() {
            if let Some(index) = index_of(&state.enemies, id) {
                let strike = strike_enemy(state, index, 1, sink);
                if strike.is_some_and(|s| s.killed) && self.stats.shrapnel > 0 {
                    spawn_shrapnel(state, pos, self.vel, self.stats.shrapnel, sink);
                }
            }

            if n % 2 == 0 {
                self.fork(pos, fork_range, state, sink);
            }
        }
    }

    /// Single extra strike branching off a chain target
    fn fork(&mut self, from: Vec2, range: f32, state: &mut GameState, sink: &mut dyn EventSink) {
        let Some(index) = find_nearest_unstruck(from, &state.enemies, &self.hit_enemies, Some(range)) else {
            return;
        };
        let (id, pos) = (state.enemies[index].id, state.enemies[index].pos);
        self.hit_enemies.insert(id);
        state.spawn_bolt(from, pos, true);
        let strike = strike_enemy(state, index, 1, sink);
        if strike.is_some_and(|s| s.killed) && self.stats.shrapnel > 0 {
            spawn_shrapnel(state, pos, self.vel, self.stats.shrapnel, sink);
        }
    }
}

/// Select up to `max_links` unstruck enemies, each the nearest to the
/// previous link within a range that shrinks after every accepted link.
/// Selected enemies are added to `struck`.
pub fn chain_path(
    start: Vec2,
    enemies: &[Enemy],
    struck: &mut BTreeSet<EntityId>,
    max_links: u32,
    range: f32,
) -> Vec<(EntityId, Vec2)> {
    let mut path = Vec::new();
    let mut from = start;
    let mut range = range;

    for _ in 0..max_links {
        let Some(i) = find_nearest_unstruck(from, enemies, struck, Some(range)) else {
            break;
        };
        let enemy = &enemies[i];
        struck.insert(enemy.id);
        path.push((enemy.id, enemy.pos));
        from = enemy.pos;
        range *= CHAIN_RANGE_FALLOFF;
    }

    path
}

/// Time a projectile may seek before it turns around
pub fn flight_timeout_ms(stats: &WeaponStats) -> i32 {
    if stats.attack_range > PROJECTILE_BASE_RANGE && stats.projectile_speed > 0.0 {
        let ticks = stats.attack_range / stats.projectile_speed;
        (ticks * TICK_MS as f32 * LONG_RANGE_TIME_FACTOR) as i32
    } else {
        PROJECTILE_RETURN_TIME_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;

    fn launch(state: &mut GameState, vel: Vec2) -> Projectile {
        let id = state.next_entity_id();
        Projectile::new(id, state.player.pos, vel, &state.stats, &state.enemies)
    }

    fn with_upgrades(keys: &[&str]) -> GameState {
        let mut state = GameState::empty(1);
        state.active_upgrades = keys.iter().map(|k| k.to_string()).collect();
        state.recompute_stats();
        state
    }

    #[test]
    fn test_timeout_scales_with_range() {
        assert_eq!(flight_timeout_ms(&WeaponStats::default()), 500);
        let stats = WeaponStats {
            attack_range: 650.0,
            ..WeaponStats::default()
        };
        // 650 / 6 ticks of flight, with 50% slack
        assert_eq!(flight_timeout_ms(&stats), 8125);
    }

    #[test]
    fn test_initial_target_is_nearest() {
        let mut state = GameState::empty(1);
        let player = state.player.pos;
        state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(100.0, 0.0));
        let near = state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(0.0, 40.0));
        let p = launch(&mut state, Vec2::new(6.0, 0.0));
        assert_eq!(p.target, Some(near));
    }

    #[test]
    fn test_hit_kills_and_returns() {
        let mut state = GameState::empty(1);
        let player = state.player.pos;
        state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(0.0, -20.0));
        let mut p = launch(&mut state, Vec2::new(0.0, -6.0));

        assert!(p.update(&mut state, &mut Vec::new()));
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 1);
        assert!(p.is_returning());
        assert_eq!(p.bounces, 1);
    }

    #[test]
    fn test_ricochet_to_next_enemy() {
        let mut state = with_upgrades(&["extra_bounce"]);
        let player = state.player.pos;
        state.spawn_enemy(EnemyKind::Triangle, player + Vec2::new(20.0, 0.0));
        let second = state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(20.0, 100.0));
        let mut p = launch(&mut state, Vec2::new(6.0, 0.0));

        assert!(p.update(&mut state, &mut Vec::new()));
        assert!(!p.is_returning());
        assert_eq!(p.target, Some(second));
        assert!(p.vel.y > 5.9);
        // Bounce credit: 50 - 500
        assert_eq!(p.time_alive_ms, -450);
        assert_eq!(p.hit_enemies.len(), 1);
    }

    #[test]
    fn test_same_enemy_never_hit_twice() {
        let mut state = with_upgrades(&["extra_bounce", "extra_bounce"]);
        let player = state.player.pos;
        state.spawn_enemy(EnemyKind::Pentagon, player + Vec2::new(10.0, 0.0));
        let mut p = launch(&mut state, Vec2::new(1.0, 0.0));

        for _ in 0..5 {
            p.update(&mut state, &mut Vec::new());
        }
        assert_eq!(state.enemies[0].health, 7);
        // Nothing left to bounce to
        assert!(p.is_returning());
    }

    #[test]
    fn test_range_forces_return() {
        let mut state = GameState::empty(1);
        state.resize(5000.0, 5000.0);
        state.player.pos = Vec2::new(100.0, 100.0);
        let mut stats = state.stats;
        stats.projectile_speed = 100.0;
        let mut p = Projectile::new(1, state.player.pos, Vec2::new(100.0, 0.0), &stats, &[]);

        for _ in 0..5 {
            assert!(p.update(&mut state, &mut Vec::new()));
            assert!(!p.is_returning());
        }
        p.update(&mut state, &mut Vec::new());
        assert!(p.is_returning());
    }

    #[test]
    fn test_return_is_clamped_and_caught() {
        let mut state = GameState::empty(1);
        let mut p = launch(&mut state, Vec2::ZERO);
        p.pos = state.player.pos + Vec2::new(70.0, 0.0);
        p.flight = Flight::Returning;

        assert!(p.update(&mut state, &mut Vec::new()));
        assert!((p.pos.x - (state.player.pos.x + 20.0)).abs() < 1e-3);
        assert!(p.update(&mut state, &mut Vec::new()));
        assert_eq!(p.pos, state.player.pos);
        assert!(!p.update(&mut state, &mut Vec::new()));
    }

    #[test]
    fn test_out_of_bounds_removed_only_while_seeking() {
        let mut state = GameState::empty(1);
        let mut p = launch(&mut state, Vec2::new(6.0, 0.0));
        p.pos = Vec2::new(state.arena.x - 1.0, 100.0);
        assert!(!p.update(&mut state, &mut Vec::new()));

        let mut p = launch(&mut state, Vec2::ZERO);
        p.pos = Vec2::new(-200.0, -200.0);
        p.flight = Flight::Returning;
        assert!(p.update(&mut state, &mut Vec::new()));
    }

    #[test]
    fn test_dead_target_reacquired() {
        let mut state = GameState::empty(1);
        let player = state.player.pos;
        let first = state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(100.0, 0.0));
        let second = state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(0.0, 150.0));
        let mut p = launch(&mut state, Vec2::new(6.0, 0.0));
        assert_eq!(p.target, Some(first));

        state.enemies.remove(0);
        p.update(&mut state, &mut Vec::new());
        assert_eq!(p.target, Some(second));
    }

    #[test]
    fn test_homing_bends_velocity() {
        let mut state = with_upgrades(&["homing"]);
        let player = state.player.pos;
        state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(0.0, 150.0));
        let mut p = launch(&mut state, Vec2::new(6.0, 0.0));

        p.update(&mut state, &mut Vec::new());
        assert!((p.vel.x - 3.9).abs() < 1e-3);
        assert!((p.vel.y - 2.1).abs() < 1e-3);
    }

    #[test]
    fn test_shrapnel_on_non_lethal_hit() {
        let mut state = with_upgrades(&["shrapnel"]);
        let player = state.player.pos;
        state.spawn_enemy(EnemyKind::Triangle, player + Vec2::new(20.0, 0.0));
        let mut p = launch(&mut state, Vec2::new(6.0, 0.0));

        p.update(&mut state, &mut Vec::new());
        assert_eq!(state.enemies[0].health, 4);
        assert_eq!(state.shards.len(), 2);
    }

    #[test]
    fn test_chain_path_shrinks_range() {
        let enemies: Vec<Enemy> = [(1, 100.0), (2, 250.0), (3, 400.0)]
            .into_iter()
            .map(|(id, x)| Enemy::new(id, EnemyKind::Basic, Vec2::new(x, 0.0)))
            .collect();
        let mut struck = BTreeSet::new();

        // 200 reaches 1, 160 reaches 2, 128 falls short of 3
        let path = chain_path(Vec2::ZERO, &enemies, &mut struck, 3, 200.0);
        let ids: Vec<EntityId> = path.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(struck.contains(&1) && struck.contains(&2));
    }

    #[test]
    fn test_chain_lightning_burst() {
        let mut state = with_upgrades(&["chain_lightning", "chain_lightning"]);
        let player = state.player.pos;
        let start = player + Vec2::new(20.0, 0.0);
        state.spawn_enemy(EnemyKind::Basic, start);
        state.spawn_enemy(EnemyKind::Triangle, start + Vec2::new(100.0, 0.0));
        state.spawn_enemy(EnemyKind::Triangle, start + Vec2::new(100.0, 80.0));
        state.spawn_enemy(EnemyKind::Triangle, start + Vec2::new(100.0, -60.0));
        let mut p = launch(&mut state, Vec2::new(6.0, 0.0));
        let mut events = Vec::new();

        p.update(&mut state, &mut events);

        assert!(p.is_returning());
        assert!(events.contains(&GameEvent::ChainLightningStruck { targets: 2 }));
        assert_eq!(p.hit_enemies.len(), 4);
        assert!(state.enemies.iter().all(|e| e.health == 4));
        assert_eq!(state.bolts.iter().filter(|b| b.fork).count(), 1);
    }

    #[test]
    fn test_chain_only_on_first_hit() {
        let mut state = with_upgrades(&["chain_lightning"]);
        let player = state.player.pos;
        state.spawn_enemy(EnemyKind::Triangle, player + Vec2::new(20.0, 0.0));
        state.spawn_enemy(EnemyKind::Triangle, player + Vec2::new(120.0, 0.0));
        let mut p = launch(&mut state, Vec2::new(6.0, 0.0));
        p.bounces = 1;
        let mut events = Vec::new();

        p.update(&mut state, &mut events);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ChainLightningStruck { .. })));
        assert_eq!(state.enemies[1].health, 5);
    }

    #[test]
    fn test_mini_fork_strikes_once() {
        let mut state = with_upgrades(&["chain_lightning", "extra_bounce"]);
        let player = state.player.pos;
        let struck = state.spawn_enemy(EnemyKind::Triangle, player + Vec2::new(100.0, 0.0));
        state.spawn_enemy(EnemyKind::Triangle, player + Vec2::new(120.0, 0.0));
        state.spawn_enemy(EnemyKind::Triangle, player + Vec2::new(160.0, 0.0));
        let parent = launch(&mut state, Vec2::new(6.0, 0.0));

        let id = state.next_entity_id();
        let struck_enemy = state.enemies[0].clone();
        let mut fork = parent.spawn_mini_fork(id, &struck_enemy);
        assert_eq!(fork.role, Role::MiniFork);
        assert_eq!(fork.vel, Vec2::ZERO);
        assert_eq!(fork.pos, struck_enemy.pos);
        assert_eq!(fork.target, Some(struck));
        assert_eq!(fork.stats.chain_lightning, 0);
        assert!(fork.hit_enemies.contains(&struck));
        assert!(!fork.is_main());

        // Sitting still, it strikes the unstruck neighbour already in reach
        let mut events = Vec::new();
        fork.update(&mut state, &mut events);
        assert!(fork.is_returning());
        assert_eq!(fork.pos, struck_enemy.pos);
        assert_eq!(state.enemies[0].health, 5);
        assert_eq!(state.enemies[1].health, 4);
        assert_eq!(state.enemies[2].health, 5);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ChainLightningStruck { .. })));
    }

    #[test]
    fn test_fork_kill_throws_shrapnel() {
        let mut state = with_upgrades(&["chain_lightning", "shrapnel"]);
        let player = state.player.pos;
        state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(20.0, 0.0));
        state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(100.0, 0.0));
        // Out of the single chain link's path, inside the fork range of the link
        state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(100.0, 150.0));
        let mut p = launch(&mut state, Vec2::new(6.0, 0.0));
        let mut events = Vec::new();

        p.update(&mut state, &mut events);

        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 3);
        assert_eq!(state.bolts.iter().filter(|b| b.fork).count(), 1);
        // Two shards for each of the three kills
        assert_eq!(state.shards.len(), 6);
    }
}
