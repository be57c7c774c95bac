//! Fixed timestep simulation tick
//!
//! Core game loop that advances the combat simulation deterministically.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::collision::player_enemy_collision;
use super::enemy::EnemyKind;
use super::events::{EventSink, GameEvent};
use super::minion::spawn_minion;
use super::projectile::Projectile;
use super::state::{GamePhase, GameState};
use super::weapon;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent; any length, normalized before use
    pub movement: Vec2,
    /// Fire toward this arena point
    pub fire: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed 50 ms step
pub fn tick(state: &mut GameState, input: &TickInput, sink: &mut dyn EventSink) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    // The demo player never leaves an offer hanging
    if input.idle_mode && state.phase == GamePhase::UpgradeSelect {
        if let Some(key) = state.upgrade_offer.first().cloned() {
            accept_upgrade(state, &key, sink);
        }
    }

    // Don't tick unless actively playing
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    state.time_ticks += 1;
    state.time_ms += TICK_MS as u64;
    state.attack_cooldown_ms -= TICK_MS as i32;

    if let Some(aim) = input.fire {
        fire(state, aim, sink);
    }

    // Player and enemy movement
    let arena = state.arena;
    state.player.step(input.movement, state.stats.move_speed, arena);
    let player_pos = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.step_toward(player_pos);
    }

    if state.stats.shield > 0 && state.player.update_shield(TICK_MS) {
        log::debug!("Shield restored");
        sink.emit(GameEvent::ShieldRestored {
            rings: state.player.shield_rings(),
        });
    }

    resolve_player_collision(state, sink);

    state.update_effects();

    let mut shards = std::mem::take(&mut state.shards);
    shards.retain_mut(|s| s.update(state, sink));
    shards.append(&mut state.shards);
    state.shards = shards;

    let mut projectiles = std::mem::take(&mut state.projectiles);
    projectiles.retain_mut(|p| p.update(state, sink));
    projectiles.append(&mut state.projectiles);
    state.projectiles = projectiles;

    let mut black_holes = std::mem::take(&mut state.black_holes);
    black_holes.retain_mut(|b| b.update(state, sink));
    black_holes.append(&mut state.black_holes);
    state.black_holes = black_holes;

    let mut minions = std::mem::take(&mut state.minions);
    minions.retain_mut(|m| m.update(state, sink));
    minions.append(&mut state.minions);
    state.minions = minions;

    let mut shots = std::mem::take(&mut state.minion_projectiles);
    shots.retain_mut(|s| s.update(state, sink));
    shots.append(&mut state.minion_projectiles);
    state.minion_projectiles = shots;

    // Enemy respawn cadence
    state.respawn_elapsed_ms += TICK_MS;
    if state.respawn_elapsed_ms >= respawn_interval_ms(state) {
        state.respawn_elapsed_ms = 0;
        let batch = state.tuning.respawn_batch_size;
        respawn_enemies(state, batch, sink);
    }
}

/// Launch the player's projectile toward `aim`. Rejected while on cooldown
/// or while a main projectile is still out.
pub fn fire(state: &mut GameState, aim: Vec2, sink: &mut dyn EventSink) -> bool {
    if !state.can_fire() {
        return false;
    }

    let origin = state.player.pos;
    let dir = (aim - origin).try_normalize().unwrap_or(Vec2::X);
    let velocity = dir * state.stats.projectile_speed;

    let id = state.next_entity_id();
    let projectile = Projectile::new(id, origin, velocity, &state.stats, &state.enemies);
    state.projectiles.push(projectile);
    state.attack_cooldown_ms = ATTACK_COOLDOWN_MS;

    sink.emit(GameEvent::AttackFired { origin, velocity });
    true
}

/// First qualifying contact only; the rest wait for the next tick
fn resolve_player_collision(state: &mut GameState, sink: &mut dyn EventSink) {
    let player_pos = state.player.pos;
    let player_size = state.player.size;

    for enemy in &mut state.enemies {
        enemy.shield_immunity = enemy.shield_immunity.saturating_sub(1);
    }

    let contact = state
        .enemies
        .iter()
        .position(|e| e.shield_immunity == 0 && player_enemy_collision(player_pos, player_size, e));
    if let Some(i) = contact {
        if state.player.shield_rings() > 0 {
            state.player.pop_shield_ring();
            state.enemies[i].shield_immunity = SHIELD_IMMUNITY_TICKS;
            shield_pushback(state);

            let rings_left = state.player.shield_rings();
            log::info!("Shield blocked enemy hit! Rings remaining: {}", rings_left);
            sink.emit(GameEvent::ShieldBlocked { rings_left });
        } else {
            state.player.health -= 1;
            log::info!("Enemy hit player! Health: {}", state.player.health);
            sink.emit(GameEvent::PlayerDamaged {
                health: state.player.health,
            });
            if state.player.is_dead() {
                game_over(state, sink);
            }
        }
    }
}

/// Shove every enemy near the player outward
fn shield_pushback(state: &mut GameState) {
    let center = state.player.pos;
    for enemy in &mut state.enemies {
        let (dist, dir) = crate::distance_and_direction(center, enemy.pos);
        if dist > 0.0 && dist < SHIELD_PUSH_RADIUS {
            enemy.apply_push(dir * SHIELD_PUSH_SPEED, SHIELD_PUSH_TICKS);
        }
    }
}

fn game_over(state: &mut GameState, sink: &mut dyn EventSink) {
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over! score={} level={} time={}s",
        state.score,
        state.level,
        state.time_ms / 1000
    );
    sink.emit(GameEvent::GameOver { score: state.score });
}

/// Draw an offer from the eligible upgrades and wait for a pick
pub fn offer_upgrades(state: &mut GameState, sink: &mut dyn EventSink) {
    let mut eligible = weapon::eligible_upgrades(&state.active_upgrades, &state.stats);
    if eligible.is_empty() {
        log::info!("No upgrades left to offer");
        return;
    }

    eligible.shuffle(&mut state.rng);
    eligible.truncate(UPGRADE_CHOICES);
    state.upgrade_offer = eligible.iter().map(|k| k.to_string()).collect();
    state.phase = GamePhase::UpgradeSelect;

    log::info!("Upgrade offer: {:?}", state.upgrade_offer);
    sink.emit(GameEvent::UpgradeOffered {
        choices: state.upgrade_offer.clone(),
    });
}

/// Pick one of the offered upgrades and resume play
pub fn accept_upgrade(state: &mut GameState, key: &str, sink: &mut dyn EventSink) -> bool {
    if state.phase != GamePhase::UpgradeSelect || !state.upgrade_offer.iter().any(|k| k == key) {
        log::warn!("Ignoring upgrade '{}': not on offer", key);
        return false;
    }

    state.upgrade_offer.clear();
    state.phase = GamePhase::Playing;
    apply_upgrade(state, key, sink)
}

/// Add an upgrade directly, bypassing the offer
pub fn apply_upgrade(state: &mut GameState, key: &str, sink: &mut dyn EventSink) -> bool {
    if !weapon::is_known_upgrade(key) {
        log::warn!("Ignoring unknown upgrade '{}'", key);
        return false;
    }

    let old_shield = state.stats.shield;
    state.active_upgrades.push(key.to_string());
    state.recompute_stats();
    log::info!("Upgrade acquired: {} (now {:?})", key, state.active_upgrades);

    if state.stats.shield != old_shield {
        state.player.set_shield_level(state.stats.shield);
    }
    if key == "summon_minion" {
        spawn_minion(state, sink);
    }

    sink.emit(GameEvent::UpgradeAccepted {
        key: key.to_string(),
    });
    true
}

/// Current respawn cadence: shrinks with play time down to a floor
pub fn respawn_interval_ms(state: &GameState) -> u32 {
    let tuning = &state.tuning;
    let reduction = state.time_ms * tuning.respawn_interval_step_ms as u64 / 60_000;
    let interval = (tuning.respawn_interval_ms as u64).saturating_sub(reduction);
    (interval as u32).max(tuning.respawn_interval_min_ms)
}

/// Enemy cap for the current level
pub fn max_enemies(state: &GameState) -> usize {
    (state.tuning.max_enemy_count as f32 * (1.0 + 0.05 * state.level as f32)) as usize
}

/// Initial wave, scaled by level
pub fn spawn_initial_enemies(state: &mut GameState) {
    let count = (state.tuning.initial_enemy_count as f32 * (1.0 + 0.15 * state.level as f32)) as u32;
    for _ in 0..count {
        spawn_enemy_by_level(state);
    }
    log::info!("Spawned {} enemies", count);
}

/// Spawn a batch off-screen, scaled by level and bounded by the enemy cap
pub fn respawn_enemies(state: &mut GameState, count: u32, sink: &mut dyn EventSink) {
    let cap = max_enemies(state);
    let scaled = (count as f32 * (1.0 + 0.025 * state.level as f32)) as u32;

    let mut spawned = 0;
    for _ in 0..scaled {
        if state.enemies.len() >= cap {
            break;
        }
        spawn_enemy_by_level(state);
        spawned += 1;
    }

    if spawned > 0 {
        log::debug!("Respawned {} enemies ({} total)", spawned, state.enemies.len());
        sink.emit(GameEvent::EnemiesSpawned { count: spawned });
    }
}

fn spawn_enemy_by_level(state: &mut GameState) {
    let pos = random_edge_position(&mut state.rng, state.arena);
    let kind = roll_enemy_kind(&mut state.rng, state.level);
    state.spawn_enemy(kind, pos);
}

/// Random point just outside one arena edge
pub fn random_edge_position(rng: &mut Pcg32, arena: Vec2) -> Vec2 {
    let (w, h) = (arena.x, arena.y);
    let near = -ENEMY_SIZE;
    let far = -SPAWN_MARGIN - ENEMY_SIZE;

    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(near..=w), rng.random_range(far..=near)),
        1 => Vec2::new(rng.random_range(near..=w), rng.random_range(h..=h + SPAWN_MARGIN)),
        2 => Vec2::new(rng.random_range(far..=near), rng.random_range(near..=h)),
        _ => Vec2::new(rng.random_range(w..=w + SPAWN_MARGIN), rng.random_range(near..=h)),
    }
}

/// Pentagons from the start, triangles from level 5, both capped
pub fn roll_enemy_kind(rng: &mut Pcg32, level: u32) -> EnemyKind {
    let pentagon_chance = (0.015 * level as f32).min(0.3);
    let triangle_chance = if level >= 5 {
        (0.3 + 0.015 * (level - 5) as f32).min(0.6)
    } else {
        0.0
    };

    let roll: f32 = rng.random();
    if roll < pentagon_chance {
        EnemyKind::Pentagon
    } else if roll < pentagon_chance + triangle_chance {
        EnemyKind::Triangle
    } else {
        EnemyKind::Basic
    }
}

/// Kite away from the closest enemy and shoot at it
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = state.player.pos;
    let nearest = state.enemies.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player)
            .partial_cmp(&b.pos.distance_squared(player))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(enemy) = nearest else {
        // Drift back to the middle
        input.movement = state.arena / 2.0 - player;
        return;
    };

    let threat = enemy.pos - player;
    input.movement = if threat.length() < 120.0 {
        -threat
    } else {
        state.arena / 2.0 - player
    };
    if state.can_fire() {
        input.fire = Some(enemy.pos);
    }
}
