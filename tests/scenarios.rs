use glam::Vec2;

use shape_shooter::Tuning;
use shape_shooter::consts::*;
use shape_shooter::sim::{
    BlackHole, EnemyKind, GameEvent, GamePhase, GameState, Projectile, Shield, TickInput, apply_upgrade, tick,
};

fn step(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    tick(state, input, &mut events);
    events
}

#[test]
fn basic_enemy_above_player_dies_to_one_shot() {
    let mut state = GameState::empty(1);
    let player = state.player.pos;
    state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(0.0, -40.0));

    let input = TickInput {
        fire: Some(player + Vec2::new(0.0, -40.0)),
        ..Default::default()
    };
    let events = step(&mut state, &input);

    assert!(state.enemies.is_empty());
    assert_eq!(state.score, 1);
    assert_eq!(state.xp, 1);
    assert_eq!(state.projectiles.len(), 1);
    assert!(state.projectiles[0].is_returning());
    assert!(events.iter().any(|e| e.sound().is_some_and(|s| s.key == "enemy_killed")));
}

#[test]
fn single_ring_shield_absorbs_contact() {
    let mut state = GameState::empty(1);
    apply_upgrade(&mut state, "shield", &mut Vec::new());
    assert_eq!(state.player.shield_rings(), 1);
    let player = state.player.pos;
    state.spawn_enemy(EnemyKind::Basic, player + Vec2::new(15.0, 0.0));

    step(&mut state, &TickInput::default());

    assert_eq!(state.player.shield_rings(), 0);
    assert!(!state.player.shield_active());
    assert_eq!(state.player.shield, Shield::Recharging { cooldown_ms: 5000 });
    assert_eq!(state.player.health, PLAYER_START_HEALTH);
    assert_eq!(state.enemies[0].shield_immunity, 10);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn pentagon_takes_eight_separate_hits() {
    let mut state = GameState::empty(1);
    let player = state.player.pos;
    state.spawn_enemy(EnemyKind::Pentagon, player + Vec2::new(20.0, 0.0));

    let shoot = |state: &mut GameState| {
        let id = state.next_entity_id();
        let mut p = Projectile::new(id, player, Vec2::new(6.0, 0.0), &state.stats, &state.enemies);
        p.update(state, &mut Vec::new());
    };

    for _ in 0..7 {
        shoot(&mut state);
    }
    assert_eq!(state.enemies.len(), 1);
    assert_eq!(state.enemies[0].health, 1);
    assert_eq!(state.score, 0);

    shoot(&mut state);
    assert!(state.enemies.is_empty());
    assert_eq!(state.score, 1);
    assert_eq!(state.xp, 7);
}

#[test]
fn projectile_turns_back_when_range_is_spent() {
    let mut state = GameState::empty(1);
    state.resize(2000.0, 2000.0);
    let mut p = Projectile::new(1, state.player.pos, Vec2::new(6.0, 0.0), &state.stats, &[]);
    assert_eq!(p.stats.attack_range, 500.0);
    // Isolate the range rule from the flight timeout
    p.timeout_ms = 60_000;

    let mut ticks = 0;
    while !p.is_returning() {
        assert!(p.update(&mut state, &mut Vec::new()));
        ticks += 1;
    }
    // 83 * 6 = 498, 84 * 6 = 504
    assert_eq!(ticks, 84);
    assert!(p.distance_traveled > 500.0);
}

#[test]
fn black_hole_detonation_reaches_inside_radius_only() {
    let mut state = GameState::empty(1);
    let center = Vec2::new(300.0, 200.0);
    state.spawn_enemy(EnemyKind::Triangle, center + Vec2::new(59.0, 0.0));
    state.spawn_enemy(EnemyKind::Triangle, center + Vec2::new(-61.0, 0.0));
    let mut hole = BlackHole::new(100, center, 1);
    assert_eq!(hole.radius, 60.0);

    let mut events = Vec::new();
    while hole.update(&mut state, &mut events) {}

    let inside = &state.enemies[0];
    assert_eq!(inside.health, 4);
    let fling = inside.pull.expect("flung");
    assert!(fling.velocity.x > 0.0);

    let outside = &state.enemies[1];
    assert_eq!(outside.health, 5);
    assert!(outside.pull.is_none());

    let detonations: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::BlackHoleDetonated { .. }))
        .collect();
    assert_eq!(detonations.len(), 1);
    assert_eq!(detonations[0].sound().map(|s| s.key), Some("black_hole_detonate"));
}

#[test]
fn autopilot_session_stays_consistent() {
    let mut state = GameState::new(2024);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut kills = 0;

    for _ in 0..2_000 {
        let events = step(&mut state, &input);
        kills += events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count() as u64;

        assert!(state.black_holes.len() <= 1);
        assert!(state.projectiles.iter().filter(|p| p.is_main()).count() <= 1);
        assert!(state.enemies.iter().all(|e| e.health > 0));
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    assert_eq!(kills, state.score);
    let json = serde_json::to_string(&state.snapshot()).expect("snapshot serializes");
    assert!(json.contains("\"score\""));
}

#[test]
fn custom_tuning_drives_new_game() {
    let tuning = Tuning::from_json(r#"{ "arena_width": 800, "arena_height": 500, "initial_enemy_count": 4 }"#)
        .expect("valid tuning");
    let mut state = GameState::with_tuning(7, tuning);
    assert_eq!(state.arena, Vec2::new(800.0, 500.0));
    assert_eq!(state.player.pos, Vec2::new(400.0, 250.0));
    assert_eq!(state.enemies.len(), 4);

    state.score = 10;
    state.restart();
    assert_eq!(state.score, 0);
    assert_eq!(state.enemies.len(), 4);
}
