//! Shared damage path
//!
//! Projectile hits, chain strikes, forks, shards and minion shots all land
//! here so that a kill is awarded in exactly one place.

use glam::Vec2;

use super::enemy::EnemyKind;
use super::events::EventSink;
use super::state::{EntityId, GameState};

/// What happened to a struck enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub id: EntityId,
    pub kind: EnemyKind,
    /// Enemy center at the moment of the strike
    pub pos: Vec2,
    pub killed: bool,
}

/// Damage the enemy at `index`: poof, health loss, and on death removal
/// plus score and XP.
pub fn strike_enemy(
    state: &mut GameState,
    index: usize,
    damage: u32,
    sink: &mut dyn EventSink,
) -> Option<Strike> {
    let enemy = state.enemies.get_mut(index)?;
    let killed = enemy.take_damage(damage);
    let strike = Strike {
        id: enemy.id,
        kind: enemy.kind,
        pos: enemy.pos,
        killed,
    };

    state.spawn_poof(strike.pos);
    if killed {
        state.enemies.remove(index);
        log::debug!("{} #{} destroyed", strike.kind.as_str(), strike.id);
        state.award_kill(strike.kind, strike.pos, sink);
    } else {
        log::debug!(
            "{} #{} hit, {} health left",
            strike.kind.as_str(),
            strike.id,
            state.enemies[index].health
        );
    }

    Some(strike)
}

/// Remove every enemy at zero health, awarding each kill. Returns the count.
pub fn sweep_dead(state: &mut GameState, sink: &mut dyn EventSink) -> u32 {
    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| e.is_dead());
    state.enemies = alive;

    for enemy in &dead {
        state.spawn_poof(enemy.pos);
        state.award_kill(enemy.kind, enemy.pos, sink);
    }
    dead.len() as u32
}
