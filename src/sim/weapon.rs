//! Weapon stats and the upgrade tables that modify them
//!
//! Effective stats are always derived: fold the base table with the owned
//! upgrade keys in acquisition order. Duplicated keys stack.

use serde::{Deserialize, Serialize};

/// Effective weapon stats consumed by new projectiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    /// Flight speed (px per tick)
    pub projectile_speed: f32,
    /// Velocity blend toward the homing target per tick (0 = none)
    pub homing: f32,
    /// Extra ricochets after the first hit
    pub bounces: u32,
    pub splits: bool,
    pub shrapnel: u32,
    pub explosive_shrapnel: u32,
    pub chain_lightning: u32,
    pub black_hole: u32,
    pub shield: u32,
    /// Distance a projectile may travel before turning back
    pub attack_range: f32,
    /// Bonus to the player's top speed
    pub move_speed: f32,
    pub minions: u32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            projectile_speed: 6.0,
            homing: 0.0,
            bounces: 0,
            splits: true,
            shrapnel: 0,
            explosive_shrapnel: 0,
            chain_lightning: 0,
            black_hole: 0,
            shield: 0,
            attack_range: 500.0,
            move_speed: 0.0,
            minions: 0,
        }
    }
}

/// A single change an upgrade makes to the stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    ProjectileSpeed(f32),
    Homing(f32),
    Bounces(u32),
    Shrapnel(u32),
    ExplosiveShrapnel(u32),
    ChainLightning(u32),
    BlackHole(u32),
    Shield(u32),
    AttackRange(f32),
    MoveSpeed(f32),
    Minions(u32),
    /// Overrides instead of accumulating
    Splits(bool),
}

impl WeaponStats {
    pub fn apply(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::ProjectileSpeed(v) => self.projectile_speed += v,
            Modifier::Homing(v) => self.homing += v,
            Modifier::Bounces(v) => self.bounces += v,
            Modifier::Shrapnel(v) => self.shrapnel += v,
            Modifier::ExplosiveShrapnel(v) => self.explosive_shrapnel += v,
            Modifier::ChainLightning(v) => self.chain_lightning += v,
            Modifier::BlackHole(v) => self.black_hole += v,
            Modifier::Shield(v) => self.shield += v,
            Modifier::AttackRange(v) => self.attack_range += v,
            Modifier::MoveSpeed(v) => self.move_speed += v,
            Modifier::Minions(v) => self.minions += v,
            Modifier::Splits(v) => self.splits = v,
        }
    }
}

/// Gate for linked upgrades
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    None,
    Single(&'static str),
    AllOf(&'static [&'static str]),
    /// Key owned at least `n` times
    CountAtLeast(&'static str, usize),
}

impl Requirement {
    pub fn is_met<S: AsRef<str>>(&self, owned: &[S]) -> bool {
        let count = |key: &str| owned.iter().filter(|k| k.as_ref() == key).count();
        match *self {
            Requirement::None => true,
            Requirement::Single(key) => count(key) > 0,
            Requirement::AllOf(keys) => keys.iter().all(|k| count(k) > 0),
            Requirement::CountAtLeast(key, n) => count(key) >= n,
        }
    }
}

/// Static upgrade definition
#[derive(Debug, Clone, Copy)]
pub struct UpgradeDef {
    pub key: &'static str,
    pub name: &'static str,
    pub modifiers: &'static [Modifier],
    /// Excluded from offers once owned
    pub one_time: bool,
    pub requires: Requirement,
}

pub const UPGRADES: &[UpgradeDef] = &[
    UpgradeDef {
        key: "extra_bounce",
        name: "Ricochet",
        modifiers: &[Modifier::Bounces(1)],
        one_time: false,
        requires: Requirement::None,
    },
    UpgradeDef {
        key: "shrapnel",
        name: "Shrapnel",
        modifiers: &[Modifier::Shrapnel(1)],
        one_time: false,
        requires: Requirement::None,
    },
    UpgradeDef {
        key: "speed_boost",
        name: "Speed Boost",
        modifiers: &[Modifier::ProjectileSpeed(3.0)],
        one_time: false,
        requires: Requirement::None,
    },
    UpgradeDef {
        key: "black_hole",
        name: "Black Hole",
        modifiers: &[Modifier::BlackHole(1)],
        one_time: false,
        requires: Requirement::None,
    },
    UpgradeDef {
        key: "homing",
        name: "Homing",
        modifiers: &[Modifier::Homing(0.35)],
        one_time: true,
        requires: Requirement::None,
    },
    UpgradeDef {
        key: "shield",
        name: "Shield",
        modifiers: &[Modifier::Shield(1)],
        one_time: false,
        requires: Requirement::None,
    },
    UpgradeDef {
        key: "long_range",
        name: "Long Shot",
        modifiers: &[Modifier::AttackRange(150.0)],
        one_time: false,
        requires: Requirement::None,
    },
    UpgradeDef {
        key: "swift_feet",
        name: "Swift Feet",
        modifiers: &[Modifier::MoveSpeed(1.0)],
        one_time: false,
        requires: Requirement::None,
    },
    UpgradeDef {
        key: "summon_minion",
        name: "Summon Minion",
        modifiers: &[Modifier::Minions(1)],
        one_time: false,
        requires: Requirement::None,
    },
];

/// Only offered once their prerequisite is owned
pub const LINKED_UPGRADES: &[UpgradeDef] = &[
    UpgradeDef {
        key: "explosive_shrapnel",
        name: "Explosive Shrapnel",
        modifiers: &[Modifier::ExplosiveShrapnel(1)],
        one_time: false,
        requires: Requirement::Single("shrapnel"),
    },
    UpgradeDef {
        key: "chain_lightning",
        name: "Chain Lightning",
        modifiers: &[Modifier::ChainLightning(1)],
        one_time: false,
        requires: Requirement::AllOf(&["speed_boost", "extra_bounce"]),
    },
    UpgradeDef {
        key: "event_horizon",
        name: "Event Horizon",
        modifiers: &[Modifier::BlackHole(1)],
        one_time: false,
        requires: Requirement::CountAtLeast("black_hole", 3),
    },
];

/// Primary table first, then the linked table
pub fn find_upgrade(key: &str) -> Option<&'static UpgradeDef> {
    UPGRADES
        .iter()
        .chain(LINKED_UPGRADES.iter())
        .find(|u| u.key == key)
}

pub fn is_known_upgrade(key: &str) -> bool {
    find_upgrade(key).is_some()
}

/// Fold the base table with the owned upgrades. Unknown keys are skipped.
pub fn compute_stats<S: AsRef<str>>(base: &WeaponStats, active: &[S]) -> WeaponStats {
    let mut stats = *base;
    for key in active {
        let Some(upgrade) = find_upgrade(key.as_ref()) else {
            continue;
        };
        for modifier in upgrade.modifiers {
            stats.apply(*modifier);
        }
    }
    stats
}

/// Upgrades that may appear in the next level-up offer
pub fn eligible_upgrades<S: AsRef<str>>(active: &[S], stats: &WeaponStats) -> Vec<&'static str> {
    let owned = |key: &str| active.iter().any(|k| k.as_ref() == key);

    let mut eligible: Vec<&'static str> = UPGRADES
        .iter()
        .filter(|u| !(u.one_time && owned(u.key)))
        .filter(|u| !(u.key == "shield" && stats.shield >= crate::consts::SHIELD_MAX_RINGS))
        .map(|u| u.key)
        .collect();

    eligible.extend(
        LINKED_UPGRADES
            .iter()
            .filter(|u| u.requires.is_met(active))
            .filter(|u| !(u.one_time && owned(u.key)))
            .map(|u| u.key),
    );

    eligible
}
