//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed 50 ms timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod black_hole;
pub mod collision;
pub mod combat;
pub mod enemy;
pub mod events;
pub mod minion;
pub mod player;
pub mod projectile;
pub mod shard;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod weapon;

pub use black_hole::{BlackHole, BlackHolePhase};
pub use collision::{Rect, check_distance, circle_rect_collision, find_nearest_unstruck};
pub use enemy::{Enemy, EnemyKind};
pub use events::{EventSink, GameEvent, NullSink, SoundCue};
pub use minion::{Minion, MinionProjectile};
pub use player::{Player, Shield};
pub use projectile::{Flight, Projectile, Role};
pub use shard::Shard;
pub use snapshot::Snapshot;
pub use state::{EntityId, GamePhase, GameState};
pub use tick::{TickInput, accept_upgrade, apply_upgrade, fire, tick};
pub use weapon::{Requirement, UpgradeDef, WeaponStats, compute_stats, eligible_upgrades};
