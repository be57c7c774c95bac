//! Game balance table
//!
//! Every knob defaults to the compiled constant, so a tuning file only needs
//! the keys it changes.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::WeaponStats;

/// Errors raised while loading a tuning file
#[derive(Debug)]
pub enum TuningError {
    /// The file could not be read
    Io(std::io::Error),
    /// The file is not valid tuning JSON
    Parse(serde_json::Error),
    /// A value is outside its usable range
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {}", e),
            TuningError::Parse(e) => write!(f, "failed to parse tuning JSON: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Game balance and arena setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Enemies ===
    /// Enemies in the opening wave (level 0)
    pub initial_enemy_count: u32,
    /// Enemy cap before level scaling
    pub max_enemy_count: u32,
    pub respawn_batch_size: u32,
    /// Respawn interval at the start of a run
    pub respawn_interval_ms: u32,
    /// Floor the interval never drops below
    pub respawn_interval_min_ms: u32,
    /// Interval reduction per minute played
    pub respawn_interval_step_ms: u32,

    // === Weapon ===
    /// Stats before any upgrade
    pub base_weapon: WeaponStats,

    // === Leveling ===
    pub xp_first_level: u32,
    /// Growth of the XP threshold per level
    pub xp_level_multiplier: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            initial_enemy_count: INITIAL_ENEMY_COUNT,
            max_enemy_count: MAX_ENEMY_COUNT,
            respawn_batch_size: RESPAWN_BATCH_SIZE,
            respawn_interval_ms: RESPAWN_INTERVAL_MS,
            respawn_interval_min_ms: RESPAWN_INTERVAL_MIN_MS,
            respawn_interval_step_ms: RESPAWN_INTERVAL_STEP_MS,

            base_weapon: WeaponStats::default(),

            xp_first_level: XP_FIRST_LEVEL,
            xp_level_multiplier: XP_LEVEL_MULTIPLIER,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(TuningError::Invalid {
                field: "arena_width/arena_height",
                reason: format!(
                    "arena must be positive, got {}x{}",
                    self.arena_width, self.arena_height
                ),
            });
        }
        if self.respawn_interval_min_ms > self.respawn_interval_ms {
            return Err(TuningError::Invalid {
                field: "respawn_interval_min_ms",
                reason: format!(
                    "floor {} exceeds base interval {}",
                    self.respawn_interval_min_ms, self.respawn_interval_ms
                ),
            });
        }
        if self.respawn_interval_min_ms == 0 {
            return Err(TuningError::Invalid {
                field: "respawn_interval_min_ms",
                reason: "must be at least one tick".to_string(),
            });
        }
        if self.xp_first_level == 0 {
            return Err(TuningError::Invalid {
                field: "xp_first_level",
                reason: "must be positive".to_string(),
            });
        }
        if !(self.xp_level_multiplier >= 1.0) {
            return Err(TuningError::Invalid {
                field: "xp_level_multiplier",
                reason: format!("must be at least 1.0, got {}", self.xp_level_multiplier),
            });
        }
        Ok(())
    }
}
