//! Session configuration.
//!
//! `GameConfig` bundles every tunable a session is built from. Defaults
//! come from `constants`; a JSON file may override any subset of fields.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::Archetype;

/// Errors produced while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config defines no levels")]
    NoLevels,
    #[error("level {level} has an empty enemy quota")]
    EmptyQuota { level: usize },
    #[error("level {level} has no archetype with a positive weight")]
    EmptyMix { level: usize },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// How a level is won.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Progression {
    /// Single pass: spawn exactly `enemies`, kill them all, then reach the
    /// bonus item behind the access gate.
    Quota { enemies: u32 },
    /// Continuous waves: enemies keep coming; survive for `duration_secs`.
    Survival { duration_secs: f64 },
}

/// Relative spawn frequency of one archetype within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeWeight {
    pub archetype: Archetype,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    pub progression: Progression,
    pub archetype_mix: Vec<ArchetypeWeight>,
    pub spawn_interval_secs: f64,
    pub spawn_delay_secs: f64,
    /// Spawns pause while this many enemies are alive or emerging.
    pub max_alive: u32,
    pub landmines: usize,
    /// Optional countdown shown on the HUD for quota levels. Running out
    /// does not end the level; it only stops the countdown at zero.
    pub time_limit_secs: Option<f64>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: "Crash Site".into(),
            progression: Progression::Quota { enemies: 8 },
            archetype_mix: vec![ArchetypeWeight {
                archetype: Archetype::Base,
                weight: 1,
            }],
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            spawn_delay_secs: SPAWN_DELAY_SECS,
            max_alive: MAX_ALIVE_ENEMIES,
            landmines: 8,
            time_limit_secs: None,
        }
    }
}

impl LevelConfig {
    /// A quota level spawning `enemies` of a single archetype.
    pub fn quota(name: &str, enemies: u32, archetype: Archetype) -> Self {
        Self {
            name: name.into(),
            progression: Progression::Quota { enemies },
            archetype_mix: vec![ArchetypeWeight {
                archetype,
                weight: 1,
            }],
            ..Default::default()
        }
    }

    /// A survival level lasting `duration_secs`.
    pub fn survival(name: &str, duration_secs: f64, mix: Vec<ArchetypeWeight>) -> Self {
        Self {
            name: name.into(),
            progression: Progression::Survival { duration_secs },
            archetype_mix: mix,
            ..Default::default()
        }
    }

    /// Quota for quota levels, `None` for survival levels.
    pub fn quota_total(&self) -> Option<u32> {
        match self.progression {
            Progression::Quota { enemies } => Some(enemies),
            Progression::Survival { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub eye_height: f32,
    pub damage_cooldown_secs: f64,
    pub spawn: Vec3,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            walk_speed: PLAYER_WALK_SPEED,
            sprint_speed: PLAYER_SPRINT_SPEED,
            jump_speed: PLAYER_JUMP_SPEED,
            gravity: GRAVITY,
            eye_height: PLAYER_EYE_HEIGHT,
            damage_cooldown_secs: PLAYER_DAMAGE_COOLDOWN_SECS,
            spawn: Vec3::from_array(PLAYER_SPAWN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub magazine: u32,
    pub reserve: u32,
    pub fire_interval_secs: f64,
    pub reload_secs: f64,
    pub damage: f32,
    pub range: f32,
    /// Start a reload automatically when the magazine runs dry.
    pub auto_reload: bool,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            magazine: MAGAZINE_CAPACITY,
            reserve: STARTING_RESERVE,
            fire_interval_secs: FIRE_INTERVAL_SECS,
            reload_secs: RELOAD_DURATION_SECS,
            damage: WEAPON_DAMAGE,
            range: WEAPON_RANGE,
            auto_reload: true,
        }
    }
}

/// The cosmetic bet placed before a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wager {
    pub stake: u32,
    pub win_multiplier: f32,
    pub per_level_bonus: f32,
}

impl Default for Wager {
    fn default() -> Self {
        Self {
            stake: DEFAULT_STAKE,
            win_multiplier: WIN_MULTIPLIER,
            per_level_bonus: PER_LEVEL_BONUS,
        }
    }
}

impl Wager {
    /// Winnings for a victory after clearing `levels_cleared` levels.
    pub fn payout(&self, levels_cleared: u32) -> u32 {
        let multiplier = self.win_multiplier + self.per_level_bonus * levels_cleared as f32;
        (self.stake as f32 * multiplier).round() as u32
    }
}

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed. Same seed and same inputs give the same session.
    pub seed: u64,
    pub max_frame_dt: f32,
    pub arena_half_width: f32,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
    pub wager: Wager,
    pub levels: Vec<LevelConfig>,
    /// Hard cap on pooled enemy instances; `None` lets the pool grow.
    pub pool_capacity: Option<usize>,
    pub death_sequence_secs: f64,
    pub level_transition_secs: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_frame_dt: MAX_FRAME_DT,
            arena_half_width: ARENA_HALF_WIDTH,
            player: PlayerTuning::default(),
            weapon: WeaponTuning::default(),
            wager: Wager::default(),
            levels: default_campaign(),
            pool_capacity: None,
            death_sequence_secs: DEATH_SEQUENCE_SECS,
            level_transition_secs: LEVEL_TRANSITION_SECS,
        }
    }
}

/// Three escalating levels around the crash site.
fn default_campaign() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            name: "Crash Site".into(),
            progression: Progression::Quota { enemies: 8 },
            archetype_mix: mix(&[(Archetype::Base, 3), (Archetype::Fast, 1)]),
            landmines: 6,
            ..Default::default()
        },
        LevelConfig {
            name: "Dust Storm".into(),
            progression: Progression::Quota { enemies: 14 },
            archetype_mix: mix(&[
                (Archetype::Base, 2),
                (Archetype::Fast, 2),
                (Archetype::Slow, 1),
            ]),
            spawn_interval_secs: 1.6,
            max_alive: 8,
            landmines: 10,
            time_limit_secs: Some(180.0),
            ..Default::default()
        },
        LevelConfig {
            name: "Last Stand".into(),
            progression: Progression::Survival { duration_secs: 90.0 },
            archetype_mix: mix(&[
                (Archetype::Base, 4),
                (Archetype::Fast, 3),
                (Archetype::Slow, 2),
                (Archetype::Boss, 1),
            ]),
            spawn_interval_secs: 1.2,
            max_alive: 10,
            landmines: 12,
            ..Default::default()
        },
    ]
}

/// Build an archetype mix from `(archetype, weight)` pairs.
pub fn mix(weights: &[(Archetype, u32)]) -> Vec<ArchetypeWeight> {
    weights
        .iter()
        .map(|&(archetype, weight)| ArchetypeWeight { archetype, weight })
        .collect()
}

impl GameConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if self.max_frame_dt <= 0.0 {
            return Err(invalid("max_frame_dt", "must be positive"));
        }
        if self.arena_half_width <= 0.0 {
            return Err(invalid("arena_half_width", "must be positive"));
        }
        if self.weapon.magazine == 0 {
            return Err(invalid("weapon.magazine", "must hold at least one round"));
        }
        if self.player.max_health <= 0.0 {
            return Err(invalid("player.max_health", "must be positive"));
        }
        if self.pool_capacity == Some(0) {
            return Err(invalid("pool_capacity", "a capped pool needs at least one slot"));
        }
        for (index, level) in self.levels.iter().enumerate() {
            match level.progression {
                Progression::Quota { enemies: 0 } => {
                    return Err(ConfigError::EmptyQuota { level: index });
                }
                Progression::Survival { duration_secs } if duration_secs <= 0.0 => {
                    return Err(invalid(
                        "progression.duration_secs",
                        format!("level {index} must last a positive time"),
                    ));
                }
                _ => {}
            }
            if level.archetype_mix.iter().all(|w| w.weight == 0) {
                return Err(ConfigError::EmptyMix { level: index });
            }
            if level.max_alive == 0 {
                return Err(invalid(
                    "max_alive",
                    format!("level {index} must allow at least one enemy"),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}
