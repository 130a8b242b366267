//! Session snapshot: the complete visible state handed to the renderer
//! after each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::SimTime;

/// Complete session state for presentation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub status: SessionStatus,
    pub phase: ObjectivePhase,
    /// Zero-based level index.
    pub level: usize,
    pub level_name: String,
    pub player: PlayerView,
    pub weapon: WeaponView,
    pub enemies: Vec<EnemyView>,
    pub hazards: Vec<HazardView>,
    pub score: ScoreView,
    pub gate_open: bool,
    /// Where the bonus area is entered.
    pub bonus_entry: Vec3,
    /// Present until collected.
    pub bonus_item: Option<Vec3>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub grounded: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponView {
    pub ammo: u32,
    pub magazine: u32,
    pub reserve: u32,
    pub reloading: bool,
    /// Visual kick, 0..=1.
    pub recoil: f32,
}

/// An enemy in use by the pool: alive, or dead and still playing its
/// death sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub slot: u32,
    pub archetype: Archetype,
    pub mode: EnemyMode,
    pub position: Vec3,
    pub facing_yaw: f32,
    pub health: f32,
    pub max_health: f32,
    /// 0 while alive, rising to 1 over the death sequence.
    pub death_progress: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardView {
    pub position: Vec3,
    pub triggered: bool,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub kills: u32,
    pub score: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub levels_cleared: u32,
    /// Quota remaining to spawn in the current level (None for survival levels).
    pub quota_remaining: Option<u32>,
    pub enemies_alive: u32,
    pub stake: u32,
}

/// Final statistics for the game-over / victory screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub outcome: GameOutcome,
    pub kills: u32,
    pub score: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    /// Hits / shots, 0 when nothing was fired.
    pub accuracy: f32,
    pub levels_cleared: u32,
    pub elapsed_secs: f64,
    pub stake: u32,
    /// Cosmetic winnings; zero on a loss.
    pub payout: u32,
}
