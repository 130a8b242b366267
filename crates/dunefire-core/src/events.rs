//! Domain events published on the event bus, and one-way HUD notices.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::GameSummary;

/// Subscription topic. Each event belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Combat,
    Player,
    Weapon,
    Objective,
    Session,
}

/// Something that happened in the simulation this tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// An enemy emerged from the wreck.
    EnemySpawned {
        slot: u32,
        archetype: Archetype,
        position: Vec3,
    },
    /// A shot was fired. `hit_slot` is the enemy struck, if any.
    ShotFired { hit_slot: Option<u32> },
    /// An enemy's health reached zero.
    EnemyKilled {
        slot: u32,
        archetype: Archetype,
        score_value: u32,
    },
    /// Player lost health.
    PlayerDamaged {
        amount: f32,
        remaining: f32,
        source: DamageSource,
    },
    /// A trap went off under the player.
    HazardTriggered { index: usize, damage: f32 },
    ReloadStarted { duration_secs: f64 },
    ReloadFinished { ammo: u32, reserve: u32 },
    /// Objective state machine moved.
    PhaseChanged {
        level: usize,
        from: ObjectivePhase,
        to: ObjectivePhase,
    },
    /// All enemies of the level's quota are dead.
    ObjectiveComplete { level: usize },
    /// The bonus item was picked up.
    ItemCollected { level: usize },
    LevelStarted { level: usize },
    GameOver { outcome: GameOutcome },
}

impl GameEvent {
    pub fn topic(&self) -> EventTopic {
        match self {
            GameEvent::EnemySpawned { .. } | GameEvent::EnemyKilled { .. } => EventTopic::Combat,
            GameEvent::ShotFired { .. }
            | GameEvent::ReloadStarted { .. }
            | GameEvent::ReloadFinished { .. } => EventTopic::Weapon,
            GameEvent::PlayerDamaged { .. } | GameEvent::HazardTriggered { .. } => {
                EventTopic::Player
            }
            GameEvent::PhaseChanged { .. }
            | GameEvent::ObjectiveComplete { .. }
            | GameEvent::ItemCollected { .. } => EventTopic::Objective,
            GameEvent::LevelStarted { .. } | GameEvent::GameOver { .. } => EventTopic::Session,
        }
    }
}

/// Write-only notification for the HUD. The core never reads HUD state back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HudNotice {
    HealthChanged { health: f32, max: f32 },
    AmmoChanged { ammo: u32, reserve: u32, reloading: bool },
    /// Whole seconds elapsed in the level, or remaining when the level is timed.
    TimerTick { seconds: u32, counting_down: bool },
    KillsChanged { kills: u32 },
    ScoreChanged { score: u32 },
    PhaseChanged { level: usize, phase: ObjectivePhase },
    /// Transient banner ("Objective complete", "Gate open", ...).
    Message { text: String },
    ClearMessage,
    GameOver { summary: GameSummary },
}
