//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype. Each carries a fixed stat profile
/// (see `dunefire_enemy_ai::profiles`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Standard infantry.
    #[default]
    Base,
    /// Runner: quick and fragile.
    Fast,
    /// Tank: slow and heavily armoured.
    Slow,
    /// End-of-level brute.
    Boss,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Base,
        Archetype::Fast,
        Archetype::Slow,
        Archetype::Boss,
    ];
}

/// Enemy behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyMode {
    /// Closing in on the player.
    #[default]
    Pursuing,
    /// Within attack range; holding position and striking on cooldown.
    Attacking,
    /// Killed. Terminal until the slot is reacquired.
    Dead,
}

/// Mission phase: the value of the objective state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectivePhase {
    #[default]
    Active,
    ObjectiveComplete,
    BonusAccessible,
    LevelComplete,
    Lost,
    Won,
}

impl ObjectivePhase {
    /// Lost and Won end the session.
    pub fn is_terminal(self) -> bool {
        matches!(self, ObjectivePhase::Lost | ObjectivePhase::Won)
    }
}

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Built but `start()` not called yet.
    #[default]
    Idle,
    Running,
    /// Game over (won or lost). `restart()` goes back to Running.
    Finished,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// What hurt the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Enemy(Archetype),
    Landmine,
}
