//! Objective state machine.
//!
//! ```text
//! Active ──quota issued, none alive──▶ ObjectiveComplete ──▶ BonusAccessible
//!    │                                                            │
//!    └──survival timer elapsed──▶ LevelComplete ◀──bonus pickup───┘
//!                                      │
//!                     next level ◀─────┴─────▶ Won (last level)
//! any non-terminal phase ──player health 0──▶ Lost
//! ```
//!
//! The machine only decides transitions. Side effects (gate, bonus item,
//! healing, level loading, scheduling) belong to the session, which applies
//! each returned `PhaseTransition` in order.

use glam::Vec3;

use dunefire_core::constants::BONUS_PICKUP_RADIUS;
use dunefire_core::enums::ObjectivePhase;
use dunefire_core::types::planar_distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub level: usize,
    pub from: ObjectivePhase,
    pub to: ObjectivePhase,
}

/// Per-frame facts the machine decides on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveInputs {
    pub player_health: f32,
    pub player_position: Vec3,
    /// Quota of the current level, `None` for survival levels.
    pub quota: Option<u32>,
    /// Enemies that have actually emerged this level.
    pub issued: u32,
    /// Enemies alive right now. Dying enemies do not count.
    pub alive: u32,
    /// Where the bonus item is, if it is still in the world.
    pub bonus_item: Option<Vec3>,
    pub level_elapsed_secs: f64,
    /// Survival duration, `None` for quota levels.
    pub survival_secs: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ObjectiveMachine {
    phase: ObjectivePhase,
    level: usize,
    level_count: usize,
}

impl ObjectiveMachine {
    pub fn new(level_count: usize) -> Self {
        Self {
            phase: ObjectivePhase::Active,
            level: 0,
            level_count: level_count.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.phase = ObjectivePhase::Active;
        self.level = 0;
    }

    pub fn phase(&self) -> ObjectivePhase {
        self.phase
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_last_level(&self) -> bool {
        self.level + 1 >= self.level_count
    }

    /// Move to `to`. Re-entering the current phase is a no-op.
    pub fn transition(&mut self, to: ObjectivePhase) -> Option<PhaseTransition> {
        if to == self.phase {
            return None;
        }
        let from = std::mem::replace(&mut self.phase, to);
        Some(PhaseTransition {
            level: self.level,
            from,
            to,
        })
    }

    /// Evaluate one frame. Returns the transitions taken, in order.
    pub fn step(&mut self, inputs: &ObjectiveInputs) -> Vec<PhaseTransition> {
        let mut taken = Vec::new();
        if self.phase.is_terminal() {
            return taken;
        }
        if inputs.player_health <= 0.0 {
            taken.extend(self.transition(ObjectivePhase::Lost));
            return taken;
        }

        match self.phase {
            ObjectivePhase::Active => match (inputs.quota, inputs.survival_secs) {
                (Some(quota), _) => {
                    if inputs.issued >= quota && inputs.alive == 0 {
                        taken.extend(self.transition(ObjectivePhase::ObjectiveComplete));
                        taken.extend(self.transition(ObjectivePhase::BonusAccessible));
                    }
                }
                (None, Some(duration)) => {
                    if inputs.level_elapsed_secs >= duration {
                        taken.extend(self.complete_level());
                    }
                }
                (None, None) => {}
            },
            ObjectivePhase::ObjectiveComplete => {
                taken.extend(self.transition(ObjectivePhase::BonusAccessible));
            }
            ObjectivePhase::BonusAccessible => {
                let collected = inputs.bonus_item.is_some_and(|item| {
                    planar_distance(inputs.player_position, item) <= BONUS_PICKUP_RADIUS
                });
                if collected {
                    taken.extend(self.complete_level());
                }
            }
            _ => {}
        }
        taken
    }

    /// Leave LevelComplete for the next level's Active phase. No-op in any
    /// other phase or on the last level.
    pub fn advance_level(&mut self) -> Option<PhaseTransition> {
        if self.phase != ObjectivePhase::LevelComplete || self.is_last_level() {
            return None;
        }
        self.level += 1;
        self.transition(ObjectivePhase::Active)
    }

    /// LevelComplete, then straight on to Won when this was the last level.
    fn complete_level(&mut self) -> Vec<PhaseTransition> {
        let mut taken: Vec<PhaseTransition> =
            self.transition(ObjectivePhase::LevelComplete).into_iter().collect();
        if self.is_last_level() {
            taken.extend(self.transition(ObjectivePhase::Won));
        }
        taken
    }
}
