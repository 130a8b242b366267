//! Running score, fed from dispatched events.

use serde::{Deserialize, Serialize};

use dunefire_core::config::Wager;
use dunefire_core::enums::{GameOutcome, ObjectivePhase};
use dunefire_core::events::GameEvent;
use dunefire_core::state::GameSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    pub kills: u32,
    pub score: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub levels_cleared: u32,
}

impl ScoreKeeper {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemyKilled { score_value, .. } => {
                self.kills += 1;
                self.score += score_value;
            }
            GameEvent::ShotFired { hit_slot } => {
                self.shots_fired += 1;
                if hit_slot.is_some() {
                    self.shots_hit += 1;
                }
            }
            GameEvent::PhaseChanged {
                to: ObjectivePhase::LevelComplete,
                ..
            } => self.levels_cleared += 1,
            _ => {}
        }
    }

    /// Fraction of shots that hit, 0 when nothing was fired.
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.shots_hit as f32 / self.shots_fired as f32
        }
    }

    pub fn summary(&self, outcome: GameOutcome, elapsed_secs: f64, wager: &Wager) -> GameSummary {
        let payout = match outcome {
            GameOutcome::Won => wager.payout(self.levels_cleared),
            GameOutcome::Lost => 0,
        };
        GameSummary {
            outcome,
            kills: self.kills,
            score: self.score,
            shots_fired: self.shots_fired,
            shots_hit: self.shots_hit,
            accuracy: self.accuracy(),
            levels_cleared: self.levels_cleared,
            elapsed_secs,
            stake: wager.stake,
            payout,
        }
    }
}
