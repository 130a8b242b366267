//! HUD that writes to the log instead of a screen.

use tracing::{debug, info, trace};

use dunefire_core::events::HudNotice;
use dunefire_sim::collaborators::Hud;

/// Logs every notice. Frequent counters go to `debug`/`trace`, phase
/// changes and banner messages to `info`.
#[derive(Debug, Default)]
pub struct LogHud {
    notices: u64,
}

impl LogHud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far.
    pub fn notices(&self) -> u64 {
        self.notices
    }
}

impl Hud for LogHud {
    fn notify(&mut self, notice: HudNotice) {
        self.notices += 1;
        match notice {
            HudNotice::HealthChanged { health, max } => {
                debug!(health, max, "health");
            }
            HudNotice::AmmoChanged {
                ammo,
                reserve,
                reloading,
            } => {
                debug!(ammo, reserve, reloading, "ammo");
            }
            HudNotice::TimerTick {
                seconds,
                counting_down,
            } => {
                trace!(seconds, counting_down, "timer");
            }
            HudNotice::KillsChanged { kills } => debug!(kills, "kills"),
            HudNotice::ScoreChanged { score } => debug!(score, "score"),
            HudNotice::PhaseChanged { level, phase } => {
                info!(level, ?phase, "objective phase");
            }
            HudNotice::Message { text } => info!("{text}"),
            HudNotice::ClearMessage => trace!("message cleared"),
            HudNotice::GameOver { summary } => {
                info!(
                    outcome = ?summary.outcome,
                    kills = summary.kills,
                    score = summary.score,
                    accuracy = summary.accuracy,
                    payout = summary.payout,
                    "game over"
                );
            }
        }
    }
}
