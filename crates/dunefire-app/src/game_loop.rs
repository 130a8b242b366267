//! Game loop thread: owns the session, advances it once per frame and
//! publishes snapshots.
//!
//! The session is built inside the thread because its collaborators are
//! not `Send`. Commands arrive over an `mpsc` channel; device input is
//! forwarded to the session's `InputAdapter`.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use dunefire_core::config::GameConfig;
use dunefire_core::constants::TARGET_FPS;
use dunefire_core::control::RawInput;
use dunefire_core::enums::SessionStatus;
use dunefire_core::state::{GameSummary, SessionSnapshot};
use dunefire_sim::input::InputAdapter;
use dunefire_sim::GameSession;

use crate::autopilot::Autopilot;
use crate::error::AppError;
use crate::hud_log::LogHud;
use crate::state::{LoopCommand, SharedSnapshot};

/// Nominal duration of one frame.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TARGET_FPS as u64);

/// How the loop advances time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// Sleep to the frame rate and step by the measured wall-clock dt.
    RealTime,
    /// Step by a fixed dt as fast as possible.
    Fixed { dt: f32 },
}

#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub pacing: Pacing,
    /// Stop after this much session time even if the game is not over.
    pub max_session_secs: f64,
    /// Drive the player with the built-in autopilot.
    pub autopilot: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            pacing: Pacing::RealTime,
            max_session_secs: 600.0,
            autopilot: true,
        }
    }
}

/// Handle to a running loop thread.
pub struct GameLoop {
    commands: mpsc::Sender<LoopCommand>,
    latest: SharedSnapshot,
    thread: JoinHandle<Option<GameSummary>>,
}

impl GameLoop {
    /// Validate `config` and start the loop thread.
    pub fn spawn(config: GameConfig, settings: LoopSettings) -> Result<Self, AppError> {
        config.validate()?;

        let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
        let latest = SharedSnapshot::new();
        let shared = latest.clone();

        let thread = std::thread::Builder::new()
            .name("dunefire-game-loop".into())
            .spawn(move || run_game_loop(config, settings, cmd_rx, &shared))
            .map_err(AppError::Spawn)?;

        Ok(Self {
            commands: cmd_tx,
            latest,
            thread,
        })
    }

    /// Queue a command. False once the loop has exited.
    pub fn send(&self, command: LoopCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Most recent snapshot, if a frame has run.
    pub fn latest(&self) -> Option<SessionSnapshot> {
        self.latest.latest()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to exit. The summary is `None` if the game was
    /// cut short by shutdown or the time cap.
    pub fn join(self) -> Result<Option<GameSummary>, AppError> {
        self.thread.join().map_err(|_| AppError::LoopPanicked)
    }
}

/// The game loop. Runs until the game ends, the time cap is hit, or a
/// Shutdown command or channel disconnect.
fn run_game_loop(
    config: GameConfig,
    settings: LoopSettings,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest: &SharedSnapshot,
) -> Option<GameSummary> {
    let mut autopilot = settings.autopilot.then(|| Autopilot::new(&config));
    let (input_tx, adapter) = InputAdapter::channel();
    let built = GameSession::with_arena(config, Box::new(adapter), Box::new(LogHud::new()));
    let mut session = match built {
        Ok(session) => session,
        Err(err) => {
            error!(%err, "session rejected its config");
            return None;
        }
    };
    session.start();
    latest.store(session.snapshot());

    let mut last_frame = Instant::now();
    let mut next_frame = last_frame;

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Input(input)) => forward(&input_tx, input),
                Ok(LoopCommand::Restart) => {
                    info!("restart requested");
                    session.restart();
                    if let Some(pilot) = autopilot.as_mut() {
                        pilot.reset();
                    }
                }
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = session.time().tick, "game loop shutting down");
                    return None;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Scripted input reacts to the last published frame
        if let Some(pilot) = autopilot.as_mut() {
            for input in pilot.steer(&session.snapshot()) {
                forward(&input_tx, input);
            }
        }

        // 3. Advance one frame
        let dt = match settings.pacing {
            Pacing::Fixed { dt } => dt,
            Pacing::RealTime => {
                let now = Instant::now();
                let dt = (now - last_frame).as_secs_f32();
                last_frame = now;
                dt
            }
        };
        session.update(dt);

        // 4. Publish
        latest.store(session.snapshot());

        if session.status() == SessionStatus::Finished {
            let summary = session.summary().cloned();
            info!(tick = session.time().tick, "game finished");
            return summary;
        }
        if session.time().elapsed_secs >= settings.max_session_secs {
            info!(
                elapsed = session.time().elapsed_secs,
                "session time cap reached"
            );
            return None;
        }

        // 5. Sleep until the next frame
        if settings.pacing == Pacing::RealTime {
            next_frame += FRAME_DURATION;
            let now = Instant::now();
            if next_frame > now {
                std::thread::sleep(next_frame - now);
            } else if now - next_frame > FRAME_DURATION * 2 {
                // Too far behind; drop the backlog instead of spiralling.
                next_frame = now;
            }
        }
    }
}

fn forward(input_tx: &mpsc::Sender<RawInput>, input: RawInput) {
    if input_tx.send(input).is_err() {
        debug!(?input, "input adapter gone; dropping event");
    }
}
