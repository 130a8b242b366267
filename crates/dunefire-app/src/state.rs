//! State shared between the caller and the game loop thread.

use std::sync::{Arc, Mutex};

use dunefire_core::control::RawInput;
use dunefire_core::state::SessionSnapshot;

/// Commands sent to the game loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopCommand {
    /// A device event to feed the session's input adapter.
    Input(RawInput),
    /// Rebuild the session from scratch.
    Restart,
    /// Stop the loop after the current frame.
    Shutdown,
}

/// Latest snapshot, written by the loop after every frame.
///
/// `Mutex<Option<...>>` because nothing exists until the first frame runs.
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot(Arc<Mutex<Option<SessionSnapshot>>>);

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, snapshot: SessionSnapshot) {
        if let Ok(mut lock) = self.0.lock() {
            *lock = Some(snapshot);
        }
    }

    /// A copy of the most recent snapshot, if any frame has run.
    pub fn latest(&self) -> Option<SessionSnapshot> {
        self.0.lock().ok().and_then(|lock| lock.clone())
    }
}
