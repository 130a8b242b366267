//! Device input adapter.
//!
//! Turns a stream of `RawInput` events (keys, mouse motion and buttons,
//! pointer capture) into the per-tick `ControlSource` view the session
//! reads. Events arrive over an mpsc channel so the device side can live
//! on another thread.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::debug;

use dunefire_core::control::{ActionTrigger, Key, LookDelta, MouseButton, MoveAxes, RawInput};

use crate::collaborators::ControlSource;

/// Radians of look per pixel of mouse motion.
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.002;

pub struct InputAdapter {
    rx: Receiver<RawInput>,
    held: HashSet<Key>,
    look: LookDelta,
    triggers: Vec<ActionTrigger>,
    captured: bool,
    sensitivity: f32,
    disconnected: bool,
}

impl InputAdapter {
    pub fn new(rx: Receiver<RawInput>) -> Self {
        Self {
            rx,
            held: HashSet::new(),
            look: LookDelta::default(),
            triggers: Vec::new(),
            captured: false,
            sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            disconnected: false,
        }
    }

    /// An adapter together with the sender that feeds it.
    pub fn channel() -> (Sender<RawInput>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }

    pub fn with_sensitivity(mut self, radians_per_pixel: f32) -> Self {
        self.sensitivity = radians_per_pixel;
        self
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Fold one event into the current state.
    pub fn apply(&mut self, input: RawInput) {
        match input {
            RawInput::PointerCapture { active } => {
                self.captured = active;
                if !active {
                    // Keys released while uncaptured would never be seen.
                    self.held.clear();
                    self.look = LookDelta::default();
                    self.triggers.clear();
                }
            }
            _ if !self.captured => {}
            RawInput::KeyDown { key } => {
                let newly_pressed = self.held.insert(key);
                if newly_pressed && key == Key::Reload {
                    self.triggers.push(ActionTrigger::Reload);
                }
            }
            RawInput::KeyUp { key } => {
                self.held.remove(&key);
            }
            RawInput::MouseMove { dx, dy } => {
                self.look.yaw += dx * self.sensitivity;
                self.look.pitch += dy * self.sensitivity;
            }
            RawInput::MouseDown {
                button: MouseButton::Primary,
            } => self.triggers.push(ActionTrigger::Fire),
            RawInput::MouseDown { .. } | RawInput::MouseUp { .. } => {}
        }
    }

    fn axis(&self, positive: Key, negative: Key) -> f32 {
        let mut value = 0.0;
        if self.held.contains(&positive) {
            value += 1.0;
        }
        if self.held.contains(&negative) {
            value -= 1.0;
        }
        value
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl ControlSource for InputAdapter {
    fn pump(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        debug!("input channel closed");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
    }

    fn movement_vector(&self) -> MoveAxes {
        MoveAxes::new(
            self.axis(Key::Forward, Key::Backward),
            self.axis(Key::Right, Key::Left),
        )
    }

    fn take_look_delta(&mut self) -> LookDelta {
        std::mem::take(&mut self.look)
    }

    fn is_sprinting(&self) -> bool {
        self.held.contains(&Key::Sprint)
    }

    fn is_jumping(&self) -> bool {
        self.held.contains(&Key::Jump)
    }

    fn is_pointer_capture_active(&self) -> bool {
        self.captured
    }

    fn drain_triggers(&mut self) -> Vec<ActionTrigger> {
        std::mem::take(&mut self.triggers)
    }
}
