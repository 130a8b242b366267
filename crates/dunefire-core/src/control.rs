//! Player control input.
//!
//! Raw device events are translated by the input adapter into an abstract
//! per-frame `ControlVector` plus discrete `ActionTrigger` edges. The
//! simulation never sees keys or pixels.

use serde::{Deserialize, Serialize};

/// Planar movement intent, each axis in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveAxes {
    pub forward: f32,
    pub right: f32,
}

impl MoveAxes {
    pub fn new(forward: f32, right: f32) -> Self {
        Self {
            forward: forward.clamp(-1.0, 1.0),
            right: right.clamp(-1.0, 1.0),
        }
    }
}

/// Look change accumulated since the previous tick (radians).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LookDelta {
    pub yaw: f32,
    pub pitch: f32,
}

/// Everything the player controller needs for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlVector {
    pub forward_axis: f32,
    pub right_axis: f32,
    pub sprint: bool,
    pub jump: bool,
    pub look_delta_yaw: f32,
    pub look_delta_pitch: f32,
}

impl ControlVector {
    pub fn new(axes: MoveAxes, look: LookDelta, sprint: bool, jump: bool) -> Self {
        Self {
            forward_axis: axes.forward,
            right_axis: axes.right,
            sprint,
            jump,
            look_delta_yaw: look.yaw,
            look_delta_pitch: look.pitch,
        }
    }
}

/// Discrete action edges raised by the input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionTrigger {
    Fire,
    Reload,
}

/// Keys the adapter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Sprint,
    Jump,
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Primary,
    Secondary,
}

/// Device-level input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawInput {
    KeyDown { key: Key },
    KeyUp { key: Key },
    /// Pointer movement in pixels.
    MouseMove { dx: f32, dy: f32 },
    MouseDown { button: MouseButton },
    MouseUp { button: MouseButton },
    /// Pointer lock gained or lost.
    PointerCapture { active: bool },
}
