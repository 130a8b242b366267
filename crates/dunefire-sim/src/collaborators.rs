//! Interfaces to the world outside the simulation core.
//!
//! The session drives a scene (`ArenaWorld`), reads player intent
//! (`ControlSource`) and reports to a HUD (`Hud`). None of them can reach
//! back into session state; the renderer reads `SessionSnapshot`s instead.

use glam::Vec3;

use dunefire_core::components::HazardSite;
use dunefire_core::control::{ActionTrigger, LookDelta, MoveAxes};
use dunefire_core::events::HudNotice;

/// The arena scene: spawn points, the bonus area and its access gate, the
/// bonus item and where traps go.
pub trait ArenaWorld {
    /// Where enemies emerge. Never empty.
    fn spawn_points(&self) -> &[Vec3];
    fn bonus_area_entry(&self) -> Vec3;
    /// `None` once the item has been removed.
    fn bonus_item_position(&self) -> Option<Vec3>;
    fn open_access_gate(&mut self);
    fn close_access_gate(&mut self);
    fn is_gate_open(&self) -> bool;
    fn remove_bonus_item(&mut self);
    /// Put the bonus item back for a new level.
    fn restore_bonus_item(&mut self);
    /// Trap placements for a level.
    fn hazard_sites(&mut self, count: usize) -> Vec<HazardSite>;
    /// Return to the state the world was built in, so a restarted session
    /// sees the same layout as the first one.
    fn reset(&mut self) {}
}

/// Player intent for the current tick.
pub trait ControlSource {
    /// Pull pending device input. Called once at the top of each tick.
    fn pump(&mut self) {}
    fn movement_vector(&self) -> MoveAxes;
    /// Look delta accumulated since the last call, in radians. Resets.
    fn take_look_delta(&mut self) -> LookDelta;
    fn is_sprinting(&self) -> bool;
    fn is_jumping(&self) -> bool;
    /// Movement, look and triggers only count while this is true.
    fn is_pointer_capture_active(&self) -> bool;
    /// Fire/reload presses since the last call, oldest first.
    fn drain_triggers(&mut self) -> Vec<ActionTrigger>;
}

/// Write-only sink for HUD updates.
pub trait Hud {
    fn notify(&mut self, notice: HudNotice);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHud;

impl Hud for NullHud {
    fn notify(&mut self, _notice: HudNotice) {}
}

/// A player who never touches the controls.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleControls;

impl ControlSource for IdleControls {
    fn movement_vector(&self) -> MoveAxes {
        MoveAxes::default()
    }

    fn take_look_delta(&mut self) -> LookDelta {
        LookDelta::default()
    }

    fn is_sprinting(&self) -> bool {
        false
    }

    fn is_jumping(&self) -> bool {
        false
    }

    fn is_pointer_capture_active(&self) -> bool {
        false
    }

    fn drain_triggers(&mut self) -> Vec<ActionTrigger> {
        Vec::new()
    }
}
