//! Plain data records shared between the simulation and its views.
//!
//! Behaviour lives in `dunefire-sim`; these carry no logic.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A landmine or other proximity trap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub position: Vec3,
    pub trigger_radius: f32,
    pub damage: f32,
    /// Flips to true on first trigger and stays set until a level/game reset.
    pub triggered: bool,
}

/// Where a hazard goes and what it does, as supplied by the arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardSite {
    pub position: Vec3,
    pub trigger_radius: f32,
    pub damage: f32,
}

impl From<HazardSite> for Hazard {
    fn from(site: HazardSite) -> Self {
        Self {
            position: site.position,
            trigger_radius: site.trigger_radius,
            damage: site.damage,
            triggered: false,
        }
    }
}
