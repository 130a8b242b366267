//! Landmine registry. Each mine fires once and stays spent until the
//! level is rebuilt or the registry is reset.

use glam::Vec3;

use dunefire_core::components::{Hazard, HazardSite};
use dunefire_core::state::HazardView;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardHit {
    /// Registration index of the mine that went off.
    pub index: usize,
    pub damage: f32,
}

#[derive(Debug, Clone, Default)]
pub struct HazardRegistry {
    hazards: Vec<Hazard>,
}

impl HazardRegistry {
    pub fn new(sites: impl IntoIterator<Item = HazardSite>) -> Self {
        Self {
            hazards: sites.into_iter().map(Hazard::from).collect(),
        }
    }

    /// Add an armed hazard. Returns its index.
    pub fn register(&mut self, hazard: Hazard) -> usize {
        self.hazards.push(hazard);
        self.hazards.len() - 1
    }

    /// Replace every hazard with a fresh, armed set.
    pub fn rebuild(&mut self, sites: impl IntoIterator<Item = HazardSite>) {
        self.hazards.clear();
        self.hazards.extend(sites.into_iter().map(Hazard::from));
    }

    /// Re-arm every hazard in place.
    pub fn reset(&mut self) {
        for hazard in &mut self.hazards {
            hazard.triggered = false;
        }
    }

    /// Damage from the first armed hazard (in registration order) whose
    /// radius strictly contains `position`, or 0.
    pub fn check_collision(&mut self, position: Vec3) -> f32 {
        self.trigger_at(position).map_or(0.0, |hit| hit.damage)
    }

    /// Like `check_collision`, but reports which hazard fired.
    pub fn trigger_at(&mut self, position: Vec3) -> Option<HazardHit> {
        let (index, hazard) = self
            .hazards
            .iter_mut()
            .enumerate()
            .find(|(_, h)| !h.triggered && h.position.distance(position) < h.trigger_radius)?;
        hazard.triggered = true;
        Some(HazardHit {
            index,
            damage: hazard.damage,
        })
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn armed_count(&self) -> usize {
        self.hazards.iter().filter(|h| !h.triggered).count()
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    pub fn views(&self) -> Vec<HazardView> {
        self.hazards
            .iter()
            .map(|h| HazardView {
                position: h.position,
                triggered: h.triggered,
            })
            .collect()
    }
}
