//! Hit-scan weapon: magazine, reserve, fire-rate gate, timed reload and a
//! cosmetic recoil value.
//!
//! The weapon only produces rays. Resolving what a ray hits is the job of
//! a `SpatialQuery`; completing a reload is a deferred action the session
//! schedules from the returned `ReloadTicket`.

use glam::Vec3;

use dunefire_core::config::WeaponTuning;
use dunefire_core::constants::{RECOIL_DECAY_RATE, RECOIL_MAX};
use dunefire_core::state::WeaponView;
use dunefire_core::types::HitScan;

use crate::scheduler::TIME_EPSILON;

/// A reload that has begun and must be finished after `duration_secs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReloadTicket {
    pub started_at: f64,
    pub duration_secs: f64,
}

#[derive(Debug, Clone)]
pub struct Weapon {
    tuning: WeaponTuning,
    ammo: u32,
    reserve: u32,
    reloading: bool,
    last_fire_at: Option<f64>,
    recoil: f32,
    shots_fired: u32,
}

impl Weapon {
    pub fn new(tuning: WeaponTuning) -> Self {
        Self {
            ammo: tuning.magazine,
            reserve: tuning.reserve,
            tuning,
            reloading: false,
            last_fire_at: None,
            recoil: 0.0,
            shots_fired: 0,
        }
    }

    /// Full magazine and starting reserve, no reload in progress.
    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }

    /// Fire if not reloading, the magazine is not empty and the fire
    /// interval has elapsed since the previous shot.
    pub fn try_fire(&mut self, now: f64, origin: Vec3, direction: Vec3) -> Option<HitScan> {
        if !self.can_fire(now) {
            return None;
        }
        self.ammo -= 1;
        self.last_fire_at = Some(now);
        self.recoil = RECOIL_MAX;
        self.shots_fired += 1;
        Some(HitScan::new(origin, direction))
    }

    pub fn can_fire(&self, now: f64) -> bool {
        if self.reloading || self.ammo == 0 {
            return false;
        }
        match self.last_fire_at {
            Some(last) => now - last + TIME_EPSILON >= self.tuning.fire_interval_secs,
            None => true,
        }
    }

    /// Begin a reload. No-op while reloading, with a full magazine or with
    /// nothing in reserve.
    pub fn try_reload(&mut self, now: f64) -> Option<ReloadTicket> {
        if self.reloading || self.ammo >= self.tuning.magazine || self.reserve == 0 {
            return None;
        }
        self.reloading = true;
        Some(ReloadTicket {
            started_at: now,
            duration_secs: self.tuning.reload_secs,
        })
    }

    /// Move `min(magazine - ammo, reserve)` rounds into the magazine.
    /// Returns false if no reload was in progress.
    pub fn finish_reload(&mut self) -> bool {
        if !self.reloading {
            return false;
        }
        let moved = (self.tuning.magazine - self.ammo).min(self.reserve);
        self.ammo += moved;
        self.reserve -= moved;
        self.reloading = false;
        true
    }

    /// Abandon a reload in progress without moving any rounds.
    pub fn cancel_reload(&mut self) -> bool {
        std::mem::replace(&mut self.reloading, false)
    }

    /// Linear recoil recovery.
    pub fn advance(&mut self, dt: f32) {
        self.recoil = (self.recoil - RECOIL_DECAY_RATE * dt).max(0.0);
    }

    /// Empty magazine that should start reloading on its own.
    pub fn wants_auto_reload(&self) -> bool {
        self.tuning.auto_reload && self.ammo == 0 && !self.reloading && self.reserve > 0
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn reserve(&self) -> u32 {
        self.reserve
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn recoil(&self) -> f32 {
        self.recoil
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    pub fn damage(&self) -> f32 {
        self.tuning.damage
    }

    pub fn range(&self) -> f32 {
        self.tuning.range
    }

    pub fn view(&self) -> WeaponView {
        WeaponView {
            ammo: self.ammo,
            magazine: self.tuning.magazine,
            reserve: self.reserve,
            reloading: self.reloading,
            recoil: self.recoil,
        }
    }

    /// Force magazine and reserve contents. Test setup only.
    #[cfg(test)]
    pub(crate) fn set_rounds(&mut self, ammo: u32, reserve: u32) {
        self.ammo = ammo.min(self.tuning.magazine);
        self.reserve = reserve;
    }
}
