//! Procedural arena layout: the default `ArenaWorld`.
//!
//! Places the crashed aircraft's spawn points in a ring around the wreck,
//! the bonus area (entry + item) in a far corner, and scatters landmines
//! with a seeded RNG so the same seed always yields the same arena.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use dunefire_core::components::HazardSite;
use dunefire_core::constants::*;
use dunefire_core::types::{clamp_to_arena, planar_distance};

use crate::collaborators::ArenaWorld;

/// Margin kept between mines and the arena wall.
const WALL_MARGIN: f32 = 2.0;
/// Placement attempts per requested mine before giving up on it.
const ATTEMPTS_PER_MINE: usize = 32;

#[derive(Debug, Clone)]
pub struct ArenaLayout {
    seed: u64,
    rng: ChaCha8Rng,
    half_width: f32,
    player_spawn: Vec3,
    spawn_points: Vec<Vec3>,
    bonus_entry: Vec3,
    bonus_home: Vec3,
    bonus_item: Option<Vec3>,
    gate_open: bool,
}

impl ArenaLayout {
    pub fn new(seed: u64, half_width: f32, player_spawn: Vec3) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let spawn_points = wreck_spawn_points(&mut rng, half_width);
        let bonus_home = clamp_to_arena(Vec3::from_array(BONUS_ITEM_POSITION), half_width);
        Self {
            seed,
            rng,
            half_width,
            player_spawn,
            spawn_points,
            bonus_entry: clamp_to_arena(Vec3::from_array(BONUS_AREA_ENTRY), half_width),
            bonus_home,
            bonus_item: Some(bonus_home),
            gate_open: false,
        }
    }

    /// Nothing may be placed within `LANDMINE_CLEARANCE` of these.
    fn keep_clear(&self) -> impl Iterator<Item = Vec3> + '_ {
        [self.player_spawn, self.bonus_home, self.bonus_entry]
            .into_iter()
            .chain(self.spawn_points.iter().copied())
    }
}

/// Evenly spaced ring around the wreck with a little angular jitter.
fn wreck_spawn_points(rng: &mut ChaCha8Rng, half_width: f32) -> Vec<Vec3> {
    let center = Vec3::from_array(WRECK_CENTER);
    let step = TAU / WRECK_SPAWN_POINTS as f32;
    (0..WRECK_SPAWN_POINTS)
        .map(|i| {
            let angle = step * i as f32 + rng.gen_range(-0.2..0.2) * step;
            let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * WRECK_SPAWN_RADIUS;
            clamp_to_arena(center + offset, half_width)
        })
        .collect()
}

impl ArenaWorld for ArenaLayout {
    fn spawn_points(&self) -> &[Vec3] {
        &self.spawn_points
    }

    fn bonus_area_entry(&self) -> Vec3 {
        self.bonus_entry
    }

    fn bonus_item_position(&self) -> Option<Vec3> {
        self.bonus_item
    }

    fn open_access_gate(&mut self) {
        self.gate_open = true;
    }

    fn close_access_gate(&mut self) {
        self.gate_open = false;
    }

    fn is_gate_open(&self) -> bool {
        self.gate_open
    }

    fn remove_bonus_item(&mut self) {
        self.bonus_item = None;
    }

    fn restore_bonus_item(&mut self) {
        self.bonus_item = Some(self.bonus_home);
    }

    /// Rebuild from the original seed; mine placement restarts too.
    fn reset(&mut self) {
        *self = Self::new(self.seed, self.half_width, self.player_spawn);
    }

    /// Rejection-sampled mine positions. May return fewer than `count`
    /// when the arena is too crowded.
    fn hazard_sites(&mut self, count: usize) -> Vec<HazardSite> {
        let extent = (self.half_width - WALL_MARGIN).max(0.0);
        let mut sites: Vec<HazardSite> = Vec::with_capacity(count);
        for _ in 0..count * ATTEMPTS_PER_MINE {
            if sites.len() == count || extent == 0.0 {
                break;
            }
            let candidate = Vec3::new(
                self.rng.gen_range(-extent..=extent),
                GROUND_LEVEL,
                self.rng.gen_range(-extent..=extent),
            );
            let crowded = self
                .keep_clear()
                .chain(sites.iter().map(|s| s.position))
                .any(|p| planar_distance(p, candidate) < LANDMINE_CLEARANCE);
            if !crowded {
                sites.push(HazardSite {
                    position: candidate,
                    trigger_radius: LANDMINE_RADIUS,
                    damage: LANDMINE_DAMAGE,
                });
            }
        }
        sites
    }
}
