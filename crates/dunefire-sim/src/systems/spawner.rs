//! Spawn cadence: decides when the next enemy emerges from the wreck.
//!
//! A spawn is scheduled `spawn_delay_secs` ahead (the emergence delay) and
//! only counts as issued once the deferred action actually acquires an
//! enemy. Quota levels stop once issued + pending reaches the quota;
//! survival levels keep going.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use dunefire_core::config::{ArchetypeWeight, LevelConfig};
use dunefire_core::enums::Archetype;

use crate::scheduler::{DeferredAction, DelayQueue, TIME_EPSILON};

#[derive(Debug, Clone, Default)]
pub struct SpawnDirector {
    /// Enemies that have emerged this level.
    issued: u32,
    /// Spawns scheduled but not yet emerged.
    pending: u32,
    next_spawn_at: f64,
}

impl SpawnDirector {
    /// Start a level's cadence; the first spawn is scheduled at `now`.
    pub fn reset(&mut self, now: f64) {
        self.issued = 0;
        self.pending = 0;
        self.next_spawn_at = now;
    }

    pub fn issued(&self) -> u32 {
        self.issued
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// A scheduled spawn fired. `emerged` is false when the pool refused.
    pub fn on_spawn_resolved(&mut self, emerged: bool) {
        self.pending = self.pending.saturating_sub(1);
        if emerged {
            self.issued += 1;
        }
    }

    /// Quota not yet fully issued (always true for survival levels).
    pub fn quota_open(&self, level: &LevelConfig) -> bool {
        match level.quota_total() {
            Some(quota) => self.issued + self.pending < quota,
            None => true,
        }
    }

    /// Schedule the next spawn if the cadence, quota and alive cap allow.
    pub fn run(
        &mut self,
        now: f64,
        level: &LevelConfig,
        alive: u32,
        spawn_point_count: usize,
        rng: &mut ChaCha8Rng,
        scheduler: &mut DelayQueue,
    ) -> Option<DeferredAction> {
        if spawn_point_count == 0 || !self.quota_open(level) {
            return None;
        }
        if alive + self.pending >= level.max_alive {
            return None;
        }
        if now + TIME_EPSILON < self.next_spawn_at {
            return None;
        }

        let action = DeferredAction::SpawnEnemy {
            archetype: choose_archetype(&level.archetype_mix, rng),
            point: rng.gen_range(0..spawn_point_count),
        };
        scheduler.schedule(now, level.spawn_delay_secs, action);
        self.pending += 1;
        self.next_spawn_at = now + level.spawn_interval_secs;
        Some(action)
    }
}

/// Weighted pick from a level's archetype mix.
pub fn choose_archetype(mix: &[ArchetypeWeight], rng: &mut ChaCha8Rng) -> Archetype {
    match WeightedIndex::new(mix.iter().map(|w| w.weight)) {
        Ok(dist) => mix[dist.sample(rng)].archetype,
        Err(err) => {
            warn!(%err, "unusable archetype mix, falling back to Base");
            Archetype::Base
        }
    }
}
