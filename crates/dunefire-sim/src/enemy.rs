//! Enemy actor. Lives in an `ActorPool` and is reinitialised, never
//! reconstructed, each time its slot is reused.

use glam::Vec3;

use dunefire_core::constants::DEATH_SEQUENCE_SECS;
use dunefire_core::enums::{Archetype, EnemyMode};
use dunefire_core::state::EnemyView;
use dunefire_core::types::{clamp_to_arena, BoundingSphere};
use dunefire_enemy_ai::fsm::{self, EnemyContext};
use dunefire_enemy_ai::profiles::{get_profile, ArchetypeProfile};

use crate::pool::{PoolHandle, Poolable};
use crate::scheduler::TIME_EPSILON;

/// Acquire arguments for an enemy slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyInit {
    pub position: Vec3,
    pub archetype: Archetype,
    pub death_sequence_secs: f64,
}

/// What a hit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already dead; nothing changed.
    Ignored,
    Wounded,
    /// This hit was lethal.
    Killed,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    handle: PoolHandle,
    archetype: Archetype,
    profile: ArchetypeProfile,
    health: f32,
    alive: bool,
    mode: EnemyMode,
    last_attack_at: Option<f64>,
    position: Vec3,
    velocity: Vec3,
    facing_yaw: f32,
    death_sequence_secs: f64,
    /// Seconds left in the death sequence. Cosmetic only.
    death_timer: f64,
}

impl Enemy {
    /// Overwrite every behaviour-relevant field for a fresh life.
    pub fn reset(&mut self, position: Vec3, archetype: Archetype) {
        self.archetype = archetype;
        self.profile = get_profile(archetype);
        self.health = self.profile.max_health;
        self.alive = true;
        self.mode = EnemyMode::Pursuing;
        self.last_attack_at = None;
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.facing_yaw = 0.0;
        self.death_timer = 0.0;
    }

    /// Run the behaviour FSM and move. Dead enemies only run down the
    /// death timer.
    pub fn advance(&mut self, dt: f32, player_position: Vec3, arena_half_width: f32) {
        if !self.alive {
            self.death_timer = (self.death_timer - dt as f64).max(0.0);
            return;
        }

        let update = fsm::evaluate(&EnemyContext {
            archetype: self.archetype,
            mode: self.mode,
            position: self.position,
            player_position,
        });
        self.mode = update.new_mode;
        self.velocity = update.velocity;
        if let Some(yaw) = update.facing_yaw {
            self.facing_yaw = yaw;
        }
        self.position = clamp_to_arena(self.position + self.velocity * dt, arena_half_width);
    }

    /// True at most once per attack cooldown while attacking. A true
    /// result restarts the cooldown.
    pub fn can_attack(&mut self, now: f64) -> bool {
        if !self.alive || self.mode != EnemyMode::Attacking {
            return false;
        }
        let ready = match self.last_attack_at {
            Some(last) => now - last + TIME_EPSILON >= self.profile.attack_cooldown_secs,
            None => true,
        };
        if ready {
            self.last_attack_at = Some(now);
        }
        ready
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health > 0.0 {
            return DamageOutcome::Wounded;
        }
        self.alive = false;
        self.mode = EnemyMode::Dead;
        self.velocity = Vec3::ZERO;
        self.death_timer = self.death_sequence_secs;
        DamageOutcome::Killed
    }

    /// Upper-body hit sphere.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let center_height = (self.profile.body_height - self.profile.hit_radius).max(0.0);
        BoundingSphere::new(
            self.position + Vec3::Y * center_height,
            self.profile.hit_radius,
        )
    }

    pub fn handle(&self) -> PoolHandle {
        self.handle
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn profile(&self) -> &ArchetypeProfile {
        &self.profile
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn mode(&self) -> EnemyMode {
        self.mode
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn facing_yaw(&self) -> f32 {
        self.facing_yaw
    }

    pub fn last_attack_at(&self) -> Option<f64> {
        self.last_attack_at
    }

    pub fn death_timer(&self) -> f64 {
        self.death_timer
    }

    /// A live enemy at the origin, outside any pool.
    #[cfg(test)]
    pub(crate) fn spawned_at_origin(archetype: Archetype) -> Self {
        let mut enemy = Self::blank();
        enemy.reinit(
            PoolHandle { slot: 0, life: 1 },
            EnemyInit {
                position: Vec3::ZERO,
                archetype,
                death_sequence_secs: DEATH_SEQUENCE_SECS,
            },
        );
        enemy
    }

    pub fn view(&self) -> EnemyView {
        let death_progress = match (self.alive, self.death_sequence_secs > 0.0) {
            (true, _) => 0.0,
            (false, false) => 1.0,
            (false, true) => (1.0 - self.death_timer / self.death_sequence_secs) as f32,
        };
        EnemyView {
            slot: self.handle.slot,
            archetype: self.archetype,
            mode: self.mode,
            position: self.position,
            facing_yaw: self.facing_yaw,
            health: self.health,
            max_health: self.profile.max_health,
            death_progress,
        }
    }
}

impl Poolable for Enemy {
    type Init = EnemyInit;

    fn blank() -> Self {
        let profile = get_profile(Archetype::Base);
        Self {
            handle: PoolHandle { slot: 0, life: 0 },
            archetype: Archetype::Base,
            profile,
            health: profile.max_health,
            alive: false,
            mode: EnemyMode::Dead,
            last_attack_at: None,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            facing_yaw: 0.0,
            death_sequence_secs: DEATH_SEQUENCE_SECS,
            death_timer: 0.0,
        }
    }

    fn reinit(&mut self, handle: PoolHandle, init: EnemyInit) {
        self.handle = handle;
        self.death_sequence_secs = init.death_sequence_secs;
        self.reset(init.position, init.archetype);
    }
}
