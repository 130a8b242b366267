//! First-person player controller: look, walk/sprint, jump, gravity,
//! ground and arena clamping, damage with an invulnerability window.

use glam::Vec3;

use dunefire_core::config::PlayerTuning;
use dunefire_core::constants::{GROUND_LEVEL, PITCH_EPSILON};
use dunefire_core::control::ControlVector;
use dunefire_core::state::PlayerView;
use dunefire_core::types::{clamp_to_arena, forward_from_yaw, right_from_yaw};

use crate::scheduler::TIME_EPSILON;

#[derive(Debug, Clone)]
pub struct PlayerController {
    tuning: PlayerTuning,
    arena_half_width: f32,
    position: Vec3,
    velocity: Vec3,
    /// Radians; 0 faces -Z, positive turns left.
    yaw: f32,
    /// Radians; positive looks up.
    pitch: f32,
    health: f32,
    alive: bool,
    last_damage_at: Option<f64>,
    grounded: bool,
}

impl PlayerController {
    pub fn new(tuning: PlayerTuning, arena_half_width: f32) -> Self {
        let mut player = Self {
            tuning,
            arena_half_width,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            health: 0.0,
            alive: false,
            last_damage_at: None,
            grounded: true,
        };
        player.reset();
        player
    }

    /// Back to the spawn point at full health.
    pub fn reset(&mut self) {
        self.position = clamp_to_arena(self.tuning.spawn, self.arena_half_width);
        self.position.y = self.position.y.max(GROUND_LEVEL);
        self.velocity = Vec3::ZERO;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.health = self.tuning.max_health;
        self.alive = true;
        self.last_damage_at = None;
        self.grounded = self.position.y <= GROUND_LEVEL;
    }

    /// One frame of movement. Does nothing once dead.
    pub fn advance(&mut self, dt: f32, control: &ControlVector) {
        if !self.alive {
            return;
        }

        let pitch_limit = std::f32::consts::FRAC_PI_2 - PITCH_EPSILON;
        self.yaw -= control.look_delta_yaw;
        self.pitch = (self.pitch - control.look_delta_pitch).clamp(-pitch_limit, pitch_limit);

        // Horizontal velocity is set outright each frame; no acceleration.
        let wish = forward_from_yaw(self.yaw) * control.forward_axis
            + right_from_yaw(self.yaw) * control.right_axis;
        let direction = wish.normalize_or_zero();
        let speed = if control.sprint {
            self.tuning.sprint_speed
        } else {
            self.tuning.walk_speed
        };
        self.velocity.x = direction.x * speed;
        self.velocity.z = direction.z * speed;

        if control.jump && self.grounded {
            self.velocity.y = self.tuning.jump_speed;
            self.grounded = false;
        }
        if !self.grounded {
            self.velocity.y -= self.tuning.gravity * dt;
        }

        self.position += self.velocity * dt;

        if self.position.y <= GROUND_LEVEL {
            self.position.y = GROUND_LEVEL;
            self.velocity.y = self.velocity.y.max(0.0);
            self.grounded = true;
        }
        self.position = clamp_to_arena(self.position, self.arena_half_width);
    }

    /// Apply damage unless dead or still inside the cooldown window since
    /// the last accepted hit. Returns whether health changed.
    pub fn take_damage(&mut self, amount: f32, now: f64) -> bool {
        if !self.alive || amount <= 0.0 {
            return false;
        }
        if let Some(last) = self.last_damage_at {
            if now - last + TIME_EPSILON < self.tuning.damage_cooldown_secs {
                return false;
            }
        }
        self.health = (self.health - amount).max(0.0);
        self.last_damage_at = Some(now);
        if self.health == 0.0 {
            self.alive = false;
        }
        true
    }

    /// Restore health up to the maximum. Returns the amount actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive || amount <= 0.0 {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.tuning.max_health);
        self.health - before
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.tuning.eye_height
    }

    /// Unit view direction from yaw and pitch.
    pub fn aim_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.tuning.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            position: self.position,
            velocity: self.velocity,
            yaw: self.yaw,
            pitch: self.pitch,
            health: self.health,
            max_health: self.tuning.max_health,
            alive: self.alive,
            grounded: self.grounded,
        }
    }
}
