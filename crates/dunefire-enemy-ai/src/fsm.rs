//! Enemy behaviour finite state machine.
//!
//! Pure function that computes mode transitions and pursuit velocity for
//! one enemy from its archetype, current mode and the player's position.
//! Operates on plain data; attack timing and health live on the actor.

use glam::Vec3;

use dunefire_core::enums::{Archetype, EnemyMode};
use dunefire_core::types::{planar_distance, yaw_toward};

use crate::profiles::get_profile;

/// Input to the enemy FSM for a single actor.
pub struct EnemyContext {
    pub archetype: Archetype,
    pub mode: EnemyMode,
    pub position: Vec3,
    pub player_position: Vec3,
}

/// Output from the enemy FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyUpdate {
    pub new_mode: EnemyMode,
    /// Planar velocity for this tick. Zero while attacking or dead.
    pub velocity: Vec3,
    /// New facing, set only while pursuing.
    pub facing_yaw: Option<f32>,
    pub mode_changed: bool,
}

/// Evaluate the FSM for one enemy.
pub fn evaluate(ctx: &EnemyContext) -> EnemyUpdate {
    // Terminal state: no transitions, no movement.
    if ctx.mode == EnemyMode::Dead {
        return EnemyUpdate {
            new_mode: EnemyMode::Dead,
            velocity: Vec3::ZERO,
            facing_yaw: None,
            mode_changed: false,
        };
    }

    let profile = get_profile(ctx.archetype);
    let distance = planar_distance(ctx.position, ctx.player_position);

    let new_mode = if distance <= profile.attack_range {
        EnemyMode::Attacking
    } else {
        EnemyMode::Pursuing
    };

    let (velocity, facing_yaw) = match new_mode {
        EnemyMode::Pursuing => (
            pursuit_velocity(ctx.position, ctx.player_position, profile.speed),
            Some(yaw_toward(ctx.position, ctx.player_position)),
        ),
        _ => (Vec3::ZERO, None),
    };

    EnemyUpdate {
        new_mode,
        velocity,
        facing_yaw,
        mode_changed: new_mode != ctx.mode,
    }
}

/// Straight-line planar velocity toward the target.
fn pursuit_velocity(from: Vec3, to: Vec3, speed: f32) -> Vec3 {
    let dir = (to - from).with_y(0.0);
    if dir.length_squared() < 1e-8 {
        return Vec3::ZERO;
    }
    dir.normalize() * speed
}
