//! Archetype-specific stat profiles.
//!
//! Every archetype-dependent number lives here, so adding an archetype is a
//! compile error until its profile exists.

use dunefire_core::enums::Archetype;

/// Fixed stat bundle for an enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    pub max_health: f32,
    /// Pursuit speed (m/s).
    pub speed: f32,
    /// Damage per successful attack on the player.
    pub contact_damage: f32,
    /// Planar distance at which the enemy stops and attacks (m).
    pub attack_range: f32,
    /// Minimum time between two attacks (s).
    pub attack_cooldown_secs: f64,
    /// Points awarded for the kill.
    pub score_value: u32,
    /// Radius of the hit-scan bounding sphere (m).
    pub hit_radius: f32,
    /// Height of the body. The hit sphere's top touches it, so its centre
    /// is at `body_height - hit_radius`.
    pub body_height: f32,
}

/// Get the stat profile for a given archetype.
pub fn get_profile(archetype: Archetype) -> ArchetypeProfile {
    match archetype {
        Archetype::Base => ArchetypeProfile {
            max_health: 50.0,
            speed: 3.0,
            contact_damage: 10.0,
            attack_range: 2.0,
            attack_cooldown_secs: 1.0,
            score_value: 100,
            hit_radius: 0.6,
            body_height: 1.8,
        },
        Archetype::Fast => ArchetypeProfile {
            max_health: 30.0,
            speed: 5.5,
            contact_damage: 6.0,
            attack_range: 1.8,
            attack_cooldown_secs: 0.6,
            score_value: 150,
            hit_radius: 0.5,
            body_height: 1.6,
        },
        Archetype::Slow => ArchetypeProfile {
            max_health: 150.0,
            speed: 1.8,
            contact_damage: 25.0,
            attack_range: 2.5,
            attack_cooldown_secs: 1.8,
            score_value: 250,
            hit_radius: 0.9,
            body_height: 2.2,
        },
        Archetype::Boss => ArchetypeProfile {
            max_health: 600.0,
            speed: 2.4,
            contact_damage: 40.0,
            attack_range: 3.5,
            attack_cooldown_secs: 2.0,
            score_value: 1000,
            hit_radius: 1.4,
            body_height: 3.2,
        },
    }
}
