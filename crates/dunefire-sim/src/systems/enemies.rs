//! Enemy movement and melee against the player.

use glam::Vec3;

use dunefire_core::enums::Archetype;

use crate::enemy::Enemy;
use crate::pool::ActorPool;

/// One landed enemy strike, before the player's damage cooldown applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attack {
    pub archetype: Archetype,
    pub damage: f32,
}

/// Advance every pooled enemy and collect attacks. `can_attack` is asked
/// exactly once per live enemy per tick.
pub fn run(
    enemies: &mut ActorPool<Enemy>,
    player_position: Vec3,
    dt: f32,
    now: f64,
    arena_half_width: f32,
) -> Vec<Attack> {
    let mut attacks = Vec::new();
    for (_, enemy) in enemies.iter_in_use_mut() {
        enemy.advance(dt, player_position, arena_half_width);
        if enemy.can_attack(now) {
            attacks.push(Attack {
                archetype: enemy.archetype(),
                damage: enemy.profile().contact_damage,
            });
        }
    }
    attacks
}

/// Live enemies (dying ones excluded).
pub fn alive_count(enemies: &ActorPool<Enemy>) -> u32 {
    enemies
        .iter_in_use()
        .filter(|(_, enemy)| enemy.is_alive())
        .count() as u32
}
