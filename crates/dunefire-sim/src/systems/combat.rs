//! Hit-scan resolution: weapon ray against live enemy hit spheres.

use dunefire_core::types::HitScan;

use crate::enemy::{DamageOutcome, Enemy};
use crate::pool::ActorPool;
use crate::spatial::{HitTarget, RayHit, SpatialQuery};

/// Hit spheres of every live enemy. Dying enemies are not targets.
pub fn hit_targets(enemies: &ActorPool<Enemy>) -> Vec<HitTarget> {
    enemies
        .iter_in_use()
        .filter(|(_, enemy)| enemy.is_alive())
        .map(|(handle, enemy)| HitTarget {
            handle,
            sphere: enemy.bounding_sphere(),
        })
        .collect()
}

/// Find the nearest live enemy on the ray and apply `damage` to it.
pub fn resolve_shot(
    ray: &HitScan,
    damage: f32,
    enemies: &mut ActorPool<Enemy>,
    query: &dyn SpatialQuery,
) -> Option<(RayHit, DamageOutcome)> {
    let targets = hit_targets(enemies);
    let hit = query.nearest_hit(ray, &targets)?;
    let enemy = enemies.get_mut(hit.handle)?;
    Some((hit, enemy.take_damage(damage)))
}
