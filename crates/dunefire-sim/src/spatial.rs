//! Ray queries against enemy hit spheres.
//!
//! The weapon never sees enemies: the session collects a `HitTarget` per
//! live enemy and asks a `SpatialQuery` for the nearest one along the ray.

use std::collections::HashMap;

use glam::Vec3;

use dunefire_core::types::{BoundingSphere, HitScan};

use crate::pool::PoolHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTarget {
    pub handle: PoolHandle,
    pub sphere: BoundingSphere,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub handle: PoolHandle,
    /// Distance from the ray origin to the entry point.
    pub distance: f32,
    pub point: Vec3,
}

pub trait SpatialQuery {
    /// Closest target the ray enters within range.
    fn nearest_hit(&self, ray: &HitScan, targets: &[HitTarget]) -> Option<RayHit>;
}

/// Tests every target. Ties go to the target listed first.
#[derive(Debug, Clone, Copy)]
pub struct BruteForceQuery {
    pub max_range: f32,
}

impl BruteForceQuery {
    pub fn new(max_range: f32) -> Self {
        Self { max_range }
    }
}

impl SpatialQuery for BruteForceQuery {
    fn nearest_hit(&self, ray: &HitScan, targets: &[HitTarget]) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for target in targets {
            consider(ray, target, self.max_range, &mut best);
        }
        best
    }
}

/// Bins targets into square planar cells and walks only the cells the ray
/// crosses, nearest first, stopping once a hit is closer than the next
/// cell boundary.
#[derive(Debug, Clone, Copy)]
pub struct UniformGridQuery {
    pub cell_size: f32,
    pub max_range: f32,
}

type Cell = (i32, i32);

impl UniformGridQuery {
    pub fn new(cell_size: f32, max_range: f32) -> Self {
        Self {
            cell_size: cell_size.max(0.1),
            max_range,
        }
    }

    fn cell_of(&self, x: f32, z: f32) -> Cell {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }

    /// Every cell a target's sphere overlaps (planar bounding box), plus
    /// the bounds of all occupied cells.
    fn bin(&self, targets: &[HitTarget]) -> (HashMap<Cell, Vec<usize>>, CellBounds) {
        let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
        let mut bounds = CellBounds::EMPTY;
        for (index, target) in targets.iter().enumerate() {
            let c = target.sphere.center;
            let r = target.sphere.radius;
            let (min_x, min_z) = self.cell_of(c.x - r, c.z - r);
            let (max_x, max_z) = self.cell_of(c.x + r, c.z + r);
            bounds.include(min_x, min_z);
            bounds.include(max_x, max_z);
            for cx in min_x..=max_x {
                for cz in min_z..=max_z {
                    grid.entry((cx, cz)).or_default().push(index);
                }
            }
        }
        (grid, bounds)
    }
}

/// Inclusive cell rectangle covering every binned target.
#[derive(Debug, Clone, Copy)]
struct CellBounds {
    min: Cell,
    max: Cell,
}

impl CellBounds {
    const EMPTY: Self = Self {
        min: (i32::MAX, i32::MAX),
        max: (i32::MIN, i32::MIN),
    };

    fn include(&mut self, x: i32, z: i32) {
        self.min = (self.min.0.min(x), self.min.1.min(z));
        self.max = (self.max.0.max(x), self.max.1.max(z));
    }

    /// True once the walk is outside the rectangle and moving away from
    /// it on some axis. It can never reach an occupied cell again.
    fn left_behind(&self, cell: Cell, step: (i32, i32)) -> bool {
        let gone =
            |c: i32, step: i32, lo: i32, hi: i32| (c > hi && step >= 0) || (c < lo && step <= 0);
        gone(cell.0, step.0, self.min.0, self.max.0)
            || gone(cell.1, step.1, self.min.1, self.max.1)
    }
}

impl SpatialQuery for UniformGridQuery {
    fn nearest_hit(&self, ray: &HitScan, targets: &[HitTarget]) -> Option<RayHit> {
        if targets.is_empty() {
            return None;
        }
        let (grid, bounds) = self.bin(targets);
        let mut tested = vec![false; targets.len()];
        let mut untested = targets.len();
        let mut best: Option<RayHit> = None;

        let origin = ray.origin;
        let dir = ray.direction;
        let (mut cx, mut cz) = self.cell_of(origin.x, origin.z);

        // Amanatides-Woo traversal over the planar projection. The ray
        // direction is unit length, so t is distance along the 3D ray.
        let axis = |o: f32, d: f32, cell: i32| -> (i32, f32, f32) {
            if d > 0.0 {
                let boundary = (cell + 1) as f32 * self.cell_size;
                (1, (boundary - o) / d, self.cell_size / d)
            } else if d < 0.0 {
                let boundary = cell as f32 * self.cell_size;
                (-1, (boundary - o) / d, -self.cell_size / d)
            } else {
                (0, f32::INFINITY, f32::INFINITY)
            }
        };
        let (step_x, mut next_x, delta_x) = axis(origin.x, dir.x, cx);
        let (step_z, mut next_z, delta_z) = axis(origin.z, dir.z, cz);

        loop {
            if bounds.left_behind((cx, cz), (step_x, step_z)) {
                break;
            }
            if let Some(indices) = grid.get(&(cx, cz)) {
                // Ascending index order keeps ties going to the first target.
                let mut candidates: Vec<usize> =
                    indices.iter().copied().filter(|&i| !tested[i]).collect();
                candidates.sort_unstable();
                for index in candidates {
                    tested[index] = true;
                    untested -= 1;
                    consider(ray, &targets[index], self.max_range, &mut best);
                }
            }
            if untested == 0 {
                break;
            }

            let t_exit = next_x.min(next_z);
            if best.is_some_and(|hit| hit.distance <= t_exit) {
                break;
            }
            if !t_exit.is_finite() || t_exit > self.max_range {
                break;
            }
            if next_x < next_z {
                cx += step_x;
                next_x += delta_x;
            } else {
                cz += step_z;
                next_z += delta_z;
            }
        }
        best
    }
}

fn consider(ray: &HitScan, target: &HitTarget, max_range: f32, best: &mut Option<RayHit>) {
    let Some(distance) = target.sphere.intersect(ray) else {
        return;
    };
    if distance > max_range {
        return;
    }
    if best.map_or(true, |b| distance < b.distance) {
        *best = Some(RayHit {
            handle: target.handle,
            distance,
            point: ray.at(distance),
        });
    }
}
