//! Point cloud pre-filters applied before ray casting.

use std::collections::HashSet;

use glam::{IVec3, Vec3};

/// Keep points whose height relative to `reference_z` lies in `[min_height, max_height]`.
pub fn crop_by_height(points: &[Vec3], reference_z: f32, min_height: f32, max_height: f32) -> Vec<Vec3> {
    points
        .iter()
        .filter(|p| {
            let dz = p.z - reference_z;
            dz >= min_height && dz <= max_height
        })
        .copied()
        .collect()
}

/// Obstacle points that also appear in the raw cloud.
///
/// Points are matched by voxel key at `tolerance` meters, which also catches
/// a raw point that ended up in a neighboring voxel.
pub fn extract_common_points(obstacle: &[Vec3], raw: &[Vec3], tolerance: f32) -> Vec<Vec3> {
    let key = |p: &Vec3| (*p / tolerance).floor().as_ivec3();
    let raw_keys: HashSet<IVec3> = raw.iter().map(key).collect();

    obstacle
        .iter()
        .filter(|p| {
            let k = key(p);
            (-1..=1).any(|dx| {
                (-1..=1).any(|dy| {
                    (-1..=1).any(|dz| raw_keys.contains(&(k + IVec3::new(dx, dy, dz))))
                })
            })
        })
        .copied()
        .collect()
}
