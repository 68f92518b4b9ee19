/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use rand::RngExt;
use rand::rngs::StdRng;

use crate::physics::{BodyId, PhysicsWorld, RayHit};

/// Perturb `dir` Inside a Cone of Half Width `spread` Radians
/// Uniform Offsets Along Two Axes Perpendicular to `dir`, Then Renormalized
pub fn apply_spread(dir: Vec3, spread: f32, rng: &mut StdRng) -> Vec3 {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO || spread <= 0.0 {
        return dir;
    }

    // Pick a Helper Axis That Isn't Parallel to the Shot
    let helper = if dir.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
    let right = dir.cross(helper).normalize();
    let up = right.cross(dir).normalize();

    let ox = rng.random_range(-1.0_f32..=1.0) * spread;
    let oy = rng.random_range(-1.0_f32..=1.0) * spread;

    (dir + right * ox + up * oy).normalize()
}

/// Cast Along `dir` for `range` Units, Skipping the Shooter's Own Body
pub fn cast_shot(
    physics: &impl PhysicsWorld,
    origin: Vec3,
    dir: Vec3,
    range: f32,
    shooter: Option<BodyId>,
) -> Option<RayHit> {
    let hit = physics.raycast(origin, origin + dir * range, shooter);
    if let Some(h) = hit.as_ref() {
        trace!("hitscan hit body {:?} at {:.2}", h.body, h.distance);
    }
    hit
}
