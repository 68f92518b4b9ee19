/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

use crate::enemies::EnemyStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyAiState {
    #[default]
    Idle,
    Patrol,
    Chase,
    Attack,
    /// Terminal, Only Reached Through Damage
    Dead,
}

/// Distance-Driven Transition Table
/// Pure: Nothing But the Previous State and the Distance to the Player Matters
pub fn next_state(state: EnemyAiState, dist: f32, stats: &EnemyStats) -> EnemyAiState {
    use EnemyAiState::*;

    match state {
        Idle | Patrol if dist < stats.detection_range => Chase,
        Chase if dist < stats.attack_range => Attack,
        Chase if dist > stats.lose_sight_range => Patrol,
        // Hysteresis Keeps Attackers From Flickering at the Edge
        Attack if dist > stats.attack_range * 1.5 => Chase,
        s => s,
    }
}

/// Heading Convention: Yaw 0 Looks Down +Z, Yaw PI/2 Looks Down +X
pub fn yaw_to(from: Vec3, to: Vec3) -> Option<f32> {
    let d = to - from;
    if d.x.abs() < 1e-6 && d.z.abs() < 1e-6 {
        return None;
    }
    Some(d.x.atan2(d.z))
}

// Into [-PI, PI)
fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

/// Turn at Most `rate * dt` Radians Toward `target_yaw`, Taking the Short Way Round
pub fn turn_toward(yaw: f32, target_yaw: f32, rate: f32, dt: f32) -> f32 {
    let diff = wrap_angle(target_yaw - yaw);
    let max_step = rate * dt;
    if diff.abs() <= max_step {
        return wrap_angle(target_yaw);
    }
    wrap_angle(yaw + max_step * diff.signum())
}

/// Move on the XZ Plane Toward `target` Without Overshooting
pub fn step_toward(pos: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    let flat = Vec3::new(target.x - pos.x, 0.0, target.z - pos.z);
    let dist = flat.length();
    let step = speed * dt;
    if dist <= step || dist < 1e-6 {
        return Vec3::new(target.x, pos.y, target.z);
    }
    pos + flat / dist * step
}

pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
