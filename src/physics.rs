/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyId,
    pub position: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

/// What the Combat Core Needs From a Physics Engine
pub trait PhysicsWorld {
    /// Nearest Dynamic Body Between `from` and `to`
    /// Static Shapes and the Ignored Body Never Report a Hit
    fn raycast(&self, from: Vec3, to: Vec3, ignore: Option<BodyId>) -> Option<RayHit>;

    fn step(&mut self, dt: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy)]
pub struct BoxBody {
    pub kind: BodyKind,
    pub center: Vec3,
    pub half_extents: Vec3,
    pub velocity: Vec3,
}

/// Kinematic Box World Standing in for the Rigid-Body Engine
/// Ground Is an Implicit Static Plane and Never Hit by Raycasts
#[derive(Debug, Default)]
pub struct ArenaPhysics {
    bodies: HashMap<BodyId, BoxBody>,
    next_id: u32,
}

impl ArenaPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, kind: BodyKind, center: Vec3, half_extents: Vec3) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            id,
            BoxBody {
                kind,
                center,
                half_extents,
                velocity: Vec3::ZERO,
            },
        );
        id
    }

    pub fn remove_body(&mut self, id: BodyId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    pub fn set_position(&mut self, id: BodyId, center: Vec3) {
        if let Some(b) = self.bodies.get_mut(&id) {
            b.center = center;
        }
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec3) {
        if let Some(b) = self.bodies.get_mut(&id) {
            b.velocity = velocity;
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&BoxBody> {
        self.bodies.get(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}

impl PhysicsWorld for ArenaPhysics {
    fn raycast(&self, from: Vec3, to: Vec3, ignore: Option<BodyId>) -> Option<RayHit> {
        let delta = to - from;
        let max_dist = delta.length();
        if max_dist < 1e-6 {
            return None;
        }
        let dir = delta / max_dist;

        let mut best: Option<RayHit> = None;
        for (id, body) in &self.bodies {
            if body.kind == BodyKind::Static || Some(*id) == ignore {
                continue;
            }
            let Some((t, normal)) = ray_box(from, dir, body.center, body.half_extents) else {
                continue;
            };
            if t > max_dist {
                continue;
            }
            match best {
                Some(b) if b.distance <= t => {}
                _ => {
                    best = Some(RayHit {
                        body: *id,
                        position: from + dir * t,
                        normal,
                        distance: t,
                    })
                }
            }
        }
        best
    }

    fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            if body.kind == BodyKind::Dynamic {
                body.center += body.velocity * dt;
            }
        }
    }
}

/// Slab Test, Returns Entry Distance and Face Normal
/// Ray Starting Inside the Box Reports t = 0 With Normal Facing Back Along the Ray
fn ray_box(origin: Vec3, dir: Vec3, center: Vec3, half: Vec3) -> Option<(f32, Vec3)> {
    const EPS: f32 = 1e-8;

    let min = center - half;
    let max = center + half;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = -dir;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (min[axis], max[axis]);

        if d.abs() < EPS {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (lo - o) * inv;
        let mut t1 = (hi - o) * inv;
        let mut sign = -1.0;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            sign = 1.0;
        }

        if t0 > t_enter {
            t_enter = t0;
            let mut n = Vec3::ZERO;
            n[axis] = sign;
            enter_normal = n;
        }
        t_exit = t_exit.min(t1);

        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }

    if t_enter < 0.0 {
        Some((0.0, -dir))
    } else {
        Some((t_enter, enter_normal))
    }
}
