/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;

use super::catalog::{ProjectileConfig, WeaponKind};
use crate::actors::ProjectileId;
use crate::events::CombatEvent;

/// Handed From a Weapon to the Simulator When a Launcher Fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
	pub weapon: WeaponKind,
	pub origin: Vec3,
	pub direction: Vec3,
	pub config: ProjectileConfig,
}

#[derive(Debug, Clone)]
pub struct Projectile {
	pub id: ProjectileId,
	pub position: Vec3,
	pub velocity: Vec3,
	/// Unit Vector Along Velocity, What the Rocket Mesh Should Face
	pub facing: Vec3,
	pub config: ProjectileConfig,
	pub remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Impact {
	Ground,
	OutOfBounds,
	Expired,
}

/// Owns Every In-Flight Projectile
/// Each One Ends in Exactly One ExplosionDamage Event
#[derive(Debug)]
pub struct ProjectileSimulator {
	projectiles: Vec<Projectile>,
	next_id: u32,
	ground_height: f32,
	half_extent: f32,
}

impl ProjectileSimulator {
	pub fn new(ground_height: f32, half_extent: f32) -> Self {
		Self {
			projectiles: Vec::new(),
			next_id: 0,
			ground_height,
			half_extent,
		}
	}

	pub fn launch(&mut self, launch: ProjectileLaunch, events: &mut Vec<CombatEvent>) -> ProjectileId {
		let id = ProjectileId(self.next_id);
		self.next_id += 1;

		let facing = launch.direction.normalize_or(Vec3::Z);
		let velocity = facing * launch.config.speed;

		self.projectiles.push(Projectile {
			id,
			position: launch.origin,
			velocity,
			facing,
			config: launch.config,
			remaining: launch.config.lifetime,
		});

		events.push(CombatEvent::ProjectileLaunched {
			id,
			position: launch.origin,
			velocity,
		});
		trace!("projectile {:?} launched from {:?} by {:?}", id, launch.origin, launch.weapon);
		id
	}

	fn impact(&self, p: &Projectile) -> Option<Impact> {
		if p.position.y <= self.ground_height {
			Some(Impact::Ground)
		} else if p.position.x.abs() > self.half_extent || p.position.z.abs() > self.half_extent {
			Some(Impact::OutOfBounds)
		} else if p.remaining <= 0.0 {
			Some(Impact::Expired)
		} else {
			None
		}
	}

	/// One Fixed Tick: Gravity, Integrate, Then Detonate Anything That Landed or Timed Out
	pub fn step(&mut self, dt: f32, events: &mut Vec<CombatEvent>) {
		for p in self.projectiles.iter_mut() {
			p.velocity.y += p.config.gravity * dt;
			p.position += p.velocity * dt;
			p.remaining -= dt;
			if p.velocity.length_squared() > 1e-8 {
				p.facing = p.velocity.normalize();
			}
		}

		let mut i = 0;
		while i < self.projectiles.len() {
			let Some(how) = self.impact(&self.projectiles[i]) else {
				i += 1;
				continue;
			};

			let p = self.projectiles.swap_remove(i);
			debug!("projectile {:?} exploded ({:?}) at {:?}", p.id, how, p.position);
			events.push(CombatEvent::ExplosionDamage {
				position: p.position,
				radius: p.config.explosion_radius,
				damage: p.config.damage,
			});
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
		self.projectiles.iter()
	}

	pub fn len(&self) -> usize {
		self.projectiles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.projectiles.is_empty()
	}

	/// Level Teardown, Nothing Explodes
	pub fn clear(&mut self) {
		self.projectiles.clear();
	}
}
