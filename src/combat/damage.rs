/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;

use crate::config::ArenaConfig;
use crate::directory::EnemyDirectory;
use crate::events::CombatEvent;

/// Linear Falloff: 1.0 at the Center, 0.5 at the Edge
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 1.0;
    }
    1.0 - 0.5 * (distance / radius).clamp(0.0, 1.0)
}

/// Turns Damage Requests Into Enemy Damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatResolver {
    pub hit_threshold: f32,
    /// Cosine of the Flame Cone Half Angle
    pub cone_cos: f32,
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::from_config(&ArenaConfig::default())
    }
}

impl CombatResolver {
    pub fn from_config(cfg: &ArenaConfig) -> Self {
        Self {
            hit_threshold: cfg.hit_threshold,
            cone_cos: cfg.cone_cos(),
        }
    }

    /// Full Damage to the First Living Enemy Near `position`
    pub fn point_hit(
        &self,
        roster: &mut EnemyDirectory,
        position: Vec3,
        damage: f32,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        let Some((id, _)) = roster.in_radius(position, self.hit_threshold).first().copied() else {
            events.push(CombatEvent::ShotMissed { position });
            return false;
        };

        roster.damage(id, damage, events);
        events.push(CombatEvent::HitConfirmed { id, position });
        true
    }

    /// Returns How Many Enemies Were Caught in the Blast
    pub fn radius_damage(
        &self,
        roster: &mut EnemyDirectory,
        center: Vec3,
        radius: f32,
        damage: f32,
        events: &mut Vec<CombatEvent>,
    ) -> usize {
        if radius <= 0.0 {
            return 0;
        }
        let caught = roster.in_radius(center, radius);
        for (id, dist) in &caught {
            roster.damage(*id, damage * falloff(*dist, radius), events);
        }
        caught.len()
    }

    /// Full Damage, No Falloff, Boundary Inclusive
    pub fn cone_damage(
        &self,
        roster: &mut EnemyDirectory,
        origin: Vec3,
        direction: Vec3,
        range: f32,
        damage: f32,
        events: &mut Vec<CombatEvent>,
    ) -> usize {
        let caught = roster.in_cone(origin, direction, range, self.cone_cos);
        for id in &caught {
            roster.damage(*id, damage, events);
        }
        caught.len()
    }

    /// Apply One Event if It Carries Damage, Otherwise Ignore It
    pub fn resolve(&self, roster: &mut EnemyDirectory, event: &CombatEvent, out: &mut Vec<CombatEvent>) {
        match *event {
            CombatEvent::WeaponHit { position, damage } => {
                self.point_hit(roster, position, damage, out);
            }
            CombatEvent::ExplosionDamage { position, radius, damage } => {
                let n = self.radius_damage(roster, position, radius, damage, out);
                trace!("explosion at {:?} caught {} enemies", position, n);
            }
            CombatEvent::FlamethrowerDamage {
                origin,
                direction,
                range,
                damage,
            } => {
                self.cone_damage(roster, origin, direction, range, damage, out);
            }
            _ => {}
        }
    }

    /// Resolve Every Event From `start` On, Appending the Results to the Same Queue
    pub fn resolve_from(&self, roster: &mut EnemyDirectory, events: &mut Vec<CombatEvent>, start: usize) {
        let mut i = start;
        let mut produced = Vec::new();
        while i < events.len() {
            let ev = events[i];
            self.resolve(roster, &ev, &mut produced);
            events.append(&mut produced);
            i += 1;
        }
    }
}
