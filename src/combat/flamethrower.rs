/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;

use super::catalog::FlameConfig;

/// One Damage Burst Produced While the Nozzle Is Open
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlameBurst {
    pub origin: Vec3,
    pub direction: Vec3,
    pub range: f32,
    pub damage: f32,
}

/// Continuous-Fire Bookkeeping, Driven Once per Frame
#[derive(Debug, Clone)]
pub struct FlameState {
    pub config: FlameConfig,
    firing: bool,
    fire_accum: f32,
    damage_accum: f32,
    origin: Vec3,
    direction: Vec3,
}

impl FlameState {
    pub fn new(config: FlameConfig) -> Self {
        Self {
            config,
            firing: false,
            fire_accum: 0.0,
            damage_accum: 0.0,
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn ignite(&mut self, origin: Vec3, direction: Vec3) {
        self.aim(origin, direction);
        self.firing = true;
    }

    pub fn aim(&mut self, origin: Vec3, direction: Vec3) {
        self.origin = origin;
        self.direction = direction.normalize_or(Vec3::Z);
    }

    pub fn stop(&mut self) {
        self.firing = false;
        self.fire_accum = 0.0;
        self.damage_accum = 0.0;
    }

    /// Drains `ammo` Every fire_interval and Pushes a Burst Every damage_interval
    /// Shuts Itself Off When the Tank Runs Dry
    pub fn update(&mut self, dt: f32, ammo: &mut f32, bursts: &mut Vec<FlameBurst>) {
        if !self.firing {
            return;
        }

        self.fire_accum += dt;
        let mut burned = dt;
        while self.fire_accum >= self.config.fire_interval {
            self.fire_accum -= self.config.fire_interval;
            *ammo = (*ammo - self.config.fuel_per_tick).max(0.0);
            // Absorb Float Drift From Repeated Tenths
            if *ammo < 1e-4 {
                *ammo = 0.0;
            }
            if *ammo <= 0.0 {
                // Dry Mid-Frame: Only the Time Up to the Last Tick Burned
                burned = (dt - self.fire_accum).max(0.0);
                break;
            }
        }

        self.damage_accum += burned;
        while self.damage_accum >= self.config.damage_interval {
            self.damage_accum -= self.config.damage_interval;
            bursts.push(FlameBurst {
                origin: self.origin,
                direction: self.direction,
                range: self.config.range,
                damage: self.config.damage_per_burst(),
            });
        }

        if *ammo <= 0.0 {
            self.stop();
        }
    }
}
