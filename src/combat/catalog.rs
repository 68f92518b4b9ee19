/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Rifle,
    Smg,
    Shotgun,
    Sniper,
    RocketLauncher,
    Flamethrower,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 7] = [
        WeaponKind::Pistol,
        WeaponKind::Rifle,
        WeaponKind::Smg,
        WeaponKind::Shotgun,
        WeaponKind::Sniper,
        WeaponKind::RocketLauncher,
        WeaponKind::Flamethrower,
    ];

    /// Slot 1..=7 Maps to weapon_1..weapon_7
    pub fn from_slot(slot: u8) -> Option<Self> {
        Self::ALL.get(usize::from(slot).checked_sub(1)?).copied()
    }

    pub fn slot(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_digit_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Digit1 => Some(Self::Pistol),
            KeyCode::Digit2 => Some(Self::Rifle),
            KeyCode::Digit3 => Some(Self::Smg),
            KeyCode::Digit4 => Some(Self::Shotgun),
            KeyCode::Digit5 => Some(Self::Sniper),
            KeyCode::Digit6 => Some(Self::RocketLauncher),
            KeyCode::Digit7 => Some(Self::Flamethrower),
            _ => None,
        }
    }

    /// Unknown Names Degrade to the Pistol Rather Than Failing
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pistol" => Self::Pistol,
            "rifle" | "assault_rifle" => Self::Rifle,
            "smg" => Self::Smg,
            "shotgun" => Self::Shotgun,
            "sniper" => Self::Sniper,
            "rocket" | "rocket_launcher" => Self::RocketLauncher,
            "flamethrower" => Self::Flamethrower,
            other => {
                warn!("unknown weapon '{other}', falling back to pistol");
                Self::Pistol
            }
        }
    }

    pub fn stats(self) -> WeaponStats {
        match self {
            WeaponKind::Pistol => WeaponStats {
                damage: 25.0,
                headshot_multiplier: 2.0,
                fire_rate: 4.0,
                is_automatic: false,
                magazine_size: 12,
                reserve_ammo_max: 96,
                reload_time: 1.2,
                spread: 0.02,
                recoil: 0.03,
                recoil_recovery: 5.0,
                range: 100.0,
                sound_range: 30.0,
            },
            WeaponKind::Rifle => WeaponStats {
                damage: 20.0,
                headshot_multiplier: 1.5,
                fire_rate: 10.0,
                is_automatic: true,
                magazine_size: 30,
                reserve_ammo_max: 180,
                reload_time: 2.0,
                spread: 0.03,
                recoil: 0.02,
                recoil_recovery: 6.0,
                range: 120.0,
                sound_range: 50.0,
            },
            WeaponKind::Smg => WeaponStats {
                damage: 14.0,
                headshot_multiplier: 1.5,
                fire_rate: 15.0,
                is_automatic: true,
                magazine_size: 40,
                reserve_ammo_max: 240,
                reload_time: 1.8,
                spread: 0.05,
                recoil: 0.015,
                recoil_recovery: 8.0,
                range: 60.0,
                sound_range: 35.0,
            },
            WeaponKind::Shotgun => WeaponStats {
                damage: 60.0,
                headshot_multiplier: 1.2,
                fire_rate: 1.2,
                is_automatic: false,
                magazine_size: 8,
                reserve_ammo_max: 40,
                reload_time: 2.5,
                spread: 0.08,
                recoil: 0.08,
                recoil_recovery: 3.0,
                range: 30.0,
                sound_range: 60.0,
            },
            WeaponKind::Sniper => WeaponStats {
                damage: 100.0,
                headshot_multiplier: 3.0,
                fire_rate: 0.8,
                is_automatic: false,
                magazine_size: 5,
                reserve_ammo_max: 30,
                reload_time: 3.0,
                spread: 0.005,
                recoil: 0.15,
                recoil_recovery: 2.0,
                range: 300.0,
                sound_range: 80.0,
            },
            WeaponKind::RocketLauncher => WeaponStats {
                damage: 100.0,
                headshot_multiplier: 1.0,
                fire_rate: 0.8,
                is_automatic: false,
                magazine_size: 4,
                reserve_ammo_max: 12,
                reload_time: 3.0,
                spread: 0.01,
                recoil: 0.2,
                recoil_recovery: 1.5,
                range: 200.0,
                sound_range: 100.0,
            },
            // Damage is Per Second, Applied in Bursts
            WeaponKind::Flamethrower => WeaponStats {
                damage: 60.0,
                headshot_multiplier: 1.0,
                fire_rate: 20.0,
                is_automatic: true,
                magazine_size: 100,
                reserve_ammo_max: 200,
                reload_time: 3.0,
                spread: 0.1,
                recoil: 0.0,
                recoil_recovery: 1.0,
                range: 8.0,
                sound_range: 25.0,
            },
        }
    }

    pub fn projectile(self) -> Option<ProjectileConfig> {
        match self {
            WeaponKind::RocketLauncher => Some(ProjectileConfig {
                damage: 100.0,
                explosion_radius: 5.0,
                speed: 30.0,
                gravity: -2.0,
                lifetime: 5.0,
            }),
            _ => None,
        }
    }

    pub fn flame(self) -> Option<FlameConfig> {
        match self {
            WeaponKind::Flamethrower => Some(FlameConfig {
                damage_per_second: self.stats().damage,
                range: self.stats().range,
                fire_interval: 0.05,
                damage_interval: 0.15,
                fuel_per_tick: 0.1,
            }),
            _ => None,
        }
    }

    /// Needs the Projectile Simulator to Be Useful
    pub fn needs_simulator(self) -> bool {
        matches!(self, WeaponKind::RocketLauncher | WeaponKind::Flamethrower)
    }
}

/// Immutable Per-Type Numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub damage: f32,
    pub headshot_multiplier: f32,
    /// Shots per Second
    pub fire_rate: f32,
    pub is_automatic: bool,
    pub magazine_size: u32,
    pub reserve_ammo_max: u32,
    pub reload_time: f32,
    /// Base Cone (Radians)
    pub spread: f32,
    pub recoil: f32,
    /// Recoil Decay per Second
    pub recoil_recovery: f32,
    pub range: f32,
    pub sound_range: f32,
}

impl WeaponStats {
    pub fn fire_interval(&self) -> f32 {
        if self.fire_rate <= 0.0 {
            return f32::INFINITY;
        }
        1.0 / self.fire_rate
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileConfig {
    pub damage: f32,
    pub explosion_radius: f32,
    pub speed: f32,
    /// Vertical Acceleration (Negative Pulls Down)
    pub gravity: f32,
    pub lifetime: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlameConfig {
    pub damage_per_second: f32,
    pub range: f32,
    pub fire_interval: f32,
    pub damage_interval: f32,
    pub fuel_per_tick: f32,
}

impl FlameConfig {
    pub fn damage_per_burst(&self) -> f32 {
        self.damage_per_second * self.damage_interval
    }
}
