/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse arena config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Tunables for the Combat Core
/// Every Field Has a Default so a Partial arena.ron Still Loads
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Fixed Physics Tick (Seconds)
    pub fixed_dt: f32,
    /// Longest Frame the Accumulator Will Swallow
    pub max_frame_dt: f32,
    /// Arena Is a Square of +-half_extent on X and Z
    pub arena_half_extent: f32,
    /// Projectiles Detonate at or Below This Height
    pub ground_height: f32,

    pub hit_threshold: f32,
    /// Flamethrower Cone Half Angle (Radians)
    pub cone_half_angle: f32,

    pub max_concurrent_enemies: usize,
    pub spawn_radius: f32,
    pub min_spawn_distance: f32,
    /// Half Extents (X, Z) of the No-Spawn Rectangle Around the Player Spawn
    pub safe_zone: (f32, f32),
    pub spawn_attempts: u32,

    pub first_wave_delay: f32,
    pub wave_start_delay: f32,
    pub dead_cleanup_delay: f32,
    pub patrol_dwell: f32,
    pub patrol_route_radius: f32,

    pub player_speed: f32,
    pub player_max_health: f32,
    pub pickup_radius: f32,
    pub drop_chance: f32,

    /// Weapon Names, Unknown Names Fall Back to the Pistol
    pub loadout: Vec<String>,
    pub rng_seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_frame_dt: 0.25,
            arena_half_extent: 50.0,
            ground_height: 0.2,

            hit_threshold: 3.0,
            cone_half_angle: 0.5,

            max_concurrent_enemies: 10,
            spawn_radius: 30.0,
            min_spawn_distance: 15.0,
            safe_zone: (8.0, 8.0),
            spawn_attempts: 100,

            first_wave_delay: 2.0,
            wave_start_delay: 3.0,
            dead_cleanup_delay: 2.0,
            patrol_dwell: 2.0,
            patrol_route_radius: 6.0,

            player_speed: 6.0,
            player_max_health: 100.0,
            pickup_radius: 1.5,
            drop_chance: 0.25,

            loadout: vec![
                "pistol".into(),
                "rifle".into(),
                "smg".into(),
                "shotgun".into(),
                "sniper".into(),
                "rocket".into(),
                "flamethrower".into(),
            ],
            rng_seed: None,
        }
    }
}

impl ArenaConfig {
    fn config_path() -> Option<PathBuf> {
        #[cfg(debug_assertions)]
        {
            // Debug Builds: Read From Project Directory
            let mut p = std::env::current_dir().ok()?;
            p.push("arena.ron");
            Some(p)
        }
        #[cfg(not(debug_assertions))]
        {
            dirs::config_dir().map(|mut p| {
                p.push("Wavenstein");
                p.push("arena.ron");
                p
            })
        }
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(contents)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Load arena.ron, Falling Back to Defaults When Missing or Malformed
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!("no arena config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_path(&path) {
            Ok(cfg) => {
                info!("loaded arena config from {}", path.display());
                cfg
            }
            Err(err) => {
                warn!("{err}; using default arena config");
                Self::default()
            }
        }
    }

    pub fn to_ron_string(&self) -> Option<String> {
        ron::ser::to_string_pretty(self, Default::default()).ok()
    }

    /// Cosine of the Flamethrower Half Angle, the Cone Inclusion Threshold
    pub fn cone_cos(&self) -> f32 {
        self.cone_half_angle.cos()
    }
}
