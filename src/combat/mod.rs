/*
Wavenstein - by David Petnick
*/
pub mod catalog;
pub mod damage;
pub mod flamethrower;
pub mod hitscan;
pub mod inventory;
pub mod projectiles;
pub mod weapon;

pub use catalog::{FlameConfig, ProjectileConfig, WeaponKind, WeaponStats};
pub use damage::CombatResolver;
pub use inventory::WeaponInventory;
pub use projectiles::{ProjectileLaunch, ProjectileSimulator};
pub use weapon::{Aim, FireOutcome, FireResult, Weapon, WeaponBehavior};
