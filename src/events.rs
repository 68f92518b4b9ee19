/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;

use crate::actors::{EnemyId, PickupId, ProjectileId};
use crate::combat::catalog::WeaponKind;
use crate::enemies::EnemyKind;
use crate::pickups::PickupKind;

/// Everything the Combat Core Tells the Presentation Layer
/// WeaponHit, FlamethrowerDamage and ExplosionDamage Also Drive Damage Resolution
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    EnemySpawned {
        id: EnemyId,
        kind: EnemyKind,
        position: Vec3,
    },
    EnemyHurt {
        id: EnemyId,
        damage: f32,
        health: f32,
    },
    EnemyDied {
        id: EnemyId,
        kind: EnemyKind,
        position: Vec3,
        score: u32,
    },
    /// Deferred Cleanup Finished, Enemy Left the Roster
    EnemyRemoved {
        id: EnemyId,
    },
    EnemyAttack {
        id: EnemyId,
        damage: f32,
    },

    WeaponFired {
        weapon: WeaponKind,
        origin: Vec3,
        sound_range: f32,
    },
    WeaponHit {
        position: Vec3,
        damage: f32,
    },
    HitConfirmed {
        id: EnemyId,
        position: Vec3,
    },
    ShotMissed {
        position: Vec3,
    },
    ReloadStarted {
        weapon: WeaponKind,
    },
    ReloadFinished {
        weapon: WeaponKind,
        ammo: f32,
    },
    WeaponSwitched {
        weapon: WeaponKind,
    },
    ItemPickedUp {
        id: PickupId,
        kind: PickupKind,
    },
    FlamethrowerDamage {
        origin: Vec3,
        direction: Vec3,
        range: f32,
        damage: f32,
    },
    ExplosionDamage {
        position: Vec3,
        radius: f32,
        damage: f32,
    },
    ProjectileLaunched {
        id: ProjectileId,
        position: Vec3,
        velocity: Vec3,
    },

    WaveStarted {
        wave: u32,
        enemies: usize,
    },
    WaveCompleted {
        wave: u32,
    },

    PlayerHurt {
        damage: f32,
        health: f32,
    },
    PlayerDied,
}
