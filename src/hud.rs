/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use serde::Serialize;

use crate::arena::Arena;
use crate::combat::catalog::WeaponKind;

/// Plain Numbers for Whoever Draws the HUD
#[derive(Resource, Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub health_pct: u32,
    pub player_dead: bool,

    pub weapon: WeaponKind,
    /// Whole Rounds, Flamethrower Fuel Rounded Up
    pub ammo: u32,
    pub reserve: u32,
    pub reloading: bool,

    pub wave: u32,
    pub enemies_remaining: usize,
    pub living_enemies: usize,

    pub score: u32,
    pub kills: u32,
}

impl HudSnapshot {
    pub fn capture(arena: &Arena) -> Self {
        let w = arena.inventory.equipped();
        let wave = arena.directory.wave();

        Self {
            health_pct: (arena.vitals.health.fraction() * 100.0).round() as u32,
            player_dead: arena.vitals.is_dead(),
            weapon: w.kind,
            ammo: w.state.current_ammo.max(0.0).ceil() as u32,
            reserve: w.state.reserve_ammo.max(0.0).ceil() as u32,
            reloading: w.state.is_reloading,
            wave: wave.number,
            enemies_remaining: wave.enemies_remaining,
            living_enemies: arena.directory.living_count(),
            score: arena.score,
            kills: arena.kills,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub fn sync_hud(arena: Res<Arena>, mut hud: ResMut<HudSnapshot>) {
    let next = HudSnapshot::capture(&arena);
    if *hud != next {
        *hud = next;
    }
}
