/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::RngExt;

use crate::actors::PickupId;
use crate::ai::flat_distance;
use crate::combat::catalog::WeaponKind;
use crate::combat::inventory::WeaponInventory;
use crate::events::CombatEvent;
use crate::player::PlayerVitals;

/// Pickups Rest on the Floor
const PICKUP_Y: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupKind {
    Ammo { weapon: WeaponKind, amount: f32 },
    Health { amount: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub id: PickupId,
    pub kind: PickupKind,
    pub position: Vec3,
}

/// Loot Lying Around the Arena
#[derive(Debug, Clone, Default)]
pub struct PickupField {
    pickups: Vec<Pickup>,
    next_id: u32,
}

impl PickupField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, kind: PickupKind, position: Vec3) -> PickupId {
        let id = PickupId(self.next_id);
        self.next_id += 1;
        self.pickups.push(Pickup {
            id,
            kind,
            position: Vec3::new(position.x, PICKUP_Y, position.z),
        });
        id
    }

    /// Roll for an Ammo Drop Where an Enemy Fell
    /// Ammo Is for One of the Weapons the Player Actually Carries
    pub fn roll_drop(
        &mut self,
        position: Vec3,
        owned: &[WeaponKind],
        drop_chance: f32,
        rng: &mut StdRng,
    ) -> Option<PickupId> {
        if owned.is_empty() || rng.random_range(0.0..1.0) >= drop_chance {
            return None;
        }
        let weapon = owned[rng.random_range(0..owned.len())];
        let amount = weapon.stats().magazine_size as f32;
        debug!("dropped {} {:?} ammo at {:?}", amount, weapon, position);
        Some(self.spawn(PickupKind::Ammo { weapon, amount }, position))
    }

    /// Grab Everything Within `radius` That Would Do Something
    pub fn collect(
        &mut self,
        player: Vec3,
        radius: f32,
        inventory: &mut WeaponInventory,
        vitals: &mut PlayerVitals,
        events: &mut Vec<CombatEvent>,
    ) -> usize {
        let before = self.pickups.len();
        self.pickups.retain(|p| {
            if flat_distance(p.position, player) > radius {
                return true;
            }
            let used = match p.kind {
                PickupKind::Ammo { weapon, amount } => inventory.add_ammo(weapon, amount),
                PickupKind::Health { amount } => vitals.heal(amount),
            };
            if used <= 0.0 {
                // Full Up, Leave It for Later
                return true;
            }
            events.push(CombatEvent::ItemPickedUp { id: p.id, kind: p.kind });
            false
        });
        before - self.pickups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter()
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn clear(&mut self) {
        self.pickups.clear();
    }
}
