/*
Wavenstein - by David Petnick
*/
use rand::rngs::StdRng;

use super::catalog::WeaponKind;
use super::weapon::{Aim, FireResult, Weapon};
use crate::events::CombatEvent;
use crate::physics::PhysicsWorld;
use crate::player::InputIntents;
use bevy::prelude::*;

/// One Weapon per Owned Type Plus the Equipped Slot
#[derive(Debug, Clone)]
pub struct WeaponInventory {
    weapons: Vec<Weapon>,
    equipped: usize,
    /// Set on Trigger Press, Cleared on Release or Switch
    trigger_latched: bool,
}

impl WeaponInventory {
    /// Launchers Are Left Out When No Projectile Simulator Is Running
    pub fn new(kinds: &[WeaponKind], projectiles_available: bool) -> Self {
        let mut weapons: Vec<Weapon> = Vec::new();
        for kind in kinds {
            if kind.needs_simulator() && !projectiles_available {
                debug!("skipping {:?}: no projectile simulator", kind);
                continue;
            }
            if weapons.iter().any(|w| w.kind == *kind) {
                continue;
            }
            weapons.push(Weapon::new(*kind));
        }
        if weapons.is_empty() {
            weapons.push(Weapon::new(WeaponKind::Pistol));
        }

        Self {
            weapons,
            equipped: 0,
            trigger_latched: false,
        }
    }

    pub fn from_loadout(names: &[String], projectiles_available: bool) -> Self {
        let kinds: Vec<WeaponKind> = names.iter().map(|n| WeaponKind::from_name(n)).collect();
        Self::new(&kinds, projectiles_available)
    }

    pub fn equipped(&self) -> &Weapon {
        &self.weapons[self.equipped]
    }

    pub fn equipped_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.equipped]
    }

    pub fn get(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    pub fn get_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.kind == kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = WeaponKind> + '_ {
        self.weapons.iter().map(|w| w.kind)
    }

    pub fn owns(&self, kind: WeaponKind) -> bool {
        self.get(kind).is_some()
    }

    /// No-Op for Unowned or Already Equipped Weapons
    pub fn switch_to(&mut self, kind: WeaponKind, events: &mut Vec<CombatEvent>) -> bool {
        let Some(idx) = self.weapons.iter().position(|w| w.kind == kind) else {
            return false;
        };
        if idx == self.equipped {
            return false;
        }

        self.equipped_mut().stop_firing();
        self.equipped = idx;
        self.trigger_latched = false;
        events.push(CombatEvent::WeaponSwitched { weapon: kind });
        true
    }

    pub fn reload(&mut self, events: &mut Vec<CombatEvent>) -> bool {
        let w = self.equipped_mut();
        if !w.start_reload() {
            return false;
        }
        events.push(CombatEvent::ReloadStarted { weapon: w.kind });
        true
    }

    /// Fire the Equipped Weapon, Reporting Hitscan Hits as Damage Requests
    pub fn fire(
        &mut self,
        aim: Aim,
        now: f32,
        physics: &impl PhysicsWorld,
        rng: &mut StdRng,
        events: &mut Vec<CombatEvent>,
    ) -> Option<FireResult> {
        let w = self.equipped_mut();
        let result = w.fire(aim, now, physics, rng)?;

        events.push(CombatEvent::WeaponFired {
            weapon: w.kind,
            origin: aim.origin,
            sound_range: w.stats.sound_range,
        });
        if let Some(hit) = result.hit() {
            events.push(CombatEvent::WeaponHit {
                position: hit.position,
                damage: w.stats.damage,
            });
        }
        Some(result)
    }

    /// Per-Frame Pass: Timers, Held-Weapon Decay, Intents, Trigger, Auto-Reload
    pub fn update(
        &mut self,
        dt: f32,
        now: f32,
        intents: &InputIntents,
        aim: Aim,
        physics: &impl PhysicsWorld,
        rng: &mut StdRng,
        events: &mut Vec<CombatEvent>,
    ) -> Option<FireResult> {
        // Reloads Keep Running on Holstered Weapons
        for w in self.weapons.iter_mut() {
            if w.tick_reload(dt) {
                events.push(CombatEvent::ReloadFinished {
                    weapon: w.kind,
                    ammo: w.state.current_ammo,
                });
            }
        }

        self.equipped_mut().update(dt, events);

        if let Some(kind) = intents.switch_to {
            self.switch_to(kind, events);
        }
        if intents.reload_just_pressed {
            self.reload(events);
        }

        if intents.attack_just_pressed {
            self.trigger_latched = true;
        }
        if !intents.attack_held && !intents.attack_just_pressed {
            self.trigger_latched = false;
            self.equipped_mut().stop_firing();
        }

        let wants_fire = if self.equipped().stats.is_automatic {
            self.trigger_latched
        } else {
            intents.attack_just_pressed
        };

        let result = if wants_fire {
            self.fire(aim, now, physics, rng, events)
        } else {
            None
        };

        if self.equipped().needs_reload() {
            self.reload(events);
        }

        result
    }

    /// Returns How Much Ammo Landed in Reserve
    pub fn add_ammo(&mut self, kind: WeaponKind, amount: f32) -> f32 {
        self.get_mut(kind).map(|w| w.add_reserve(amount)).unwrap_or(0.0)
    }

    /// Level Teardown: Nothing Pending May Land Afterwards
    pub fn cancel_pending(&mut self) {
        for w in self.weapons.iter_mut() {
            w.cancel_reload();
            w.stop_firing();
        }
        self.trigger_latched = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ArenaPhysics;
    use rand::SeedableRng;

    fn aim() -> Aim {
        Aim {
            origin: Vec3::new(0.0, 1.6, 0.0),
            direction: Vec3::Z,
            shooter: None,
        }
    }

    fn press() -> InputIntents {
        InputIntents {
            attack_held: true,
            attack_just_pressed: true,
            ..Default::default()
        }
    }

    fn hold() -> InputIntents {
        InputIntents {
            attack_held: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_launchers_need_simulator() {
        let inv = WeaponInventory::new(&WeaponKind::ALL, false);
        assert!(!inv.owns(WeaponKind::RocketLauncher));
        assert!(!inv.owns(WeaponKind::Flamethrower));
        assert!(inv.owns(WeaponKind::Sniper));

        let inv = WeaponInventory::new(&[WeaponKind::RocketLauncher], false);
        assert_eq!(inv.equipped().kind, WeaponKind::Pistol);
    }

    #[test]
    fn test_loadout_names_degrade_to_pistol() {
        let names = vec!["bfg".to_string(), "shotgun".to_string()];
        let inv = WeaponInventory::from_loadout(&names, true);
        let kinds: Vec<_> = inv.kinds().collect();
        assert_eq!(kinds, vec![WeaponKind::Pistol, WeaponKind::Shotgun]);
    }

    #[test]
    fn test_semi_auto_fires_on_press_edge_only() {
        let world = ArenaPhysics::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut inv = WeaponInventory::new(&[WeaponKind::Pistol], true);
        let mut events = Vec::new();

        assert!(inv.update(0.016, 0.0, &press(), aim(), &world, &mut rng, &mut events).is_some());
        // Still Holding a Second Later: No Second Shot
        assert!(inv.update(0.016, 1.0, &hold(), aim(), &world, &mut rng, &mut events).is_none());
        assert!(inv.update(0.016, 2.0, &press(), aim(), &world, &mut rng, &mut events).is_some());
        assert_eq!(inv.equipped().state.current_ammo, 10.0);
    }

    #[test]
    fn test_automatic_fires_while_held() {
        let world = ArenaPhysics::new();
        let mut rng = StdRng::seed_from_u64(4);
        let mut inv = WeaponInventory::new(&[WeaponKind::Rifle], true);
        let mut events = Vec::new();

        inv.update(0.016, 0.0, &press(), aim(), &world, &mut rng, &mut events);
        for i in 1..5 {
            inv.update(0.2, i as f32 * 0.2, &hold(), aim(), &world, &mut rng, &mut events);
        }
        assert_eq!(inv.equipped().state.current_ammo, 25.0);

        let fired = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::WeaponFired { .. }))
            .count();
        assert_eq!(fired, 5);
    }

    #[test]
    fn test_switch_resets_trigger_latch() {
        let world = ArenaPhysics::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut inv = WeaponInventory::new(&[WeaponKind::Rifle, WeaponKind::Smg], true);
        let mut events = Vec::new();

        inv.update(0.016, 0.0, &press(), aim(), &world, &mut rng, &mut events);
        let switch = InputIntents {
            attack_held: true,
            switch_to: Some(WeaponKind::Smg),
            ..Default::default()
        };
        let r = inv.update(0.016, 1.0, &switch, aim(), &world, &mut rng, &mut events);
        assert!(r.is_none());
        assert_eq!(inv.equipped().kind, WeaponKind::Smg);
        assert_eq!(inv.equipped().state.current_ammo, 40.0);
        assert!(events.contains(&CombatEvent::WeaponSwitched { weapon: WeaponKind::Smg }));
    }

    #[test]
    fn test_switch_shuts_the_nozzle() {
        let world = ArenaPhysics::new();
        let mut rng = StdRng::seed_from_u64(6);
        let mut inv = WeaponInventory::new(&[WeaponKind::Flamethrower, WeaponKind::Pistol], true);
        let mut events = Vec::new();

        inv.update(0.016, 0.0, &press(), aim(), &world, &mut rng, &mut events);
        assert!(inv.equipped().is_flame_firing());

        assert!(inv.switch_to(WeaponKind::Pistol, &mut events));
        let flame = inv.get(WeaponKind::Flamethrower).expect("owned");
        assert!(!flame.is_flame_firing());
    }

    #[test]
    fn test_empty_magazine_auto_reloads() {
        let world = ArenaPhysics::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut inv = WeaponInventory::new(&[WeaponKind::Pistol], true);
        inv.equipped_mut().state.current_ammo = 1.0;
        let mut events = Vec::new();

        inv.update(0.016, 0.0, &press(), aim(), &world, &mut rng, &mut events);
        assert!(inv.equipped().state.is_reloading);
        assert!(events.contains(&CombatEvent::ReloadStarted { weapon: WeaponKind::Pistol }));

        let idle = InputIntents::default();
        inv.update(2.0, 2.0, &idle, aim(), &world, &mut rng, &mut events);
        assert!(!inv.equipped().state.is_reloading);
        assert_eq!(inv.equipped().state.current_ammo, 12.0);
        assert_eq!(inv.equipped().state.reserve_ammo, 84.0);
    }

    #[test]
    fn test_holstered_reload_still_completes() {
        let world = ArenaPhysics::new();
        let mut rng = StdRng::seed_from_u64(8);
        let mut inv = WeaponInventory::new(&[WeaponKind::Pistol, WeaponKind::Rifle], true);
        let mut events = Vec::new();
        inv.equipped_mut().state.current_ammo = 4.0;
        assert!(inv.reload(&mut events));
        inv.switch_to(WeaponKind::Rifle, &mut events);

        inv.update(5.0, 5.0, &InputIntents::default(), aim(), &world, &mut rng, &mut events);
        let pistol = inv.get(WeaponKind::Pistol).expect("owned");
        assert_eq!(pistol.state.current_ammo, 12.0);
    }

    #[test]
    fn test_cancel_pending_blocks_stale_reload() {
        let world = ArenaPhysics::new();
        let mut rng = StdRng::seed_from_u64(9);
        let mut inv = WeaponInventory::new(&[WeaponKind::Pistol], true);
        let mut events = Vec::new();
        inv.equipped_mut().state.current_ammo = 0.0;
        assert!(inv.reload(&mut events));

        inv.cancel_pending();
        inv.equipped_mut().state.reserve_ammo = 0.0;
        inv.update(5.0, 5.0, &InputIntents::default(), aim(), &world, &mut rng, &mut events);
        assert_eq!(inv.equipped().state.current_ammo, 0.0);
    }

    #[test]
    fn test_add_ammo_only_for_owned() {
        let mut inv = WeaponInventory::new(&[WeaponKind::Pistol], true);
        inv.equipped_mut().state.reserve_ammo = 90.0;
        assert_eq!(inv.add_ammo(WeaponKind::Pistol, 12.0), 6.0);
        assert_eq!(inv.add_ammo(WeaponKind::Sniper, 12.0), 0.0);
    }
}
