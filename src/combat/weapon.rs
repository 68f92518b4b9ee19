/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use bevy::time::{Timer, TimerMode};
use rand::rngs::StdRng;
use std::time::Duration;

use super::catalog::{ProjectileConfig, WeaponKind, WeaponStats};
use super::flamethrower::{FlameBurst, FlameState};
use super::hitscan::{apply_spread, cast_shot};
use super::projectiles::ProjectileLaunch;
use crate::events::CombatEvent;
use crate::physics::{BodyId, PhysicsWorld, RayHit};

/// Where a Shot Comes From This Frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Shooter's Own Body, Never Hit by Its Own Rays
    pub shooter: Option<BodyId>,
}

/// Per-Instance Ammo / Reload / Bloom Tracking
/// Ammo Is Fractional Because the Flamethrower Burns Tenths
#[derive(Debug, Clone)]
pub struct WeaponState {
    pub current_ammo: f32,
    pub reserve_ammo: f32,
    pub is_reloading: bool,
    pub last_fire_time: f32,
    pub current_spread: f32,
    pub current_recoil: f32,
    reload_timer: Option<Timer>,
}

impl WeaponState {
    fn full(stats: &WeaponStats) -> Self {
        Self {
            current_ammo: stats.magazine_size as f32,
            reserve_ammo: stats.reserve_ammo_max as f32,
            is_reloading: false,
            last_fire_time: f32::NEG_INFINITY,
            current_spread: 0.0,
            current_recoil: 0.0,
            reload_timer: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum WeaponBehavior {
    Hitscan,
    Projectile(ProjectileConfig),
    Flamethrower(FlameState),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireOutcome {
    /// Instant Ray, With Whatever It Struck
    Hitscan(Option<RayHit>),
    /// Rocket Handed to the Simulator, Damage Resolves on Detonation
    Launched(ProjectileLaunch),
    /// Nozzle Opened, Damage Resolves in Periodic Bursts
    Ignited,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireResult {
    pub weapon: WeaponKind,
    pub direction: Vec3,
    pub outcome: FireOutcome,
}

impl FireResult {
    pub fn hit(&self) -> Option<&RayHit> {
        match &self.outcome {
            FireOutcome::Hitscan(hit) => hit.as_ref(),
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.hit().is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub stats: WeaponStats,
    pub state: WeaponState,
    behavior: WeaponBehavior,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        let stats = kind.stats();
        let behavior = if let Some(cfg) = kind.projectile() {
            WeaponBehavior::Projectile(cfg)
        } else if let Some(cfg) = kind.flame() {
            WeaponBehavior::Flamethrower(FlameState::new(cfg))
        } else {
            WeaponBehavior::Hitscan
        };

        Self {
            kind,
            stats,
            state: WeaponState::full(&stats),
            behavior,
        }
    }

    pub fn behavior(&self) -> &WeaponBehavior {
        &self.behavior
    }

    pub fn is_flame_firing(&self) -> bool {
        matches!(&self.behavior, WeaponBehavior::Flamethrower(f) if f.is_firing())
    }

    pub fn has_ammo(&self) -> bool {
        self.state.current_ammo > 0.0
    }

    /// Reloading, Dry, or Still Inside the Fire-Rate Window
    pub fn can_fire(&self, time: f32) -> bool {
        !self.state.is_reloading
            && self.has_ammo()
            && time - self.state.last_fire_time >= self.stats.fire_interval()
    }

    /// Gated Fire, None Means Nothing Changed
    pub fn fire(
        &mut self,
        aim: Aim,
        time: f32,
        physics: &impl PhysicsWorld,
        rng: &mut StdRng,
    ) -> Option<FireResult> {
        // Open Nozzle Just Follows the Crosshair
        if let WeaponBehavior::Flamethrower(flame) = &mut self.behavior {
            if flame.is_firing() {
                flame.aim(aim.origin, aim.direction);
                return None;
            }
        }

        if !self.can_fire(time) {
            return None;
        }

        let cone = self.stats.spread + self.state.current_spread;
        let direction = apply_spread(aim.direction, cone, rng);

        let outcome = match &mut self.behavior {
            WeaponBehavior::Hitscan => {
                self.state.current_ammo -= 1.0;
                FireOutcome::Hitscan(cast_shot(physics, aim.origin, direction, self.stats.range, aim.shooter))
            }
            WeaponBehavior::Projectile(cfg) => {
                self.state.current_ammo -= 1.0;
                FireOutcome::Launched(ProjectileLaunch {
                    weapon: self.kind,
                    origin: aim.origin,
                    direction,
                    config: *cfg,
                })
            }
            WeaponBehavior::Flamethrower(flame) => {
                flame.ignite(aim.origin, aim.direction);
                FireOutcome::Ignited
            }
        };
        self.state.current_ammo = self.state.current_ammo.max(0.0);
        self.state.last_fire_time = time;

        // Bloom: Grows While the Trigger Is Held, Capped at Double
        let s = &self.stats;
        self.state.current_recoil = (self.state.current_recoil + s.recoil).min(s.recoil * 2.0);
        self.state.current_spread = (self.state.current_spread + s.spread * 0.5).min(s.spread * 2.0);

        Some(FireResult {
            weapon: self.kind,
            direction,
            outcome,
        })
    }

    pub fn stop_firing(&mut self) {
        if let WeaponBehavior::Flamethrower(flame) = &mut self.behavior {
            flame.stop();
        }
    }

    /// Frame Update for the Held Weapon: Bloom Decay and Flame Bursts
    pub fn update(&mut self, dt: f32, events: &mut Vec<CombatEvent>) {
        let decay = (1.0 - self.stats.recoil_recovery * dt).max(0.0);
        self.state.current_recoil *= decay;
        self.state.current_spread *= decay;

        if let WeaponBehavior::Flamethrower(flame) = &mut self.behavior {
            let mut bursts: Vec<FlameBurst> = Vec::new();
            flame.update(dt, &mut self.state.current_ammo, &mut bursts);
            events.extend(bursts.into_iter().map(|b| CombatEvent::FlamethrowerDamage {
                origin: b.origin,
                direction: b.direction,
                range: b.range,
                damage: b.damage,
            }));
        }
    }

    pub fn needs_reload(&self) -> bool {
        !self.state.is_reloading && self.state.current_ammo <= 0.0 && self.state.reserve_ammo > 0.0
    }

    /// Gated: Not Already Reloading, Something in Reserve, Magazine Not Full
    pub fn start_reload(&mut self) -> bool {
        let st = &self.state;
        if st.is_reloading
            || st.reserve_ammo <= 0.0
            || st.current_ammo >= self.stats.magazine_size as f32
        {
            return false;
        }

        self.stop_firing();
        self.state.is_reloading = true;
        self.state.reload_timer = Some(Timer::from_seconds(self.stats.reload_time, TimerMode::Once));
        true
    }

    /// Advance the Pending Reload, Returns True on the Tick It Completes
    pub fn tick_reload(&mut self, dt: f32) -> bool {
        let Some(timer) = self.state.reload_timer.as_mut() else {
            return false;
        };
        timer.tick(Duration::from_secs_f32(dt.max(0.0)));
        if !timer.is_finished() {
            return false;
        }

        self.state.reload_timer = None;
        self.state.is_reloading = false;

        let needed = (self.stats.magazine_size as f32 - self.state.current_ammo).max(0.0);
        let moved = needed.min(self.state.reserve_ammo);
        self.state.current_ammo += moved;
        self.state.reserve_ammo -= moved;
        true
    }

    /// Drops Any Pending Reload Without Moving Ammo
    pub fn cancel_reload(&mut self) {
        self.state.reload_timer = None;
        self.state.is_reloading = false;
    }

    /// Returns How Much Was Actually Added
    pub fn add_reserve(&mut self, amount: f32) -> f32 {
        let cap = self.stats.reserve_ammo_max as f32;
        let before = self.state.reserve_ammo;
        self.state.reserve_ammo = (before + amount.max(0.0)).min(cap);
        self.state.reserve_ammo - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ArenaPhysics, BodyKind};
    use rand::SeedableRng;

    fn aim_forward() -> Aim {
        Aim {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::Z,
            shooter: None,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xC0FFEE)
    }

    #[test]
    fn test_ammo_counts_down_per_shot() {
        let world = ArenaPhysics::new();
        let mut rng = rng();
        let mut w = Weapon::new(WeaponKind::Pistol);
        let interval = w.stats.fire_interval();

        for n in 1..=12 {
            let r = w.fire(aim_forward(), n as f32 * interval, &world, &mut rng);
            assert!(r.is_some());
            assert_eq!(w.state.current_ammo, 12.0 - n as f32);
        }
        assert!(w.fire(aim_forward(), 100.0, &world, &mut rng).is_none());
        assert_eq!(w.state.current_ammo, 0.0);
    }

    #[test]
    fn test_fire_rate_gate() {
        let world = ArenaPhysics::new();
        let mut rng = rng();
        let mut w = Weapon::new(WeaponKind::Rifle);

        assert!(w.fire(aim_forward(), 1.0, &world, &mut rng).is_some());
        let ammo = w.state.current_ammo;
        assert!(w.fire(aim_forward(), 1.05, &world, &mut rng).is_none());
        assert_eq!(w.state.current_ammo, ammo);
        assert!(w.fire(aim_forward(), 1.11, &world, &mut rng).is_some());
    }

    #[test]
    fn test_bloom_caps_at_double() {
        let world = ArenaPhysics::new();
        let mut rng = rng();
        let mut w = Weapon::new(WeaponKind::Smg);
        for i in 0..10 {
            w.fire(aim_forward(), i as f32, &world, &mut rng);
        }
        assert!((w.state.current_recoil - w.stats.recoil * 2.0).abs() < 1e-6);
        assert!((w.state.current_spread - w.stats.spread * 2.0).abs() < 1e-6);

        for _ in 0..120 {
            w.update(1.0 / 60.0, &mut Vec::new());
        }
        assert!(w.state.current_recoil < 1e-4);
        assert!(w.state.current_spread < 1e-4);
    }

    #[test]
    fn test_hitscan_reports_dynamic_hit() {
        let mut world = ArenaPhysics::new();
        world.add_body(BodyKind::Dynamic, Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.5, 1.0, 0.5));
        let mut rng = rng();
        let mut w = Weapon::new(WeaponKind::Pistol);

        let r = w.fire(aim_forward(), 0.0, &world, &mut rng).expect("fired");
        let hit = r.hit().expect("hit the box");
        assert!((hit.distance - 4.5).abs() < 0.05);
    }

    #[test]
    fn test_reload_conserves_ammo() {
        let world = ArenaPhysics::new();
        let mut rng = rng();
        let mut w = Weapon::new(WeaponKind::Pistol);
        w.state.reserve_ammo = 5.0;
        for i in 0..9 {
            w.fire(aim_forward(), i as f32, &world, &mut rng);
        }
        assert_eq!(w.state.current_ammo, 3.0);
        let total = w.state.current_ammo + w.state.reserve_ammo;

        assert!(w.start_reload());
        assert!(!w.start_reload());
        assert!(w.fire(aim_forward(), 50.0, &world, &mut rng).is_none());

        assert!(!w.tick_reload(w.stats.reload_time * 0.5));
        assert!(w.state.is_reloading);
        assert!(w.tick_reload(w.stats.reload_time * 0.5 + 0.01));

        assert!(!w.state.is_reloading);
        assert_eq!(w.state.current_ammo + w.state.reserve_ammo, total);
        assert_eq!(w.state.current_ammo, total.min(12.0));
        assert_eq!(w.state.reserve_ammo, 0.0);
    }

    #[test]
    fn test_reload_lands_after_exactly_reload_time() {
        let mut w = Weapon::new(WeaponKind::Rifle);
        w.state.current_ammo = 0.0;
        w.state.reserve_ammo = 100.0;
        assert!(w.start_reload());
        assert!(w.tick_reload(w.stats.reload_time));
        assert_eq!(w.state.current_ammo, 30.0);
        assert_eq!(w.state.reserve_ammo, 70.0);
        // Timer Is Gone, Nothing Lands Twice
        assert!(!w.tick_reload(w.stats.reload_time));
        assert_eq!(w.state.current_ammo, 30.0);
    }

    #[test]
    fn test_reload_gates() {
        let mut full = Weapon::new(WeaponKind::Pistol);
        assert!(!full.start_reload());

        let mut dry = Weapon::new(WeaponKind::Pistol);
        dry.state.current_ammo = 0.0;
        dry.state.reserve_ammo = 0.0;
        assert!(!dry.start_reload());
        assert!(!dry.needs_reload());
    }

    #[test]
    fn test_cancelled_reload_never_lands() {
        let mut w = Weapon::new(WeaponKind::Shotgun);
        w.state.current_ammo = 2.0;
        assert!(w.start_reload());
        w.cancel_reload();
        assert!(!w.tick_reload(60.0));
        assert_eq!(w.state.current_ammo, 2.0);
    }

    #[test]
    fn test_rocket_fire_hands_back_launch() {
        let world = ArenaPhysics::new();
        let mut rng = rng();
        let mut w = Weapon::new(WeaponKind::RocketLauncher);

        let r = w.fire(aim_forward(), 0.0, &world, &mut rng).expect("fired");
        assert!(!r.is_hit());
        match r.outcome {
            FireOutcome::Launched(launch) => {
                assert_eq!(launch.config.explosion_radius, 5.0);
                assert_eq!(launch.origin, aim_forward().origin);
            }
            other => panic!("expected launch, got {other:?}"),
        }
        assert_eq!(w.state.current_ammo, 3.0);
    }

    #[test]
    fn test_flamethrower_burns_until_dry() {
        let world = ArenaPhysics::new();
        let mut rng = rng();
        let mut w = Weapon::new(WeaponKind::Flamethrower);
        w.state.current_ammo = 0.5;
        w.state.reserve_ammo = 0.0;

        let r = w.fire(aim_forward(), 0.0, &world, &mut rng).expect("ignited");
        assert_eq!(r.outcome, FireOutcome::Ignited);
        assert!(w.is_flame_firing());
        // Holding the Trigger Doesn't Re-Ignite
        assert!(w.fire(aim_forward(), 1.0, &world, &mut rng).is_none());

        let mut events = Vec::new();
        for _ in 0..20 {
            w.update(0.05, &mut events);
        }
        assert_eq!(w.state.current_ammo, 0.0);
        assert!(!w.is_flame_firing());
        assert!(events.iter().any(|e| matches!(e, CombatEvent::FlamethrowerDamage { .. })));
    }

    #[test]
    fn test_add_reserve_respects_cap() {
        let mut w = Weapon::new(WeaponKind::Sniper);
        w.state.reserve_ammo = 25.0;
        assert_eq!(w.add_reserve(20.0), 5.0);
        assert_eq!(w.state.reserve_ammo, 30.0);
        assert_eq!(w.add_reserve(3.0), 0.0);
    }
}
