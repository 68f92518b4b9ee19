/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::time::Duration;

use crate::actors::EnemyId;
use crate::combat::damage::CombatResolver;
use crate::combat::inventory::WeaponInventory;
use crate::combat::projectiles::ProjectileSimulator;
use crate::combat::weapon::{Aim, FireOutcome};
use crate::config::ArenaConfig;
use crate::directory::{DirectorySettings, EnemyDirectory};
use crate::events::CombatEvent;
use crate::hud::{sync_hud, HudSnapshot};
use crate::physics::{ArenaPhysics, BodyId, BodyKind, PhysicsWorld};
use crate::pickups::PickupField;
use crate::player::{gather_intents, InputIntents, PlayerPose, PlayerVitals};

/// Enemy Hitbox, Centered on Enemy::position
pub const ENEMY_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 1.0, 0.4);
const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.9, 0.3);

/// Fixed-Step Accumulator for Running Without a Schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fixed_dt: f32,
    max_frame_dt: f32,
    accumulator: f32,
}

impl FrameClock {
    pub fn new(fixed_dt: f32, max_frame_dt: f32) -> Self {
        Self {
            fixed_dt: fixed_dt.max(1e-4),
            max_frame_dt,
            accumulator: 0.0,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Returns How Many Fixed Ticks This Frame Owes
    /// Long Frames Are Clamped so a Stall Can't Snowball
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, self.max_frame_dt);
        let mut steps = 0;
        while self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// The Whole Combat Core: One Player, One Roster, One Physics World
#[derive(Resource)]
pub struct Arena {
    pub config: ArenaConfig,
    pub physics: ArenaPhysics,
    pub inventory: WeaponInventory,
    pub projectiles: ProjectileSimulator,
    pub directory: EnemyDirectory,
    pub pickups: PickupField,
    pub resolver: CombatResolver,
    pub vitals: PlayerVitals,
    pub pose: PlayerPose,
    pub score: u32,
    pub kills: u32,
    rng: StdRng,
    clock: FrameClock,
    enemy_bodies: HashMap<EnemyId, BodyId>,
    now: f32,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        let seed = config.rng_seed.unwrap_or_else(rand::random::<u64>);
        debug!("arena rng seed {}", seed);

        let mut physics = ArenaPhysics::new();
        let half = config.arena_half_extent;
        // Floor Slab, Never Reported by Raycasts
        physics.add_body(
            BodyKind::Static,
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(half, 0.5, half),
        );

        let mut pose = PlayerPose::default();
        pose.body = Some(physics.add_body(BodyKind::Dynamic, pose.position, PLAYER_HALF_EXTENTS));

        let mut arena = Self {
            physics,
            inventory: WeaponInventory::from_loadout(&config.loadout, true),
            projectiles: ProjectileSimulator::new(config.ground_height, half),
            directory: EnemyDirectory::new(DirectorySettings::from_config(&config)),
            pickups: PickupField::new(),
            resolver: CombatResolver::from_config(&config),
            vitals: PlayerVitals::new(config.player_max_health),
            pose,
            score: 0,
            kills: 0,
            rng: StdRng::seed_from_u64(seed),
            clock: FrameClock::new(config.fixed_dt, config.max_frame_dt),
            enemy_bodies: HashMap::new(),
            now: 0.0,
            config,
        };
        arena.start_waves();
        arena
    }

    /// Seconds of Variable-Step Time Simulated So Far
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Queue the Next Wave After first_wave_delay
    pub fn start_waves(&mut self) {
        let next = self.directory.wave().number + 1;
        self.directory.schedule_wave(next, self.config.first_wave_delay);
    }

    fn sync_enemy_bodies(&mut self) {
        for e in self.directory.iter() {
            match (e.is_alive(), self.enemy_bodies.get(&e.id).copied()) {
                (true, Some(body)) => self.physics.set_position(body, e.position),
                (true, None) => {
                    let body = self.physics.add_body(BodyKind::Dynamic, e.position, ENEMY_HALF_EXTENTS);
                    self.enemy_bodies.insert(e.id, body);
                }
                // Corpses Stop Soaking Up Bullets
                (false, Some(body)) => {
                    self.physics.remove_body(body);
                    self.enemy_bodies.remove(&e.id);
                }
                (false, None) => {}
            }
        }

        let directory = &self.directory;
        let physics = &mut self.physics;
        self.enemy_bodies.retain(|id, body| {
            if directory.get(*id).is_some() {
                return true;
            }
            physics.remove_body(*body);
            false
        });
    }

    /// Physics-Synchronized Work: Bodies, Rockets, Blast Damage
    pub fn fixed_step(&mut self, dt: f32, events: &mut Vec<CombatEvent>) {
        let start = events.len();

        self.sync_enemy_bodies();
        if let Some(body) = self.pose.body {
            self.physics.set_position(body, self.pose.position);
        }
        self.physics.step(dt);
        self.projectiles.step(dt, events);

        self.resolver.resolve_from(&mut self.directory, events, start);
        self.settle(start, events);
    }

    /// Once-per-Frame Work: Movement, Weapons, AI, Waves, Pickups
    pub fn variable_step(&mut self, dt: f32, intents: &InputIntents, events: &mut Vec<CombatEvent>) {
        let start = events.len();
        self.now += dt;

        // The Dead Don't Pull Triggers
        let idle = InputIntents::default();
        let intents = if self.vitals.is_dead() { &idle } else { intents };

        self.pose.apply_movement(intents.movement, self.config.player_speed, dt, self.config.arena_half_extent);

        let aim = Aim {
            origin: self.pose.position,
            direction: self.pose.aim,
            shooter: self.pose.body,
        };
        let fired = self.inventory.update(dt, self.now, intents, aim, &self.physics, &mut self.rng, events);
        if let Some(FireOutcome::Launched(launch)) = fired.map(|r| r.outcome) {
            self.projectiles.launch(launch, events);
        }

        self.directory.update(dt, self.now, self.pose.position, &mut self.rng, events);
        self.resolver.resolve_from(&mut self.directory, events, start);
        self.settle(start, events);

        if !self.vitals.is_dead() {
            self.pickups.collect(
                self.pose.position,
                self.config.pickup_radius,
                &mut self.inventory,
                &mut self.vitals,
                events,
            );
        }
    }

    /// Fold Kills and Enemy Attacks Into Score, Loot and Player Health
    fn settle(&mut self, start: usize, events: &mut Vec<CombatEvent>) {
        let mut incoming = 0.0;
        let owned: Vec<_> = self.inventory.kinds().collect();

        for ev in &events[start..] {
            match *ev {
                CombatEvent::EnemyDied { position, score, .. } => {
                    self.score += score;
                    self.kills += 1;
                    self.pickups.roll_drop(position, &owned, self.config.drop_chance, &mut self.rng);
                }
                CombatEvent::EnemyAttack { damage, .. } => incoming += damage,
                _ => {}
            }
        }

        if incoming > 0.0 {
            self.vitals.take_damage(incoming, events);
        }
    }

    /// Headless Driver: Owed Fixed Ticks, Then One Variable Pass
    pub fn frame(&mut self, frame_dt: f32, intents: &InputIntents, events: &mut Vec<CombatEvent>) {
        let steps = self.clock.advance(frame_dt);
        let fixed = self.clock.fixed_dt();
        for _ in 0..steps {
            self.fixed_step(fixed, events);
        }
        self.variable_step(frame_dt.clamp(0.0, self.config.max_frame_dt), intents, events);
    }

    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot::capture(self)
    }

    /// Tear Down Everything Transient; No Stale Timer Survives
    pub fn clear_level(&mut self) {
        self.directory.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.inventory.cancel_pending();
        for (_, body) in self.enemy_bodies.drain() {
            self.physics.remove_body(body);
        }
        self.clock.reset();
        info!("level cleared");
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArenaSet {
    Input,
    Simulate,
    Publish,
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<ArenaConfig>()
            .cloned()
            .unwrap_or_else(ArenaConfig::load);

        let arena = Arena::new(config.clone());
        let hud = arena.snapshot();

        app.insert_resource(Time::<Fixed>::from_seconds(config.fixed_dt as f64))
            .insert_resource(config)
            .insert_resource(arena)
            .insert_resource(hud)
            .init_resource::<InputIntents>()
            .add_message::<CombatEvent>()
            .configure_sets(Update, (ArenaSet::Input, ArenaSet::Simulate, ArenaSet::Publish).chain())
            .add_systems(Startup, clamp_virtual_time)
            .add_systems(FixedUpdate, arena_fixed_step)
            .add_systems(Update, gather_intents.in_set(ArenaSet::Input))
            .add_systems(Update, arena_variable_step.in_set(ArenaSet::Simulate))
            .add_systems(Update, (sync_hud, log_combat_events).in_set(ArenaSet::Publish));
    }
}

fn clamp_virtual_time(config: Res<ArenaConfig>, mut time: ResMut<Time<Virtual>>) {
    time.set_max_delta(Duration::from_secs_f32(config.max_frame_dt));
}

fn arena_fixed_step(time: Res<Time>, mut arena: ResMut<Arena>, mut out: MessageWriter<CombatEvent>) {
    let mut events = Vec::new();
    arena.fixed_step(time.delta_secs(), &mut events);
    for ev in events {
        out.write(ev);
    }
}

fn arena_variable_step(
    time: Res<Time>,
    intents: Res<InputIntents>,
    mut arena: ResMut<Arena>,
    mut out: MessageWriter<CombatEvent>,
) {
    let mut events = Vec::new();
    arena.variable_step(time.delta_secs(), &intents, &mut events);
    for ev in events {
        out.write(ev);
    }
}

fn log_combat_events(mut events: MessageReader<CombatEvent>) {
    for ev in events.read() {
        match ev {
            CombatEvent::WaveStarted { wave, enemies } => info!("Wave {} Begins: {} Enemies", wave, enemies),
            CombatEvent::WaveCompleted { wave } => info!("Wave {} Cleared", wave),
            CombatEvent::PlayerDied => warn!("Player Down"),
            CombatEvent::EnemyDied { kind, score, .. } => debug!("{:?} Killed (+{})", kind, score),
            CombatEvent::ItemPickedUp { kind, .. } => debug!("Picked Up {:?}", kind),
            other => trace!("{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::EnemyAiState;
    use crate::enemies::EnemyKind;

    fn arena() -> Arena {
        Arena::new(ArenaConfig {
            rng_seed: Some(77),
            ..Default::default()
        })
    }

    fn press() -> InputIntents {
        InputIntents {
            attack_held: true,
            attack_just_pressed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_clock_clamps_long_frames() {
        let mut clock = FrameClock::new(0.125, 0.5);
        assert_eq!(clock.advance(0.3), 2);
        assert_eq!(clock.advance(0.2), 2);
        assert_eq!(clock.advance(10.0), 4);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_first_wave_arrives_after_delay() {
        let mut a = arena();
        let mut events = Vec::new();
        let idle = InputIntents::default();

        for _ in 0..19 {
            a.frame(0.1, &idle, &mut events);
        }
        assert_eq!(a.directory.wave().number, 0);

        a.frame(0.1, &idle, &mut events);
        a.frame(0.1, &idle, &mut events);
        assert_eq!(a.directory.wave().number, 1);
        assert_eq!(a.directory.living_count(), 7);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::WaveStarted { wave: 1, .. })));
    }

    #[test]
    fn test_enemy_attack_hurts_player() {
        let mut a = arena();
        let mut events = Vec::new();
        a.directory
            .spawn_enemy(EnemyKind::Grunt, Vec3::new(0.0, 1.0, 1.5), &mut events)
            .expect("spawned");

        for _ in 0..15 {
            a.variable_step(0.1, &InputIntents::default(), &mut events);
        }
        assert_eq!(a.vitals.health.cur, 92.0);
        assert!(events.contains(&CombatEvent::PlayerHurt {
            damage: 8.0,
            health: 92.0
        }));
    }

    #[test]
    fn test_kill_scores_and_drops_loot() {
        let mut a = Arena::new(ArenaConfig {
            rng_seed: Some(5),
            drop_chance: 1.0,
            loadout: vec!["pistol".into()],
            ..Default::default()
        });
        let mut events = Vec::new();
        let id = a
            .directory
            .spawn_enemy(EnemyKind::Grunt, Vec3::new(0.0, 1.0, 10.0), &mut events)
            .expect("spawned");

        for dt in [0.016, 0.3] {
            a.fixed_step(1.0 / 60.0, &mut events);
            let target = a.directory.get(id).map(|e| e.position).expect("alive");
            a.pose.aim_at(target);
            a.variable_step(dt, &press(), &mut events);
        }

        assert_eq!(a.directory.get(id).map(|e| e.state), Some(EnemyAiState::Dead));
        assert_eq!(a.kills, 1);
        assert_eq!(a.score, 100);
        assert_eq!(a.pickups.len(), 1);
        assert_eq!(a.inventory.equipped().state.current_ammo, 10.0);

        // Corpse Loses Its Hitbox on the Next Fixed Tick
        let bodies = a.physics.len();
        a.fixed_step(1.0 / 60.0, &mut events);
        assert_eq!(a.physics.len(), bodies - 1);
    }

    /// One Loadout, No Waves, a Heavy Parked at `at` That Never Notices the Player
    fn range_with(weapon: &str, at: Vec3) -> (Arena, EnemyId) {
        let mut a = Arena::new(ArenaConfig {
            rng_seed: Some(11),
            first_wave_delay: 600.0,
            loadout: vec![weapon.into()],
            ..Default::default()
        });
        let mut events = Vec::new();
        let id = a
            .directory
            .spawn_enemy(EnemyKind::Heavy, at, &mut events)
            .expect("spawned");
        if let Some(e) = a.directory.get_mut(id) {
            e.stats.detection_range = 0.0;
        }
        (a, id)
    }

    #[test]
    fn test_rocket_blast_reaches_enemy_through_frames() {
        let heavy_at = Vec3::new(2.0, 1.0, 6.0);
        let (mut a, id) = range_with("rocket", heavy_at);
        let mut events = Vec::new();
        a.pose.aim_at(Vec3::new(0.0, 0.0, 6.0));

        a.frame(1.0 / 60.0, &press(), &mut events);
        assert_eq!(a.projectiles.len(), 1);

        let idle = InputIntents::default();
        for _ in 0..120 {
            if !a.projectiles.is_empty() {
                a.frame(1.0 / 60.0, &idle, &mut events);
            }
        }

        let booms: Vec<Vec3> = events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::ExplosionDamage { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert_eq!(booms.len(), 1);

        let d = heavy_at.distance(booms[0]);
        assert!(d <= 5.0);
        let expected = 200.0 - 100.0 * (1.0 - 0.5 * d / 5.0);
        let hp = a.directory.get(id).map(|e| e.health.cur).expect("heavy");
        assert!((hp - expected).abs() < 1e-3, "hp {hp} expected {expected}");
        assert!(hp < 200.0);
    }

    #[test]
    fn test_flamethrower_bursts_burn_enemy_in_cone() {
        let heavy_at = Vec3::new(0.0, 1.6, 4.0);
        let (mut a, id) = range_with("flamethrower", heavy_at);
        let mut events = Vec::new();
        a.pose.aim_at(heavy_at);

        // Ignite, Then Hold for 0.5 s: Three 0.15 s Bursts
        a.variable_step(1.0 / 60.0, &press(), &mut events);
        assert!(a.inventory.equipped().is_flame_firing());

        let hold = InputIntents {
            attack_held: true,
            ..Default::default()
        };
        for _ in 0..8 {
            a.variable_step(0.0625, &hold, &mut events);
        }

        let bursts = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::FlamethrowerDamage { .. }))
            .count();
        assert_eq!(bursts, 3);
        let hp = a.directory.get(id).map(|e| e.health.cur).expect("heavy");
        assert!((hp - (200.0 - 3.0 * 9.0)).abs() < 1e-3);
        assert!(a.inventory.equipped().state.current_ammo < 100.0);
    }

    #[test]
    fn test_clear_level_drops_everything() {
        let mut a = arena();
        let mut events = Vec::new();
        a.directory
            .spawn_enemy(EnemyKind::Soldier, Vec3::new(0.0, 1.0, 20.0), &mut events)
            .expect("spawned");
        a.fixed_step(1.0 / 60.0, &mut events);
        a.inventory.equipped_mut().state.current_ammo = 0.0;
        a.inventory.reload(&mut events);
        a.pickups.spawn(
            crate::pickups::PickupKind::Health { amount: 10.0 },
            Vec3::new(30.0, 0.0, 30.0),
        );

        a.clear_level();

        assert!(a.directory.is_empty());
        assert!(a.pickups.is_empty());
        assert!(a.projectiles.is_empty());
        assert!(!a.directory.has_pending_wave());
        assert!(!a.inventory.equipped().state.is_reloading);
        // Floor and Player Remain
        assert_eq!(a.physics.len(), 2);
    }

    #[test]
    fn test_dead_player_cannot_fire() {
        let mut a = arena();
        let mut events = Vec::new();
        a.vitals.take_damage(1000.0, &mut events);
        a.variable_step(0.1, &press(), &mut events);
        assert_eq!(a.inventory.equipped().state.current_ammo, 12.0);
    }

    #[test]
    fn test_plugin_runs_under_minimal_plugins() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(ArenaConfig {
                rng_seed: Some(3),
                first_wave_delay: 0.0,
                ..Default::default()
            })
            .add_plugins(ArenaPlugin);

        for _ in 0..3 {
            app.update();
        }

        let arena = app.world().resource::<Arena>();
        assert_eq!(arena.directory.wave().number, 1);
        assert_eq!(arena.directory.living_count(), 7);

        let hud = app.world().resource::<HudSnapshot>();
        assert_eq!(hud.wave, 1);
        assert_eq!(hud.living_enemies, 7);
    }
}
