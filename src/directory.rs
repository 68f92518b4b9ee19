/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::RngExt;
use std::f32::consts::TAU;

use crate::actors::EnemyId;
use crate::ai::flat_distance;
use crate::ai_patrol::PatrolRoute;
use crate::config::ArenaConfig;
use crate::enemies::{Enemy, EnemyKind};
use crate::events::CombatEvent;

/// Body Center Height for Spawned Enemies
pub const ENEMY_SPAWN_Y: f32 = 1.0;

/// Axis-Aligned No-Spawn Rectangle on the XZ Plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeZone {
    pub center: Vec3,
    /// Half Extents Along X and Z
    pub half: Vec2,
}

impl SafeZone {
    pub fn contains(&self, p: Vec3) -> bool {
        (p.x - self.center.x).abs() <= self.half.x && (p.z - self.center.z).abs() <= self.half.y
    }

    /// Shove `p` Out Through the Nearest Edge
    pub fn push_out(&self, p: Vec3) -> Vec3 {
        if !self.contains(p) {
            return p;
        }
        let dx = p.x - self.center.x;
        let dz = p.z - self.center.z;
        let pen_x = self.half.x - dx.abs();
        let pen_z = self.half.y - dz.abs();
        let nudge = 0.01;

        let mut out = p;
        if pen_x <= pen_z {
            let sign = if dx >= 0.0 { 1.0 } else { -1.0 };
            out.x = self.center.x + sign * (self.half.x + nudge);
        } else {
            let sign = if dz >= 0.0 { 1.0 } else { -1.0 };
            out.z = self.center.z + sign * (self.half.y + nudge);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySettings {
    pub max_concurrent: usize,
    pub spawn_radius: f32,
    pub min_spawn_distance: f32,
    pub safe_zone: SafeZone,
    pub spawn_attempts: u32,
    pub arena_half_extent: f32,
    pub wave_start_delay: f32,
    pub dead_cleanup_delay: f32,
    pub patrol_dwell: f32,
    pub patrol_route_radius: f32,
}

impl DirectorySettings {
    /// Safe Zone Sits Around the Player Spawn at the Origin
    pub fn from_config(cfg: &ArenaConfig) -> Self {
        Self {
            max_concurrent: cfg.max_concurrent_enemies,
            spawn_radius: cfg.spawn_radius,
            min_spawn_distance: cfg.min_spawn_distance,
            safe_zone: SafeZone {
                center: Vec3::ZERO,
                half: Vec2::new(cfg.safe_zone.0, cfg.safe_zone.1),
            },
            spawn_attempts: cfg.spawn_attempts,
            arena_half_extent: cfg.arena_half_extent,
            wave_start_delay: cfg.wave_start_delay,
            dead_cleanup_delay: cfg.dead_cleanup_delay,
            patrol_dwell: cfg.patrol_dwell,
            patrol_route_radius: cfg.patrol_route_radius,
        }
    }
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self::from_config(&ArenaConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveState {
    pub number: u32,
    /// Spawned but Not Yet Cleaned Up
    pub enemies_remaining: usize,
    pub in_progress: bool,
}

#[derive(Debug, Clone)]
struct PendingWave {
    number: u32,
    timer: Timer,
}

/// Enemies per Wave Before the Concurrency Cap
pub fn wave_size(wave: u32, max_concurrent: usize) -> usize {
    (5 + 2 * wave as usize).min(max_concurrent)
}

/// Types Eligible in `wave`, Grunts Always
pub fn wave_pool(wave: u32) -> Vec<EnemyKind> {
    let mut pool = vec![EnemyKind::Grunt];
    if wave >= 2 {
        pool.push(EnemyKind::Soldier);
    }
    if wave >= 4 {
        pool.push(EnemyKind::Sniper);
    }
    if wave >= 6 && wave % 2 == 0 {
        pool.push(EnemyKind::Heavy);
    }
    pool
}

/// Owns Every Enemy and the Wave Schedule
#[derive(Debug, Clone)]
pub struct EnemyDirectory {
    enemies: Vec<Enemy>,
    next_id: u32,
    settings: DirectorySettings,
    wave: WaveState,
    pending: Option<PendingWave>,
    last_player_pos: Vec3,
}

impl EnemyDirectory {
    pub fn new(settings: DirectorySettings) -> Self {
        Self {
            enemies: Vec::new(),
            next_id: 0,
            settings,
            wave: WaveState::default(),
            pending: None,
            last_player_pos: Vec3::ZERO,
        }
    }

    pub fn settings(&self) -> &DirectorySettings {
        &self.settings
    }

    pub fn wave(&self) -> WaveState {
        self.wave
    }

    pub fn has_pending_wave(&self) -> bool {
        self.pending.is_some()
    }

    pub fn living_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Roster Size Including Corpses Awaiting Cleanup
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn living(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn set_player_position(&mut self, pos: Vec3) {
        self.last_player_pos = pos;
    }

    fn admit(&mut self, enemy: Enemy, events: &mut Vec<CombatEvent>) -> EnemyId {
        let id = enemy.id;
        events.push(CombatEvent::EnemySpawned {
            id,
            kind: enemy.kind,
            position: enemy.position,
        });
        self.enemies.push(enemy);
        self.wave.enemies_remaining += 1;
        id
    }

    fn at_capacity(&self, kind: EnemyKind) -> bool {
        if self.living_count() >= self.settings.max_concurrent {
            debug!("spawn of {:?} refused: {} enemies already alive", kind, self.settings.max_concurrent);
            return true;
        }
        false
    }

    fn next_enemy(&mut self, kind: EnemyKind, position: Vec3) -> Enemy {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        Enemy::new(id, kind, position, self.settings.dead_cleanup_delay)
    }

    /// Idle Enemy at `position`; `None` When the Arena Is Full
    pub fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        position: Vec3,
        events: &mut Vec<CombatEvent>,
    ) -> Option<EnemyId> {
        if self.at_capacity(kind) {
            return None;
        }
        let enemy = self.next_enemy(kind, position);
        Some(self.admit(enemy, events))
    }

    /// Like spawn_enemy but Already Walking a Route
    pub fn spawn_patrol(
        &mut self,
        kind: EnemyKind,
        position: Vec3,
        route: PatrolRoute,
        events: &mut Vec<CombatEvent>,
    ) -> Option<EnemyId> {
        if self.at_capacity(kind) {
            return None;
        }
        let enemy = self.next_enemy(kind, position).with_patrol(route);
        Some(self.admit(enemy, events))
    }

    fn in_bounds(&self, p: Vec3) -> bool {
        let lim = self.settings.arena_half_extent - 1.0;
        p.x.abs() <= lim && p.z.abs() <= lim
    }

    /// Random Point in the Spawn Ring Around the Player, Outside the Safe Zone
    pub fn sample_spawn_position(&self, rng: &mut StdRng) -> Vec3 {
        let s = &self.settings;
        let lo = s.min_spawn_distance.min(s.spawn_radius);
        let hi = s.spawn_radius.max(lo);
        let player = self.last_player_pos;

        let mut candidate = player;
        for _ in 0..s.spawn_attempts {
            let angle = rng.random_range(0.0..TAU);
            let dist = rng.random_range(lo..=hi);
            candidate = Vec3::new(
                player.x + angle.sin() * dist,
                ENEMY_SPAWN_Y,
                player.z + angle.cos() * dist,
            );
            if !s.safe_zone.contains(candidate) && self.in_bounds(candidate) {
                return candidate;
            }
        }

        // Out of Attempts: Keep the Last Candidate but Make It Legal
        let lim = s.arena_half_extent - 1.0;
        candidate.x = candidate.x.clamp(-lim, lim);
        candidate.z = candidate.z.clamp(-lim, lim);
        candidate.y = ENEMY_SPAWN_Y;
        debug!("spawn sampling exhausted, falling back to {:?}", candidate);
        s.safe_zone.push_out(candidate)
    }

    /// Spawn Wave `n` Now, Returning How Many Enemies Actually Joined
    pub fn start_wave(&mut self, n: u32, rng: &mut StdRng, events: &mut Vec<CombatEvent>) -> usize {
        self.pending = None;
        self.wave.number = n;
        self.wave.in_progress = true;

        let pool = wave_pool(n);
        let want = wave_size(n, self.settings.max_concurrent);
        let mut spawned = 0;

        for _ in 0..want {
            let kind = pool[rng.random_range(0..pool.len())];
            let pos = self.sample_spawn_position(rng);
            let route = PatrolRoute::around(
                pos,
                self.settings.patrol_route_radius,
                self.settings.patrol_dwell,
                rng,
            );
            if self.spawn_patrol(kind, pos, route, events).is_none() {
                break;
            }
            spawned += 1;
        }

        info!("wave {} started with {} enemies", n, spawned);
        events.push(CombatEvent::WaveStarted { wave: n, enemies: spawned });
        spawned
    }

    /// Start Wave `n` Once `delay` Seconds Have Passed
    pub fn schedule_wave(&mut self, n: u32, delay: f32) {
        self.pending = Some(PendingWave {
            number: n,
            timer: Timer::from_seconds(delay.max(0.0), TimerMode::Once),
        });
    }

    /// Returns `true` if the Enemy Died From This Hit
    pub fn damage(&mut self, id: EnemyId, amount: f32, events: &mut Vec<CombatEvent>) -> bool {
        self.get_mut(id).is_some_and(|e| e.take_damage(amount, events))
    }

    /// AI, Deferred Cleanup, Wave Timer and Completion Check
    pub fn update(
        &mut self,
        dt: f32,
        now: f32,
        player: Vec3,
        rng: &mut StdRng,
        events: &mut Vec<CombatEvent>,
    ) {
        self.last_player_pos = player;

        for e in self.enemies.iter_mut() {
            e.think(dt, now, player, events);
        }

        let mut removed = 0;
        self.enemies.retain_mut(|e| {
            if e.tick_cleanup(dt) {
                events.push(CombatEvent::EnemyRemoved { id: e.id });
                removed += 1;
                return false;
            }
            true
        });
        self.wave.enemies_remaining = self.wave.enemies_remaining.saturating_sub(removed);

        // A Due Wave Waits for Stragglers Instead of Being Dropped
        let due = match self.pending.as_mut() {
            Some(p) => {
                p.timer.tick(std::time::Duration::from_secs_f32(dt.max(0.0)));
                p.timer.is_finished().then_some(p.number)
            }
            None => None,
        };
        if let Some(n) = due {
            if !self.wave.in_progress && self.living_count() == 0 {
                self.start_wave(n, rng, events);
            }
        }

        if self.wave.in_progress && self.living_count() == 0 && self.wave.enemies_remaining == 0 {
            self.wave.in_progress = false;
            info!("wave {} complete", self.wave.number);
            events.push(CombatEvent::WaveCompleted { wave: self.wave.number });
            self.schedule_wave(self.wave.number + 1, self.settings.wave_start_delay);
        }
    }

    pub fn nearest_in_range(&self, pos: Vec3, range: f32) -> Option<EnemyId> {
        self.living()
            .map(|e| (e.id, flat_distance(e.position, pos)))
            .filter(|(_, d)| *d <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Horizontal Distance, Height Ignored
    pub fn in_range(&self, pos: Vec3, range: f32) -> Vec<EnemyId> {
        self.living()
            .filter(|e| flat_distance(e.position, pos) <= range)
            .map(|e| e.id)
            .collect()
    }

    /// Full 3D Distance, in Roster Order, Paired With That Distance
    pub fn in_radius(&self, center: Vec3, radius: f32) -> Vec<(EnemyId, f32)> {
        self.living()
            .map(|e| (e.id, e.position.distance(center)))
            .filter(|(_, d)| *d <= radius)
            .collect()
    }

    /// Inclusive at the Boundary: `dot >= cos_half_angle`
    pub fn in_cone(&self, origin: Vec3, direction: Vec3, range: f32, cos_half_angle: f32) -> Vec<EnemyId> {
        let dir = direction.normalize_or(Vec3::Z);
        self.living()
            .filter(|e| {
                let to = e.position - origin;
                let d = to.length();
                if d > range {
                    return false;
                }
                if d < 1e-6 {
                    return true;
                }
                (to / d).dot(dir) >= cos_half_angle - 1e-6
            })
            .map(|e| e.id)
            .collect()
    }

    /// Drop Every Enemy and Any Pending Wave, Wave Number Survives
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.pending = None;
        self.wave.in_progress = false;
        self.wave.enemies_remaining = 0;
    }
}
