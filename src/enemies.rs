/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actors::{EnemyId, Health};
use crate::ai::{self, EnemyAiState};
use crate::ai_patrol::PatrolRoute;
use crate::events::CombatEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Soldier,
    Heavy,
    Sniper,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Grunt,
        EnemyKind::Soldier,
        EnemyKind::Heavy,
        EnemyKind::Sniper,
    ];

    /// Unknown Names Degrade to a Grunt
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "grunt" => EnemyKind::Grunt,
            "soldier" => EnemyKind::Soldier,
            "heavy" => EnemyKind::Heavy,
            "sniper" => EnemyKind::Sniper,
            other => {
                warn!("unknown enemy type {:?}, spawning a grunt", other);
                EnemyKind::Grunt
            }
        }
    }

    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Grunt => EnemyStats {
                max_health: 50.0,
                move_speed: 2.0,
                chase_speed: 4.0,
                rotation_speed: 5.0,
                damage: 8.0,
                attack_range: 2.5,
                attack_cooldown: 1.0,
                detection_range: 35.0,
                lose_sight_range: 50.0,
                score_value: 100,
            },
            EnemyKind::Soldier => EnemyStats {
                max_health: 80.0,
                move_speed: 2.5,
                chase_speed: 4.5,
                rotation_speed: 4.0,
                damage: 12.0,
                attack_range: 15.0,
                attack_cooldown: 1.5,
                detection_range: 40.0,
                lose_sight_range: 55.0,
                score_value: 200,
            },
            EnemyKind::Heavy => EnemyStats {
                max_health: 200.0,
                move_speed: 1.5,
                chase_speed: 2.5,
                rotation_speed: 2.5,
                damage: 25.0,
                attack_range: 8.0,
                attack_cooldown: 2.5,
                detection_range: 30.0,
                lose_sight_range: 45.0,
                score_value: 500,
            },
            EnemyKind::Sniper => EnemyStats {
                max_health: 60.0,
                move_speed: 2.0,
                chase_speed: 3.0,
                rotation_speed: 3.0,
                damage: 35.0,
                attack_range: 35.0,
                attack_cooldown: 3.0,
                detection_range: 55.0,
                lose_sight_range: 70.0,
                score_value: 300,
            },
        }
    }
}

/// Per-Type Tuning, Copied Into Each Enemy at Spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub max_health: f32,
    pub move_speed: f32,
    pub chase_speed: f32,
    /// Radians per Second
    pub rotation_speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub detection_range: f32,
    pub lose_sight_range: f32,
    pub score_value: u32,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub stats: EnemyStats,
    pub health: Health,
    pub state: EnemyAiState,
    pub position: Vec3,
    pub yaw: f32,
    pub last_attack_time: f32,
    pub patrol: Option<PatrolRoute>,
    cleanup_delay: f32,
    /// Started on Death, Removal Happens When It Finishes
    cleanup: Option<Timer>,
}

impl Enemy {
    pub fn new(id: EnemyId, kind: EnemyKind, position: Vec3, cleanup_delay: f32) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            stats,
            health: Health::new(stats.max_health),
            state: EnemyAiState::Idle,
            position,
            yaw: 0.0,
            last_attack_time: 0.0,
            patrol: None,
            cleanup_delay,
            cleanup: None,
        }
    }

    /// Start Walking `route` Right Away
    pub fn with_patrol(mut self, route: PatrolRoute) -> Self {
        self.patrol = Some(route);
        self.state = EnemyAiState::Patrol;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.state != EnemyAiState::Dead
    }

    /// Returns `true` Only for the Hit That Kills
    pub fn take_damage(&mut self, amount: f32, events: &mut Vec<CombatEvent>) -> bool {
        if !self.is_alive() {
            return false;
        }

        self.health.cur -= amount;
        if self.health.is_depleted() {
            self.state = EnemyAiState::Dead;
            self.cleanup = Some(Timer::from_seconds(self.cleanup_delay, TimerMode::Once));
            debug!("{:?} {:?} died at {:?}", self.kind, self.id, self.position);
            events.push(CombatEvent::EnemyDied {
                id: self.id,
                kind: self.kind,
                position: self.position,
                score: self.stats.score_value,
            });
            return true;
        }

        events.push(CombatEvent::EnemyHurt {
            id: self.id,
            damage: amount,
            health: self.health.cur,
        });
        false
    }

    /// Ticks the Post-Death Timer, `true` Once the Body Should Leave the Roster
    pub fn tick_cleanup(&mut self, dt: f32) -> bool {
        let Some(timer) = self.cleanup.as_mut() else {
            return false;
        };
        timer.tick(std::time::Duration::from_secs_f32(dt.max(0.0)));
        timer.is_finished()
    }

    fn face(&mut self, target: Vec3, dt: f32) {
        if let Some(want) = ai::yaw_to(self.position, target) {
            self.yaw = ai::turn_toward(self.yaw, want, self.stats.rotation_speed, dt);
        }
    }

    /// One AI Tick Against the Player's Current Position
    pub fn think(&mut self, dt: f32, now: f32, player: Vec3, events: &mut Vec<CombatEvent>) {
        if !self.is_alive() {
            return;
        }

        let dist = ai::flat_distance(self.position, player);
        let next = ai::next_state(self.state, dist, &self.stats);
        if next != self.state {
            trace!("{:?} {:?}: {:?} -> {:?} at {:.1}", self.kind, self.id, self.state, next, dist);
            self.state = next;
        }

        match self.state {
            EnemyAiState::Idle | EnemyAiState::Dead => {}
            EnemyAiState::Patrol => {
                // No Route Means Standing Watch
                let Some(route) = self.patrol.as_mut() else {
                    return;
                };
                let target = route.target();
                self.position = route.walk(self.position, self.stats.move_speed, dt);
                self.face(target, dt);
            }
            EnemyAiState::Chase => {
                self.face(player, dt);
                self.position = ai::step_toward(self.position, player, self.stats.chase_speed, dt);
            }
            EnemyAiState::Attack => {
                self.face(player, dt);
                if now - self.last_attack_time >= self.stats.attack_cooldown {
                    self.last_attack_time = now;
                    events.push(CombatEvent::EnemyAttack {
                        id: self.id,
                        damage: self.stats.damage,
                    });
                }
            }
        }
    }
}
