/*
Wavenstein - by David Petnick

Patrol routes for arena enemies.

A route is a closed loop of waypoints on the XZ plane. The walker
heads for the current waypoint at the enemy's move speed, waits
out a dwell timer on arrival, then advances to the next one,
wrapping back to the first after the last.
*/

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::RngExt;
use std::f32::consts::TAU;

use crate::ai::{flat_distance, step_toward};

/// Close Enough to Count as Standing on a Waypoint
pub const ARRIVE_EPS: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    index: usize,
    dwell_secs: f32,
    /// Running Only While Parked on a Waypoint
    dwell: Option<Timer>,
}

impl PatrolRoute {
    /// `None` for an Empty Waypoint List
    pub fn new(waypoints: Vec<Vec3>, dwell_secs: f32) -> Option<Self> {
        if waypoints.is_empty() {
            return None;
        }
        Some(Self {
            waypoints,
            index: 0,
            dwell_secs,
            dwell: None,
        })
    }

    /// Four to Six Points Scattered Around `center`
    pub fn around(center: Vec3, radius: f32, dwell_secs: f32, rng: &mut StdRng) -> Self {
        let count = rng.random_range(4..=6usize);
        let phase = rng.random_range(0.0..TAU);

        let waypoints = (0..count)
            .map(|i| {
                let a = phase + TAU * i as f32 / count as f32;
                let r = radius * rng.random_range(0.5..=1.0);
                Vec3::new(center.x + a.sin() * r, center.y, center.z + a.cos() * r)
            })
            .collect();

        Self {
            waypoints,
            index: 0,
            dwell_secs,
            dwell: None,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.waypoints[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn is_dwelling(&self) -> bool {
        self.dwell.is_some()
    }

    /// Advance One Tick, Returning the New Position
    pub fn walk(&mut self, position: Vec3, speed: f32, dt: f32) -> Vec3 {
        if let Some(timer) = self.dwell.as_mut() {
            timer.tick(std::time::Duration::from_secs_f32(dt.max(0.0)));
            if timer.is_finished() {
                self.dwell = None;
                self.index = (self.index + 1) % self.waypoints.len();
            }
            return position;
        }

        let target = self.target();
        let next = step_toward(position, target, speed, dt);
        if flat_distance(next, target) <= ARRIVE_EPS {
            self.dwell = Some(Timer::from_seconds(self.dwell_secs, TimerMode::Once));
        }
        next
    }
}
