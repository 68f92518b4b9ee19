/*
Wavenstein - by David Petnick
*/
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub cur: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { cur: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.cur <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.cur / self.max).clamp(0.0, 1.0)
    }

    /// Returns Amount Actually Restored
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.cur;
        self.cur = (self.cur + amount).min(self.max);
        self.cur - before
    }
}

/// Stable Roster Key, Never Reused Within an Arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EnemyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PickupId(pub u32);
