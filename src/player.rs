/*
Wavenstein - by David Petnick
*/
use bevy::prelude::*;

use crate::actors::Health;
use crate::combat::catalog::WeaponKind;
use crate::events::CombatEvent;
use crate::physics::BodyId;

pub const EYE_HEIGHT: f32 = 1.6;

/// One Frame's Worth of Player Intent, Polled Once per Frame
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputIntents {
    pub attack_held: bool,
    pub attack_just_pressed: bool,
    pub reload_just_pressed: bool,
    pub switch_to: Option<WeaponKind>,
    /// X = Strafe Right, Y = Forward
    pub movement: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerVitals {
    pub health: Health,
    dead: bool,
}

impl PlayerVitals {
    pub fn new(max: f32) -> Self {
        Self {
            health: Health::new(max),
            dead: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn take_damage(&mut self, amount: f32, events: &mut Vec<CombatEvent>) {
        if self.dead {
            return;
        }

        self.health.cur = (self.health.cur - amount).max(0.0);
        events.push(CombatEvent::PlayerHurt {
            damage: amount,
            health: self.health.cur,
        });

        if self.health.is_depleted() {
            self.dead = true;
            info!("player died");
            events.push(CombatEvent::PlayerDied);
        }
    }

    /// Corpses Don't Heal
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.dead {
            return 0.0;
        }
        self.health.heal(amount)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerPose {
    /// Eye Position
    pub position: Vec3,
    /// Unit Aim Direction
    pub aim: Vec3,
    pub body: Option<BodyId>,
}

impl Default for PlayerPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, EYE_HEIGHT, 0.0),
            aim: Vec3::Z,
            body: None,
        }
    }
}

impl PlayerPose {
    pub fn set_aim(&mut self, dir: Vec3) {
        self.aim = dir.normalize_or(self.aim);
    }

    pub fn aim_at(&mut self, target: Vec3) {
        self.set_aim(target - self.position);
    }

    /// Walk Relative to Aim Yaw, XZ Only, Clamped Inside the Arena
    pub fn apply_movement(&mut self, movement: Vec2, speed: f32, dt: f32, half_extent: f32) {
        let forward = Vec3::new(self.aim.x, 0.0, self.aim.z).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let right = forward.cross(Vec3::Y);

        let wish = (forward * movement.y + right * movement.x).normalize_or_zero();
        if wish == Vec3::ZERO {
            return;
        }

        self.position += wish * speed * dt;
        self.position.x = self.position.x.clamp(-half_extent, half_extent);
        self.position.z = self.position.z.clamp(-half_extent, half_extent);
    }
}

/// Fill InputIntents From Keyboard/Mouse When Those Resources Exist
pub fn gather_intents(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mut intents: ResMut<InputIntents>,
) {
    let Some(keys) = keys else {
        return;
    };

    let mut next = InputIntents::default();

    if let Some(mouse) = mouse.as_ref() {
        next.attack_held = mouse.pressed(MouseButton::Left);
        next.attack_just_pressed = mouse.just_pressed(MouseButton::Left);
    }
    // Ctrl Fires Too, Like the Old Days
    if keys.pressed(KeyCode::ControlLeft) {
        next.attack_held = true;
    }
    if keys.just_pressed(KeyCode::ControlLeft) {
        next.attack_just_pressed = true;
    }

    next.reload_just_pressed = keys.just_pressed(KeyCode::KeyR);
    next.switch_to = keys.get_just_pressed().find_map(|k| WeaponKind::from_digit_key(*k));

    let mut mv = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) { mv.y += 1.0; }
    if keys.pressed(KeyCode::KeyS) { mv.y -= 1.0; }
    if keys.pressed(KeyCode::KeyD) { mv.x += 1.0; }
    if keys.pressed(KeyCode::KeyA) { mv.x -= 1.0; }
    next.movement = mv;

    *intents = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_dies_once() {
        let mut v = PlayerVitals::new(100.0);
        let mut events = Vec::new();

        v.take_damage(60.0, &mut events);
        v.take_damage(60.0, &mut events);
        v.take_damage(60.0, &mut events);

        assert!(v.is_dead());
        assert_eq!(v.health.cur, 0.0);
        assert_eq!(events.iter().filter(|e| **e == CombatEvent::PlayerDied).count(), 1);
        assert_eq!(v.heal(50.0), 0.0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut v = PlayerVitals::new(100.0);
        let mut events = Vec::new();
        v.take_damage(30.0, &mut events);
        assert_eq!(v.heal(50.0), 30.0);
        assert_eq!(v.health.cur, 100.0);
    }

    #[test]
    fn test_movement_follows_aim_yaw() {
        let mut pose = PlayerPose::default();
        pose.set_aim(Vec3::X);

        pose.apply_movement(Vec2::new(0.0, 1.0), 6.0, 0.5, 50.0);
        assert!((pose.position.x - 3.0).abs() < 1e-5);
        assert_eq!(pose.position.y, EYE_HEIGHT);

        // Strafing Right While Facing +X Heads Toward +Z
        pose.apply_movement(Vec2::new(1.0, 0.0), 6.0, 0.5, 50.0);
        assert!((pose.position.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_movement_clamped_to_arena() {
        let mut pose = PlayerPose::default();
        pose.apply_movement(Vec2::new(0.0, 1.0), 6.0, 100.0, 50.0);
        assert_eq!(pose.position.z, 50.0);
    }

    #[test]
    fn test_gather_intents_reads_keyboard() {
        let mut app = App::new();
        app.init_resource::<InputIntents>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ButtonInput<MouseButton>>();
        app.add_systems(Update, gather_intents);

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyW);
            keys.press(KeyCode::Digit3);
            keys.press(KeyCode::KeyR);
        }
        app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Left);
        app.update();

        let intents = app.world().resource::<InputIntents>();
        assert_eq!(intents.movement, Vec2::new(0.0, 1.0));
        assert_eq!(intents.switch_to, WeaponKind::from_slot(3));
        assert!(intents.reload_just_pressed);
        assert!(intents.attack_held);
        assert!(intents.attack_just_pressed);
    }
}
