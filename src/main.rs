/*
Wavenstein - by David Petnick
*/
use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::time::Duration;

use wavelib::arena::{Arena, ArenaPlugin, ArenaSet};
use wavelib::combat::catalog::WeaponKind;
use wavelib::events::CombatEvent;
use wavelib::player::{gather_intents, InputIntents};

/// Stop After This Many Waves Are Cleared
const WAVES_TO_PLAY: u32 = 3;
/// Or After This Much Simulated Time, Whichever Comes First
const TIME_LIMIT_SECS: f32 = 300.0;

#[derive(Resource, Default)]
struct Autopilot {
    frame: u64,
}

/// Aim at the Nearest Enemy and Keep the Trigger Busy
fn autopilot(
    mut pilot: ResMut<Autopilot>,
    mut arena: ResMut<Arena>,
    mut intents: ResMut<InputIntents>,
) {
    pilot.frame += 1;
    let mut next = InputIntents::default();

    let eye = arena.pose.position;
    let target = arena
        .directory
        .nearest_in_range(eye, f32::INFINITY)
        .and_then(|id| arena.directory.get(id))
        .map(|e| e.position);

    if let Some(target) = target {
        arena.pose.aim_at(target);
        // Alternate Press/Release so Semi-Autos Keep Firing
        let pressed = pilot.frame % 2 == 0;
        next.attack_held = pressed;
        next.attack_just_pressed = pressed;
    }

    // Out of Everything: Rotate to the Next Weapon We Own
    let w = arena.inventory.equipped();
    if w.state.current_ammo <= 0.0 && w.state.reserve_ammo <= 0.0 && !w.state.is_reloading {
        let current = w.kind.slot();
        next.switch_to = (1..=WeaponKind::ALL.len() as u8)
            .map(|i| (current + i - 1) % WeaponKind::ALL.len() as u8 + 1)
            .filter_map(WeaponKind::from_slot)
            .find(|k| arena.inventory.owns(*k) && *k != w.kind);
    }

    *intents = next;
}

fn stop_when_done(
    arena: Res<Arena>,
    mut events: MessageReader<CombatEvent>,
    mut exit: MessageWriter<AppExit>,
) {
    for ev in events.read() {
        match ev {
            CombatEvent::WaveCompleted { wave } if *wave >= WAVES_TO_PLAY => {
                info!("Autopilot Finished {} Waves, Score {}", wave, arena.score);
                exit.write(AppExit::Success);
            }
            CombatEvent::PlayerDied => {
                info!("Autopilot Died on Wave {}, Score {}", arena.directory.wave().number, arena.score);
                exit.write(AppExit::Success);
            }
            _ => {}
        }
    }

    if arena.now() >= TIME_LIMIT_SECS {
        info!("Time Limit Reached, Score {}", arena.score);
        exit.write(AppExit::Success);
    }
}

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(ArenaPlugin)
        .init_resource::<Autopilot>()
        .add_systems(Update, autopilot.in_set(ArenaSet::Input).after(gather_intents))
        .add_systems(Update, stop_when_done.in_set(ArenaSet::Publish))
        .run();
}
