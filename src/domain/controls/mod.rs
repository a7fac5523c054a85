use crate::domain::simulation::{HeldKeys, LabSettings, SimulationTick};
use bevy::prelude::*;

#[derive(Resource)]
pub struct Keybinds {
    pub apply_force: KeyCode,
    pub reset: KeyCode,
    pub help: KeyCode,
    pub diagnostics: KeyCode,
}

impl Default for Keybinds {
    fn default() -> Self {
        Self {
            apply_force: KeyCode::KeyF,
            reset: KeyCode::KeyR,
            help: KeyCode::KeyH,
            diagnostics: KeyCode::F3,
        }
    }
}

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Keybinds>().add_systems(
            Update,
            (
                capture_held_keys.before(SimulationTick),
                help_toggle,
                diagnostics_toggle,
            ),
        );
    }
}

/// Snapshots which logical keys are down this frame. Held, not just pressed.
pub fn capture_held_keys(
    keys: Res<ButtonInput<KeyCode>>,
    keybinds: Res<Keybinds>,
    mut held: ResMut<HeldKeys>,
) {
    let next = HeldKeys {
        apply_force: keys.pressed(keybinds.apply_force),
        reset: keys.pressed(keybinds.reset),
    };
    // avoid tripping change detection every frame
    held.set_if_neq(next);
}

fn help_toggle(
    mut settings: ResMut<LabSettings>,
    keys: Res<ButtonInput<KeyCode>>,
    keybinds: Res<Keybinds>,
) {
    if keys.just_pressed(keybinds.help) {
        settings.show_help = !settings.show_help;
    }
}

fn diagnostics_toggle(
    mut settings: ResMut<LabSettings>,
    keys: Res<ButtonInput<KeyCode>>,
    keybinds: Res<Keybinds>,
) {
    if keys.just_pressed(keybinds.diagnostics) {
        settings.show_diagnostics = !settings.show_diagnostics;
    }
}
