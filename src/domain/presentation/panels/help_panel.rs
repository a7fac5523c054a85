use bevy::prelude::*;
use bevy_egui::egui;

use crate::domain::controls::Keybinds;
use crate::domain::simulation::LabSettings;

pub fn show_help_panel(ctx: &mut egui::Context, settings: &LabSettings, keybinds: &Keybinds) {
    if settings.show_help {
        egui::Window::new("Help")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .show(ctx, |ui| {
                ui.label(format!("{}: Apply force", key_name(keybinds.apply_force)));
                ui.label(format!("{}: Restart collision", key_name(keybinds.reset)));
                ui.label(format!("{}: Toggle Help", key_name(keybinds.help)));
                ui.label(format!("{}: Toggle Diagnostics", key_name(keybinds.diagnostics)));
            });
    }
}

fn key_name(key: KeyCode) -> String {
    let name = format!("{key:?}");
    name.strip_prefix("Key").map(str::to_string).unwrap_or(name)
}
