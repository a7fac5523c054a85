use bevy::prelude::*;
use bevy_egui::egui;

use crate::domain::simulation::{LoadScene, ScenarioId, SecondLawParams, Session};

/// Text the viewer is editing for the second-law scene. Parsed only on apply.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SecondLawForm {
    pub force: String,
    pub masses: Vec<String>,
}

impl SecondLawForm {
    pub fn from_params(params: &SecondLawParams) -> Self {
        Self {
            force: params.force.to_string(),
            masses: params.masses.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Parses the fields into the session and asks for a reload. The form is rewritten with
    /// the values actually used so fallbacks are visible.
    pub fn apply(&mut self, session: &mut Session) -> LoadScene {
        session.second_law = SecondLawParams::from_inputs(&self.force, &self.masses);
        *self = Self::from_params(&session.second_law);
        LoadScene(ScenarioId::SecondLaw)
    }
}

impl Default for SecondLawForm {
    fn default() -> Self {
        Self::from_params(&SecondLawParams::default())
    }
}

pub fn show_scene_panel(
    ctx: &mut egui::Context,
    session: &mut Session,
    form: &mut SecondLawForm,
    requests: &mut EventWriter<LoadScene>,
) {
    egui::Window::new("Newton's Laws").show(ctx, |ui| {
        ui.horizontal(|ui| {
            for id in ScenarioId::ALL {
                if ui
                    .selectable_label(session.active == Some(id), id.title())
                    .clicked()
                {
                    requests.send(LoadScene(id));
                }
            }
        });

        ui.separator();
        ui.label(session.description);

        if session.active != Some(ScenarioId::SecondLaw) {
            return;
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Force (N):");
            ui.text_edit_singleline(&mut form.force);
        });
        for (i, (text, accel)) in form
            .masses
            .iter_mut()
            .zip(session.second_law.accelerations())
            .enumerate()
        {
            ui.horizontal(|ui| {
                ui.label(format!("Mass {} (kg):", i + 1));
                ui.text_edit_singleline(text);
                ui.label(format!("a = {accel:.2} m/s²"));
            });
        }
        if ui.button("Apply and reload").clicked() {
            requests.send(form.apply(session));
        }
    });
}
