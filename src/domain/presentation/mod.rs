use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin};

use crate::domain::controls::Keybinds;
use crate::domain::simulation::{
    Appearance, Floor, ForceArrow, LabSettings, LoadScene, ObjectRegistry, Session, Shape,
    SimulationTick, TransientEffects,
};

mod panels;

use panels::{show_diagnostics_panel, show_help_panel, show_scene_panel, SecondLawForm};

const GRID_LINES: i32 = 30;
const GRID_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<SecondLawForm>()
            .add_systems(
                Update,
                (
                    ui_system.before(SimulationTick),
                    attach_visuals.after(SimulationTick),
                    draw_force_arrows.after(SimulationTick),
                    draw_floor_grid,
                ),
            );
    }
}

#[allow(clippy::too_many_arguments)]
fn ui_system(
    mut contexts: EguiContexts,
    settings: Res<LabSettings>,
    keybinds: Res<Keybinds>,
    mut session: ResMut<Session>,
    mut form: ResMut<SecondLawForm>,
    registry: Res<ObjectRegistry>,
    effects: Res<TransientEffects>,
    diagnostics: Res<DiagnosticsStore>,
    mut requests: EventWriter<LoadScene>,
) {
    let ctx = contexts.ctx_mut();
    show_scene_panel(ctx, &mut session, &mut form, &mut requests);
    show_help_panel(ctx, &settings, &keybinds);
    show_diagnostics_panel(ctx, &diagnostics, &settings, &registry, &effects);
}

/// Gives freshly spawned scene entities a mesh and material matching their `Appearance`.
fn attach_visuals(
    mut commands: Commands,
    added: Query<(Entity, &Appearance), Added<Appearance>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, appearance) in &added {
        let (mesh, material) = match appearance.shape {
            Shape::Sphere { radius } => (
                meshes.add(Sphere::new(radius).mesh().uv(32, 18)),
                StandardMaterial {
                    base_color: appearance.color,
                    metallic: 0.7,
                    perceptual_roughness: 0.2,
                    ..default()
                },
            ),
            Shape::Cuboid { half_extents } => (
                meshes.add(Cuboid::from_size(half_extents * 2.0)),
                StandardMaterial {
                    base_color: appearance.color,
                    perceptual_roughness: 0.9,
                    ..default()
                },
            ),
        };
        commands
            .entity(entity)
            .insert((mesh, materials.add(material)));
    }
}

fn draw_force_arrows(mut gizmos: Gizmos, arrows: Query<(&ForceArrow, &Transform)>) {
    for (arrow, transform) in &arrows {
        let start = transform.translation;
        gizmos.arrow(
            start,
            start + arrow.direction * arrow.length,
            arrow.color,
        );
    }
}

fn draw_floor_grid(mut gizmos: Gizmos, floors: Query<&Appearance, With<Floor>>) {
    let Ok(floor) = floors.get_single() else {
        return;
    };
    let Shape::Cuboid { half_extents } = floor.shape else {
        return;
    };
    // just above the top face to avoid z-fighting
    let y = 0.01;
    let step_x = half_extents.x * 2.0 / GRID_LINES as f32;
    let step_z = half_extents.z * 2.0 / GRID_LINES as f32;
    for i in 0..=GRID_LINES {
        let x = -half_extents.x + i as f32 * step_x;
        let z = -half_extents.z + i as f32 * step_z;
        gizmos.line(
            Vec3::new(x, y, -half_extents.z),
            Vec3::new(x, y, half_extents.z),
            GRID_COLOR,
        );
        gizmos.line(
            Vec3::new(-half_extents.x, y, z),
            Vec3::new(half_extents.x, y, z),
            GRID_COLOR,
        );
    }
}
