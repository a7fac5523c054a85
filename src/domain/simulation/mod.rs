//! Authoritative simulation state: the physics world, the active scene and the per-frame tick.

use std::time::Duration;

use bevy::prelude::*;

pub mod effects;
pub mod input;
pub mod lifecycle;
pub mod physics;
pub mod registry;
pub mod scenarios;

#[cfg(test)]
pub(crate) mod test_support;

pub use effects::{ForceArrow, TransientEffects};
pub use lifecycle::{Appearance, Floor, LoadScene, Session};
pub use physics::{PhysicsWorld, Shape, WorldFactory};
pub use registry::ObjectRegistry;
pub use scenarios::{HeldKeys, ScenarioId, SecondLawParams};

use effects::expire_transients;
use input::dispatch_input;
use lifecycle::{apply_scene_requests, load_scene};
use registry::sync_visuals;
use scenarios::ParseScenarioError;

/// Environment variable naming the scenario shown at startup (`law1`, `law2`, `law3`).
pub const SCENE_ENV: &str = "NEWTON_LAB_SCENE";

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LabState {
    #[default]
    Uninitialized,
    Running,
}

/// Input dispatch, scene requests, physics step and visual sync, in that order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationTick;

#[derive(Resource, Clone, Debug)]
pub struct LabSettings {
    pub gravity: Vec3,
    /// Fixed physics step, independent of frame time.
    pub timestep: f32,
    pub force_arrow_ttl: Duration,
    pub initial_scene: ScenarioId,
    pub show_help: bool,
    pub show_diagnostics: bool,
}

impl Default for LabSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            timestep: 1.0 / 60.0,
            force_arrow_ttl: Duration::from_millis(500),
            initial_scene: ScenarioId::FirstLaw,
            show_help: true,
            show_diagnostics: false,
        }
    }
}

impl LabSettings {
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(raw) = std::env::var(SCENE_ENV) {
            if let Err(err) = settings.override_scene(&raw) {
                warn!("{SCENE_ENV}: {err}; starting with {}", settings.initial_scene);
            }
        }
        settings
    }

    pub fn override_scene(&mut self, raw: &str) -> Result<(), ParseScenarioError> {
        self.initial_scene = raw.parse()?;
        Ok(())
    }
}

impl FromWorld for TransientEffects {
    fn from_world(world: &mut World) -> Self {
        let ttl = world
            .get_resource::<LabSettings>()
            .map(|s| s.force_arrow_ttl)
            .unwrap_or_else(|| LabSettings::default().force_arrow_ttl);
        TransientEffects::new(ttl)
    }
}

pub struct SimPlugin;
impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<LabSettings>() {
            app.insert_resource(LabSettings::from_env());
        }
        app.init_resource::<Session>()
            .init_resource::<ObjectRegistry>()
            .init_resource::<WorldFactory>()
            .init_resource::<TransientEffects>()
            .init_resource::<HeldKeys>()
            .init_state::<LabState>()
            .add_event::<LoadScene>()
            .add_systems(Startup, initialize)
            .add_systems(
                Update,
                (dispatch_input, apply_scene_requests, step_physics, sync_visuals)
                    .chain()
                    .in_set(SimulationTick)
                    .run_if(in_state(LabState::Running)),
            )
            .add_systems(Update, expire_transients.before(SimulationTick));
    }
}

fn initialize(world: &mut World) {
    let first = world.resource::<LabSettings>().initial_scene;
    load_scene(world, first);
    world
        .resource_mut::<NextState<LabState>>()
        .set(LabState::Running);
}

pub fn step_physics(physics: Option<ResMut<PhysicsWorld>>, settings: Res<LabSettings>) {
    let Some(mut physics) = physics else {
        return;
    };
    physics.step(settings.timestep);
}
