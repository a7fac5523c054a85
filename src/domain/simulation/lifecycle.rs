//! Scene lifecycle: world creation or reuse, clearing, and scenario setup.

use bevy::prelude::*;

use super::effects::TransientEffects;
use super::physics::{BodyDesc, BodyHandle, PhysicsWorld, Shape, WorldFactory};
use super::registry::{ObjectRegistry, ObjectTag, SimulatedObject, SimulatedVisual};
use super::scenarios::{ScenarioId, SecondLawParams};
use super::LabSettings;

const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(15.0, 0.5, 15.0);
const FLOOR_COLOR: Color = Color::srgb(0.8, 0.8, 0.8);

/// Request to (re)load a scenario at the next tick boundary.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadScene(pub ScenarioId);

/// Viewer session: which scenario is up and the parameters it was built with.
#[derive(Resource, Default)]
pub struct Session {
    pub active: Option<ScenarioId>,
    pub second_law: SecondLawParams,
    pub description: &'static str,
}

/// How a scene entity should look. The presentation layer turns it into a mesh.
#[derive(Component, Clone, Copy, Debug)]
pub struct Appearance {
    pub shape: Shape,
    pub color: Color,
}

/// Marker for the static platform visual.
#[derive(Component)]
pub struct Floor;

pub struct SceneBuilder<'a> {
    world: &'a mut World,
    physics: &'a mut PhysicsWorld,
    registry: &'a mut ObjectRegistry,
}

impl<'a> SceneBuilder<'a> {
    fn spawn_visual(&mut self, desc: &BodyDesc, color: Color) -> Entity {
        self.world
            .spawn((
                Appearance {
                    shape: desc.shape,
                    color,
                },
                SpatialBundle::from_transform(Transform::from_translation(desc.position)),
            ))
            .id()
    }

    /// Static body whose visual never moves; not counted as a scene object.
    pub fn add_fixture(&mut self, desc: BodyDesc, color: Color) -> Entity {
        self.physics.add_body(desc);
        let visual = self.spawn_visual(&desc, color);
        self.registry.register_fixture(visual);
        visual
    }

    pub fn add_object(
        &mut self,
        desc: BodyDesc,
        color: Color,
        tag: Option<ObjectTag>,
    ) -> BodyHandle {
        let body = self.physics.add_body(desc);
        let visual = self.spawn_visual(&desc, color);
        self.world.entity_mut(visual).insert(SimulatedVisual);
        self.registry.register(SimulatedObject { body, visual, tag });
        body
    }
}

/// Loads `id`, rebuilding the scene from scratch. Runs with exclusive world access, so no
/// system ever observes a half-built scene.
pub fn load_scene(world: &mut World, id: ScenarioId) {
    let is_reload = world.resource::<Session>().active == Some(id);

    if is_reload && world.contains_resource::<PhysicsWorld>() {
        debug!("reusing physics world for {id}");
    } else {
        let gravity = world.resource::<LabSettings>().gravity;
        let physics = world.resource::<WorldFactory>().create(gravity);
        debug!(world = ?physics.id(), "created physics world for {id}");
        world.insert_resource(physics);
    }

    clear_scene(world);

    let params = world.resource::<Session>().second_law.clone();
    let scenario = id.behavior();
    world.resource_scope(|world, mut physics: Mut<PhysicsWorld>| {
        world.resource_scope(|world, mut registry: Mut<ObjectRegistry>| {
            let mut scene = SceneBuilder {
                world,
                physics: &mut *physics,
                registry: &mut *registry,
            };
            let floor = scene.add_fixture(
                BodyDesc::fixed_cuboid(FLOOR_HALF_EXTENTS)
                    .at(Vec3::new(0.0, -FLOOR_HALF_EXTENTS.y, 0.0)),
                FLOOR_COLOR,
            );
            scene.world.entity_mut(floor).insert(Floor);
            scenario.setup(&mut scene, &params);
        });
    });

    {
        let mut session = world.resource_mut::<Session>();
        session.active = Some(id);
        session.description = scenario.describe();
    }

    info!(
        reload = is_reload,
        objects = world.resource::<ObjectRegistry>().len(),
        "loaded {id}"
    );
}

/// Removes every scene visual and annotation and empties the physics world of bodies.
fn clear_scene(world: &mut World) {
    let mut doomed = world.resource_mut::<ObjectRegistry>().take_visuals();
    doomed.extend(world.resource_mut::<TransientEffects>().drain());
    for entity in doomed {
        world.despawn(entity);
    }
    if let Some(mut physics) = world.get_resource_mut::<PhysicsWorld>() {
        physics.remove_all_bodies();
    }
}

/// Applies queued scene requests in order, each one to completion.
pub fn apply_scene_requests(world: &mut World) {
    let requests: Vec<LoadScene> = world.resource_mut::<Events<LoadScene>>().drain().collect();
    for LoadScene(id) in requests {
        load_scene(world, id);
    }
}
