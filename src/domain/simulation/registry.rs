use bevy::prelude::*;

use super::physics::{BodyHandle, PhysicsWorld, RigidBodyWorld};

/// Semantic label used by scenarios to aim input at a specific object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectTag {
    RestingBody,
}

/// A rigid body paired with the entity that draws it.
#[derive(Clone, Copy, Debug)]
pub struct SimulatedObject {
    pub body: BodyHandle,
    pub visual: Entity,
    pub tag: Option<ObjectTag>,
}

/// Marker for entities whose transform is driven by the physics world.
#[derive(Component)]
pub struct SimulatedVisual;

/// Objects of the active scene. Static fixtures (the floor) are kept apart and are not part of
/// the scene's declared body count.
#[derive(Resource, Default)]
pub struct ObjectRegistry {
    objects: Vec<SimulatedObject>,
    fixtures: Vec<Entity>,
}

impl ObjectRegistry {
    pub fn register(&mut self, object: SimulatedObject) {
        self.objects.push(object);
    }

    pub fn register_fixture(&mut self, visual: Entity) {
        self.fixtures.push(visual);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulatedObject> {
        self.objects.iter()
    }

    pub fn tagged(&self, tag: ObjectTag) -> Option<&SimulatedObject> {
        self.objects.iter().find(|o| o.tag == Some(tag))
    }

    /// Empties the registry, returning every visual it referenced.
    pub fn take_visuals(&mut self) -> Vec<Entity> {
        let mut visuals: Vec<Entity> = self.objects.drain(..).map(|o| o.visual).collect();
        visuals.append(&mut self.fixtures);
        visuals
    }

    /// Current pose of each object's body, paired with its visual.
    pub fn poses<'a>(
        &'a self,
        world: &'a dyn RigidBodyWorld,
    ) -> impl Iterator<Item = (Entity, Vec3, Quat)> + 'a {
        self.objects.iter().filter_map(move |o| {
            Some((o.visual, world.position(o.body)?, world.rotation(o.body)?))
        })
    }
}

pub fn sync_visuals(
    physics: Option<Res<PhysicsWorld>>,
    registry: Res<ObjectRegistry>,
    mut visuals: Query<&mut Transform, With<SimulatedVisual>>,
) {
    let Some(physics) = physics else {
        return;
    };
    for (entity, position, rotation) in registry.poses(&**physics) {
        if let Ok(mut transform) = visuals.get_mut(entity) {
            transform.translation = position;
            transform.rotation = rotation;
        }
    }
}
