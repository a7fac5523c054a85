//! Headless fixtures for simulation tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::prelude::*;

use super::effects::TransientEffects;
use super::lifecycle::{LoadScene, Session};
use super::physics::{BodyDesc, BodyHandle, RapierWorld, RigidBodyWorld, WorldFactory};
use super::registry::ObjectRegistry;
use super::scenarios::HeldKeys;
use super::LabSettings;

/// A world with every resource the tick expects, no scene loaded and no window.
pub fn lab_world() -> World {
    let mut world = World::new();
    world.insert_resource(LabSettings::default());
    world.init_resource::<Session>();
    world.init_resource::<ObjectRegistry>();
    world.init_resource::<WorldFactory>();
    world.init_resource::<HeldKeys>();
    world.insert_resource(TransientEffects::new(Duration::from_millis(500)));
    world.init_resource::<Events<LoadScene>>();
    world.insert_resource(Time::<Real>::default());
    world
}

/// Real physics that also records every step it is asked to take.
pub struct RecordingWorld {
    inner: RapierWorld,
    steps: Arc<Mutex<Vec<f32>>>,
}

impl RigidBodyWorld for RecordingWorld {
    fn gravity(&self) -> Vec3 {
        self.inner.gravity()
    }

    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.inner.add_body(desc)
    }

    fn remove_all_bodies(&mut self) {
        self.inner.remove_all_bodies();
    }

    fn body_count(&self) -> usize {
        self.inner.body_count()
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3, point: Vec3) {
        self.inner.apply_impulse(body, impulse, point);
    }

    fn position(&self, body: BodyHandle) -> Option<Vec3> {
        self.inner.position(body)
    }

    fn rotation(&self, body: BodyHandle) -> Option<Quat> {
        self.inner.rotation(body)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.inner.velocity(body)
    }

    fn step(&mut self, dt: f32) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push(dt);
        }
        self.inner.step(dt);
    }
}

/// Factory whose worlds share one step log, returned alongside it.
pub fn recording_factory() -> (WorldFactory, Arc<Mutex<Vec<f32>>>) {
    let steps = Arc::new(Mutex::new(Vec::new()));
    let log = steps.clone();
    let factory = WorldFactory::new(move |gravity| {
        Box::new(RecordingWorld {
            inner: RapierWorld::new(gravity),
            steps: log.clone(),
        })
    });
    (factory, steps)
}
