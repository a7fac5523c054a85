use bevy::prelude::*;

use super::{HeldKeys, InputAction, InputContext, Scenario, SecondLawParams, BLUE, GREEN};
use crate::domain::simulation::lifecycle::SceneBuilder;
use crate::domain::simulation::physics::BodyDesc;
use crate::domain::simulation::registry::ObjectTag;

const RADIUS: f32 = 0.5;
const PUSH: Vec3 = Vec3::new(0.0, 0.0, -15.0);

/// Inertia: one body at rest, one already moving.
pub struct FirstLaw;

impl Scenario for FirstLaw {
    fn body_count(&self, _params: &SecondLawParams) -> usize {
        2
    }

    fn setup(&self, scene: &mut SceneBuilder, _params: &SecondLawParams) {
        scene.add_object(
            BodyDesc::sphere(5.0, RADIUS).at(Vec3::new(-3.0, RADIUS, 0.0)),
            BLUE,
            Some(ObjectTag::RestingBody),
        );
        scene.add_object(
            BodyDesc::sphere(2.0, RADIUS)
                .at(Vec3::new(3.0, RADIUS, 0.0))
                .moving(Vec3::new(-5.0, 0.0, 0.0)),
            GREEN,
            None,
        );
    }

    fn handle_input(&self, keys: HeldKeys, ctx: &InputContext) -> Vec<InputAction> {
        if !keys.apply_force {
            return Vec::new();
        }
        ctx.objects
            .tagged(ObjectTag::RestingBody)
            .map(|resting| InputAction::Impulse {
                body: resting.body,
                impulse: PUSH,
            })
            .into_iter()
            .collect()
    }

    fn describe(&self) -> &'static str {
        "An object at rest (blue) and another in motion (green).\n\
         Hold F to push the blue object and break its inertia."
    }
}
