use bevy::prelude::*;

use super::{HeldKeys, InputAction, InputContext, Scenario, SecondLawParams, BLUE, RED};
use crate::domain::simulation::lifecycle::SceneBuilder;
use crate::domain::simulation::physics::BodyDesc;

const RADIUS: f32 = 0.5;
const MASS: f32 = 5.0;

/// Action and reaction: two equal bodies on a collision course.
pub struct ThirdLaw;

impl Scenario for ThirdLaw {
    fn body_count(&self, _params: &SecondLawParams) -> usize {
        2
    }

    fn setup(&self, scene: &mut SceneBuilder, _params: &SecondLawParams) {
        scene.add_object(
            BodyDesc::sphere(MASS, RADIUS)
                .at(Vec3::new(-10.0, RADIUS, 0.0))
                .moving(Vec3::new(8.0, 0.0, 0.0)),
            BLUE,
            None,
        );
        scene.add_object(
            BodyDesc::sphere(MASS, RADIUS)
                .at(Vec3::new(10.0, RADIUS, 0.0))
                .moving(Vec3::new(-8.0, 0.0, 0.0)),
            RED,
            None,
        );
    }

    fn handle_input(&self, keys: HeldKeys, _ctx: &InputContext) -> Vec<InputAction> {
        if keys.reset {
            vec![InputAction::Reload]
        } else {
            Vec::new()
        }
    }

    fn describe(&self) -> &'static str {
        "Two objects collide. Watch how equal and opposite forces change their motion.\n\
         Press R to restart the simulation."
    }
}
