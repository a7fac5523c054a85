use bevy::prelude::*;

use super::{HeldKeys, InputAction, InputContext, Scenario, BLUE, GREEN, RED};
use crate::domain::simulation::lifecycle::SceneBuilder;
use crate::domain::simulation::physics::BodyDesc;

const DEFAULT_FORCE: f32 = 30.0;
const DEFAULT_MASS: f32 = 1.0;
const SPACING: f32 = 5.0;
const PALETTE: [Color; 3] = [GREEN, BLUE, RED];

/// Masses and push strength for the second-law scene. Only changes between reloads.
#[derive(Clone, Debug, PartialEq)]
pub struct SecondLawParams {
    pub masses: Vec<f32>,
    /// Magnitude of the impulse applied per tick, in newton-seconds.
    pub force: f32,
}

impl Default for SecondLawParams {
    fn default() -> Self {
        Self {
            masses: vec![1.0, 5.0, 10.0],
            force: DEFAULT_FORCE,
        }
    }
}

impl SecondLawParams {
    /// Reads form text. Anything that is not a positive finite number falls back to the
    /// default for that field instead of being reported.
    pub fn from_inputs<S: AsRef<str>>(force: &str, masses: &[S]) -> Self {
        Self {
            force: parse_positive(force).unwrap_or(DEFAULT_FORCE),
            masses: masses
                .iter()
                .map(|m| parse_positive(m.as_ref()).unwrap_or(DEFAULT_MASS))
                .collect(),
        }
    }

    /// a = F / m for each mass.
    pub fn accelerations(&self) -> impl Iterator<Item = f32> + '_ {
        self.masses.iter().map(move |m| self.force / m)
    }
}

fn parse_positive(text: &str) -> Option<f32> {
    let value = text.trim().parse::<f32>().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        debug!("ignoring form value {text:?}");
        None
    }
}

fn radius_for_mass(mass: f32) -> f32 {
    0.25 * mass.cbrt()
}

/// F = m·a: the same push on bodies of different mass.
pub struct SecondLaw;

impl Scenario for SecondLaw {
    fn body_count(&self, params: &SecondLawParams) -> usize {
        params.masses.len()
    }

    fn setup(&self, scene: &mut SceneBuilder, params: &SecondLawParams) {
        for (i, &mass) in params.masses.iter().enumerate() {
            let radius = radius_for_mass(mass);
            let x = -SPACING + i as f32 * SPACING;
            scene.add_object(
                BodyDesc::sphere(mass, radius).at(Vec3::new(x, radius, 0.0)),
                PALETTE[i % PALETTE.len()],
                None,
            );
        }
    }

    fn handle_input(&self, keys: HeldKeys, ctx: &InputContext) -> Vec<InputAction> {
        if !keys.apply_force {
            return Vec::new();
        }
        let impulse = Vec3::new(0.0, 0.0, -ctx.params.force);
        let mut actions: Vec<InputAction> = ctx
            .objects
            .iter()
            .map(|o| InputAction::Impulse {
                body: o.body,
                impulse,
            })
            .collect();
        actions.push(InputAction::ShowForceArrows);
        actions
    }

    fn describe(&self) -> &'static str {
        "Set the force and the masses, then hold F to apply the force."
    }
}
