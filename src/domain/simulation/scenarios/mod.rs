//! The three law demonstrations as a closed set of scenario behaviours.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;

use super::lifecycle::SceneBuilder;
use super::physics::BodyHandle;
use super::registry::ObjectRegistry;

mod first_law;
mod second_law;
mod third_law;

pub use second_law::SecondLawParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    FirstLaw,
    SecondLaw,
    ThirdLaw,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 3] = [
        ScenarioId::FirstLaw,
        ScenarioId::SecondLaw,
        ScenarioId::ThirdLaw,
    ];

    pub fn behavior(self) -> &'static dyn Scenario {
        match self {
            ScenarioId::FirstLaw => &first_law::FirstLaw,
            ScenarioId::SecondLaw => &second_law::SecondLaw,
            ScenarioId::ThirdLaw => &third_law::ThirdLaw,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ScenarioId::FirstLaw => "First Law",
            ScenarioId::SecondLaw => "Second Law",
            ScenarioId::ThirdLaw => "Third Law",
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario `{0}` (expected law1, law2 or law3)")]
pub struct ParseScenarioError(String);

impl FromStr for ScenarioId {
    type Err = ParseScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "law1" | "first" => Ok(ScenarioId::FirstLaw),
            "law2" | "second" => Ok(ScenarioId::SecondLaw),
            "law3" | "third" => Ok(ScenarioId::ThirdLaw),
            _ => Err(ParseScenarioError(s.to_string())),
        }
    }
}

/// Logical keys held during the current frame.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub apply_force: bool,
    pub reset: bool,
}

pub struct InputContext<'a> {
    pub objects: &'a ObjectRegistry,
    pub params: &'a SecondLawParams,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    /// Applied at the body's current position.
    Impulse { body: BodyHandle, impulse: Vec3 },
    ShowForceArrows,
    Reload,
}

pub trait Scenario: Sync {
    /// Number of dynamic bodies `setup` registers, floor excluded.
    fn body_count(&self, params: &SecondLawParams) -> usize;

    fn setup(&self, scene: &mut SceneBuilder, params: &SecondLawParams);

    /// Evaluated every tick; held keys act on every tick they stay down.
    fn handle_input(&self, keys: HeldKeys, ctx: &InputContext) -> Vec<InputAction>;

    fn describe(&self) -> &'static str;
}

pub(crate) const BLUE: Color = Color::srgb(0.122, 0.467, 0.706);
pub(crate) const GREEN: Color = Color::srgb(0.173, 0.627, 0.173);
pub(crate) const RED: Color = Color::srgb(0.839, 0.153, 0.157);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::physics::{BodyDesc, RapierWorld, RigidBodyWorld};
    use crate::domain::simulation::registry::{ObjectTag, SimulatedObject};

    fn registry_with(tags: &[Option<ObjectTag>]) -> ObjectRegistry {
        let mut backend = RapierWorld::new(Vec3::ZERO);
        let mut registry = ObjectRegistry::default();
        for &tag in tags {
            registry.register(SimulatedObject {
                body: backend.add_body(BodyDesc::sphere(1.0, 0.5)),
                visual: Entity::PLACEHOLDER,
                tag,
            });
        }
        registry
    }

    #[test]
    fn parses_scenario_ids() {
        assert_eq!("law1".parse::<ScenarioId>(), Ok(ScenarioId::FirstLaw));
        assert_eq!(" Second ".parse::<ScenarioId>(), Ok(ScenarioId::SecondLaw));
        assert_eq!("LAW3".parse::<ScenarioId>(), Ok(ScenarioId::ThirdLaw));
        let err = "law4".parse::<ScenarioId>().unwrap_err();
        assert!(err.to_string().contains("law4"));
    }

    #[test]
    fn first_law_pushes_only_the_resting_body() {
        let objects = registry_with(&[Some(ObjectTag::RestingBody), None]);
        let params = SecondLawParams::default();
        let ctx = InputContext {
            objects: &objects,
            params: &params,
        };
        let resting = objects.tagged(ObjectTag::RestingBody).unwrap().body;

        let held = HeldKeys {
            apply_force: true,
            ..default()
        };
        let actions = ScenarioId::FirstLaw.behavior().handle_input(held, &ctx);
        assert_eq!(
            actions,
            vec![InputAction::Impulse {
                body: resting,
                impulse: Vec3::new(0.0, 0.0, -15.0),
            }]
        );

        let idle = ScenarioId::FirstLaw
            .behavior()
            .handle_input(HeldKeys::default(), &ctx);
        assert!(idle.is_empty());
    }

    #[test]
    fn second_law_pushes_everything_and_asks_for_arrows() {
        let objects = registry_with(&[None, None, None]);
        let params = SecondLawParams {
            masses: vec![1.0, 5.0, 10.0],
            force: 12.0,
        };
        let ctx = InputContext {
            objects: &objects,
            params: &params,
        };
        let held = HeldKeys {
            apply_force: true,
            ..default()
        };

        let actions = ScenarioId::SecondLaw.behavior().handle_input(held, &ctx);
        let impulses: Vec<Vec3> = actions
            .iter()
            .filter_map(|a| match a {
                InputAction::Impulse { impulse, .. } => Some(*impulse),
                _ => None,
            })
            .collect();
        assert_eq!(impulses, vec![Vec3::new(0.0, 0.0, -12.0); 3]);
        assert!(actions.contains(&InputAction::ShowForceArrows));
    }

    #[test]
    fn second_law_ignores_reset_key() {
        let objects = registry_with(&[None]);
        let params = SecondLawParams::default();
        let ctx = InputContext {
            objects: &objects,
            params: &params,
        };
        let held = HeldKeys {
            reset: true,
            ..default()
        };
        assert!(ScenarioId::SecondLaw
            .behavior()
            .handle_input(held, &ctx)
            .is_empty());
    }

    #[test]
    fn third_law_reloads_on_reset_only() {
        let objects = registry_with(&[None, None]);
        let params = SecondLawParams::default();
        let ctx = InputContext {
            objects: &objects,
            params: &params,
        };
        let third = ScenarioId::ThirdLaw.behavior();

        let force = HeldKeys {
            apply_force: true,
            ..default()
        };
        assert!(third.handle_input(force, &ctx).is_empty());

        let reset = HeldKeys {
            reset: true,
            ..default()
        };
        assert_eq!(third.handle_input(reset, &ctx), vec![InputAction::Reload]);
    }

    #[test]
    fn declared_body_counts() {
        let params = SecondLawParams::default();
        assert_eq!(ScenarioId::FirstLaw.behavior().body_count(&params), 2);
        assert_eq!(ScenarioId::SecondLaw.behavior().body_count(&params), 3);
        assert_eq!(ScenarioId::ThirdLaw.behavior().body_count(&params), 2);
    }
}
