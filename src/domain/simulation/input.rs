use bevy::prelude::*;

use super::effects::{ForceArrow, TransientEffects};
use super::lifecycle::{LoadScene, Session};
use super::physics::{PhysicsWorld, RigidBodyWorld};
use super::registry::{ObjectRegistry, SimulatedVisual};
use super::scenarios::{HeldKeys, InputAction, InputContext, ScenarioId};

/// Follow-up work requested by the active scenario for this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub reload: Option<ScenarioId>,
    pub show_force_arrows: bool,
}

/// Runs the active scenario's input handling. Impulses land immediately, each at its target's
/// current position; holding a key for N ticks applies the impulse N times.
pub fn apply_input(
    keys: HeldKeys,
    session: &Session,
    registry: &ObjectRegistry,
    physics: &mut dyn RigidBodyWorld,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();
    let Some(active) = session.active else {
        return outcome;
    };

    let ctx = InputContext {
        objects: registry,
        params: &session.second_law,
    };
    for action in active.behavior().handle_input(keys, &ctx) {
        match action {
            InputAction::Impulse { body, impulse } => {
                if let Some(at) = physics.position(body) {
                    physics.apply_impulse(body, impulse, at);
                }
            }
            InputAction::ShowForceArrows => outcome.show_force_arrows = true,
            InputAction::Reload => outcome.reload = Some(active),
        }
    }
    outcome
}

#[allow(clippy::too_many_arguments)]
pub fn dispatch_input(
    mut commands: Commands,
    keys: Res<HeldKeys>,
    session: Res<Session>,
    registry: Res<ObjectRegistry>,
    physics: Option<ResMut<PhysicsWorld>>,
    mut effects: ResMut<TransientEffects>,
    visuals: Query<&Transform, With<SimulatedVisual>>,
    time: Res<Time<Real>>,
    mut requests: EventWriter<LoadScene>,
) {
    let Some(mut physics) = physics else {
        return;
    };
    let outcome = apply_input(*keys, &session, &registry, &mut **physics);

    if outcome.show_force_arrows {
        let anchors: Vec<Vec3> = registry
            .iter()
            .filter_map(|o| visuals.get(o.visual).ok())
            .map(|t| t.translation)
            .collect();
        let started = effects.show(time.elapsed(), anchors, |at| {
            commands
                .spawn((ForceArrow::default(), Transform::from_translation(at)))
                .id()
        });
        if started {
            debug!(arrows = effects.len(), "showing force arrows");
        }
    }

    if let Some(id) = outcome.reload {
        requests.send(LoadScene(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::lifecycle::load_scene;
    use crate::domain::simulation::physics::WorldFactory;
    use crate::domain::simulation::registry::ObjectTag;
    use crate::domain::simulation::test_support::lab_world;

    const FORCE: HeldKeys = HeldKeys {
        apply_force: true,
        reset: false,
    };

    fn dispatch(world: &mut World, keys: HeldKeys) -> DispatchOutcome {
        world.resource_scope(|world, mut physics: Mut<PhysicsWorld>| {
            apply_input(
                keys,
                world.resource::<Session>(),
                world.resource::<ObjectRegistry>(),
                &mut **physics,
            )
        })
    }

    fn velocities(world: &World) -> Vec<Vec3> {
        let physics = world.resource::<PhysicsWorld>();
        world
            .resource::<ObjectRegistry>()
            .iter()
            .map(|o| physics.velocity(o.body).unwrap())
            .collect()
    }

    #[test]
    fn nothing_happens_before_a_scene_is_loaded() {
        let mut world = lab_world();
        let physics = WorldFactory::default().create(Vec3::ZERO);
        world.insert_resource(physics);
        assert_eq!(dispatch(&mut world, FORCE), DispatchOutcome::default());
    }

    #[test]
    fn first_law_impulse_accumulates_on_the_resting_body_only() {
        let mut world = lab_world();
        load_scene(&mut world, ScenarioId::FirstLaw);
        let registry = world.resource::<ObjectRegistry>();
        let resting = registry.tagged(ObjectTag::RestingBody).unwrap().body;
        let other = registry.iter().find(|o| o.tag.is_none()).unwrap().body;

        for _ in 0..3 {
            dispatch(&mut world, FORCE);
        }

        let physics = world.resource::<PhysicsWorld>();
        let pushed = physics.velocity(resting).unwrap();
        assert!(pushed.abs_diff_eq(Vec3::new(0.0, 0.0, -9.0), 1e-4), "{pushed}");
        assert_eq!(physics.velocity(other).unwrap(), Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn second_law_one_push_gives_force_over_mass() {
        let mut world = lab_world();
        load_scene(&mut world, ScenarioId::SecondLaw);

        let outcome = dispatch(&mut world, FORCE);

        assert!(outcome.show_force_arrows);
        let along_force: Vec<f32> = velocities(&world).iter().map(|v| -v.z).collect();
        for (got, want) in along_force.iter().zip([30.0, 6.0, 3.0]) {
            assert!((got - want).abs() < 1e-4, "{along_force:?}");
        }
    }

    #[test]
    fn third_law_reset_requests_a_reload_of_itself() {
        let mut world = lab_world();
        load_scene(&mut world, ScenarioId::ThirdLaw);
        let reset = HeldKeys {
            reset: true,
            ..default()
        };
        assert_eq!(dispatch(&mut world, reset).reload, Some(ScenarioId::ThirdLaw));
        assert_eq!(dispatch(&mut world, FORCE), DispatchOutcome::default());
    }

    #[test]
    fn held_force_key_spawns_a_single_burst_of_arrows() {
        let mut world = lab_world();
        load_scene(&mut world, ScenarioId::SecondLaw);
        world.insert_resource(FORCE);

        let mut schedule = Schedule::default();
        schedule.add_systems(dispatch_input);
        for _ in 0..4 {
            schedule.run(&mut world);
        }

        let mut arrows = world.query::<&ForceArrow>();
        assert_eq!(arrows.iter(&world).count(), 3);
        assert_eq!(world.resource::<TransientEffects>().len(), 3);
        // impulses kept landing while the arrows were up
        assert!((velocities(&world)[0].z + 120.0).abs() < 1e-3);
    }

    #[test]
    fn reset_key_queues_a_load_request() {
        let mut world = lab_world();
        load_scene(&mut world, ScenarioId::ThirdLaw);
        world.insert_resource(HeldKeys {
            reset: true,
            ..default()
        });

        let mut schedule = Schedule::default();
        schedule.add_systems(dispatch_input);
        schedule.run(&mut world);

        let requests: Vec<LoadScene> = world
            .resource_mut::<Events<LoadScene>>()
            .drain()
            .collect();
        assert_eq!(requests, vec![LoadScene(ScenarioId::ThirdLaw)]);
    }
}
