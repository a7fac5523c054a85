//! Rigid-body world used by the scenes.
//!
//! The rest of the simulation only talks to [`RigidBodyWorld`], so the solver can be swapped
//! (tests use a recording stand-in). [`RapierWorld`] is the default backend, a thin adapter
//! over rapier's rigid-body pipeline.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use bevy::prelude::*;
use rapier3d::na as nalgebra;
use rapier3d::prelude::{
    point, vector, BroadPhase, CCDSolver, ColliderBuilder, ColliderSet, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector,
};

const RESTITUTION: f32 = 0.3;
const FRICTION: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Everything needed to create a body. A mass of zero makes it static.
#[derive(Clone, Copy, Debug)]
pub struct BodyDesc {
    pub mass: f32,
    pub shape: Shape,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl BodyDesc {
    pub fn sphere(mass: f32, radius: f32) -> Self {
        Self {
            mass,
            shape: Shape::Sphere { radius },
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }

    pub fn fixed_cuboid(half_extents: Vec3) -> Self {
        Self {
            mass: 0.0,
            shape: Shape::Cuboid { half_extents },
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn moving(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}

pub trait RigidBodyWorld: Send + Sync {
    fn gravity(&self) -> Vec3;
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;
    fn remove_all_bodies(&mut self);
    fn body_count(&self) -> usize;
    /// Instantaneous momentum change applied at a world-space point.
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3, point: Vec3);
    fn position(&self, body: BodyHandle) -> Option<Vec3>;
    fn rotation(&self, body: BodyHandle) -> Option<Quat>;
    fn velocity(&self, body: BodyHandle) -> Option<Vec3>;
    fn step(&mut self, dt: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldId(u64);

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(1);

/// The live physics world. Replaced on scenario switch, kept across same-scenario reloads.
#[derive(Resource)]
pub struct PhysicsWorld {
    id: WorldId,
    backend: Box<dyn RigidBodyWorld>,
}

impl PhysicsWorld {
    pub fn new(backend: Box<dyn RigidBodyWorld>) -> Self {
        Self {
            id: WorldId(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed)),
            backend,
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }
}

impl Deref for PhysicsWorld {
    type Target = dyn RigidBodyWorld;

    fn deref(&self) -> &Self::Target {
        self.backend.as_ref()
    }
}

impl DerefMut for PhysicsWorld {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.backend.as_mut()
    }
}

type BackendFn = dyn Fn(Vec3) -> Box<dyn RigidBodyWorld> + Send + Sync;

/// Builds a fresh backend for a gravity vector.
#[derive(Resource)]
pub struct WorldFactory(Box<BackendFn>);

impl WorldFactory {
    pub fn new(build: impl Fn(Vec3) -> Box<dyn RigidBodyWorld> + Send + Sync + 'static) -> Self {
        Self(Box::new(build))
    }

    pub fn create(&self, gravity: Vec3) -> PhysicsWorld {
        PhysicsWorld::new((self.0)(gravity))
    }
}

impl Default for WorldFactory {
    fn default() -> Self {
        Self::new(|gravity| Box::new(RapierWorld::new(gravity)))
    }
}

fn to_rapier(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_rapier(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Rapier sets and pipeline state for one physics world.
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    island_manager: IslandManager,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: to_rapier(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            island_manager: IslandManager::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }
}

impl RigidBodyWorld for RapierWorld {
    fn gravity(&self) -> Vec3 {
        from_rapier(&self.gravity)
    }

    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let builder = if desc.mass > 0.0 {
            RigidBodyBuilder::dynamic().linvel(to_rapier(desc.velocity))
        } else {
            RigidBodyBuilder::fixed()
        };
        let handle = self
            .rigid_body_set
            .insert(builder.translation(to_rapier(desc.position)).build());

        let collider = match desc.shape {
            Shape::Sphere { radius } => ColliderBuilder::ball(radius),
            Shape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
        };
        let collider = collider
            .mass(desc.mass.max(0.0))
            .restitution(RESTITUTION)
            .friction(FRICTION)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            // impulses may land before the first step
            body.recompute_mass_properties_from_colliders(&self.collider_set);
        }
        BodyHandle(handle)
    }

    fn remove_all_bodies(&mut self) {
        let handles: Vec<RigidBodyHandle> = self.rigid_body_set.iter().map(|(h, _)| h).collect();
        for handle in handles {
            self.rigid_body_set.remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
        }
    }

    fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3, at: Vec3) {
        let Some(body) = self.rigid_body_set.get_mut(body.0) else {
            return;
        };
        if body.is_dynamic() {
            body.apply_impulse_at_point(to_rapier(impulse), point![at.x, at.y, at.z], true);
        }
    }

    fn position(&self, body: BodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(body.0)
            .map(|b| from_rapier(b.translation()))
    }

    fn rotation(&self, body: BodyHandle) -> Option<Quat> {
        self.rigid_body_set.get(body.0).map(|b| {
            let q = b.rotation().coords;
            Quat::from_xyzw(q.x, q.y, q.z, q.w)
        })
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(body.0)
            .map(|b| from_rapier(b.linvel()))
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}
