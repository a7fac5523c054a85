//! Short-lived annotations (force arrows) with wall-clock expiry.

use std::time::Duration;

use bevy::prelude::*;

/// Arrow drawn from the entity's translation by the presentation layer.
#[derive(Component, Clone, Copy, Debug)]
pub struct ForceArrow {
    pub direction: Vec3,
    pub length: f32,
    pub color: Color,
}

impl Default for ForceArrow {
    fn default() -> Self {
        Self {
            direction: Vec3::NEG_Z,
            length: 1.5,
            color: Color::srgb(1.0, 1.0, 0.0),
        }
    }
}

struct TransientVisual {
    entity: Entity,
    created: Duration,
}

/// Active annotations. At most one burst is alive at a time.
#[derive(Resource)]
pub struct TransientEffects {
    ttl: Duration,
    visuals: Vec<TransientVisual>,
}

impl TransientEffects {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            visuals: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.visuals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    /// Spawns one annotation per anchor unless a burst is still alive.
    /// Returns whether a burst was started.
    pub fn show(
        &mut self,
        now: Duration,
        anchors: impl IntoIterator<Item = Vec3>,
        mut spawn: impl FnMut(Vec3) -> Entity,
    ) -> bool {
        if self.is_active() {
            return false;
        }
        self.visuals.extend(anchors.into_iter().map(|at| TransientVisual {
            entity: spawn(at),
            created: now,
        }));
        self.is_active()
    }

    /// Removes and returns annotations whose time-to-live has elapsed at `now`.
    pub fn expire(&mut self, now: Duration) -> Vec<Entity> {
        let ttl = self.ttl;
        let mut expired = Vec::new();
        self.visuals.retain(|v| {
            let alive = now.saturating_sub(v.created) < ttl;
            if !alive {
                expired.push(v.entity);
            }
            alive
        });
        expired
    }

    pub fn drain(&mut self) -> Vec<Entity> {
        self.visuals.drain(..).map(|v| v.entity).collect()
    }
}

pub fn expire_transients(
    mut commands: Commands,
    time: Res<Time<Real>>,
    mut effects: ResMut<TransientEffects>,
) {
    for entity in effects.expire(time.elapsed()) {
        if let Some(mut e) = commands.get_entity(entity) {
            e.despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(500);

    fn spawn_into(world: &mut World) -> impl FnMut(Vec3) -> Entity + '_ {
        move |at| {
            world
                .spawn((Transform::from_translation(at), ForceArrow::default()))
                .id()
        }
    }

    #[test]
    fn burst_expires_exactly_at_ttl() {
        let mut world = World::new();
        let mut effects = TransientEffects::new(TTL);
        let start = Duration::from_secs(3);

        let anchors = [Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(effects.show(start, anchors, spawn_into(&mut world)));
        assert_eq!(effects.len(), 3);

        assert!(effects.expire(start + Duration::from_millis(499)).is_empty());
        assert_eq!(effects.len(), 3);

        let expired = effects.expire(start + TTL);
        assert_eq!(expired.len(), 3);
        assert_eq!(effects.len(), 0);
    }

    #[test]
    fn no_second_burst_while_one_is_alive() {
        let mut world = World::new();
        let mut effects = TransientEffects::new(TTL);
        let start = Duration::ZERO;

        assert!(effects.show(start, [Vec3::ZERO], spawn_into(&mut world)));
        let mut spawned = 0;
        let started = effects.show(start + Duration::from_millis(100), [Vec3::X, Vec3::Y], |_| {
            spawned += 1;
            Entity::PLACEHOLDER
        });
        assert!(!started);
        assert_eq!(spawned, 0);
        assert_eq!(effects.len(), 1);

        effects.expire(start + TTL);
        assert!(effects.show(start + TTL, [Vec3::X], spawn_into(&mut world)));
    }

    #[test]
    fn burst_without_anchors_does_not_block() {
        let mut effects = TransientEffects::new(TTL);
        assert!(!effects.show(Duration::ZERO, std::iter::empty(), |_| Entity::PLACEHOLDER));
        assert!(!effects.is_active());
    }

    #[test]
    fn expiry_system_despawns_annotations() {
        let mut world = World::new();
        world.insert_resource(Time::<Real>::default());
        let mut effects = TransientEffects::new(Duration::ZERO);
        let arrow = world.spawn(ForceArrow::default()).id();
        effects.show(Duration::ZERO, [Vec3::ZERO], |_| arrow);
        world.insert_resource(effects);

        let mut schedule = Schedule::default();
        schedule.add_systems(expire_transients);
        schedule.run(&mut world);

        assert!(world.get_entity(arrow).is_none());
        assert!(!world.resource::<TransientEffects>().is_active());
    }
}
