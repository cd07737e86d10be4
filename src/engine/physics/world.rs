use glam::Vec2;
use rapier2d::prelude::*;

use super::collision::{CollisionEvent as GameCollisionEvent, CollisionEventQueue};

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Default gravity. The world uses screen coordinates, so +y points down.
pub const DEFAULT_GRAVITY: f32 = 30.0;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    /// Collision event handler
    collision_event_queue: CollisionEventQueue,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(DEFAULT_GRAVITY)
    }

    /// Create a new physics world pulling bodies down by `gravity`
    pub fn with_gravity(gravity: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: vector![0.0, gravity],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
        }
    }

    /// Step the simulation forward by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.collision_event_queue.clear();

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
            Some(&mut self.query_pipeline),
            &(),
            &self.collision_event_queue,
        );
    }

    /// Add a rigid body with a single collider, returning both handles
    pub fn spawn(&mut self, body: RigidBody, collider: Collider) -> (RigidBodyHandle, ColliderHandle) {
        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        (body_handle, collider_handle)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    /// Remove the body owning `collider`, along with the collider itself
    pub fn remove_collider_body(&mut self, collider: ColliderHandle) {
        if let Some(parent) = self.collider_set.get(collider).and_then(Collider::parent) {
            self.remove_rigid_body(parent);
        }
    }

    /// World position of a collider
    pub fn collider_position(&self, handle: ColliderHandle) -> Option<Vec2> {
        self.collider_set.get(handle).map(|collider| {
            let t = collider.translation();
            Vec2::new(t.x, t.y)
        })
    }

    /// Current linear velocity of the body owning `collider`
    pub fn velocity(&self, collider: ColliderHandle) -> Option<Vec2> {
        self.parent_body(collider).map(|body| {
            let v = body.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    /// Overwrite the horizontal velocity of the body owning `collider`
    pub fn set_velocity_x(&mut self, collider: ColliderHandle, vx: f32) {
        if let Some(body) = self.parent_body_mut(collider) {
            let mut velocity = *body.linvel();
            velocity.x = vx;
            body.set_linvel(velocity, true);
        }
    }

    /// Overwrite the vertical velocity of the body owning `collider`
    pub fn set_velocity_y(&mut self, collider: ColliderHandle, vy: f32) {
        if let Some(body) = self.parent_body_mut(collider) {
            let mut velocity = *body.linvel();
            velocity.y = vy;
            body.set_linvel(velocity, true);
        }
    }

    fn parent_body(&self, collider: ColliderHandle) -> Option<&RigidBody> {
        let parent = self.collider_set.get(collider)?.parent()?;
        self.rigid_body_set.get(parent)
    }

    fn parent_body_mut(&mut self, collider: ColliderHandle) -> Option<&mut RigidBody> {
        let parent = self.collider_set.get(collider)?.parent()?;
        self.rigid_body_set.get_mut(parent)
    }

    /// Collision events produced by the last step
    pub fn collision_events(&self) -> Vec<GameCollisionEvent> {
        self.collision_event_queue.events()
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    pub fn gravity(&self) -> f32 {
        self.gravity.y
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::body::{presets, BodyBuilder};
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spawn_and_remove() {
        let mut world = PhysicsWorld::new();
        let (_, collider) = world.spawn(presets::actor_body(1.0, 2.0), presets::player_collider(1.0, 2.0));
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_position(collider), Some(Vec2::new(1.0, 2.0)));

        world.remove_collider_body(collider);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert_eq!(world.collider_position(collider), None);
    }

    #[test]
    fn test_velocity_components_set_independently() {
        let mut world = PhysicsWorld::new();
        let (_, collider) = world.spawn(presets::actor_body(0.0, 0.0), presets::player_collider(1.0, 2.0));

        world.set_velocity_x(collider, 5.0);
        world.set_velocity_y(collider, -12.0);
        assert_eq!(world.velocity(collider), Some(Vec2::new(5.0, -12.0)));
    }

    #[test]
    fn test_gravity_points_down() {
        let mut world = PhysicsWorld::new();
        let (_, collider) = world.spawn(presets::actor_body(0.0, 0.0), presets::player_collider(1.0, 2.0));
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        let position = world.collider_position(collider).unwrap();
        assert!(position.y > 0.0);
    }

    #[test]
    fn test_free_fall_velocity() {
        let mut world = PhysicsWorld::new();
        let body = BodyBuilder::new_dynamic().linear_damping(0.0).build();
        let (_, collider) = world.spawn(body, presets::player_collider(1.0, 2.0));
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }

        // Ten steps of 30 units/s^2 at 60Hz
        let velocity = world.velocity(collider).unwrap();
        assert_relative_eq!(velocity.x, 0.0);
        assert_relative_eq!(velocity.y, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_actor_fall_is_damped() {
        let mut world = PhysicsWorld::new();
        let (_, collider) = world.spawn(presets::actor_body(0.0, 0.0), presets::player_collider(1.0, 2.0));
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }

        let velocity = world.velocity(collider).unwrap();
        assert!(velocity.y > 4.0 && velocity.y < 5.0);
    }

    #[test]
    fn test_falling_onto_terrain_reports_contact() {
        let mut world = PhysicsWorld::new();
        let (_, player) = world.spawn(presets::actor_body(0.0, 0.0), presets::player_collider(1.0, 2.0));
        let (_, ground) = world.spawn(presets::static_body(0.0, 2.0), presets::terrain_collider(10.0, 1.0));

        let mut touched = false;
        for _ in 0..120 {
            world.step(1.0 / 60.0);
            touched |= world
                .collision_events()
                .iter()
                .any(|event| event.started_with(player) == Some(ground));
        }
        assert!(touched);
    }
}
