use glam::Vec2;
use rapier2d::na;
use rapier2d::prelude::*;

// ---------------------------------------------------------------------------
// glam <-> nalgebra conversions
// ---------------------------------------------------------------------------

fn to_na(v: Vec2) -> na::Vector2<f32> {
    na::Vector2::new(v.x, v.y)
}

fn from_na(v: &na::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body. Table games only need moving balls and static rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
    /// Convex polygon in body-local coordinates (hull is computed by rapier).
    ConvexPolygon { points: Vec<Vec2> },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(*radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(*half_width, *half_height)
            }
            ColliderDesc::ConvexPolygon { points } => {
                let hull: Vec<Point<f32>> =
                    points.iter().map(|p| Point::new(p.x, p.y)).collect();
                ColliderBuilder::convex_hull(&hull).unwrap_or_else(|| {
                    // Degenerate outline: collide with its bounding box instead.
                    let half = points
                        .iter()
                        .fold(Vec2::ZERO, |acc, p| acc.max(p.abs()))
                        .max(Vec2::splat(0.5));
                    log::warn!(
                        "Convex hull failed for {} points, using {:?} box",
                        points.len(),
                        half
                    );
                    ColliderBuilder::cuboid(half.x, half.y)
                })
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub locked_rotation: bool,
    pub ccd: bool,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            locked_rotation: false,
            ccd: false,
            collider,
            linear_damping: 0.0,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            locked_rotation: true,
            ccd: false,
            collider,
            linear_damping: 0.0,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_locked_rotation(mut self, locked: bool) -> Self {
        self.locked_rotation = locked;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Velocity decay per second. Rolling resistance of the cloth lives here.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }
}

/// Handle pair referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps the Rapier2D pipeline for a top-down table.
pub struct PhysicsWorld {
    gravity: na::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world. Table games pass `Vec2::ZERO`.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// The integration timestep in seconds.
    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Create a rigid body + collider and return handles.
    pub fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(to_na(desc.position))
            .rotation(desc.rotation)
            .linvel(to_na(desc.velocity))
            .locked_axes(if desc.locked_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .build();

        let body_handle = self.bodies.insert(rb);

        // Contact restitution is the larger of the two colliders' values.
        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction(material.friction)
            .density(material.density)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and its collider from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation by one timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Apply an instantaneous impulse to a body.
    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(to_na(impulse), true);
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(to_na(vel), true);
        }
    }

    /// Current linear velocity in units per second. Zero for removed bodies.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| from_na(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Current position of a body's centre.
    pub fn position(&self, body: &PhysicsBody) -> Option<Vec2> {
        self.bodies
            .get(body.body_handle)
            .map(|rb| from_na(&rb.position().translation.vector))
    }

    /// Current rotation of a body in radians.
    pub fn rotation(&self, body: &PhysicsBody) -> Option<f32> {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.position().rotation.angle())
    }

    /// Mass of a body, derived from its collider density and area.
    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    /// Restitution of the body's collider.
    pub fn restitution(&self, body: &PhysicsBody) -> Option<f32> {
        self.colliders
            .get(body.collider_handle)
            .map(|c| c.restitution())
    }

    /// Change the restitution of the body's collider for future contacts.
    pub fn set_restitution(&mut self, body: &PhysicsBody, restitution: f32) {
        if let Some(collider) = self.colliders.get_mut(body.collider_handle) {
            collider.set_restitution(restitution);
        }
    }

    /// Linear damping of the body.
    pub fn linear_damping(&self, body: &PhysicsBody) -> Option<f32> {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.linear_damping())
    }

    /// Change the linear damping of the body.
    pub fn set_linear_damping(&mut self, body: &PhysicsBody, damping: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linear_damping(damping);
        }
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(radius: f32) -> BodyDesc {
        BodyDesc::dynamic(ColliderDesc::Ball { radius })
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(&ball(10.0), ColliderMaterial::default());
        assert_eq!(world.body_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.position(&body), None);
        assert_eq!(world.velocity(&body), Vec2::ZERO);
    }

    #[test]
    fn impulse_changes_velocity() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(&ball(5.0), ColliderMaterial::default());

        assert_eq!(world.velocity(&body), Vec2::ZERO);
        world.apply_impulse(&body, Vec2::new(100.0, 0.0));
        world.step();

        let vel = world.velocity(&body);
        assert!(vel.x > 0.0, "Velocity should be positive X: {:?}", vel);
    }

    #[test]
    fn set_velocity_directly() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(&ball(5.0), ColliderMaterial::default());

        world.set_velocity(&body, Vec2::new(50.0, -30.0));
        let vel = world.velocity(&body);
        assert!((vel.x - 50.0).abs() < 0.001);
        assert!((vel.y - (-30.0)).abs() < 0.001);
    }

    #[test]
    fn fixed_body_does_not_move() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let rail = world.create_body(
            &BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: 100.0,
                half_height: 10.0,
            })
            .with_position(Vec2::new(0.0, 500.0)),
            ColliderMaterial::default(),
        );
        world.set_velocity(&rail, Vec2::new(10.0, 10.0));

        for _ in 0..10 {
            world.step();
        }

        let pos = world.position(&rail).unwrap();
        assert!((pos.y - 500.0).abs() < 0.001, "Fixed body moved: y={}", pos.y);
    }

    #[test]
    fn damping_slows_a_rolling_ball() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            &ball(5.0)
                .with_velocity(Vec2::new(100.0, 0.0))
                .with_linear_damping(2.0),
            ColliderMaterial::default(),
        );

        for _ in 0..30 {
            world.step();
        }
        let speed = world.velocity(&body).length();
        assert!(speed < 100.0 && speed > 0.0, "speed={}", speed);
    }

    #[test]
    fn material_can_be_changed_after_creation() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(&ball(5.0), ColliderMaterial::default());

        world.set_restitution(&body, 0.95);
        world.set_linear_damping(&body, 0.5);
        assert_eq!(world.restitution(&body), Some(0.95));
        assert_eq!(world.linear_damping(&body), Some(0.5));
    }

    #[test]
    fn density_scales_mass() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let light = world.create_body(&ball(5.0), ColliderMaterial::default());
        let heavy = world.create_body(
            &ball(5.0).with_position(Vec2::new(100.0, 0.0)),
            ColliderMaterial {
                density: 8.5,
                ..ColliderMaterial::default()
            },
        );
        let ratio = world.mass(&heavy) / world.mass(&light);
        assert!((ratio - 8.5).abs() < 0.01, "ratio={}", ratio);
    }

    #[test]
    fn converging_balls_exchange_momentum() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let material = ColliderMaterial {
            restitution: 0.95,
            friction: 0.0,
            density: 1.0,
        };
        let a = world.create_body(
            &ball(10.0).with_velocity(Vec2::new(200.0, 0.0)),
            material,
        );
        let b = world.create_body(&ball(10.0).with_position(Vec2::new(30.0, 0.0)), material);

        for _ in 0..30 {
            world.step();
        }
        assert!(world.velocity(&b).x > 0.0, "struck ball should move away");
        assert!(world.velocity(&a).x < 200.0, "striker should slow down");
    }

    #[test]
    fn convex_polygon_blocks_a_ball() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let trapezoid = vec![
            Vec2::new(-50.0, 5.0),
            Vec2::new(50.0, 5.0),
            Vec2::new(46.0, -5.0),
            Vec2::new(-46.0, -5.0),
        ];
        world.create_body(
            &BodyDesc::fixed(ColliderDesc::ConvexPolygon { points: trapezoid })
                .with_position(Vec2::new(0.0, 100.0)),
            ColliderMaterial::default(),
        );
        let body = world.create_body(
            &ball(5.0).with_velocity(Vec2::new(0.0, 300.0)).with_ccd(true),
            ColliderMaterial::default(),
        );

        for _ in 0..60 {
            world.step();
        }
        let pos = world.position(&body).unwrap();
        assert!(pos.y < 95.0, "ball passed through the rail: y={}", pos.y);
    }

    #[test]
    fn builder_pattern() {
        let desc = ball(5.0)
            .with_position(Vec2::new(10.0, 20.0))
            .with_velocity(Vec2::new(1.0, 2.0))
            .with_rotation(1.5)
            .with_locked_rotation(true)
            .with_ccd(true);

        assert_eq!(desc.body_type, BodyType::Dynamic);
        assert_eq!(desc.position, Vec2::new(10.0, 20.0));
        assert_eq!(desc.velocity, Vec2::new(1.0, 2.0));
        assert!(desc.locked_rotation);
        assert!(desc.ccd);
    }

    #[test]
    fn body_position_and_rotation() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            &BodyDesc::fixed(ColliderDesc::Ball { radius: 5.0 })
                .with_position(Vec2::new(100.0, 200.0))
                .with_rotation(1.5),
            ColliderMaterial::default(),
        );

        let pos = world.position(&body).unwrap();
        assert!((pos.x - 100.0).abs() < 0.001);
        assert!((pos.y - 200.0).abs() < 0.001);
        assert!((world.rotation(&body).unwrap() - 1.5).abs() < 0.001);
    }
}
