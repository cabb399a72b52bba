use crate::api::types::{BodyId, GameEvent};
use crate::input::queue::InputQueue;
#[cfg(feature = "physics")]
use crate::core::physics::{BodyDesc, ColliderMaterial, PhysicsBody, PhysicsWorld};
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorState;
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Most ticks run for a single animation frame before time is dropped.
    pub max_steps_per_frame: u32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of vector vertices exposed per frame (default: 65536).
    pub max_vector_vertices: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Default: zero (top-down table).
    #[cfg(feature = "physics")]
    pub gravity: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            world_width: 800.0,
            world_height: 600.0,
            max_vector_vertices: 65536,
            max_events: 32,
            #[cfg(feature = "physics")]
            gravity: Vec2::ZERO,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state and spawn the static world.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. `input` holds everything the host pushed since the
    /// previous tick; it is empty on catch-up ticks.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Apply a JSON settings document pushed by the host. Games without
    /// runtime settings ignore it.
    fn load_config(&mut self, _ctx: &mut EngineContext, _json: &str) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub events: Vec<GameEvent>,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "vectors")]
    pub vectors: VectorState,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_id: 1,
            #[cfg(feature = "physics")]
            physics: PhysicsWorld::new(Vec2::ZERO),
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
        }
    }

    /// Create an EngineContext with a custom gravity vector.
    #[cfg(feature = "physics")]
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            physics: PhysicsWorld::new(gravity),
            ..Self::new()
        }
    }

    /// Create an EngineContext set up from a game's configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let mut ctx = Self::with_gravity(config.gravity);
        #[cfg(not(feature = "physics"))]
        let ctx = Self::new();
        #[cfg(feature = "physics")]
        ctx.physics.set_dt(config.fixed_dt);
        ctx
    }

    /// Generate the next unique body ID.
    pub fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (events, vector geometry).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        #[cfg(feature = "vectors")]
        self.vectors.clear();
    }

    // -- Physics convenience methods --

    /// Create a physics body and hand out a fresh identity for it.
    #[cfg(feature = "physics")]
    pub fn spawn_body(
        &mut self,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> (BodyId, PhysicsBody) {
        let id = self.next_id();
        let body = self.physics.create_body(desc, material);
        (id, body)
    }

    /// Remove a physics body from the world.
    #[cfg(feature = "physics")]
    pub fn despawn_body(&mut self, body: &PhysicsBody) {
        self.physics.remove_body(body);
    }

    /// Advance the physics simulation by one fixed step. Games call this from
    /// `update` at the point of their tick where the world should move.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.physics.step();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert!(b > a);
    }

    #[test]
    fn clear_frame_data_drops_events() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(ctx.events.len(), 1);
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }

    #[test]
    #[cfg(feature = "vectors")]
    fn clear_frame_data_drops_vectors() {
        use crate::systems::vector::VectorColor;
        let mut ctx = EngineContext::new();
        ctx.vectors.fill_rect(glam::Vec2::ZERO, 10.0, 10.0, VectorColor::WHITE);
        assert!(ctx.vectors.vertex_count() > 0);
        ctx.clear_frame_data();
        assert_eq!(ctx.vectors.vertex_count(), 0);
    }
}
