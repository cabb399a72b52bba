pub mod api;
pub mod core;
pub mod systems;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{BodyId, GameEvent};
pub use core::time::FixedTimestep;
pub use input::queue::{keys, CustomInput, InputEvent, InputQueue, InputState};
pub use bridge::protocol::ProtocolLayout;

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial,
};

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorState, VectorVertex, VectorColor};
