pub mod api;
pub mod core;
pub mod systems;
pub mod sim;
pub mod rules;
pub mod ai;

// Re-export key types at crate root for convenience
pub use api::config::{PoolConfig, ScoreWeights, SearchConfig, SimConfig};
pub use api::types::{
    BallColor, BallId, BallSeed, ColorCounts, Shot, ShotContext, ShotResult, SimEvent,
};
pub use core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, PhysicsBody, PhysicsWorld};
pub use core::table::{BodyRole, Pocket, PocketKind, StaticCollider, StaticTable, TableDimensions};
pub use systems::rack::standard_rack;
pub use sim::{BallMovement, BallView, FirstContact, RunState, ShotOutcome, SimulationRun};
pub use rules::evaluate;
pub use ai::{CandidateSource, Plan, RandomCandidates, SearchStatus, ShotSearch};
