//! Deterministic turn engine and data types shared across clients.
//!
//! `game-core` defines the canonical rules (commands, actions, world state)
//! and exposes pure APIs that can be reused by both the runtime and offline
//! tools. All state mutation flows through [`engine::GameEngine`], and
//! supporting crates depend on the types re-exported here.
pub mod action;
mod ai;
pub mod combat;
pub mod command;
pub mod config;
pub mod engine;
pub mod mapgen;
pub mod rng;
pub mod rules;
pub mod state;

pub use action::{
    ActionTransition, AttackAction, AttackError, AttackOutcome, MoveAction, MoveError,
    PickupAction, PickupError,
};
pub use command::Command;
pub use config::{Axis, ConfigError, GameConfig};
pub use engine::{
    EngineError, GameEngine, RejectReason, RejectedMove, StepOutcome, TransitionPhase,
    TransitionPhaseError, TurnReport, WorldEvent,
};
pub use mapgen::{ItemSpawn, MapBlueprint, MonsterSpawn};
pub use rng::{PcgRng, RngOracle, SeedStream, compute_seed};
pub use rules::{Interaction, InteractionResolver, StandardRules};
pub use state::{
    ActorState, EnginePhase, EntitiesState, EntityId, GameState, InvariantViolation, ItemState,
    Position, PropState, ResourceMeter, SpawnError, TerrainGrid, TileMap, TileView, TurnState,
    WorldState,
};
