pub mod common;
pub mod entities;
pub mod turn;
pub mod world;

// Re-export common types
pub use common::{EntityId, Position, ResourceMeter};

// Re-export entity types
pub use entities::{ActorState, EntitiesState, ItemState, PropState};

// Re-export turn bookkeeping
pub use turn::{EnginePhase, TurnState};

// Re-export world types
pub use world::{TerrainGrid, TileMap, TileView, WorldState};
