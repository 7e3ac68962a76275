//! Authoritative game state representation.
//!
//! This module owns the data structures that describe terrain, entities, and
//! turn bookkeeping. Host layers query this state freely but mutate it
//! exclusively through the engine; the spawn helpers here are for initial
//! population only.
pub mod types;

pub use types::{
    ActorState, EnginePhase, EntitiesState, EntityId, ItemState, Position, PropState,
    ResourceMeter, TerrainGrid, TileMap, TileView, TurnState, WorldState,
};

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed fixed at initialization and never modified. Combined with
    /// `turn.action_nonce` to derive per-roll seeds.
    pub game_seed: u64,

    /// Sequential entity id allocator. Ids are never reused; 0 is reserved
    /// for the player.
    next_entity_id: u32,

    /// Turn counter and engine lifecycle phase.
    pub turn: TurnState,
    /// Player, hostiles, props, and floor items.
    pub entities: EntitiesState,
    /// Terrain grid and the per-tile occupancy index.
    pub world: WorldState,
}

impl GameState {
    /// Creates a state with the given terrain and player, registering the
    /// player in the occupancy index.
    pub fn new(game_seed: u64, terrain: TerrainGrid, player: ActorState) -> Result<Self, SpawnError> {
        let mut state = Self {
            game_seed,
            next_entity_id: 1,
            turn: TurnState::new(),
            entities: EntitiesState::new(player),
            world: WorldState::new(terrain),
        };

        let position = state.entities.player.position;
        state.check_spawn_tile(position, true)?;
        if !state.world.tile_map.add_occupant(position, EntityId::PLAYER) {
            return Err(SpawnError::TileFull { position });
        }
        Ok(state)
    }

    /// Allocates a fresh unique id, skipping the reserved player id.
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted.
    pub fn allocate_entity_id(&mut self) -> EntityId {
        while self.next_entity_id == EntityId::PLAYER.0 {
            self.next_entity_id = self
                .next_entity_id
                .checked_add(1)
                .expect("EntityId overflow");
        }

        let id = EntityId(self.next_entity_id);
        self.next_entity_id = self
            .next_entity_id
            .checked_add(1)
            .expect("EntityId overflow");

        id
    }

    /// Adds a hostile actor at full health and registers its tile.
    pub fn spawn_npc(
        &mut self,
        name: &str,
        position: Position,
        hp: u32,
        power: u32,
        defense: u32,
    ) -> Result<EntityId, SpawnError> {
        self.check_spawn_tile(position, true)?;
        let id = self.allocate_entity_id();
        if !self.world.tile_map.add_occupant(position, id) {
            return Err(SpawnError::TileFull { position });
        }
        self.entities.npcs.push(ActorState::new(
            id,
            name,
            position,
            ResourceMeter::full(hp),
            power,
            defense,
        ));
        Ok(id)
    }

    /// Adds an inert prop, optionally blocking.
    pub fn spawn_prop(
        &mut self,
        name: &str,
        position: Position,
        blocks: bool,
    ) -> Result<EntityId, SpawnError> {
        self.check_spawn_tile(position, blocks)?;
        let id = self.allocate_entity_id();
        if !self.world.tile_map.add_occupant(position, id) {
            return Err(SpawnError::TileFull { position });
        }
        self.entities.props.push(PropState {
            id,
            name: name.into(),
            position,
            blocks,
        });
        Ok(id)
    }

    /// Adds a floor item.
    pub fn spawn_item(
        &mut self,
        name: &str,
        position: Position,
        heal_amount: u32,
    ) -> Result<EntityId, SpawnError> {
        self.check_spawn_tile(position, false)?;
        let id = self.allocate_entity_id();
        if !self.world.tile_map.add_occupant(position, id) {
            return Err(SpawnError::TileFull { position });
        }
        self.entities.items.push(ItemState {
            id,
            name: name.into(),
            position,
            heal_amount,
        });
        Ok(id)
    }

    fn check_spawn_tile(&self, position: Position, blocking: bool) -> Result<(), SpawnError> {
        if !self.world.terrain.in_bounds(position) {
            return Err(SpawnError::OutOfBounds { position });
        }
        if !self.world.terrain.is_walkable(position) {
            return Err(SpawnError::NotWalkable { position });
        }
        if blocking && self.blocking_entity_at(position).is_some() {
            return Err(SpawnError::Blocked { position });
        }
        Ok(())
    }

    /// True if the entity prevents others from entering its tile.
    ///
    /// Living actors and blocking props do; items, corpses, and unknown ids
    /// do not.
    pub fn is_blocking(&self, id: EntityId) -> bool {
        if let Some(actor) = self.entities.actor(id) {
            return actor.is_alive();
        }
        if let Some(prop) = self.entities.prop(id) {
            return prop.blocks;
        }
        false
    }

    /// First blocking occupant at a tile, if any. Out-of-bounds reads as
    /// unoccupied.
    pub fn blocking_entity_at(&self, position: Position) -> Option<EntityId> {
        self.world
            .tile_map
            .occupants(&position)
            .and_then(|slots| slots.iter().copied().find(|id| self.is_blocking(*id)))
    }

    /// Whether a tile can be entered: walkable terrain and no blocking
    /// occupant. Out-of-bounds is never enterable.
    pub fn can_enter(&self, position: Position) -> bool {
        self.world.is_walkable(position) && self.blocking_entity_at(position).is_none()
    }

    /// Full cross-check of entity positions against the occupancy index.
    ///
    /// A violation means a mutation path broke atomicity. Callers must treat
    /// it as unrecoverable rather than attempt a repair.
    pub fn verify_consistency(&self) -> Result<(), InvariantViolation> {
        for actor in self.entities.all_actors().filter(|a| a.is_alive()) {
            self.check_indexed(actor.id, actor.position)?;
        }
        for prop in &self.entities.props {
            self.check_indexed(prop.id, prop.position)?;
        }
        for item in &self.entities.items {
            self.check_indexed(item.id, item.position)?;
        }

        for (&position, slots) in self.world.tile_map.occupancy() {
            let mut blockers = 0usize;
            for &id in slots {
                let tracked = if let Some(actor) = self.entities.actor(id) {
                    if !actor.is_alive() {
                        return Err(InvariantViolation::DeadOccupant { entity: id, position });
                    }
                    Some(actor.position)
                } else if let Some(prop) = self.entities.prop(id) {
                    Some(prop.position)
                } else {
                    self.entities.item(id).map(|item| item.position)
                };

                match tracked {
                    None => {
                        return Err(InvariantViolation::UnknownOccupant { entity: id, position });
                    }
                    Some(tracked) if tracked != position => {
                        return Err(InvariantViolation::StaleOccupant { entity: id, position });
                    }
                    Some(_) => {}
                }

                if self.is_blocking(id) {
                    blockers += 1;
                }
            }
            if blockers > 1 {
                return Err(InvariantViolation::DoubleBlocker { position });
            }
        }
        Ok(())
    }

    fn check_indexed(&self, id: EntityId, position: Position) -> Result<(), InvariantViolation> {
        if !self.world.terrain.in_bounds(position) {
            return Err(InvariantViolation::OutOfBounds {
                entity: id,
                position,
            });
        }
        if !self.world.terrain.is_walkable(position) {
            return Err(InvariantViolation::OnUnwalkableTerrain {
                entity: id,
                position,
            });
        }
        let listed = self
            .world
            .tile_map
            .occupants(&position)
            .is_some_and(|slots| slots.contains(&id));
        if !listed {
            return Err(InvariantViolation::Unindexed {
                entity: id,
                position,
            });
        }
        Ok(())
    }
}

/// Rejected attempt to place an entity during initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("spawn position {position} is outside the map")]
    OutOfBounds { position: Position },

    #[error("spawn position {position} is not walkable")]
    NotWalkable { position: Position },

    #[error("spawn position {position} already holds a blocking entity")]
    Blocked { position: Position },

    #[error("tile {position} has no free occupant slot")]
    TileFull { position: Position },
}

/// Broken consistency between entity records and the occupancy index.
///
/// These are programming errors, not game outcomes; the per-variant payload
/// is the diagnostic the host reports before shutting down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{entity} is outside the map at {position}")]
    OutOfBounds { entity: EntityId, position: Position },

    #[error("{entity} stands on unwalkable terrain at {position}")]
    OnUnwalkableTerrain { entity: EntityId, position: Position },

    #[error("{entity} at {position} is missing from the occupancy index")]
    Unindexed { entity: EntityId, position: Position },

    #[error("occupancy index lists {entity} at {position} but the entity is elsewhere")]
    StaleOccupant { entity: EntityId, position: Position },

    #[error("occupancy index lists unknown entity {entity} at {position}")]
    UnknownOccupant { entity: EntityId, position: Position },

    #[error("occupancy index lists dead {entity} at {position}")]
    DeadOccupant { entity: EntityId, position: Position },

    #[error("multiple blocking entities share tile {position}")]
    DoubleBlocker { position: Position },
}
