use crate::action::ActionTransition;
use crate::rng::RngOracle;
use crate::state::{EntityId, GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PickupError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("actor {0} is dead")]
    DeadActor(EntityId),

    #[error("item {0} not found")]
    ItemNotFound(EntityId),

    #[error("{actor} and item {item} are not on the same tile")]
    NotColocated { actor: EntityId, item: EntityId },

    #[error("occupancy desync for item {item} at {position}")]
    OccupancyDesync { item: EntityId, position: Position },
}

/// Consume a floor item the actor is standing on, restoring hit points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickupAction {
    pub actor: EntityId,
    pub item: EntityId,
}

impl PickupAction {
    pub fn new(actor: EntityId, item: EntityId) -> Self {
        Self { actor, item }
    }
}

impl ActionTransition for PickupAction {
    type Error = PickupError;
    type Outcome = u32;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let actor = state
            .entities
            .actor(self.actor)
            .ok_or(PickupError::ActorNotFound(self.actor))?;
        if !actor.is_alive() {
            return Err(PickupError::DeadActor(self.actor));
        }

        let item = state
            .entities
            .item(self.item)
            .ok_or(PickupError::ItemNotFound(self.item))?;
        if actor.position != item.position {
            return Err(PickupError::NotColocated {
                actor: self.actor,
                item: self.item,
            });
        }

        Ok(())
    }

    fn apply(&self, state: &mut GameState, _rng: &dyn RngOracle) -> Result<u32, Self::Error> {
        let item = state
            .entities
            .item(self.item)
            .ok_or(PickupError::ItemNotFound(self.item))?;
        let position = item.position;

        if !state.world.tile_map.remove_occupant(&position, self.item) {
            return Err(PickupError::OccupancyDesync {
                item: self.item,
                position,
            });
        }
        let Some(item) = state.entities.remove_item(self.item) else {
            // Rollback the index entry so the remaining record stays consistent
            let _ = state.world.tile_map.add_occupant(position, self.item);
            return Err(PickupError::ItemNotFound(self.item));
        };

        let actor = state
            .entities
            .actor_mut(self.actor)
            .ok_or(PickupError::ActorNotFound(self.actor))?;
        Ok(actor.hp.restore(item.heal_amount))
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        if state.entities.item(self.item).is_some() {
            return Err(PickupError::ItemNotFound(self.item));
        }
        Ok(())
    }
}
