use crate::action::ActionTransition;
use crate::rng::RngOracle;
use crate::state::{EntityId, GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("destination {destination} is out of bounds")]
    OutOfBounds { destination: Position },

    #[error("destination {destination} is not walkable")]
    Blocked { destination: Position },

    #[error("destination {destination} is occupied by {occupant}")]
    Occupied {
        destination: Position,
        occupant: EntityId,
    },

    #[error("occupancy desync for actor {actor} at {position}")]
    OccupancyDesync { actor: EntityId, position: Position },

    #[error("actor {actor} missing from occupants at {position}")]
    MissingOccupant { actor: EntityId, position: Position },
}

/// One-tile displacement of an actor to an already-computed destination.
///
/// The engine derives the destination from the command delta; hostile AI
/// derives it from its approach step. Either way the action only accepts
/// in-bounds walkable tiles free of blocking occupants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveAction {
    pub actor: EntityId,
    pub destination: Position,
}

impl MoveAction {
    pub fn new(actor: EntityId, destination: Position) -> Self {
        Self { actor, destination }
    }
}

impl ActionTransition for MoveAction {
    type Error = MoveError;
    type Outcome = ();

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state
            .entities
            .actor(self.actor)
            .ok_or(MoveError::ActorNotFound(self.actor))?;

        let destination = self.destination;
        if !state.world.terrain.in_bounds(destination) {
            return Err(MoveError::OutOfBounds { destination });
        }
        if !state.world.terrain.is_walkable(destination) {
            return Err(MoveError::Blocked { destination });
        }
        if let Some(occupant) = state.blocking_entity_at(destination) {
            return Err(MoveError::Occupied {
                destination,
                occupant,
            });
        }

        Ok(())
    }

    fn apply(&self, state: &mut GameState, _rng: &dyn RngOracle) -> Result<(), Self::Error> {
        let actor_state = state
            .entities
            .actor(self.actor)
            .ok_or(MoveError::ActorNotFound(self.actor))?;
        let origin = actor_state.position;

        // Update the occupancy index first; both halves must land together.
        if !state.world.tile_map.remove_occupant(&origin, self.actor) {
            return Err(MoveError::OccupancyDesync {
                actor: self.actor,
                position: origin,
            });
        }
        if !state.world.tile_map.add_occupant(self.destination, self.actor) {
            // Rollback so the index still matches the actor position
            let _ = state.world.tile_map.add_occupant(origin, self.actor);
            return Err(MoveError::OccupancyDesync {
                actor: self.actor,
                position: self.destination,
            });
        }

        let actor_state = state
            .entities
            .actor_mut(self.actor)
            .ok_or(MoveError::ActorNotFound(self.actor))?;
        actor_state.position = self.destination;

        Ok(())
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let actor_state = state
            .entities
            .actor(self.actor)
            .ok_or(MoveError::ActorNotFound(self.actor))?;
        let is_present = state
            .world
            .tile_map
            .occupants(&actor_state.position)
            .is_some_and(|slots| slots.contains(&self.actor));

        if is_present {
            Ok(())
        } else {
            Err(MoveError::MissingOccupant {
                actor: self.actor,
                position: actor_state.position,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;
    use crate::state::{ActorState, TerrainGrid};

    fn state_with_player_at(x: i32, y: i32) -> GameState {
        let terrain = TerrainGrid::filled(5, 5, true);
        GameState::new(0, terrain, ActorState::player(Position::new(x, y))).unwrap()
    }

    #[test]
    fn pre_validate_rejects_bad_destinations() {
        let mut state = state_with_player_at(0, 0);
        state.world.terrain.set_walkable(Position::new(1, 1), false);
        state.spawn_npc("Goblin", Position::new(0, 1), 16, 4, 1).unwrap();

        let oob = MoveAction::new(EntityId::PLAYER, Position::new(-1, 0));
        assert_eq!(
            oob.pre_validate(&state),
            Err(MoveError::OutOfBounds {
                destination: Position::new(-1, 0)
            })
        );

        let wall = MoveAction::new(EntityId::PLAYER, Position::new(1, 1));
        assert_eq!(
            wall.pre_validate(&state),
            Err(MoveError::Blocked {
                destination: Position::new(1, 1)
            })
        );

        let bump = MoveAction::new(EntityId::PLAYER, Position::new(0, 1));
        assert!(matches!(
            bump.pre_validate(&state),
            Err(MoveError::Occupied { .. })
        ));

        let open = MoveAction::new(EntityId::PLAYER, Position::new(1, 0));
        assert_eq!(open.pre_validate(&state), Ok(()));
    }

    #[test]
    fn apply_moves_actor_and_index_together() {
        let mut state = state_with_player_at(2, 2);
        let action = MoveAction::new(EntityId::PLAYER, Position::new(2, 1));

        action.pre_validate(&state).unwrap();
        action.apply(&mut state, &PcgRng).unwrap();
        action.post_validate(&state).unwrap();

        assert_eq!(state.entities.player.position, Position::new(2, 1));
        assert!(
            state
                .world
                .tile_map
                .occupants(&Position::new(2, 2))
                .is_none()
        );
        assert_eq!(
            state.world.tile_map.first_occupant(&Position::new(2, 1)),
            Some(EntityId::PLAYER)
        );
        assert_eq!(state.verify_consistency(), Ok(()));
    }

    #[test]
    fn apply_reports_desync_when_origin_unindexed() {
        let mut state = state_with_player_at(2, 2);
        state
            .world
            .tile_map
            .remove_occupant(&Position::new(2, 2), EntityId::PLAYER);

        let action = MoveAction::new(EntityId::PLAYER, Position::new(2, 1));
        assert_eq!(
            action.apply(&mut state, &PcgRng),
            Err(MoveError::OccupancyDesync {
                actor: EntityId::PLAYER,
                position: Position::new(2, 2)
            })
        );
    }
}
