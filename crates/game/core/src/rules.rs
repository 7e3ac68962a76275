//! Pluggable resolution of entity encounters.
//!
//! The engine does not hard-code what happens when one entity walks into
//! another. It asks an [`InteractionResolver`] and acts on the returned
//! [`Interaction`]. Swapping the resolver changes the campaign's rules
//! without touching the turn pipeline.

use crate::state::{EntityId, GameState};

/// What the engine should do about an encounter between two entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interaction {
    /// Resolve a melee attack from the source against the target.
    Attack,
    /// The target blocks the tile; the move is refused.
    Block,
    /// Consume the target as a floor item.
    Pickup,
    /// Nothing happens.
    Ignore,
}

/// Decides how encounters resolve, keyed by what the target turns out to be.
///
/// `on_bump` fires when a move is about to land on a tile a blocking entity
/// already holds. `on_enter` fires after a move completes, once per
/// non-blocking entity sharing the destination tile.
pub trait InteractionResolver: Send + Sync {
    fn on_bump(&self, state: &GameState, source: EntityId, target: EntityId) -> Interaction;

    fn on_enter(&self, _state: &GameState, _source: EntityId, _target: EntityId) -> Interaction {
        Interaction::Ignore
    }
}

/// Baseline ruleset: bumping a living actor attacks it, bumping anything
/// else blocks, and stepping onto an item picks it up.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl InteractionResolver for StandardRules {
    fn on_bump(&self, state: &GameState, _source: EntityId, target: EntityId) -> Interaction {
        match state.entities.actor(target) {
            Some(actor) if actor.is_alive() => Interaction::Attack,
            _ => Interaction::Block,
        }
    }

    fn on_enter(&self, state: &GameState, _source: EntityId, target: EntityId) -> Interaction {
        if state.entities.item(target).is_some() {
            Interaction::Pickup
        } else {
            Interaction::Ignore
        }
    }
}
