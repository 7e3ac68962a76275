//! Turn actions and the transition pipeline contract.
//!
//! Every mutation of [`GameState`] during play is expressed as an action
//! run through three phases: `pre_validate` checks preconditions against
//! the unmodified state, `apply` performs the mutation, and
//! `post_validate` audits the result. The engine drives the phases and
//! decides which failures are normal outcomes (a blocked move) and which
//! are fatal (an occupancy desync).

pub mod attack;
pub mod movement;
pub mod pickup;

pub use attack::{AttackAction, AttackError, AttackOutcome};
pub use movement::{MoveAction, MoveError};
pub use pickup::{PickupAction, PickupError};

use crate::rng::RngOracle;
use crate::state::{EntityId, GameState};

/// Defines how a concrete action mutates game state.
pub trait ActionTransition {
    type Error;
    type Outcome;

    /// The entity performing this action.
    fn actor(&self) -> EntityId;

    /// Validates preconditions against the state **before** mutation.
    fn pre_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly.
    ///
    /// `rng` is consulted only by actions the rules define as random
    /// (combat rolls); movement must never draw from it.
    fn apply(
        &self,
        state: &mut GameState,
        rng: &dyn RngOracle,
    ) -> Result<Self::Outcome, Self::Error>;

    /// Validates postconditions against the state **after** mutation.
    fn post_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        Ok(())
    }
}
