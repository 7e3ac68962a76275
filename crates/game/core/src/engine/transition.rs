//! Three-phase execution of a single transition.

use crate::action::ActionTransition;
use crate::rng::RngOracle;
use crate::state::GameState;

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and return the outcome
/// 3. `post_validate` - Verify postconditions after mutation
///
/// On success the caller owns the follow-up bookkeeping (nonce, events).
#[inline]
pub(crate) fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    rng: &dyn RngOracle,
) -> Result<T::Outcome, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let outcome = transition
        .apply(state, rng)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(outcome)
}
