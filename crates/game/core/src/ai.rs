//! Hostile actor behavior for the back half of a turn.
//!
//! After the player's command resolves, every living hostile within the
//! activation radius takes one action in spawn order. Adjacent hostiles
//! attack; the rest take a single step toward the player. Hostiles outside
//! the radius stay dormant, so distant rooms cost nothing per turn.

use crate::action::{AttackAction, MoveAction};
use crate::config::GameConfig;
use crate::engine::{EngineError, WorldEvent, push_attack_events, run_action};
use crate::rng::RngOracle;
use crate::state::{EntityId, GameState, Position};

/// Runs one action for every activated hostile, stopping early if the
/// player dies.
///
/// Hostile movement is routine and emits no events; attacks and deaths do.
pub(crate) fn hostile_turns(
    state: &mut GameState,
    config: &GameConfig,
    rng: &dyn RngOracle,
    events: &mut Vec<WorldEvent>,
) -> Result<(), EngineError> {
    let hostiles: Vec<EntityId> = state
        .entities
        .npcs
        .iter()
        .filter(|npc| npc.is_alive())
        .map(|npc| npc.id)
        .collect();

    for id in hostiles {
        if !state.entities.player.is_alive() {
            break;
        }
        let Some(npc) = state.entities.actor(id) else {
            continue;
        };
        let player_at = state.entities.player.position;
        let distance = npc.position.manhattan_distance(player_at);
        if distance > config.activation_radius {
            continue;
        }

        if distance == 1 {
            let action = AttackAction::new(id, EntityId::PLAYER);
            let outcome = run_action(&action, state, rng).map_err(EngineError::Attack)?;
            push_attack_events(id, EntityId::PLAYER, outcome, state, events);
        } else if let Some(destination) = approach_step(state, npc.position, player_at) {
            let action = MoveAction::new(id, destination);
            run_action(&action, state, rng).map_err(EngineError::Move)?;
        }
    }
    Ok(())
}

/// One greedy chase step: try the axis with the larger gap first, fall back
/// to the other. Returns `None` when both candidate tiles are closed, in
/// which case the hostile holds position for the turn.
fn approach_step(state: &GameState, from: Position, target: Position) -> Option<Position> {
    let dx = target.x - from.x;
    let dy = target.y - from.y;

    let step_x = Position::new(from.x + dx.signum(), from.y);
    let step_y = Position::new(from.x, from.y + dy.signum());

    let (first, second) = if dx.abs() >= dy.abs() {
        (step_x, step_y)
    } else {
        (step_y, step_x)
    };

    [first, second]
        .into_iter()
        .find(|candidate| *candidate != from && state.can_enter(*candidate))
}
