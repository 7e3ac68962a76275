//! Plain-text presentation: the map frame and one-line event prose.

use game_core::{EntityId, GameState, Position, RejectReason, RejectedMove, WorldEvent};
use runtime::GameSession;

/// Renders the whole map plus a status bar underneath.
pub fn frame(session: &GameSession) -> String {
    let state = session.state();
    let mut out = String::new();
    for y in 0..session.map_height() {
        for x in 0..session.map_width() {
            out.push(glyph_at(state, Position::new(x as i32, y as i32)));
        }
        out.push('\n');
    }
    let hp = session.player_hp();
    out.push_str(&format!(
        "hp {}/{}  pos {}  turn {}\n",
        hp.current,
        hp.maximum,
        session.player_position(),
        session.turn()
    ));
    out
}

fn glyph_at(state: &GameState, position: Position) -> char {
    let view = state.world.tile_view(position);
    let occupant = view
        .occupants()
        .filter_map(|id| occupant_glyph(state, id))
        .max_by_key(|&(_, priority)| priority);
    match occupant {
        Some((glyph, _)) => glyph,
        None if view.is_walkable() => '.',
        None => '#',
    }
}

/// Hostiles draw with the initial of their name, so a Goblin is `g` and an
/// Orc is `o`. Dead actors leave the occupancy index and draw nothing.
fn occupant_glyph(state: &GameState, id: EntityId) -> Option<(char, u8)> {
    if id.is_player() {
        return Some(('@', 3));
    }
    if let Some(actor) = state.entities.actor(id).filter(|actor| actor.is_alive()) {
        let initial = actor
            .name
            .chars()
            .next()
            .map_or('m', |c| c.to_ascii_lowercase());
        return Some((initial, 2));
    }
    if state.entities.item(id).is_some() {
        return Some(('!', 1));
    }
    if state.entities.prop(id).is_some() {
        return Some(('+', 0));
    }
    None
}

pub fn describe_rejection(rejection: &RejectedMove) -> String {
    match rejection.reason {
        RejectReason::OutOfBounds => "The warren ends there.".to_string(),
        RejectReason::Impassable => "A wall blocks the way.".to_string(),
        RejectReason::Occupied => "Something solid blocks the way.".to_string(),
    }
}

pub fn describe_event(state: &GameState, event: &WorldEvent) -> String {
    match *event {
        WorldEvent::Moved { entity, to, .. } if entity.is_player() => {
            format!("You step to {to}.")
        }
        WorldEvent::Moved { entity, to, .. } => {
            format!("The {} moves to {to}.", name_of(state, entity))
        }
        WorldEvent::Waited { entity } if entity.is_player() => "You wait.".to_string(),
        WorldEvent::Waited { entity } => format!("The {} waits.", name_of(state, entity)),
        WorldEvent::Attacked {
            attacker,
            defender,
            damage: 0,
        } if attacker.is_player() => {
            format!("You hit the {} but the blow glances off.", name_of(state, defender))
        }
        WorldEvent::Attacked {
            attacker,
            defender,
            damage,
        } if attacker.is_player() => {
            format!("You hit the {} for {damage}.", name_of(state, defender))
        }
        WorldEvent::Attacked {
            attacker,
            defender,
            damage: 0,
        } if defender.is_player() => {
            format!("The {} hits you but your armor holds.", name_of(state, attacker))
        }
        WorldEvent::Attacked {
            attacker,
            defender,
            damage,
        } if defender.is_player() => {
            format!("The {} hits you for {damage}.", name_of(state, attacker))
        }
        WorldEvent::Attacked {
            attacker,
            defender,
            damage,
        } => format!(
            "The {} hits the {} for {damage}.",
            name_of(state, attacker),
            name_of(state, defender)
        ),
        WorldEvent::Missed { attacker, defender } if attacker.is_player() => {
            format!("You miss the {}.", name_of(state, defender))
        }
        WorldEvent::Missed { attacker, .. } => {
            format!("The {} misses you.", name_of(state, attacker))
        }
        WorldEvent::Died { entity, .. } if entity.is_player() => "You fall.".to_string(),
        WorldEvent::Died { entity, .. } => format!("The {} dies.", name_of(state, entity)),
        // The item record is gone by the time the event is read back, so
        // the prose stays generic.
        WorldEvent::PickedUp { healed, .. } => {
            format!("You use a medkit and recover {healed} hp.")
        }
        WorldEvent::GameOver => "The run is over.".to_string(),
    }
}

fn name_of(state: &GameState, id: EntityId) -> String {
    state
        .entities
        .actor(id)
        .map(|actor| actor.name.clone())
        .or_else(|| state.entities.prop(id).map(|prop| prop.name.clone()))
        .or_else(|| state.entities.item(id).map(|item| item.name.clone()))
        .unwrap_or_else(|| format!("creature {id}"))
}
