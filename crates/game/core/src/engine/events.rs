//! Observable outcomes of a turn.

use crate::state::{EntityId, Position};

/// Events emitted while a turn resolves, in occurrence order.
///
/// Events carry entity ids rather than snapshots. Dead actors stay in
/// [`EntitiesState`](crate::state::EntitiesState), so consumers can still
/// look up names and final stats after a `Died` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldEvent {
    /// An entity stepped onto a new tile.
    Moved {
        entity: EntityId,
        from: Position,
        to: Position,
    },
    /// An entity held its position for the turn.
    Waited { entity: EntityId },
    /// A melee swing connected.
    Attacked {
        attacker: EntityId,
        defender: EntityId,
        damage: u32,
    },
    /// A melee swing missed.
    Missed {
        attacker: EntityId,
        defender: EntityId,
    },
    /// An actor ran out of hit points.
    Died { entity: EntityId, position: Position },
    /// An entity consumed a floor item.
    PickedUp {
        entity: EntityId,
        item: EntityId,
        healed: u32,
    },
    /// The player died; the session no longer accepts commands.
    GameOver,
}
