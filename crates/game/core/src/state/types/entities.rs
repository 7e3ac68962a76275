use super::{EntityId, Position, ResourceMeter};

/// A creature that can act: the player or a hostile.
///
/// Dead actors stay in the state with a depleted meter so names and final
/// positions remain inspectable; they vacate the occupancy index instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    pub hp: ResourceMeter,
    /// Sides of the damage die rolled on a hit.
    pub power: u32,
    /// Flat damage reduction applied to incoming hits.
    pub defense: u32,
}

impl ActorState {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        position: Position,
        hp: ResourceMeter,
        power: u32,
        defense: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            hp,
            power,
            defense,
        }
    }

    /// The baseline adventurer statline used when a session spawns its player.
    pub fn player(position: Position) -> Self {
        Self::new(
            EntityId::PLAYER,
            "Player",
            position,
            ResourceMeter::full(30),
            5,
            2,
        )
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.hp.is_depleted()
    }
}

/// Inert fixture occupying a tile, optionally blocking movement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropState {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    pub blocks: bool,
}

/// Pickup lying on the floor. Entering its tile consumes it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemState {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    /// Hit points restored on pickup, clamped at the actor's maximum.
    pub heal_amount: u32,
}

/// All entities tracked in the session, with the player as a distinguished
/// singleton.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitiesState {
    pub player: ActorState,
    pub npcs: Vec<ActorState>,
    pub props: Vec<PropState>,
    pub items: Vec<ItemState>,
}

impl EntitiesState {
    pub fn new(player: ActorState) -> Self {
        Self {
            player,
            npcs: Vec::new(),
            props: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Looks up an actor (player or hostile) by id.
    pub fn actor(&self, id: EntityId) -> Option<&ActorState> {
        if self.player.id == id {
            return Some(&self.player);
        }
        self.npcs.iter().find(|actor| actor.id == id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorState> {
        if self.player.id == id {
            return Some(&mut self.player);
        }
        self.npcs.iter_mut().find(|actor| actor.id == id)
    }

    /// The player followed by every hostile, in spawn order.
    pub fn all_actors(&self) -> impl Iterator<Item = &ActorState> {
        std::iter::once(&self.player).chain(self.npcs.iter())
    }

    pub fn prop(&self, id: EntityId) -> Option<&PropState> {
        self.props.iter().find(|prop| prop.id == id)
    }

    pub fn item(&self, id: EntityId) -> Option<&ItemState> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Removes and returns an item, preserving the order of the rest.
    pub fn remove_item(&mut self, id: EntityId) -> Option<ItemState> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}
