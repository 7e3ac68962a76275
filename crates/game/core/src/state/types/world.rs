use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::GameConfig;

use super::{EntityId, Position};

type OccupantSlots = ArrayVec<EntityId, { GameConfig::MAX_OCCUPANTS_PER_TILE }>;

/// Walkability grid plus the dynamic occupancy index layered on top of it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    pub terrain: TerrainGrid,
    pub tile_map: TileMap,
}

impl WorldState {
    pub fn new(terrain: TerrainGrid) -> Self {
        Self {
            terrain,
            tile_map: TileMap::default(),
        }
    }

    /// Bounds-checked terrain lookup; out-of-bounds reads as not walkable.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.terrain.is_walkable(position)
    }

    /// Merged view of terrain and occupants at a tile.
    ///
    /// Out-of-bounds positions yield a view that is neither walkable nor
    /// occupied, so callers never need a separate bounds check.
    pub fn tile_view(&self, position: Position) -> TileView {
        TileView {
            position,
            walkable: self.terrain.is_walkable(position),
            occupants: self
                .tile_map
                .occupants(&position)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// Row-major grid of walkable flags with fail-closed bounds handling.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    walkable: Vec<bool>,
}

impl TerrainGrid {
    /// A grid with every tile set to `walkable`.
    pub fn filled(width: u32, height: u32, walkable: bool) -> Self {
        Self {
            width,
            height,
            walkable: vec![walkable; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.in_bounds(position) {
            return None;
        }
        Some((position.y as usize) * (self.width as usize) + (position.x as usize))
    }

    /// Out-of-bounds always returns false.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.index(position)
            .map(|i| self.walkable[i])
            .unwrap_or(false)
    }

    /// Writes a walkable flag. Out-of-bounds writes are dropped.
    pub fn set_walkable(&mut self, position: Position, walkable: bool) {
        if let Some(i) = self.index(position) {
            self.walkable[i] = walkable;
        }
    }
}

/// Per-tile occupant lists keyed by position.
///
/// Tiles with no occupants carry no entry, so iteration over the map only
/// visits occupied tiles.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    occupancy: BTreeMap<Position, OccupantSlots>,
}

impl TileMap {
    pub fn occupancy(&self) -> &BTreeMap<Position, OccupantSlots> {
        &self.occupancy
    }

    pub fn occupants(&self, position: &Position) -> Option<&OccupantSlots> {
        self.occupancy.get(position)
    }

    /// First occupant at a tile, if any.
    pub fn first_occupant(&self, position: &Position) -> Option<EntityId> {
        self.occupancy
            .get(position)
            .and_then(|slots| slots.first().copied())
    }

    /// Registers an entity at a tile. Returns false if the tile is full.
    /// Re-adding an entity already listed is a no-op reporting success.
    pub fn add_occupant(&mut self, position: Position, entity: EntityId) -> bool {
        let slots = self.occupancy.entry(position).or_default();
        if slots.contains(&entity) {
            return true;
        }
        slots.try_push(entity).is_ok()
    }

    /// Unregisters an entity from a tile. Returns false if it was not there.
    pub fn remove_occupant(&mut self, position: &Position, entity: EntityId) -> bool {
        let Some(slots) = self.occupancy.get_mut(position) else {
            return false;
        };
        let Some(index) = slots.iter().position(|occupant| *occupant == entity) else {
            return false;
        };
        slots.remove(index);
        if slots.is_empty() {
            self.occupancy.remove(position);
        }
        true
    }
}

/// Snapshot of one tile: terrain flag plus occupants.
#[derive(Clone, Debug)]
pub struct TileView {
    position: Position,
    walkable: bool,
    occupants: OccupantSlots,
}

impl TileView {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    pub fn occupants(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.occupants.iter().copied()
    }
}
