//! Rooms-and-corridors map generation.
//!
//! Generation is a pure function of the configuration: every roll comes
//! from a [`SeedStream`] keyed on the session seed, so the same config
//! always yields the same layout. The generator produces a
//! [`MapBlueprint`] first; turning it into a [`GameState`] is a separate
//! step so callers can inspect or test layouts without spawning anything.

use crate::config::GameConfig;
use crate::rng::{RngOracle, SeedStream, compute_seed, seed_context};
use crate::state::{ActorState, GameState, Position, SpawnError, TerrainGrid};

/// Axis-aligned room span. `x2`/`y2` are the far corners; the carved
/// interior excludes the `x1`/`y1` edge so adjacent rooms keep a wall
/// between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Rect {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl Rect {
    fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }
}

/// A hostile to place when the blueprint is realized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterSpawn {
    pub name: &'static str,
    pub position: Position,
    pub hp: u32,
    pub power: u32,
    pub defense: u32,
}

/// A floor item to place when the blueprint is realized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemSpawn {
    pub name: &'static str,
    pub position: Position,
    pub heal_amount: u32,
}

/// Everything map generation decided: terrain plus initial placements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapBlueprint {
    pub terrain: TerrainGrid,
    pub player_spawn: Position,
    pub monsters: Vec<MonsterSpawn>,
    pub items: Vec<ItemSpawn>,
}

impl MapBlueprint {
    /// Realizes the blueprint into a playable state, registering every
    /// entity in the occupancy index.
    pub fn into_state(self, game_seed: u64) -> Result<GameState, SpawnError> {
        let mut state = GameState::new(
            game_seed,
            self.terrain,
            ActorState::player(self.player_spawn),
        )?;
        for monster in self.monsters {
            state.spawn_npc(
                monster.name,
                monster.position,
                monster.hp,
                monster.power,
                monster.defense,
            )?;
        }
        for item in self.items {
            state.spawn_item(item.name, item.position, item.heal_amount)?;
        }
        Ok(state)
    }
}

/// Carves rooms joined by L-shaped corridors and decides initial spawns.
///
/// Room placement makes `max_rooms` attempts and keeps the ones that fit
/// without overlap. The player starts at the first room's center. Every
/// later room holds one hostile at its center and, on a coin flip, one
/// medkit somewhere inside. Maps too small for a single rolled room fall
/// back to one carved hall so the blueprint is always playable.
pub fn generate(config: &GameConfig, rng: &dyn RngOracle) -> MapBlueprint {
    let mut stream = SeedStream::new(
        rng,
        compute_seed(config.random_seed, 0, 0, seed_context::MAP_LAYOUT),
    );
    let mut terrain = TerrainGrid::filled(config.map_width, config.map_height, false);
    let mut rooms: Vec<Rect> = Vec::new();

    for _ in 0..config.max_rooms {
        let width = stream.range(config.room_min_size, config.room_max_size);
        let height = stream.range(config.room_min_size, config.room_max_size);
        if width + 2 > config.map_width || height + 2 > config.map_height {
            continue;
        }
        let x = stream.range(0, config.map_width - width - 2);
        let y = stream.range(0, config.map_height - height - 2);

        let room = Rect::new(x as i32, y as i32, width as i32, height as i32);
        if rooms.iter().any(|other| room.intersects(other)) {
            continue;
        }
        carve_room(&mut terrain, &room);

        if let Some(previous) = rooms.last() {
            let new_center = room.center();
            let prev_center = previous.center();
            if stream.roll_die(2) == 1 {
                carve_h_tunnel(&mut terrain, prev_center.x, new_center.x, prev_center.y);
                carve_v_tunnel(&mut terrain, prev_center.y, new_center.y, new_center.x);
            } else {
                carve_v_tunnel(&mut terrain, prev_center.y, new_center.y, prev_center.x);
                carve_h_tunnel(&mut terrain, prev_center.x, new_center.x, new_center.y);
            }
        }
        rooms.push(room);
    }

    // On maps smaller than any rollable room, carve the whole interior.
    if rooms.is_empty() {
        let room = Rect::new(
            0,
            0,
            config.map_width as i32 - 2,
            config.map_height as i32 - 2,
        );
        carve_room(&mut terrain, &room);
        rooms.push(room);
    }

    let player_spawn = rooms[0].center();
    let mut monsters = Vec::new();
    let mut items = Vec::new();

    for room in rooms.iter().skip(1) {
        let center = room.center();
        monsters.push(if stream.roll_die(2) == 1 {
            MonsterSpawn {
                name: "Goblin",
                position: center,
                hp: 12,
                power: 3,
                defense: 0,
            }
        } else {
            MonsterSpawn {
                name: "Orc",
                position: center,
                hp: 16,
                power: 4,
                defense: 1,
            }
        });

        if stream.roll_die(2) == 1 {
            let x = stream.range((room.x1 + 1) as u32, room.x2 as u32);
            let y = stream.range((room.y1 + 1) as u32, room.y2 as u32);
            let position = Position::new(x as i32, y as i32);
            // The room center is taken by the hostile.
            if position != center {
                items.push(ItemSpawn {
                    name: "Medkit",
                    position,
                    heal_amount: 8,
                });
            }
        }
    }

    MapBlueprint {
        terrain,
        player_spawn,
        monsters,
        items,
    }
}

fn carve_room(terrain: &mut TerrainGrid, room: &Rect) {
    for y in (room.y1 + 1)..=room.y2 {
        for x in (room.x1 + 1)..=room.x2 {
            terrain.set_walkable(Position::new(x, y), true);
        }
    }
}

fn carve_h_tunnel(terrain: &mut TerrainGrid, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        terrain.set_walkable(Position::new(x, y), true);
    }
}

fn carve_v_tunnel(terrain: &mut TerrainGrid, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        terrain.set_walkable(Position::new(x, y), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    #[test]
    fn same_config_reproduces_the_same_blueprint() {
        let config = GameConfig::new(80, 50, 1234);
        let first = generate(&config, &PcgRng);
        let second = generate(&config, &PcgRng);
        assert_eq!(first, second);
    }

    #[test]
    fn blueprints_realize_into_consistent_states() {
        let config = GameConfig::new(80, 50, 99);
        let blueprint = generate(&config, &PcgRng);

        assert!(blueprint.terrain.is_walkable(blueprint.player_spawn));
        for monster in &blueprint.monsters {
            assert!(blueprint.terrain.is_walkable(monster.position));
            assert_ne!(monster.position, blueprint.player_spawn);
        }
        for item in &blueprint.items {
            assert!(blueprint.terrain.is_walkable(item.position));
            assert_ne!(item.position, blueprint.player_spawn);
        }

        let state = blueprint.into_state(99).unwrap();
        assert_eq!(state.verify_consistency(), Ok(()));
    }

    #[test]
    fn map_borders_stay_solid() {
        let config = GameConfig::new(80, 50, 7);
        let blueprint = generate(&config, &PcgRng);

        for x in 0..80 {
            assert!(!blueprint.terrain.is_walkable(Position::new(x, 0)));
            assert!(!blueprint.terrain.is_walkable(Position::new(x, 49)));
        }
        for y in 0..50 {
            assert!(!blueprint.terrain.is_walkable(Position::new(0, y)));
            assert!(!blueprint.terrain.is_walkable(Position::new(79, y)));
        }
    }

    #[test]
    fn tiny_maps_fall_back_to_a_single_hall() {
        let config = GameConfig::new(5, 5, 3);
        let blueprint = generate(&config, &PcgRng);

        assert!(blueprint.monsters.is_empty());
        assert!(blueprint.items.is_empty());
        assert_eq!(blueprint.player_spawn, Position::new(1, 1));
        assert!(blueprint.terrain.is_walkable(Position::new(1, 1)));
        assert!(blueprint.terrain.is_walkable(Position::new(3, 3)));
        assert!(!blueprint.terrain.is_walkable(Position::new(0, 0)));
        assert!(!blueprint.terrain.is_walkable(Position::new(4, 4)));
    }
}
