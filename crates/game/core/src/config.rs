use std::fmt;

/// Session configuration: map dimensions, seed, and tunable parameters.
///
/// A config is validated once with [`GameConfig::validate`] before any map
/// generation happens; the generator assumes the bounds hold.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Map width in tiles. Must be within `MIN_MAP_SIDE..=MAX_MAP_SIDE`.
    pub map_width: u32,
    /// Map height in tiles. Must be within `MIN_MAP_SIDE..=MAX_MAP_SIDE`.
    pub map_height: u32,
    /// Base seed for all randomness (map layout, combat rolls).
    pub random_seed: u64,
    /// Number of room placement attempts during generation.
    pub max_rooms: u32,
    /// Smallest room side length the generator will roll.
    pub room_min_size: u32,
    /// Largest room side length the generator will roll.
    pub room_max_size: u32,
    /// Manhattan distance within which hostiles pursue the player.
    pub activation_radius: u32,
    /// Maximum retained entries in the session event log.
    pub event_log_capacity: usize,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum entities sharing one tile (e.g. an actor standing on items).
    pub const MAX_OCCUPANTS_PER_TILE: usize = 4;

    // ===== validation bounds =====
    /// Smallest usable map side: leaves room for a border and one room.
    pub const MIN_MAP_SIDE: u32 = 4;
    pub const MAX_MAP_SIDE: u32 = 256;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAP_WIDTH: u32 = 80;
    pub const DEFAULT_MAP_HEIGHT: u32 = 50;
    pub const DEFAULT_MAX_ROOMS: u32 = 30;
    pub const DEFAULT_ROOM_MIN_SIZE: u32 = 6;
    pub const DEFAULT_ROOM_MAX_SIZE: u32 = 10;
    pub const DEFAULT_ACTIVATION_RADIUS: u32 = 8;
    pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 256;

    pub fn new(map_width: u32, map_height: u32, random_seed: u64) -> Self {
        Self {
            map_width,
            map_height,
            random_seed,
            ..Self::default()
        }
    }

    /// Checks every field against its documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [(Axis::Width, self.map_width), (Axis::Height, self.map_height)] {
            if value < Self::MIN_MAP_SIDE {
                return Err(ConfigError::MapTooSmall {
                    axis,
                    value,
                    minimum: Self::MIN_MAP_SIDE,
                });
            }
            if value > Self::MAX_MAP_SIDE {
                return Err(ConfigError::MapTooLarge {
                    axis,
                    value,
                    maximum: Self::MAX_MAP_SIDE,
                });
            }
        }
        if self.room_min_size < 2 || self.room_min_size > self.room_max_size {
            return Err(ConfigError::RoomBounds {
                min: self.room_min_size,
                max: self.room_max_size,
            });
        }
        if self.max_rooms == 0 {
            return Err(ConfigError::NoRooms);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: Self::DEFAULT_MAP_WIDTH,
            map_height: Self::DEFAULT_MAP_HEIGHT,
            random_seed: 0,
            max_rooms: Self::DEFAULT_MAX_ROOMS,
            room_min_size: Self::DEFAULT_ROOM_MIN_SIZE,
            room_max_size: Self::DEFAULT_ROOM_MAX_SIZE,
            activation_radius: Self::DEFAULT_ACTIVATION_RADIUS,
            event_log_capacity: Self::DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

/// Map axis named in validation errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
        }
    }
}

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("map {axis} {value} is below the minimum of {minimum}")]
    MapTooSmall { axis: Axis, value: u32, minimum: u32 },

    #[error("map {axis} {value} exceeds the maximum of {maximum}")]
    MapTooLarge { axis: Axis, value: u32, maximum: u32 },

    #[error("room size bounds are invalid (min {min}, max {max})")]
    RoomBounds { min: u32, max: u32 },

    #[error("max_rooms must be at least 1")]
    NoRooms,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        let mut config = GameConfig::default();
        config.map_width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MapTooSmall {
                axis: Axis::Width,
                ..
            })
        ));

        let mut config = GameConfig::default();
        config.map_height = 1000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MapTooLarge {
                axis: Axis::Height,
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_room_bounds() {
        let mut config = GameConfig::default();
        config.room_min_size = 12;
        config.room_max_size = 6;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RoomBounds { min: 12, max: 6 })
        ));
    }
}
