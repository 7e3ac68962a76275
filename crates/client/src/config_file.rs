//! Optional TOML session settings and the flag/file/default merge.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Deserialize;

use game_core::GameConfig;

use crate::cli::Args;

/// On-disk session settings. Every field is optional; missing ones fall
/// through to the engine defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<u64>,
    pub max_rooms: Option<u32>,
    pub room_min_size: Option<u32>,
    pub room_max_size: Option<u32>,
    pub activation_radius: Option<u32>,
    pub event_log_capacity: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Builds the session config. CLI switches override the file; the file
/// overrides the defaults. Without an explicit seed each run gets a fresh
/// one, so replays must pass `--seed`.
pub fn resolve(args: &Args) -> Result<GameConfig> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let mut config = GameConfig::new(
        args.width
            .or(file.width)
            .unwrap_or(GameConfig::DEFAULT_MAP_WIDTH),
        args.height
            .or(file.height)
            .unwrap_or(GameConfig::DEFAULT_MAP_HEIGHT),
        args.seed.or(file.seed).unwrap_or_else(clock_seed),
    );
    if let Some(max_rooms) = file.max_rooms {
        config.max_rooms = max_rooms;
    }
    if let Some(room_min_size) = file.room_min_size {
        config.room_min_size = room_min_size;
    }
    if let Some(room_max_size) = file.room_max_size {
        config.room_max_size = room_max_size;
    }
    if let Some(activation_radius) = file.activation_radius {
        config.activation_radius = activation_radius;
    }
    if let Some(event_log_capacity) = file.event_log_capacity {
        config.event_log_capacity = event_log_capacity;
    }
    Ok(config)
}

fn clock_seed() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_nanos() as u64,
        Err(_) => 0,
    }
}
