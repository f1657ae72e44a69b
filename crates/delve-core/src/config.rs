//! World generation settings
//!
//! All settings deserialize from JSON with every field optional; missing
//! fields take the defaults below.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::bsp::BspOptions;
use crate::error::ConfigError;
use crate::rooms::RandomRoomsOptions;
use crate::walk::DrunkWalkOptions;

/// Smallest map side the border ring leaves room for
pub const MIN_MAP_SIDE: i32 = 3;

/// Largest map, in cells
pub const MAX_MAP_AREA: i32 = 1 << 22;

/// Which generator carves the map
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum GenerationKind {
    #[default]
    #[strum(serialize = "bsp")]
    #[serde(rename = "bsp")]
    Bsp,
    #[strum(serialize = "drunk")]
    #[serde(rename = "drunk")]
    DrunkWalk,
    #[strum(serialize = "random")]
    #[serde(rename = "random")]
    RandomRooms,
}

/// Everything [`crate::World::generate`] needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    pub kind: GenerationKind,
    /// Absent means seed from entropy
    pub seed: Option<u64>,

    pub bsp: BspOptions,
    pub drunk_walk: DrunkWalkOptions,
    pub random_rooms: RandomRoomsOptions,

    /// BSP rooms farther than this many hops from the start room are walled off
    pub prune_hops: usize,
    pub alt_floor_chance: f32,
    pub enemy_chance: f32,
    /// Random rooms only: chance to put a door in a one-wide gap
    pub chokepoint_door_chance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 45,
            kind: GenerationKind::Bsp,
            seed: None,
            bsp: BspOptions {
                split_count: 100,
                minimum_room_size: 5,
                ..BspOptions::default()
            },
            drunk_walk: DrunkWalkOptions::default(),
            random_rooms: RandomRoomsOptions::default(),
            prune_hops: 4,
            alt_floor_chance: 0.1,
            enemy_chance: 0.02,
            chokepoint_door_chance: 0.25,
        }
    }
}

impl WorldConfig {
    /// Parse a JSON config, then validate it
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges that the generators rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let area = self.width.checked_mul(self.height);
        if self.width < MIN_MAP_SIDE
            || self.height < MIN_MAP_SIDE
            || area.is_none_or(|a| a > MAX_MAP_AREA)
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        for (name, value) in [
            ("alt_floor_chance", self.alt_floor_chance),
            ("enemy_chance", self.enemy_chance),
            ("chokepoint_door_chance", self.chokepoint_door_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidChance { name, value });
            }
        }

        if self.bsp.minimum_room_size < 1 {
            return Err(ConfigError::InvalidMinimumRoomSize(self.bsp.minimum_room_size));
        }

        let fill = self.drunk_walk.fill_target;
        if !(fill > 0.0 && fill <= 1.0) {
            return Err(ConfigError::InvalidFillTarget(fill));
        }

        let rooms = &self.random_rooms;
        for (name, min, max) in [
            ("width", rooms.min_width, rooms.max_width),
            ("height", rooms.min_height, rooms.max_height),
        ] {
            if min < 1 || min > max {
                return Err(ConfigError::InvalidRoomBounds { name, min, max });
            }
        }

        Ok(())
    }
}
