//! Game settings
//!
//! Loaded from a JSON file by the host. Every field has a default, so a
//! partial file only overrides what it names.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SampleEncoding;

/// Tile grid shape and map generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub pixels_per_meter: f32,
    /// Tile edge length in meters
    pub tile_edge_meters: f32,
    /// log2 of the tile grid edge length
    pub tile_shift: u32,
    /// log2 of chunks per axis
    pub chunk_shift: u32,
    /// log2 of tiles per chunk edge
    pub chunk_tile_shift: u32,
    /// Edge length of a stamped room, in tiles
    pub room_tiles: u32,
    /// Door layout seed
    pub seed: u64,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            pixels_per_meter: 32.0,
            tile_edge_meters: 1.0,
            tile_shift: 8,
            chunk_shift: 4,
            chunk_tile_shift: 4,
            room_tiles: 16,
            seed: 0x5EED,
        }
    }
}

/// Player footprint and speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub width_px: f32,
    pub height_px: f32,
    /// Meters per second
    pub speed_mps: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            width_px: 24.0,
            height_px: 24.0,
            speed_mps: 5.0,
        }
    }
}

/// Tone synth configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub samples_per_second: u32,
    pub encoding: SampleEncoding,
    pub hertz: f32,
    /// Peak level, 0.0 - 1.0 of full scale
    pub amplitude: f32,
    /// Retune the tone whenever the player enters a new tile
    pub tile_tones: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            samples_per_second: 48_000,
            encoding: SampleEncoding::I16,
            hertz: 256.0,
            amplitude: 0.1,
            tile_tones: true,
        }
    }
}

/// Frame buffer size the world must exceed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

impl ViewportSettings {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// All game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldSettings,
    pub player: PlayerSettings,
    pub audio: AudioSettings,
    pub viewport: ViewportSettings,
    /// Size of the permanent memory region the host hands the arena
    pub permanent_storage_bytes: usize,
    /// Outline the tile under the player (debug aid)
    pub highlight_player_tile: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world: WorldSettings::default(),
            player: PlayerSettings::default(),
            audio: AudioSettings::default(),
            viewport: ViewportSettings::default(),
            permanent_storage_bytes: 1024 * 1024,
            highlight_player_tile: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
