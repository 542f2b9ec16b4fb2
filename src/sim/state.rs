//! Game state - everything the frame loop carries from one frame to the next
//!
//! Owned by the host's loop object and passed by reference into every
//! per-frame call; nothing lives in statics.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::world::World;
use crate::arena::Arena;
use crate::audio::{SineWave, ToneSynth};
use crate::consts::TILE_TONES_HZ;
use crate::settings::Settings;

/// Something observable that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player's tile changed
    TileSwitch { from: UVec2, to: UVec2, tile_type: u32 },
    /// A move was rejected by collision; `candidate` is the position it tried to reach
    MoveBlocked { candidate: Vec2, tile_type: u32 },
    /// The player changed layers
    LayerChanged { z_index: u8 },
    /// Pause toggled
    PauseChanged { paused: bool },
}

/// Complete game state
pub struct GameState<'a> {
    pub world: World<'a>,
    pub player: Player,
    pub synth: ToneSynth,
    pub viewport: Vec2,
    /// Frames simulated (paused frames excluded)
    pub frame_index: u64,
    pub paused: bool,
    /// Retune the synth on tile switches
    pub tile_tones: bool,
    pub highlight_player_tile: bool,
    base_wave: SineWave,
    events: Vec<GameEvent>,
}

impl<'a> GameState<'a> {
    /// Build the world inside the arena, stamp rooms and spawn the player in
    /// the middle of the first room.
    pub fn new(arena: &mut Arena<'a>, settings: &Settings) -> Self {
        let viewport = settings.viewport.size();
        let mut world = World::new(arena, &settings.world, viewport);
        world.generate_rooms(settings.world.room_tiles, settings.world.seed);

        let middle = settings.world.room_tiles / 2;
        let spawn = world.tile_center(UVec2::new(middle, middle));
        let player = Player::new(&settings.player, &world, spawn, viewport);

        let base_wave = SineWave {
            hertz: settings.audio.hertz,
            amplitude: settings.audio.amplitude,
        };

        log::info!(
            "Game state ready: player at {:?}, arena {} / {} bytes used",
            player.world_position.tile,
            arena.used(),
            arena.capacity()
        );

        Self {
            world,
            player,
            synth: ToneSynth::new(base_wave),
            viewport,
            frame_index: 0,
            paused: false,
            tile_tones: settings.audio.tile_tones,
            highlight_player_tile: settings.highlight_player_tile,
            base_wave,
            events: Vec::new(),
        }
    }

    /// Record an event for the host
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tone for the tile the player just entered
    pub fn retune_for_tile(&mut self, tile_type: u32) {
        if !self.tile_tones {
            return;
        }
        let hertz = TILE_TONES_HZ
            .get(tile_type as usize)
            .copied()
            .unwrap_or(self.base_wave.hertz);
        self.synth.set_wave(SineWave {
            hertz,
            amplitude: self.base_wave.amplitude,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{TILE_DOOR, TILE_FLOOR};
    use crate::sim::tile_map::is_passable;

    #[test]
    fn test_new_spawns_on_floor_in_first_room() {
        let settings = Settings::default();
        let mut memory = vec![0u8; settings.permanent_storage_bytes];
        let mut arena = Arena::new(&mut memory);
        let state = GameState::new(&mut arena, &settings);

        assert_eq!(state.player.world_position.tile, UVec2::new(8, 8));
        assert_eq!(state.world.tile_map.tile_type_at(UVec2::new(8, 8)), TILE_FLOOR);
        assert!(crate::sim::can_occupy(
            &state.world.tile_map,
            state.player.absolute_position,
            state.player.samples()
        ));
        assert!(is_passable(state.world.tile_map.tile_type_at(state.player.world_position.tile)));
        assert_eq!(arena.used(), 256 * 256 * 4);
    }

    #[test]
    fn test_retune_for_tile() {
        let settings = Settings::default();
        let mut memory = vec![0u8; settings.permanent_storage_bytes];
        let mut arena = Arena::new(&mut memory);
        let mut state = GameState::new(&mut arena, &settings);

        state.retune_for_tile(TILE_DOOR);
        assert_eq!(state.synth.wave().hertz, TILE_TONES_HZ[TILE_DOOR as usize]);
        state.retune_for_tile(99);
        assert_eq!(state.synth.wave().hertz, settings.audio.hertz);

        state.tile_tones = false;
        state.retune_for_tile(TILE_FLOOR);
        assert_eq!(state.synth.wave().hertz, settings.audio.hertz);
    }

    #[test]
    fn test_events_drain_in_order() {
        let settings = Settings::default();
        let mut memory = vec![0u8; settings.permanent_storage_bytes];
        let mut arena = Arena::new(&mut memory);
        let mut state = GameState::new(&mut arena, &settings);

        state.push_event(GameEvent::LayerChanged { z_index: 1 });
        state.push_event(GameEvent::PauseChanged { paused: true });
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LayerChanged { z_index: 1 }, GameEvent::PauseChanged { paused: true }]
        );
        assert!(state.drain_events().is_empty());
    }
}
