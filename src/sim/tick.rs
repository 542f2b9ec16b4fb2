//! Frame entry points driven by the host loop
//!
//! Once per video frame the host calls `update_and_render` with that frame's
//! input and frame buffer, then `fill_sound` with whatever window its audio
//! driver is ready to accept.

use glam::Vec2;

use super::collision::Occupancy;
use super::input::{ControllerInput, FrameInput};
use super::state::{GameEvent, GameState};
use crate::audio::AudioWindow;
use crate::renderer::frame::{Color, FrameBuffer};
use crate::renderer::scene::{draw_player, draw_tiles};

/// First controller with any movement or layer input, else an idle one
fn active_controller(input: &FrameInput) -> ControllerInput {
    input
        .controllers
        .iter()
        .find(|c| {
            c.any_digital() || c.stick != Vec2::ZERO || c.layer_up.ended_down || c.layer_down.ended_down
        })
        .copied()
        .unwrap_or_default()
}

/// Advance the simulation by one frame
pub fn tick(state: &mut GameState, input: &FrameInput) {
    if input.pause {
        state.paused = !state.paused;
        log::info!("Paused: {}", state.paused);
        state.push_event(GameEvent::PauseChanged { paused: state.paused });
    }
    if state.paused {
        return;
    }

    state.frame_index += 1;

    let controller = active_controller(input);
    let viewport = state.viewport;
    let outcome = state.player.step(&state.world, &controller, input.fps, viewport);

    if let Some(z_index) = outcome.layer_changed {
        log::debug!("Layer -> {}", z_index);
        state.push_event(GameEvent::LayerChanged { z_index });
    }

    if let Some((candidate, Occupancy::Blocked { sample, tile_type })) = outcome.blocked {
        log::debug!("Move to {} blocked at {} sample (tile type {})", candidate, sample, tile_type);
        state.push_event(GameEvent::MoveBlocked { candidate, tile_type });
    }

    if let Some((from, to)) = outcome.tile_switch {
        let tile_type = state.world.tile_map.tile_type_at(to);
        log::debug!("Tile switch {:?} -> {:?} (type {})", from, to, tile_type);
        state.push_event(GameEvent::TileSwitch { from, to, tile_type });
        state.retune_for_tile(tile_type);
    }
}

/// Simulate one frame and draw it into the host's buffer.
///
/// # Panics
/// If the buffer is not smaller than the world on both axes.
pub fn update_and_render(state: &mut GameState, input: &FrameInput, buffer: &mut FrameBuffer) {
    let viewport = Vec2::new(buffer.width() as f32, buffer.height() as f32);
    if viewport != state.viewport {
        assert!(
            viewport.x < state.world.width_px && viewport.y < state.world.height_px,
            "frame buffer {}x{} not smaller than the world",
            viewport.x,
            viewport.y
        );
        log::info!("Viewport resized to {}x{}", viewport.x, viewport.y);
        state.viewport = viewport;
        state.player.update_anchors(&state.world, viewport);
    }

    tick(state, input);

    buffer.clear(Color::BLACK);
    let highlight = state
        .highlight_player_tile
        .then_some(state.player.world_position.tile);
    draw_tiles(buffer, &state.world, state.player.camera_position, highlight);
    draw_player(buffer, &state.player);
}

/// Fill the host's locked audio window with the current tone
pub fn fill_sound(state: &mut GameState, window: &mut AudioWindow) -> usize {
    state.synth.write_samples(window)
}
