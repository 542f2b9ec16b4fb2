//! Tile Wander entry point
//!
//! Headless native host: owns the permanent memory, the frame buffer and a
//! simulated audio ring, and drives the game once per frame with scripted
//! input. Window creation and real audio devices are left to a platform layer.

use std::path::PathBuf;

use glam::Vec2;

use tile_wander::Arena;
use tile_wander::audio::{AudioWindow, SampleFormat};
use tile_wander::renderer::FrameBuffer;
use tile_wander::settings::Settings;
use tile_wander::sim::{ButtonState, ControllerInput, FrameInput, GameEvent, GameState, fill_sound, update_and_render};

/// Frames to run before exiting
const FRAME_COUNT: u64 = 600;
/// Target frame rate of the scripted run
const TARGET_FPS: f32 = 60.0;
/// Audio ring length in seconds
const RING_SECONDS: usize = 1;
/// How far ahead of the play cursor the host keeps the ring filled
const LATENCY_FRAMES: usize = 3;

/// Simulated audio device: a ring buffer whose play cursor advances in real
/// time while the host writes ahead of it
struct AudioRing {
    memory: Vec<u8>,
    format: SampleFormat,
    /// Stereo samples written since start
    running_sample_index: usize,
    /// Stereo samples played since start
    played_samples: usize,
}

impl AudioRing {
    fn new(format: SampleFormat) -> Self {
        Self {
            memory: vec![0u8; format.bytes_per_second() * RING_SECONDS],
            format,
            running_sample_index: 0,
            played_samples: 0,
        }
    }

    fn ring_samples(&self) -> usize {
        self.memory.len() / self.format.bytes_per_sample()
    }

    /// Advance the play cursor by one frame's worth of samples
    fn play_frame(&mut self, fps: f32) {
        self.played_samples += (self.format.samples_per_second as f32 / fps).round() as usize;
    }

    /// Lock the region between the last write and the latency target
    fn lock(&mut self, fps: f32) -> AudioWindow<'_> {
        let samples_per_frame = (self.format.samples_per_second as f32 / fps).round() as usize;
        let target = (self.played_samples + samples_per_frame * LATENCY_FRAMES)
            .min(self.played_samples + self.ring_samples());
        let to_write = target.saturating_sub(self.running_sample_index);

        let bytes_per_sample = self.format.bytes_per_sample();
        let byte_to_lock = (self.running_sample_index % self.ring_samples()) * bytes_per_sample;
        self.running_sample_index += to_write;
        AudioWindow::from_ring(&mut self.memory, byte_to_lock, to_write * bytes_per_sample, self.format)
    }
}

/// Scripted input: walk a square, switching layers at each corner
fn scripted_input(frame: u64) -> FrameInput {
    let leg = (frame / 120) % 4;
    let mut controller = ControllerInput::default();
    match leg {
        0 => controller.move_right = ButtonState::DOWN,
        1 => controller.move_down = ButtonState::DOWN,
        2 => controller.move_left = ButtonState::DOWN,
        _ => controller.stick = Vec2::new(0.0, 1.0),
    }
    if frame % 120 == 0 {
        if leg % 2 == 0 {
            controller.layer_up = ButtonState::DOWN;
        } else {
            controller.layer_down = ButtonState::DOWN;
        }
    }
    FrameInput::single(TARGET_FPS, controller)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tile Wander starting...");

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load(&path),
        None => Settings::default(),
    };

    let mut permanent_storage = vec![0u8; settings.permanent_storage_bytes];
    let mut arena = Arena::new(&mut permanent_storage);
    let mut state = GameState::new(&mut arena, &settings);

    let width = settings.viewport.width as usize;
    let height = settings.viewport.height as usize;
    let mut pixels = vec![0u8; width * height * tile_wander::consts::BYTES_PER_PIXEL];

    let format = SampleFormat::new(settings.audio.samples_per_second, settings.audio.encoding);
    let mut ring = AudioRing::new(format);

    let mut tile_switches = 0usize;
    let mut blocked = 0usize;
    let mut samples_written = 0usize;
    let mut split_windows = 0usize;

    for frame in 0..FRAME_COUNT {
        let input = scripted_input(frame);

        let mut buffer = FrameBuffer::new(&mut pixels, width, height);
        update_and_render(&mut state, &input, &mut buffer);

        ring.play_frame(TARGET_FPS);
        let mut window = ring.lock(TARGET_FPS);
        if window.is_split() {
            split_windows += 1;
        }
        samples_written += fill_sound(&mut state, &mut window);

        for event in state.drain_events() {
            match event {
                GameEvent::TileSwitch { .. } => tile_switches += 1,
                GameEvent::MoveBlocked { .. } => blocked += 1,
                GameEvent::LayerChanged { z_index } => log::info!("Frame {}: layer {}", frame, z_index),
                GameEvent::PauseChanged { paused } => log::info!("Frame {}: paused {}", frame, paused),
            }
        }
    }

    log::info!(
        "Ran {} frames: player at {:?}, {} tile switches, {} blocked moves",
        state.frame_index,
        state.player.world_position.tile,
        tile_switches,
        blocked
    );
    log::info!(
        "Audio: {} samples written, {} wrapped windows, phase {:.3}",
        samples_written,
        split_windows,
        state.synth.phase()
    );
}
