//! Player entity and its per-frame kinematics step

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::{Occupancy, SamplePoint, check_occupancy, footprint_samples};
use super::input::ControllerInput;
use super::tile_map::WorldPosition;
use super::world::World;
use crate::consts::MIN_PIXELS_PER_FRAME;
use crate::safe_ratio;
use crate::settings::PlayerSettings;

/// What the player did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    /// No directional input
    Idle,
    /// At least one direction held
    AttemptingMove,
}

/// Result of one kinematics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub state: MotionState,
    /// The candidate position passed collision and was committed
    pub moved: bool,
    /// The rejected candidate position and why it was rejected
    pub blocked: Option<(Vec2, Occupancy)>,
    /// Tile left and tile entered, when a committed move changed tiles
    pub tile_switch: Option<(UVec2, UVec2)>,
    /// New layer, when the layer buttons changed it
    pub layer_changed: Option<u8>,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    /// Authoritative world position of the footprint center, always wrapped
    pub absolute_position: Vec2,
    /// Screen-space top-left draw anchor
    pub fixed_position: Vec2,
    /// Screen-space logical anchor (footprint center)
    pub game_position: Vec2,
    /// Top-left of the viewport in world pixels
    pub camera_position: Vec2,
    pub width_px: f32,
    pub height_px: f32,
    pub speed_mps: f32,
    /// Layer selector (0 = lower, 1 = upper)
    pub z_index: u8,
    /// Direction of the last attempted move
    pub last_move_direction: Vec2,
    pub world_position: WorldPosition,
    pub state: MotionState,
    samples: [SamplePoint; 3],
}

/// Pixels to travel this frame, never less than one
pub fn pixels_per_frame(pixels_per_meter: f32, speed_mps: f32, fps: f32) -> f32 {
    safe_ratio(pixels_per_meter * speed_mps, fps).max(MIN_PIXELS_PER_FRAME)
}

impl Player {
    /// Place a player at `spawn` (world pixels, footprint center).
    ///
    /// # Panics
    /// If the player is larger than a tile on either axis.
    pub fn new(settings: &PlayerSettings, world: &World, spawn: Vec2, viewport: Vec2) -> Self {
        let tile_edge = world.tile_map.tile_edge_px;
        assert!(
            settings.width_px <= tile_edge && settings.height_px <= tile_edge,
            "player ({}x{}px) must fit inside one {}px tile",
            settings.width_px,
            settings.height_px,
            tile_edge
        );

        let absolute_position = world.wrap(spawn);
        let mut player = Self {
            absolute_position,
            fixed_position: Vec2::ZERO,
            game_position: Vec2::ZERO,
            camera_position: Vec2::ZERO,
            width_px: settings.width_px,
            height_px: settings.height_px,
            speed_mps: settings.speed_mps,
            z_index: 0,
            last_move_direction: Vec2::ZERO,
            world_position: world.position_of(absolute_position),
            state: MotionState::Idle,
            samples: footprint_samples(settings.width_px, settings.height_px),
        };
        player.update_anchors(world, viewport);
        player
    }

    /// Half the footprint
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width_px, self.height_px) * 0.5
    }

    /// Collision sample points on the footprint
    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    /// Recompute the screen anchors and camera from the current position
    pub fn update_anchors(&mut self, world: &World, viewport: Vec2) {
        let center = viewport * 0.5;
        self.game_position = center;
        self.fixed_position = center - self.half_size();
        self.camera_position = world.wrap(self.absolute_position - center);
        self.world_position = world.position_of(self.absolute_position);
    }

    /// Advance one frame.
    ///
    /// The whole move is rejected if any footprint sample of the candidate
    /// position lands on a blocking tile; there is no per-axis sliding.
    pub fn step(&mut self, world: &World, input: &ControllerInput, fps: f32, viewport: Vec2) -> MoveOutcome {
        let layer_changed = self.apply_layer_input(input);

        let direction = input.movement_direction();
        if direction == Vec2::ZERO {
            self.state = MotionState::Idle;
            return MoveOutcome {
                state: self.state,
                moved: false,
                blocked: None,
                tile_switch: None,
                layer_changed,
            };
        }

        self.state = MotionState::AttemptingMove;
        self.last_move_direction = direction;

        let speed = pixels_per_frame(world.pixels_per_meter, self.speed_mps, fps);
        let candidate = world.wrap(self.absolute_position + direction * speed);

        let occupancy = check_occupancy(&world.tile_map, candidate, &self.samples);
        if occupancy != Occupancy::Free {
            return MoveOutcome {
                state: self.state,
                moved: false,
                blocked: Some((candidate, occupancy)),
                tile_switch: None,
                layer_changed,
            };
        }

        let previous_tile = self.world_position.tile;
        self.absolute_position = candidate;
        self.update_anchors(world, viewport);

        let current_tile = self.world_position.tile;
        let tile_switch = (current_tile != previous_tile).then_some((previous_tile, current_tile));

        MoveOutcome {
            state: self.state,
            moved: true,
            blocked: None,
            tile_switch,
            layer_changed,
        }
    }

    fn apply_layer_input(&mut self, input: &ControllerInput) -> Option<u8> {
        let layer = if input.layer_up.ended_down {
            1
        } else if input.layer_down.ended_down {
            0
        } else {
            return None;
        };

        if layer == self.z_index {
            return None;
        }
        self.z_index = layer;
        Some(layer)
    }
}
