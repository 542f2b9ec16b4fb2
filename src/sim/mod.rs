//! Per-frame simulation module
//!
//! All gameplay logic lives here. One `update_and_render` call per video
//! frame, run to completion before the next frame's input is sampled:
//! - No rendering or platform dependencies outside `tick`
//! - No global state; everything hangs off `GameState`

pub mod collision;
pub mod input;
pub mod player;
pub mod state;
pub mod tick;
pub mod tile_map;
pub mod world;

pub use collision::{Occupancy, SamplePoint, can_occupy, footprint_samples};
pub use input::{ButtonState, ControllerInput, FrameInput};
pub use player::{MotionState, MoveOutcome, Player, pixels_per_frame};
pub use state::{GameEvent, GameState};
pub use tick::{fill_sound, tick, update_and_render};
pub use tile_map::{TileMap, WorldPosition, is_passable};
pub use world::World;
