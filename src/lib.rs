//! Tile Wander - a toroidal tile-world wanderer
//!
//! Core modules:
//! - `arena`: Linear bump allocator over the host's permanent memory
//! - `sim`: Per-frame simulation (tile map, collision, player kinematics)
//! - `renderer`: Software rasterizer writing into a bottom-up frame buffer
//! - `audio`: Phase-accumulating tone synth writing into ring-buffer windows
//! - `settings`: Data-driven configuration

pub mod arena;
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use arena::Arena;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Tile code for tiles nobody has stamped yet (passable)
    pub const TILE_EMPTY: u32 = 0;
    /// Walkable room interior
    pub const TILE_FLOOR: u32 = 1;
    /// The one blocking tile code
    pub const TILE_WALL: u32 = 2;
    /// Opening in a room wall (passable)
    pub const TILE_DOOR: u32 = 3;

    /// Slowest movement the kinematics step will ever produce
    pub const MIN_PIXELS_PER_FRAME: f32 = 1.0;

    /// Frame buffers are always 32-bit 0xAARRGGBB
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Output is always interleaved stereo
    pub const AUDIO_CHANNELS: usize = 2;

    /// Tone played per tile code when tile tones are enabled
    pub const TILE_TONES_HZ: [f32; 4] = [220.0, 262.0, 196.0, 330.0];
}

/// Divide, yielding 0.0 instead of inf/NaN when the divisor is zero
#[inline]
pub fn safe_ratio(numerator: f32, divisor: f32) -> f32 {
    if divisor == 0.0 { 0.0 } else { numerator / divisor }
}

/// Wrap a coordinate into [0, extent) on a toroidal axis
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to exactly `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_ratio_zero_divisor() {
        assert_eq!(safe_ratio(10.0, 0.0), 0.0);
        assert_eq!(safe_ratio(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_wrap_coordinate() {
        assert_eq!(wrap_coordinate(-1.0, 100.0), 99.0);
        assert_eq!(wrap_coordinate(100.0, 100.0), 0.0);
        assert_eq!(wrap_coordinate(250.0, 100.0), 50.0);
        let tiny = wrap_coordinate(-1.0e-9, 100.0);
        assert!((0.0..100.0).contains(&tiny));
    }
}
