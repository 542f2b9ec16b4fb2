//! Tile map - chunked, bit-shift addressed tile grid
//!
//! Every dimension is a power of two stored as a shift/mask pair:
//! - `tile_*`: edge length of the whole (toroidal) tile grid
//! - `chunk_*`: chunks per axis
//! - `chunk_tile_*`: tiles per chunk edge
//!
//! Storage is one flat row-major grid of `tile_dimensions²` codes carved out of
//! the arena. Chunks are an addressing layer over that grid: a chunk index is
//! derived from the already-wrapped tile index, so it wraps at world seams too.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::consts::{TILE_EMPTY, TILE_WALL};

/// Power-of-two dimension held as a shift with its derived size and mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    pub shift: u32,
    pub mask: u32,
    pub size: u32,
}

impl Dimension {
    pub fn from_shift(shift: u32) -> Self {
        assert!(shift < 16, "dimension shift {} too large", shift);
        let size = 1 << shift;
        Self {
            shift,
            mask: size - 1,
            size,
        }
    }
}

/// Where a pixel position lands in the tile grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    /// The raw pixel position this was derived from
    pub pixel: Vec2,
    /// Wrapped tile index, always in [0, tile_dimensions)
    pub tile: UVec2,
    /// Chunk holding `tile`
    pub chunk: UVec2,
    /// `tile` relative to its chunk's first tile
    pub chunk_relative: UVec2,
    /// Pixel offset inside the tile, in [0, tile_edge_px)
    pub tile_relative_px: Vec2,
}

/// Flat tile grid with chunk addressing
pub struct TileMap<'a> {
    pub tile_edge_px: f32,
    pub tiles_dim: Dimension,
    pub chunks_dim: Dimension,
    pub chunk_tiles_dim: Dimension,
    tiles: &'a mut [u32],
}

impl<'a> TileMap<'a> {
    /// Size the grid and reserve its storage from the arena.
    ///
    /// # Panics
    /// If the declared tile grid is smaller than the chunk storage it must
    /// address, if the tile edge rounds to zero pixels, or if the arena is
    /// too small (checked by the arena).
    pub fn new(
        arena: &mut Arena<'a>,
        pixels_per_meter: f32,
        tile_shift: u32,
        chunk_shift: u32,
        chunk_tile_shift: u32,
        tile_edge_meters: f32,
    ) -> Self {
        let tiles_dim = Dimension::from_shift(tile_shift);
        let chunks_dim = Dimension::from_shift(chunk_shift);
        let chunk_tiles_dim = Dimension::from_shift(chunk_tile_shift);
        assert!(
            tile_shift >= chunk_shift + chunk_tile_shift,
            "tile grid ({}) smaller than chunk storage ({} x {})",
            tiles_dim.size,
            chunks_dim.size,
            chunk_tiles_dim.size
        );

        let tile_edge_px = (pixels_per_meter * tile_edge_meters).round();
        assert!(tile_edge_px >= 1.0, "tile edge must be at least one pixel");

        let count = (tiles_dim.size as usize) * (tiles_dim.size as usize);
        let tiles = arena.reserve_array::<u32>(count);
        tiles.fill(TILE_EMPTY);

        log::info!(
            "Tile map: {}x{} tiles of {}px, {}x{} chunks of {} tiles",
            tiles_dim.size,
            tiles_dim.size,
            tile_edge_px,
            chunks_dim.size,
            chunks_dim.size,
            chunk_tiles_dim.size
        );

        Self {
            tile_edge_px,
            tiles_dim,
            chunks_dim,
            chunk_tiles_dim,
            tiles,
        }
    }

    /// Edge length of the tile grid in tiles
    pub fn tile_dimensions(&self) -> u32 {
        self.tiles_dim.size
    }

    /// Edge length of the whole world in pixels
    pub fn world_edge_px(&self) -> f32 {
        self.tile_edge_px * self.tiles_dim.size as f32
    }

    /// Resolve a pixel position to tile, chunk and in-chunk indices.
    pub fn coordinates_for(&self, pixel: Vec2) -> WorldPosition {
        let edge = self.tile_edge_px as f64;
        let tile_x = (pixel.x as f64 / edge).floor() as i64;
        let tile_y = (pixel.y as f64 / edge).floor() as i64;
        let tile = self.wrap_tile(tile_x, tile_y);

        let tile_relative_px = Vec2::new(
            (pixel.x as f64 - tile_x as f64 * edge) as f32,
            (pixel.y as f64 - tile_y as f64 * edge) as f32,
        );

        WorldPosition {
            pixel,
            tile,
            chunk: self.chunk_of(tile),
            chunk_relative: tile & UVec2::splat(self.chunk_tiles_dim.mask),
            tile_relative_px,
        }
    }

    /// Wrap a signed tile index onto the toroidal grid
    pub fn wrap_tile(&self, x: i64, y: i64) -> UVec2 {
        let mask = self.tiles_dim.mask as i64;
        UVec2::new((x & mask) as u32, (y & mask) as u32)
    }

    /// Chunk holding an already-wrapped tile
    pub fn chunk_of(&self, tile: UVec2) -> UVec2 {
        (tile >> self.chunk_tiles_dim.shift) & UVec2::splat(self.chunks_dim.mask)
    }

    /// First tile of a chunk
    pub fn chunk_origin(&self, chunk: UVec2) -> UVec2 {
        (chunk & UVec2::splat(self.chunks_dim.mask)) << self.chunk_tiles_dim.shift
    }

    #[inline]
    fn index(&self, tile: UVec2) -> usize {
        let tile = tile & UVec2::splat(self.tiles_dim.mask);
        (tile.y as usize) * (self.tiles_dim.size as usize) + (tile.x as usize)
    }

    /// Tile code at a tile index (wrapped onto the grid)
    pub fn tile_type_at(&self, tile: UVec2) -> u32 {
        self.tiles[self.index(tile)]
    }

    /// Tile code at a chunk-relative position
    pub fn chunk_tile_type(&self, chunk: UVec2, relative: UVec2) -> Option<u32> {
        if relative.x >= self.chunk_tiles_dim.size || relative.y >= self.chunk_tiles_dim.size {
            return None;
        }
        Some(self.tile_type_at(self.chunk_origin(chunk) + relative))
    }

    /// Overwrite one tile (wrapped onto the grid)
    pub fn set_tile_type(&mut self, tile: UVec2, code: u32) {
        let idx = self.index(tile);
        self.tiles[idx] = code;
    }

    /// Stamp a rectangle of tiles starting at `origin`, wrapping at the seams
    pub fn fill_tiles(&mut self, origin: UVec2, size: UVec2, code: u32) {
        for dy in 0..size.y {
            for dx in 0..size.x {
                let tile = self.wrap_tile(origin.x as i64 + dx as i64, origin.y as i64 + dy as i64);
                self.set_tile_type(tile, code);
            }
        }
    }
}

/// Only walls block movement
#[inline]
pub fn is_passable(tile_type: u32) -> bool {
    tile_type != TILE_WALL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE_FLOOR;
    use proptest::prelude::*;

    fn with_map<R>(f: impl FnOnce(&mut TileMap) -> R) -> R {
        let mut memory = vec![0u8; 64 * 1024];
        let mut arena = Arena::new(&mut memory);
        // 16x16 tiles of 10px, 4x4 chunks of 4 tiles
        let mut map = TileMap::new(&mut arena, 10.0, 4, 2, 2, 1.0);
        f(&mut map)
    }

    #[test]
    fn test_dimensions() {
        with_map(|map| {
            assert_eq!(map.tile_dimensions(), 16);
            assert_eq!(map.tile_edge_px, 10.0);
            assert_eq!(map.world_edge_px(), 160.0);
        });
    }

    #[test]
    fn test_coordinates_for() {
        with_map(|map| {
            let pos = map.coordinates_for(Vec2::new(57.0, 123.5));
            assert_eq!(pos.tile, UVec2::new(5, 12));
            assert_eq!(pos.chunk, UVec2::new(1, 3));
            assert_eq!(pos.chunk_relative, UVec2::new(1, 0));
            assert!((pos.tile_relative_px - Vec2::new(7.0, 3.5)).length() < 1e-4);
        });
    }

    #[test]
    fn test_negative_pixels_wrap() {
        with_map(|map| {
            let pos = map.coordinates_for(Vec2::new(-1.0, -11.0));
            assert_eq!(pos.tile, UVec2::new(15, 14));
            assert_eq!(pos.chunk, UVec2::new(3, 3));
            assert!((pos.tile_relative_px - Vec2::new(9.0, 9.0)).length() < 1e-4);
        });
    }

    #[test]
    fn test_chunk_index_wraps_at_seam() {
        with_map(|map| {
            let past_east = map.coordinates_for(Vec2::new(165.0, 5.0));
            assert_eq!(past_east.tile, UVec2::new(0, 0));
            assert_eq!(past_east.chunk, UVec2::new(0, 0));
        });
    }

    #[test]
    fn test_set_and_read_through_chunk() {
        with_map(|map| {
            map.set_tile_type(UVec2::new(9, 6), TILE_WALL);
            assert_eq!(map.tile_type_at(UVec2::new(9, 6)), TILE_WALL);
            assert_eq!(map.chunk_tile_type(UVec2::new(2, 1), UVec2::new(1, 2)), Some(TILE_WALL));
            assert_eq!(map.chunk_tile_type(UVec2::new(2, 1), UVec2::new(4, 0)), None);
        });
    }

    #[test]
    fn test_fill_tiles_wraps() {
        with_map(|map| {
            map.fill_tiles(UVec2::new(15, 15), UVec2::new(2, 2), TILE_FLOOR);
            for tile in [(15, 15), (0, 15), (15, 0), (0, 0)] {
                assert_eq!(map.tile_type_at(UVec2::new(tile.0, tile.1)), TILE_FLOOR);
            }
            assert_eq!(map.tile_type_at(UVec2::new(1, 1)), TILE_EMPTY);
        });
    }

    #[test]
    fn test_is_passable() {
        assert!(is_passable(TILE_EMPTY));
        assert!(is_passable(TILE_FLOOR));
        assert!(!is_passable(TILE_WALL));
        assert!(is_passable(3));
    }

    #[test]
    #[should_panic(expected = "smaller than chunk storage")]
    fn test_grid_smaller_than_chunks_is_fatal() {
        let mut memory = vec![0u8; 64 * 1024];
        let mut arena = Arena::new(&mut memory);
        TileMap::new(&mut arena, 10.0, 4, 3, 2, 1.0);
    }

    #[test]
    #[should_panic(expected = "arena exhausted")]
    fn test_arena_too_small_is_fatal() {
        let mut memory = vec![0u8; 128];
        let mut arena = Arena::new(&mut memory);
        TileMap::new(&mut arena, 10.0, 4, 2, 2, 1.0);
    }

    proptest! {
        #[test]
        fn prop_tile_index_in_range_and_toroidal(
            x in -5_000i32..5_000,
            y in -5_000i32..5_000,
            k in -4i32..4,
        ) {
            with_map(|map| {
                let world = map.world_edge_px();
                let p = Vec2::new(x as f32, y as f32);
                let base = map.coordinates_for(p);
                prop_assert!(base.tile.x < map.tile_dimensions());
                prop_assert!(base.tile.y < map.tile_dimensions());

                let shifted = map.coordinates_for(p + Vec2::new(k as f32 * world, -k as f32 * world));
                prop_assert_eq!(base.tile, shifted.tile);
                prop_assert_eq!(base.chunk, shifted.chunk);
                Ok(())
            })?;
        }
    }
}
