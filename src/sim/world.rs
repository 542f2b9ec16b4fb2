//! World - the tile map plus its pixel-space extents
//!
//! Also owns map authoring: stamping a toroidal grid of rooms whose door
//! layout comes from a seeded RNG.

use glam::{UVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::tile_map::{TileMap, WorldPosition};
use crate::arena::Arena;
use crate::consts::{TILE_DOOR, TILE_FLOOR, TILE_WALL};
use crate::settings::WorldSettings;

/// The tile map with its pixel scale and size
pub struct World<'a> {
    pub tile_map: TileMap<'a>,
    pub pixels_per_meter: f32,
    pub width_px: f32,
    pub height_px: f32,
}

impl<'a> World<'a> {
    /// Build the world, reserving its tiles from the arena.
    ///
    /// # Panics
    /// If the world is not strictly larger than the viewport on both axes:
    /// the camera must always have room to pan.
    pub fn new(arena: &mut Arena<'a>, settings: &WorldSettings, viewport: Vec2) -> Self {
        let tile_map = TileMap::new(
            arena,
            settings.pixels_per_meter,
            settings.tile_shift,
            settings.chunk_shift,
            settings.chunk_tile_shift,
            settings.tile_edge_meters,
        );
        let width_px = tile_map.world_edge_px();
        let height_px = tile_map.world_edge_px();
        assert!(
            width_px > viewport.x && height_px > viewport.y,
            "world ({}x{}px) must be larger than the viewport ({}x{}px)",
            width_px,
            height_px,
            viewport.x,
            viewport.y
        );

        Self {
            tile_map,
            pixels_per_meter: settings.pixels_per_meter,
            width_px,
            height_px,
        }
    }

    /// World extents as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width_px, self.height_px)
    }

    /// Wrap a pixel position onto the torus
    pub fn wrap(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            crate::wrap_coordinate(pixel.x, self.width_px),
            crate::wrap_coordinate(pixel.y, self.height_px),
        )
    }

    /// Resolve a pixel position against the tile map
    pub fn position_of(&self, pixel: Vec2) -> WorldPosition {
        self.tile_map.coordinates_for(pixel)
    }

    /// Pixel center of a tile
    pub fn tile_center(&self, tile: UVec2) -> Vec2 {
        (tile.as_vec2() + Vec2::splat(0.5)) * self.tile_map.tile_edge_px
    }

    /// Stamp rooms of `room_tiles` edge length over the whole grid.
    ///
    /// Each room is walled on its border with a door slot in the middle of
    /// every wall. A door is open only if both rooms sharing that wall agree,
    /// which holds across the world seam as well. Returns the number of rooms.
    pub fn generate_rooms(&mut self, room_tiles: u32, seed: u64) -> u32 {
        let dims = self.tile_map.tile_dimensions();
        assert!(
            room_tiles >= 3 && dims % room_tiles == 0,
            "room size {} must be at least 3 and divide the {}-tile grid",
            room_tiles,
            dims
        );
        let rooms = dims / room_tiles;
        let room_count = (rooms * rooms) as usize;

        let mut rng = Pcg32::seed_from_u64(seed);
        // Door from room (x, y) to its east / south neighbour
        let east_doors: Vec<bool> = (0..room_count).map(|_| rng.random_bool(0.6)).collect();
        let south_doors: Vec<bool> = (0..room_count).map(|_| rng.random_bool(0.6)).collect();
        let room_index = |x: u32, y: u32| ((y % rooms) * rooms + (x % rooms)) as usize;

        let middle = room_tiles / 2;
        let last = room_tiles - 1;
        for ry in 0..rooms {
            for rx in 0..rooms {
                let origin = UVec2::new(rx * room_tiles, ry * room_tiles);
                self.tile_map.fill_tiles(origin, UVec2::splat(room_tiles), TILE_WALL);
                self.tile_map
                    .fill_tiles(origin + UVec2::ONE, UVec2::splat(room_tiles - 2), TILE_FLOOR);

                let east = east_doors[room_index(rx, ry)];
                let west = east_doors[room_index(rx + rooms - 1, ry)];
                let south = south_doors[room_index(rx, ry)];
                let north = south_doors[room_index(rx, ry + rooms - 1)];

                let doors = [
                    (east, UVec2::new(last, middle)),
                    (west, UVec2::new(0, middle)),
                    (south, UVec2::new(middle, last)),
                    (north, UVec2::new(middle, 0)),
                ];
                for (open, offset) in doors {
                    if open {
                        self.tile_map.set_tile_type(origin + offset, TILE_DOOR);
                    }
                }
            }
        }

        log::info!("Stamped {}x{} rooms of {} tiles (seed {})", rooms, rooms, room_tiles, seed);
        rooms
    }
}
