//! Scene drawing - camera-relative tile grid and the player

use glam::{UVec2, Vec2};

use super::frame::{Color, FrameBuffer};
use crate::consts::{TILE_DOOR, TILE_EMPTY, TILE_FLOOR, TILE_WALL};
use crate::sim::player::Player;
use crate::sim::world::World;

const HIGHLIGHT: Color = Color::rgb(0.2, 0.6, 1.0);

/// Render color of a tile code
pub fn tile_color(tile_type: u32) -> Color {
    match tile_type {
        TILE_EMPTY => Color::rgb(0.1, 0.1, 0.12),
        TILE_FLOOR => Color::rgb(0.5, 0.5, 0.5),
        TILE_WALL => Color::rgb(1.0, 1.0, 1.0),
        TILE_DOOR => Color::rgb(0.6, 0.4, 0.2),
        // Unknown codes stand out
        _ => Color::rgb(1.0, 0.0, 1.0),
    }
}

/// Player color per layer
pub fn player_color(z_index: u8) -> Color {
    if z_index == 0 {
        Color::rgb(1.0, 1.0, 0.0)
    } else {
        Color::rgb(1.0, 0.5, 0.0)
    }
}

/// Draw every tile that overlaps the viewport, offset by the camera.
///
/// The camera may sit anywhere on the torus; tiles past the world seam are
/// fetched from the other side.
pub fn draw_tiles(buffer: &mut FrameBuffer, world: &World, camera: Vec2, highlight: Option<UVec2>) {
    let map = &world.tile_map;
    let edge = map.tile_edge_px;
    let first_tile = (camera / edge).floor();
    let scroll = camera - first_tile * edge;

    let columns = (buffer.width() as f32 / edge).ceil() as i64 + 1;
    let rows = (buffer.height() as f32 / edge).ceil() as i64 + 1;
    let edge_px = edge as i32;

    for row in 0..rows {
        for column in 0..columns {
            let tile = map.wrap_tile(first_tile.x as i64 + column, first_tile.y as i64 + row);
            let color = if highlight == Some(tile) {
                HIGHLIGHT
            } else {
                tile_color(map.tile_type_at(tile))
            };
            let screen = Vec2::new(column as f32, row as f32) * edge - scroll;
            buffer.fill_rect(screen.x.round() as i32, screen.y.round() as i32, edge_px, edge_px, color);
        }
    }
}

/// Draw the player at its fixed screen anchor
pub fn draw_player(buffer: &mut FrameBuffer, player: &Player) {
    let anchor = player.fixed_position.round();
    buffer.fill_rect(
        anchor.x as i32,
        anchor.y as i32,
        player.width_px.round() as i32,
        player.height_px.round() as i32,
        player_color(player.z_index),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::settings::{PlayerSettings, WorldSettings};

    fn world_settings() -> WorldSettings {
        WorldSettings {
            pixels_per_meter: 10.0,
            tile_edge_meters: 1.0,
            tile_shift: 4,
            chunk_shift: 2,
            chunk_tile_shift: 2,
            room_tiles: 8,
            seed: 3,
        }
    }

    #[test]
    fn test_tiles_follow_camera_across_seam() {
        let mut memory = vec![0u8; 4096];
        let mut arena = Arena::new(&mut memory);
        let mut world = World::new(&mut arena, &world_settings(), Vec2::new(40.0, 30.0));
        world.tile_map.set_tile_type(UVec2::new(15, 0), TILE_WALL);
        world.tile_map.set_tile_type(UVec2::new(0, 0), TILE_FLOOR);

        let mut pixels = vec![0u8; 40 * 30 * 4];
        let mut buffer = FrameBuffer::new(&mut pixels, 40, 30);
        // Camera 5px left of the seam: half of tile 15, then tile 0
        draw_tiles(&mut buffer, &world, Vec2::new(155.0, 0.0), None);

        assert_eq!(buffer.pixel(0, 0), tile_color(TILE_WALL).pack());
        assert_eq!(buffer.pixel(4, 9), tile_color(TILE_WALL).pack());
        assert_eq!(buffer.pixel(5, 0), tile_color(TILE_FLOOR).pack());
        assert_eq!(buffer.pixel(14, 9), tile_color(TILE_FLOOR).pack());
        assert_eq!(buffer.pixel(15, 0), tile_color(TILE_EMPTY).pack());
        assert_eq!(buffer.pixel(39, 29), tile_color(TILE_EMPTY).pack());
    }

    #[test]
    fn test_highlight_replaces_tile_color() {
        let mut memory = vec![0u8; 4096];
        let mut arena = Arena::new(&mut memory);
        let world = World::new(&mut arena, &world_settings(), Vec2::new(40.0, 30.0));

        let mut pixels = vec![0u8; 40 * 30 * 4];
        let mut buffer = FrameBuffer::new(&mut pixels, 40, 30);
        draw_tiles(&mut buffer, &world, Vec2::ZERO, Some(UVec2::new(1, 2)));
        assert_eq!(buffer.pixel(15, 25), HIGHLIGHT.pack());
        assert_eq!(buffer.pixel(5, 25), tile_color(TILE_EMPTY).pack());
    }

    #[test]
    fn test_player_drawn_centered() {
        let mut memory = vec![0u8; 4096];
        let mut arena = Arena::new(&mut memory);
        let world = World::new(&mut arena, &world_settings(), Vec2::new(40.0, 30.0));
        let settings = PlayerSettings {
            width_px: 4.0,
            height_px: 4.0,
            speed_mps: 1.0,
        };
        let player = Player::new(&settings, &world, Vec2::new(15.0, 15.0), Vec2::new(40.0, 30.0));

        let mut pixels = vec![0u8; 40 * 30 * 4];
        let mut buffer = FrameBuffer::new(&mut pixels, 40, 30);
        draw_player(&mut buffer, &player);
        assert_eq!(buffer.pixel(18, 13), player_color(0).pack());
        assert_eq!(buffer.pixel(21, 16), player_color(0).pack());
        assert_eq!(buffer.pixel(22, 16), 0);
        assert_eq!(buffer.pixel(17, 13), 0);
    }
}
