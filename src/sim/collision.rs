//! Tile collision - footprint sampling against the tile map
//!
//! A mover is tested at a handful of named points on its bounding box, all
//! evaluated at the candidate (post-move) position. There is no swept test:
//! a mover faster than one tile per frame can tunnel through a thin wall.

use glam::Vec2;

use super::tile_map::{TileMap, is_passable};

/// Named offset on a mover's footprint, relative to its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub name: &'static str,
    pub offset: Vec2,
}

/// Center plus the two bottom corners of a `width` x `height` box centered
/// on the mover's reference point
pub fn footprint_samples(width: f32, height: f32) -> [SamplePoint; 3] {
    let half = Vec2::new(width, height) * 0.5;
    [
        SamplePoint {
            name: "center",
            offset: Vec2::ZERO,
        },
        SamplePoint {
            name: "bottom-left",
            offset: Vec2::new(-half.x, half.y),
        },
        SamplePoint {
            name: "bottom-right",
            offset: Vec2::new(half.x, half.y),
        },
    ]
}

/// Result of testing a candidate position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Occupancy {
    Free,
    /// First sample point that landed on a blocking tile
    Blocked { sample: &'static str, tile_type: u32 },
}

/// Test every sample point; the first one on a blocking tile rejects the move
pub fn check_occupancy(map: &TileMap, candidate: Vec2, samples: &[SamplePoint]) -> Occupancy {
    for sample in samples {
        let position = map.coordinates_for(candidate + sample.offset);
        let tile_type = map.tile_type_at(position.tile);
        if !is_passable(tile_type) {
            return Occupancy::Blocked {
                sample: sample.name,
                tile_type,
            };
        }
    }
    Occupancy::Free
}

/// Whether a mover may stand at `candidate`
#[inline]
pub fn can_occupy(map: &TileMap, candidate: Vec2, samples: &[SamplePoint]) -> bool {
    check_occupancy(map, candidate, samples) == Occupancy::Free
}
