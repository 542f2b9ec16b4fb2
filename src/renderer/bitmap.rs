//! Indexed bitmaps and clipped blits
//!
//! Source pixels can use any channel packing. Each channel is located through
//! its bit mask: the shift is the mask's least significant set bit, and
//! channels narrower or wider than 8 bits are rescaled to 8.

use super::frame::{FrameBuffer, clip_rect};
use crate::consts::BYTES_PER_PIXEL;

/// Find the least significant set bit of a mask
pub fn least_significant_set_bit(mask: u32) -> Option<u32> {
    (0..u32::BITS).find(|&bit| mask & (1 << bit) != 0)
}

/// One channel's mask with its derived shift and width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Channel {
    mask: u32,
    shift: u32,
    bits: u32,
}

impl Channel {
    fn new(name: &str, mask: u32) -> Self {
        let Some(shift) = least_significant_set_bit(mask) else {
            panic!("{} channel mask is zero", name);
        };
        Self {
            mask,
            shift,
            bits: mask.count_ones(),
        }
    }

    /// Channel value rescaled to 0..=255
    #[inline]
    fn extract(&self, pixel: u32) -> u32 {
        let raw = (pixel & self.mask) >> self.shift;
        if self.bits == 8 {
            raw
        } else {
            let max = (1u64 << self.bits) - 1;
            ((raw as u64 * 255 + max / 2) / max) as u32
        }
    }
}

/// Channel layout of a source bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
}

impl PixelFormat {
    /// Same packing as the frame buffer
    pub const ARGB: Self = Self {
        red_mask: 0x00FF_0000,
        green_mask: 0x0000_FF00,
        blue_mask: 0x0000_00FF,
        alpha_mask: 0xFF00_0000,
    };

    /// Byte order R, G, B, A in memory (little-endian)
    pub const RGBA: Self = Self {
        red_mask: 0x0000_00FF,
        green_mask: 0x0000_FF00,
        blue_mask: 0x00FF_0000,
        alpha_mask: 0xFF00_0000,
    };
}

/// Resolved channel shifts for converting to `0xAARRGGBB`
#[derive(Debug, Clone, Copy)]
struct Converter {
    red: Channel,
    green: Channel,
    blue: Channel,
    alpha: Channel,
}

impl Converter {
    /// # Panics
    /// If any mask is zero: the format names a channel that cannot be found.
    fn new(format: PixelFormat) -> Self {
        Self {
            red: Channel::new("red", format.red_mask),
            green: Channel::new("green", format.green_mask),
            blue: Channel::new("blue", format.blue_mask),
            alpha: Channel::new("alpha", format.alpha_mask),
        }
    }

    #[inline]
    fn convert(&self, pixel: u32) -> u32 {
        (self.alpha.extract(pixel) << 24)
            | (self.red.extract(pixel) << 16)
            | (self.green.extract(pixel) << 8)
            | self.blue.extract(pixel)
    }
}

/// A decoded image, rows stored top-down
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    format: PixelFormat,
}

impl Bitmap {
    /// # Panics
    /// If `pixels` does not hold exactly `width * height` entries or a mask
    /// in `format` is zero.
    pub fn new(width: usize, height: usize, pixels: Vec<u32>, format: PixelFormat) -> Self {
        assert_eq!(pixels.len(), width * height, "bitmap pixel count mismatch");
        // Reject formats with a missing channel up front
        Converter::new(format);
        Self {
            width,
            height,
            pixels,
            format,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw source pixel at (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        assert!(x < self.width && y < self.height, "bitmap pixel ({}, {}) out of bounds", x, y);
        self.pixels[y * self.width + x]
    }

    /// Source row `y`, columns `x..x + count`
    fn row(&self, x: usize, y: usize, count: usize) -> &[u32] {
        let start = y * self.width + x;
        &self.pixels[start..start + count]
    }
}

impl FrameBuffer<'_> {
    /// Copy the top-left `width` x `height` pixels of `bitmap` to (x, y).
    ///
    /// Clipping follows `fill_rect`; the source read position moves with it,
    /// so a rectangle cut off on the left or top starts reading that many
    /// columns or rows into the bitmap, and one cut off on the right skips
    /// the trailing source columns of each row.
    ///
    /// # Panics
    /// If the requested size exceeds the bitmap.
    pub fn blit_bitmap(&mut self, x: i32, y: i32, width: i32, height: i32, bitmap: &Bitmap) {
        assert!(
            width.max(0) as usize <= bitmap.width && height.max(0) as usize <= bitmap.height,
            "blit {}x{} larger than {}x{} bitmap",
            width,
            height,
            bitmap.width,
            bitmap.height
        );
        let Some(clip) = clip_rect(self.width(), self.height(), x, y, width, height) else {
            return;
        };
        let converter = Converter::new(bitmap.format);

        for row in 0..clip.height {
            let source = bitmap.row(clip.skip_x, clip.skip_y + row, clip.width);
            let dest = self.row_span_mut(clip.dest_x, clip.dest_y + row, clip.width);
            for (dest, &pixel) in dest.chunks_exact_mut(BYTES_PER_PIXEL).zip(source) {
                dest.copy_from_slice(&converter.convert(pixel).to_le_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 bitmap whose pixel encodes its own (x, y)
    fn checksum_bitmap() -> Bitmap {
        let pixels = (0..16u32).map(|i| 0xFF00_0000 | ((i % 4) << 8) | (i / 4) | 0x0010_0000).collect();
        Bitmap::new(4, 4, pixels, PixelFormat::ARGB)
    }

    fn source_at(x: usize, y: usize) -> u32 {
        checksum_bitmap().pixel(x, y)
    }

    /// Blit the checksum bitmap onto an 8x6 buffer, returning every pixel
    fn blit(x: i32, y: i32) -> Vec<Vec<u32>> {
        let mut memory = vec![0u8; 8 * 6 * 4];
        let mut buffer = FrameBuffer::new(&mut memory, 8, 6);
        buffer.blit_bitmap(x, y, 4, 4, &checksum_bitmap());
        (0..6).map(|py| (0..8).map(|px| buffer.pixel(px, py)).collect()).collect()
    }

    /// Assert the visible part of a blit at (x, y) maps back to the right source pixel
    fn assert_co_clipped(x: i32, y: i32) {
        let pixels = blit(x, y);
        for (py, row) in pixels.iter().enumerate() {
            for (px, &value) in row.iter().enumerate() {
                let sx = px as i32 - x;
                let sy = py as i32 - y;
                let expected = if (0..4).contains(&sx) && (0..4).contains(&sy) {
                    source_at(sx as usize, sy as usize)
                } else {
                    0
                };
                assert_eq!(value, expected, "blit at ({}, {}), pixel ({}, {})", x, y, px, py);
            }
        }
    }

    #[test]
    fn test_least_significant_set_bit() {
        assert_eq!(least_significant_set_bit(0x00FF_0000), Some(16));
        assert_eq!(least_significant_set_bit(0x8000_0000), Some(31));
        assert_eq!(least_significant_set_bit(1), Some(0));
        assert_eq!(least_significant_set_bit(0), None);
    }

    #[test]
    fn test_left_clip_reads_trailing_columns() {
        let pixels = blit(-2, 0);
        for y in 0..4 {
            assert_eq!(pixels[y][0], source_at(2, y));
            assert_eq!(pixels[y][1], source_at(3, y));
            assert_eq!(pixels[y][2], 0);
        }
        assert_co_clipped(-2, 0);
    }

    #[test]
    fn test_co_clipping_on_every_edge() {
        // left, top, right, bottom, and two corners
        for (x, y) in [(-2, 1), (3, -3), (6, 1), (2, 4), (-1, -1), (7, 5)] {
            assert_co_clipped(x, y);
        }
    }

    #[test]
    fn test_unclipped_blit() {
        assert_co_clipped(1, 1);
    }

    #[test]
    fn test_fully_offscreen_blit_is_noop() {
        assert!(blit(-4, 0).iter().flatten().all(|&p| p == 0));
        assert!(blit(0, 6).iter().flatten().all(|&p| p == 0));
    }

    #[test]
    fn test_channel_masks_are_remapped() {
        let rgba = Bitmap::new(1, 1, vec![0x8033_2211], PixelFormat::RGBA);
        let mut memory = vec![0u8; 4];
        let mut buffer = FrameBuffer::new(&mut memory, 1, 1);
        buffer.blit_bitmap(0, 0, 1, 1, &rgba);
        assert_eq!(buffer.pixel(0, 0), 0x8011_2233);
    }

    #[test]
    fn test_narrow_channels_are_rescaled() {
        // 5-6-5 with a 1-bit alpha
        let format = PixelFormat {
            red_mask: 0xF800,
            green_mask: 0x07E0,
            blue_mask: 0x001F,
            alpha_mask: 0x1_0000,
        };
        let bitmap = Bitmap::new(1, 1, vec![0x1_F800 | 0x001F], format);
        let mut memory = vec![0u8; 4];
        let mut buffer = FrameBuffer::new(&mut memory, 1, 1);
        buffer.blit_bitmap(0, 0, 1, 1, &bitmap);
        assert_eq!(buffer.pixel(0, 0), 0xFFFF_00FF);
    }

    #[test]
    #[should_panic(expected = "alpha channel mask is zero")]
    fn test_zero_mask_is_fatal() {
        let format = PixelFormat {
            alpha_mask: 0,
            ..PixelFormat::ARGB
        };
        Bitmap::new(1, 1, vec![0], format);
    }

    #[test]
    #[should_panic(expected = "larger than")]
    fn test_oversized_blit_is_fatal() {
        let mut memory = vec![0u8; 8 * 6 * 4];
        let mut buffer = FrameBuffer::new(&mut memory, 8, 6);
        buffer.blit_bitmap(0, 0, 5, 4, &checksum_bitmap());
    }
}
