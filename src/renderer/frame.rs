//! Frame buffer view and solid rectangle fills
//!
//! The host owns the pixel memory and hands it over every frame. Pixels are
//! 32-bit `0xAARRGGBB`, stored little-endian. Rows are normally stored
//! bottom-up (logical row 0 is the last row in memory); all addressing goes
//! through `FrameBuffer::offset`, which hides the row order from callers.

use crate::consts::BYTES_PER_PIXEL;

/// Order of rows in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Logical row 0 is the last row in memory
    #[default]
    BottomUp,
    /// Logical row 0 is the first row in memory
    TopDown,
}

/// Color with channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Pack as `0xAARRGGBB`
    pub fn pack(&self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.a) << 24) | (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

/// Part of a requested rectangle that survives clipping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    /// First destination column/row written
    pub dest_x: usize,
    pub dest_y: usize,
    pub width: usize,
    pub height: usize,
    /// Leading columns/rows cut off the left/top; a source image must skip as many
    pub skip_x: usize,
    pub skip_y: usize,
}

/// Clip a rectangle against a `bounds_w` x `bounds_h` area.
///
/// Each side is clipped independently. Returns `None` for empty or fully
/// off-screen rectangles.
pub fn clip_rect(bounds_w: usize, bounds_h: usize, x: i32, y: i32, width: i32, height: i32) -> Option<ClipRect> {
    if width <= 0 || height <= 0 {
        return None;
    }
    let (x, y) = (x as i64, y as i64);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width as i64).min(bounds_w as i64);
    let y1 = (y + height as i64).min(bounds_h as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    Some(ClipRect {
        dest_x: x0 as usize,
        dest_y: y0 as usize,
        width: (x1 - x0) as usize,
        height: (y1 - y0) as usize,
        skip_x: (x0 - x) as usize,
        skip_y: (y0 - y) as usize,
    })
}

/// Writable view over the host's pixel memory
pub struct FrameBuffer<'a> {
    width: usize,
    height: usize,
    /// Bytes from one row to the next (may include padding)
    pitch: usize,
    row_order: RowOrder,
    memory: &'a mut [u8],
}

impl<'a> FrameBuffer<'a> {
    /// Bottom-up buffer of tightly packed rows
    pub fn new(memory: &'a mut [u8], width: usize, height: usize) -> Self {
        Self::with_layout(memory, width, height, width * BYTES_PER_PIXEL, RowOrder::BottomUp)
    }

    /// # Panics
    /// If a row does not fit in `pitch` or the memory is too small.
    pub fn with_layout(memory: &'a mut [u8], width: usize, height: usize, pitch: usize, row_order: RowOrder) -> Self {
        assert!(
            pitch >= width * BYTES_PER_PIXEL,
            "pitch {} too small for {} pixels",
            pitch,
            width
        );
        assert!(
            memory.len() >= pitch * height,
            "frame memory {} bytes, need {}",
            memory.len(),
            pitch * height
        );
        Self {
            width,
            height,
            pitch,
            row_order,
            memory,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Byte offset of logical pixel (x, y)
    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        let row = match self.row_order {
            RowOrder::BottomUp => self.height - 1 - y,
            RowOrder::TopDown => y,
        };
        row * self.pitch + x * BYTES_PER_PIXEL
    }

    /// Bytes of `count` pixels of logical row `y`, starting at column `x`
    #[inline]
    pub(crate) fn row_span_mut(&mut self, x: usize, y: usize, count: usize) -> &mut [u8] {
        assert!(x + count <= self.width, "span {}+{} past row end", x, count);
        let start = self.offset(x, y);
        &mut self.memory[start..start + count * BYTES_PER_PIXEL]
    }

    /// Packed pixel at logical (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        let start = self.offset(x, y);
        let bytes = &self.memory[start..start + BYTES_PER_PIXEL];
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Fill every visible pixel
    pub fn clear(&mut self, color: Color) {
        let (width, height) = (self.width as i32, self.height as i32);
        self.fill_rect(0, 0, width, height, color);
    }

    /// Fill a rectangle, clipped to the buffer. Off-screen and empty
    /// rectangles draw nothing.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let Some(clip) = clip_rect(self.width, self.height, x, y, width, height) else {
            return;
        };
        let pixel = color.pack().to_le_bytes();
        for row in clip.dest_y..clip.dest_y + clip.height {
            for dest in self.row_span_mut(clip.dest_x, row, clip.width).chunks_exact_mut(BYTES_PER_PIXEL) {
                dest.copy_from_slice(&pixel);
            }
        }
    }
}
