//! Software rendering module
//!
//! Everything is rasterized on the CPU into a frame buffer the host presents.

pub mod bitmap;
pub mod frame;
pub mod scene;

pub use bitmap::{Bitmap, PixelFormat};
pub use frame::{Color, FrameBuffer, RowOrder};
