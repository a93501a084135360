//! Software rendering module
//!
//! Everything is drawn on the CPU into a borrowed 0xAARRGGBB pixel buffer.

pub mod bitmap;
pub mod font;
pub mod text;

pub use bitmap::{Bitmap, blend};
pub use text::{draw_text, text_size};
