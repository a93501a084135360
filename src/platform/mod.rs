//! Platform abstraction layer
//!
//! The frame driver only talks to a window through [`WindowLayer`]:
//! - Input and window events (mouse, resize, close)
//! - Frame timing
//! - Pixel buffer hand-off (acquire, draw, present)

pub mod headless;

pub use headless::HeadlessWindow;

use crate::renderer::Bitmap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

/// Input state sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Cursor position in window pixels
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Buttons currently held
    pub buttons: MouseButtons,
    /// The window size changed since the last poll
    pub resized: bool,
    pub should_close: bool,
}

/// A window the frame driver can draw into
///
/// Calls are made from one thread, in frame order:
/// `poll_input`, `frame_delta_seconds`, `acquire_frame_buffer`, `present`.
/// Pixels are 0xAARRGGBB; a backend with a different native layout converts
/// in `present`.
pub trait WindowLayer {
    fn poll_input(&mut self) -> InputState;

    /// Seconds since the previous call
    fn frame_delta_seconds(&mut self) -> f64;

    /// Writable buffer for the next frame, sized to the current window
    ///
    /// May block until the previous frame has been presented.
    fn acquire_frame_buffer(&mut self) -> Bitmap<'_>;

    /// Show the buffer handed out by the last `acquire_frame_buffer`
    fn present(&mut self);
}
