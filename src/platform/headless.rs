//! In-memory window for tests and offscreen runs
//!
//! Time advances by a fixed step per frame, input comes from a script and
//! the presented frame can be written out as a binary PPM.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{InputState, WindowLayer};
use crate::Result;
use crate::renderer::Bitmap;

pub struct HeadlessWindow {
    width: usize,
    height: usize,
    back: Vec<u32>,
    front: Vec<u32>,
    frame_delta: f64,
    frame_limit: Option<u64>,
    frames_presented: u64,
    script: VecDeque<InputState>,
    last_input: InputState,
    pending_resize: Option<(usize, usize)>,
}

impl HeadlessWindow {
    /// Window of `width x height` pixels ticking at `fps`
    pub fn new(width: usize, height: usize, fps: f64) -> Self {
        Self {
            width,
            height,
            back: vec![0; width * height],
            front: vec![0; width * height],
            frame_delta: 1.0 / fps,
            frame_limit: None,
            frames_presented: 0,
            script: VecDeque::new(),
            last_input: InputState::default(),
            pending_resize: None,
        }
    }

    /// Request close once `frames` frames have been presented
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Queue the input returned by a future `poll_input`, one per frame
    ///
    /// Once the script runs out the last cursor position and buttons repeat.
    pub fn push_input(&mut self, input: InputState) {
        self.script.push_back(input);
    }

    /// Change the window size; reported as `resized` on the next poll
    pub fn resize(&mut self, width: usize, height: usize) {
        self.pending_resize = Some((width, height));
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// The last presented frame, row-major with no padding
    pub fn front_buffer(&self) -> &[u32] {
        &self.front
    }

    /// Write the presented frame as binary PPM (P6), dropping alpha
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut row = Vec::with_capacity(self.width * 3);
        for line in self.front.chunks(self.width.max(1)) {
            row.clear();
            for &pixel in line {
                row.extend_from_slice(&[(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]);
            }
            writer.write_all(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_ppm(BufWriter::new(file))?;
        log::info!(
            "Saved {}x{} frame to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}

impl WindowLayer for HeadlessWindow {
    fn poll_input(&mut self) -> InputState {
        let mut input = self.script.pop_front().unwrap_or(InputState {
            resized: false,
            should_close: false,
            ..self.last_input
        });

        if let Some((width, height)) = self.pending_resize.take() {
            log::debug!("Headless window resized to {width}x{height}");
            self.width = width;
            self.height = height;
            self.back = vec![0; width * height];
            self.front = vec![0; width * height];
            input.resized = true;
        }

        if self
            .frame_limit
            .is_some_and(|limit| self.frames_presented >= limit)
        {
            input.should_close = true;
        }

        self.last_input = input;
        input
    }

    fn frame_delta_seconds(&mut self) -> f64 {
        self.frame_delta
    }

    fn acquire_frame_buffer(&mut self) -> Bitmap<'_> {
        Bitmap::new(&mut self.back, self.width, self.height, self.width)
    }

    fn present(&mut self) {
        self.front.copy_from_slice(&self.back);
        self.frames_presented += 1;
    }
}
