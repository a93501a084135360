//! Run settings
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Settings for one run of the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
    /// Total entity slots, including the four walls
    pub entity_capacity: usize,
    /// Field width / height
    pub field_aspect_ratio: f32,
    /// Empty border around the field, in pixels
    pub field_margin_px: f32,
    /// Speed of generated entities (field units per second)
    pub entity_speed: f32,

    // === Window ===
    pub window_width: usize,
    pub window_height: usize,
    /// Frame rate the headless window reports through its frame delta
    pub target_fps: f64,
    /// Frames to run before the headless window asks to close
    pub frames: u64,
    /// Where to write the last presented frame (binary PPM)
    pub snapshot_path: Option<String>,

    // === HUD ===
    /// Entity/particle/substep counters in the top-left corner
    pub show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            entity_capacity: DEFAULT_ENTITY_CAPACITY,
            field_aspect_ratio: FIELD_ASPECT_RATIO,
            field_margin_px: FIELD_MARGIN,
            entity_speed: ENTITY_SPEED,

            window_width: 1280,
            window_height: 720,
            target_fps: 60.0,
            frames: 600,
            snapshot_path: None,

            show_hud: true,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a JSON settings file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.entity_capacity <= BOUNDARY_COUNT {
            return Err(Error::InvalidSettings(format!(
                "entity_capacity must be greater than {BOUNDARY_COUNT}, got {}",
                self.entity_capacity
            )));
        }
        if !(self.field_aspect_ratio.is_finite() && self.field_aspect_ratio > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "field_aspect_ratio must be positive, got {}",
                self.field_aspect_ratio
            )));
        }
        if !(self.field_margin_px.is_finite() && self.field_margin_px >= 0.0) {
            return Err(Error::InvalidSettings(format!(
                "field_margin_px must not be negative, got {}",
                self.field_margin_px
            )));
        }
        if !(self.entity_speed.is_finite() && self.entity_speed >= 0.0) {
            return Err(Error::InvalidSettings(format!(
                "entity_speed must not be negative, got {}",
                self.entity_speed
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(Error::InvalidSettings(
                "window dimensions must be non-zero".to_string(),
            ));
        }
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "target_fps must be positive, got {}",
                self.target_fps
            )));
        }
        Ok(())
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_json_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Seed to use for this run
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        })
    }
}
