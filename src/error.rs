//! Crate error type
//!
//! Only the edges of the program can fail (settings files, snapshots).
//! The simulation and rasterizer clip, truncate or no-op instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
