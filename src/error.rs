use std::io;

use thiserror::Error;

/// Errors raised at the edges of the crate: reading inputs, writing images, loading config.
/// The estimators and the tooltip placer are total and never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("failed to write image: {0}")]
    Image(String),

    #[error("bad config {path}: {reason}")]
    Config { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
