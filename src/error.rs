//! Error type shared by every fishing component

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FishingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shape mismatch: reference is {expected:?}, sample is {actual:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Screen capture error: {0}")]
    Capture(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialize error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FishingError>;
