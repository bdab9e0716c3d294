//! Error types for pluckstring.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluckError {
    #[error("Could not initialize PluckString. Missing Canvas element.")]
    MissingElement,

    #[error("Could not initialize PluckString. Missing width option.")]
    MissingWidth,

    #[error("Could not initialize PluckString. Missing height option.")]
    MissingHeight,

    #[error("No playable sound source among {0:?}")]
    NoPlayableSource(Vec<String>),

    #[error("WAV decode error: {0}")]
    Decode(#[from] hound::Error),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio stream error: {0}")]
    AudioStream(String),

    #[error("Audio command queue is full")]
    AudioQueueFull,

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PluckError>;
