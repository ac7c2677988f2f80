use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Queue errors
    #[error("start index {index} out of range for replacement queue of length {len}")]
    StartIndexOutOfRange { index: usize, len: usize },

    // Configuration errors
    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // State persistence errors
    #[error("Failed to serialize player state: {0}")]
    StateSerialize(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
