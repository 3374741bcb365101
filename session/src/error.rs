use soccer_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("camera frame is empty ({width}x{height})")]
    EmptyField { width: u32, height: u32 },

    #[error("invalid game configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("UI message codec error: {0}")]
    Codec(#[from] postcard::Error),

    #[error("recording I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed recording: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UI sink rejected message: {0}")]
    Sink(String),
}
