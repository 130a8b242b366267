use thiserror::Error;

use dunefire_core::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("game loop thread panicked")]
    LoopPanicked,
    #[error("failed to encode summary: {0}")]
    Encode(#[from] serde_json::Error),
}
