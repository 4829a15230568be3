use thiserror::Error;

/// Fatal errors raised while setting up the engine.
///
/// Everything that can go wrong while reading a frame is a `Rejection`
/// instead; only missing or unreadable reference data ends up here.
#[derive(Debug, Error)]
pub enum MrzError {
    #[error("Reference data error: {0}")]
    ReferenceData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
