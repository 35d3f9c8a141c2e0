use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("unknown variant id `{0}`")]
    UnknownVariant(String),
    #[error("invalid hex color `{0}`")]
    InvalidColor(String),
    #[error("palette has no color stops")]
    EmptyPalette,
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("malformed preset json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackdropError>;
