//! Error types for wand navigation

/// Errors raised by the navigation core.
///
/// Recoverable conditions (deadzone rejection, missing intersect, gimbal-lock
/// angle extraction) never surface here; they resolve to fallback values.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Cross product requires a vector of length {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Drag session is active but no wand pose is available")]
    MissingWandPose,

    #[error("Malformed controller payload: {0}")]
    ParseFailure(String),

    #[error("Malformed room extent: {0}")]
    InvalidExtent(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for NavError {
    fn from(err: toml::de::Error) -> Self {
        NavError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
