use thiserror::Error;

/// Top-level error type for the kakeibo system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for KakeiboError` (or the reverse) so that the `?`
/// operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KakeiboError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for KakeiboError {
    fn from(err: toml::de::Error) -> Self {
        KakeiboError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for KakeiboError {
    fn from(err: toml::ser::Error) -> Self {
        KakeiboError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for KakeiboError {
    fn from(err: serde_json::Error) -> Self {
        KakeiboError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for kakeibo operations.
pub type Result<T> = std::result::Result<T, KakeiboError>;
