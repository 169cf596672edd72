use thiserror::Error;

/// Failure to load settings or to persist session state
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backing file could not be read or written
    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Session encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for SessionError {
    fn from(err: config::ConfigError) -> Self {
        SessionError::Configuration(err.to_string())
    }
}
