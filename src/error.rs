use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Precondition failed: {0}")]
    PreconditionFailure(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("External call failed{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    ExternalCallFailure { status: Option<u16>, message: String },
    #[error("External call timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("All image generations failed. First error: {first_cause}")]
    RoundExhausted { first_cause: Box<StudioError> },
    #[error("Round cancelled before any image was generated")]
    Cancelled,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StudioError {
    /// True for failures of a single call to the external service.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            StudioError::ExternalCallFailure { .. }
                | StudioError::Timeout(_)
                | StudioError::RequestError(_)
                | StudioError::ResponseError(_)
        )
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StudioError::ExternalCallFailure {
                status: None,
                message: format!("request timed out: {}", e),
            }
        } else if e.is_decode() {
            StudioError::ResponseError(e.to_string())
        } else {
            StudioError::RequestError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
