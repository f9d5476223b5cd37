use thiserror::Error;

/// Sink errors.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("No remote endpoint configured")]
    ConfigurationMissing,

    #[error("Invalid endpoint {0:?}: expected an http(s) URL")]
    InvalidEndpoint(String),

    #[error("Transmission to {endpoint} failed: {reason}")]
    TransmissionFailure { endpoint: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SinkResult<T> = Result<T, SinkError>;
