use estatboard::{PipelineError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Authentication failed (status {status})")]
    Unauthorized { status: u16 },

    #[error("Statistics API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from {url}: {reason}")]
    UnexpectedShape { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Base URL cannot carry path segments: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid API token")]
    InvalidToken,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    Validation(#[from] ValidationError),

    #[error("Aggregation failed: {0}")]
    Pipeline(#[from] PipelineError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
