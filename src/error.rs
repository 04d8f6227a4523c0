//! Errors returned by the query client

use thiserror::Error;

/// Errors that can occur while talking to the server
#[derive(Error, Debug)]
pub enum CypherError {
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Server at {url} answered with HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Response body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CypherError {
    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            CypherError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type CypherResult<T> = Result<T, CypherError>;
