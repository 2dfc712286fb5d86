//! Error types for the ragula crate.

use thiserror::Error;

/// Status reported for failures that never produced an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Errors that can occur when talking to the Ragula API.
#[derive(Error, Debug)]
pub enum RagulaError {
    /// The server answered with a non-2xx status.
    #[error("[{status}] {message}")]
    ApiError { status: u16, message: String },

    /// DNS, connect, timeout or any other failure below HTTP.
    #[error("[{status}] Request failed: {0}", status = TRANSPORT_FAILURE_STATUS)]
    TransportError(#[from] reqwest::Error),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to decode response: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// A structured body was expected but the server sent something else.
    #[error("Unexpected response body: {0}")]
    UnexpectedBody(String),
}

impl RagulaError {
    /// The HTTP-like status code callers observe for this error.
    ///
    /// Transport failures report [`TRANSPORT_FAILURE_STATUS`], the same code a
    /// server-side failure would. Local errors raised before any request carry
    /// no status.
    pub fn status(&self) -> Option<u16> {
        match self {
            RagulaError::ApiError { status, .. } => Some(*status),
            RagulaError::TransportError(_) => Some(TRANSPORT_FAILURE_STATUS),
            RagulaError::InvalidUpload(_)
            | RagulaError::IoError(_)
            | RagulaError::DecodeError(_)
            | RagulaError::UnexpectedBody(_) => None,
        }
    }

    /// Whether the request never reached the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, RagulaError::TransportError(_))
    }
}

/// Result type alias for RagulaError.
pub type Result<T> = std::result::Result<T, RagulaError>;
