//! Errors raised by post sources

use thiserror::Error;

/// Failure of a post source operation
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Listing posts failed{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    ListFailed { status: Option<u16>, message: String },

    #[error("A non-empty credential is required for this operation")]
    Unauthenticated,

    #[error("Revision conflict on {path}: reload the post and reapply the changes")]
    Conflict { path: String },

    #[error("Post file not found: {path}")]
    NotFound { path: String },

    #[error("Remote request failed ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Encoding(String),

    #[error("The {0} source is read-only")]
    ReadOnly(&'static str),
}

impl GatewayError {
    /// Short machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            GatewayError::ListFailed { .. } => "list-failed",
            GatewayError::Unauthenticated => "unauthenticated",
            GatewayError::Conflict { .. } => "conflict",
            GatewayError::NotFound { .. } => "not-found",
            GatewayError::Remote { .. } => "remote",
            GatewayError::Transport(_) | GatewayError::Io(_) => "transport",
            GatewayError::Encoding(_) => "decode",
            GatewayError::ReadOnly(_) => "read-only",
        }
    }
}
