//! Error handling for the Inventory MRP client
//!
//! Every failure carries the single message the presentation layer shows to
//! the user. No structured error codes are modeled beyond the HTTP status.

use thiserror::Error;

/// Message used when a failed response carries nothing more specific
pub const GENERIC_ERROR_MESSAGE: &str = "Error communicating with the server";

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response did not match the expected shape
    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    /// A request body could not be encoded
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Data kept changing on the backend while a read was in flight
    #[error("Data changed while loading, please try again")]
    Outdated,

    /// Input rejected before submission
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Message shown to the user
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of an application error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ClientError::Validation(shared::describe_errors(&errors))
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Configuration(err.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
