//! Error types for Fatura

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status of the response that carried the failure envelope
        status: Option<u16>,
        code: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status associated with this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Backend-provided message from a failure envelope
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Timeout or connection failure (no response at all)
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout() || e.is_connect())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
