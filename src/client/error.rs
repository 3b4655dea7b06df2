//! Errors surfaced by the Student Store client

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-2xx status
    #[error("{message} (HTTP {status})")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    /// The request never produced a response
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Rejected before any request was sent
    #[error("{0}")]
    Form(String),

    #[error("Failed to read photo '{path}': {source}")]
    Photo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from the terminal: {0}")]
    Terminal(#[source] std::io::Error),
}

impl ClientError {
    /// Builds an API error from a status and the raw body, preferring the
    /// server's `{"error": ...}` message when the body carries one.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(response) => ClientError::Api {
                status,
                code: Some(response.code),
                message: response.error,
            },
            Err(_) => ClientError::Api {
                status,
                code: None,
                message: if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for AppError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Form(message) => AppError::BadRequest { message },
            other => AppError::Internal {
                source: anyhow::Error::new(other),
            },
        }
    }
}
