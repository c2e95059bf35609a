use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::navigation::Route;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error body shapes the API is known to return. The first non-empty field
/// wins, in declaration order.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        [self.detail, self.message, self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

/// Pulls a human readable message out of an error response body.
pub fn server_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        if let Some(message) = parsed.into_message() {
            return message;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .map(|reason| format!("Request failed: {}", reason))
        .unwrap_or_else(|| "Request failed".to_string())
}

impl ClientError {
    pub fn api(status: StatusCode, body: &str) -> Self {
        ClientError::Api {
            status,
            message: server_message(status, body),
        }
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Auth(msg) => msg.clone(),
            ClientError::SessionExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            ClientError::Network(_) => {
                "Unable to reach the server. Please check your connection and try again."
                    .to_string()
            }
            ClientError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ClientError::Storage(_) => "Could not access the saved session.".to_string(),
            ClientError::Config(msg) => msg.clone(),
        }
    }

    /// Where the caller should navigate after this error, if anywhere.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            ClientError::SessionExpired => Some(Route::Login),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Auth(_) | ClientError::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }
}
