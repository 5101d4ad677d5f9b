//! Error types for the expense client

use thiserror::Error;

/// Fallback text when nothing more specific can be shown.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Error, Debug)]
pub enum ClientError {
    /// Backend answered 401; the stored session has already been cleared.
    /// `message` is whatever the response body said, if anything.
    #[error("Session expired. Please log in again.")]
    Unauthorized { message: Option<String> },

    /// Backend answered with any other non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Local session store failure
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rejected locally before any request was made
    #[error("{0}")]
    Invalid(String),
}

impl ClientError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ClientError::Invalid(message.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    /// A 401 from a credential check means the credentials were wrong, not
    /// that a session ran out; report it with the backend's own text.
    pub fn into_credential_failure(self) -> Self {
        match self {
            ClientError::Unauthorized { message } => ClientError::Api {
                status: 401,
                message: message.unwrap_or_else(|| "Invalid email or password".to_string()),
            },
            other => other,
        }
    }

    /// Text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized { .. } => self.to_string(),
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Network(message) | ClientError::Decode(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            ClientError::Invalid(message) => message.clone(),
            _ => UNEXPECTED_ERROR.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_passes_through() {
        let err = ClientError::Api {
            status: 400,
            message: "Amount must be positive".to_string(),
        };
        assert_eq!(err.user_message(), "Amount must be positive");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_empty_api_message_falls_back() {
        let err = ClientError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message(), UNEXPECTED_ERROR);
    }

    #[test]
    fn test_unauthorized_message() {
        let err = ClientError::Unauthorized {
            message: Some("Token expired".to_string()),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Session expired. Please log in again.");
    }

    #[test]
    fn test_credential_failure_keeps_backend_text() {
        let err = ClientError::Unauthorized {
            message: Some("Invalid email or password".to_string()),
        }
        .into_credential_failure();
        assert!(!err.is_unauthorized());
        assert_eq!(err.user_message(), "Invalid email or password");

        let err = ClientError::Unauthorized { message: None }.into_credential_failure();
        assert!(matches!(err, ClientError::Api { status: 401, .. }));
        assert_eq!(err.user_message(), "Invalid email or password");

        let err = ClientError::invalid("Email is required").into_credential_failure();
        assert_eq!(err.user_message(), "Email is required");
    }

    #[test]
    fn test_local_errors_are_unexpected() {
        let err = ClientError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(err.user_message(), UNEXPECTED_ERROR);
    }
}
