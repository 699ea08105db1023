//! Errors reported by the backend.

use thiserror::Error;

/// A backend answer that did not carry usable data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend rejected the request (non-2xx status or `success: false`).
    #[error("request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided `mensaje`, if any.
        message: Option<String>,
    },

    /// The resource already exists (HTTP 409), e.g. a duplicate connection.
    #[error("conflict: {}", .message.as_deref().unwrap_or("no message"))]
    Conflict {
        /// Server-provided `mensaje`, if any.
        message: Option<String>,
    },

    /// The resource does not exist (HTTP 404).
    #[error("not found: {}", .message.as_deref().unwrap_or("no message"))]
    NotFound {
        /// Server-provided `mensaje`, if any.
        message: Option<String>,
    },

    /// A success envelope without a `data` field.
    #[error("response carried no data")]
    MissingData,

    /// The body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Build the error for a failed HTTP status.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            404 => ApiError::NotFound { message },
            409 => ApiError::Conflict { message },
            _ => ApiError::Rejected { status, message },
        }
    }

    /// The server message, if the backend sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. }
            | ApiError::Conflict { message }
            | ApiError::NotFound { message } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            ApiError::MissingData | ApiError::Malformed(_) => None,
        }
    }

    /// Text to show the user: the server message verbatim, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_variant() {
        assert!(matches!(
            ApiError::from_status(409, None),
            ApiError::Conflict { .. }
        ));
        assert!(matches!(
            ApiError::from_status(404, None),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            ApiError::from_status(401, None),
            ApiError::Rejected { status: 401, .. }
        ));
    }

    #[test]
    fn user_message_prefers_server_text() {
        let err = ApiError::from_status(400, Some("Credenciales inválidas".into()));
        assert_eq!(err.user_message("Error al iniciar sesión"), "Credenciales inválidas");
    }

    #[test]
    fn user_message_falls_back_on_blank_or_missing() {
        let blank = ApiError::from_status(500, Some("  ".into()));
        assert_eq!(blank.user_message("Error de red"), "Error de red");
        assert_eq!(ApiError::MissingData.user_message("Error de red"), "Error de red");
    }

    #[test]
    fn error_display() {
        let err = ApiError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "request rejected (500): no message");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
