//! Error types for the LibraryHub client

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Status-code band of a failed HTTP response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 401: the session is no longer valid
    Unauthorized,
    /// 400
    BadRequest,
    /// 403: authenticated but not allowed
    Forbidden,
    /// 404
    NotFound,
    /// 500 and above
    Server,
    /// Anything else (409, 422, 3xx...)
    Other,
}

impl ErrorCategory {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => ErrorCategory::Unauthorized,
            400 => ErrorCategory::BadRequest,
            403 => ErrorCategory::Forbidden,
            404 => ErrorCategory::NotFound,
            s if s >= 500 => ErrorCategory::Server,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether a failure in this band is shown to the user
    pub fn is_notified(&self) -> bool {
        matches!(
            self,
            ErrorCategory::BadRequest
                | ErrorCategory::Forbidden
                | ErrorCategory::NotFound
                | ErrorCategory::Server
        )
    }

    /// Short text suitable for a toast or status line
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::Unauthorized => "Your session has expired, please sign in again",
            ErrorCategory::BadRequest => "The request was rejected, check the submitted data",
            ErrorCategory::Forbidden => "You do not have permission to perform this action",
            ErrorCategory::NotFound => "The requested resource was not found",
            ErrorCategory::Server => "The server encountered an error, try again later",
            ErrorCategory::Other => "The request failed",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Unauthorized => "unauthorized",
            ErrorCategory::BadRequest => "bad_request",
            ErrorCategory::Forbidden => "forbidden",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Server => "server",
            ErrorCategory::Other => "other",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main client error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The server answered with a non-success status
    #[error("HTTP {status} ({category}): {body}")]
    Http {
        status: StatusCode,
        category: ErrorCategory,
        body: Value,
    },

    /// No response was received
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid login response format")]
    InvalidLoginResponse,

    /// The stored token contains characters that cannot go in a header
    #[error("Session token is not a valid header value")]
    InvalidToken,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Build an HTTP error from a status and the (possibly empty) response body
    pub fn http(status: StatusCode, body: Value) -> Self {
        AppError::Http {
            status,
            category: ErrorCategory::from_status(status),
            body,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            AppError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            AppError::Http { category, .. } => Some(*category),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.category() == Some(ErrorCategory::Unauthorized)
    }

    /// Server-provided message, if the error body carries one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Http { body, .. } => body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .or_else(|| body.as_str()),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
