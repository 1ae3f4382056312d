//! Error types for credential and token operations

use std::fmt;
use std::path::PathBuf;

/// Why the probe request rejected an access token.
///
/// Only `Expired` is worth a refresh attempt; the others mean the token or
/// the request itself is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// 400
    InvalidParameters,
    /// 401
    Expired,
    /// 403
    Forbidden,
    /// 404
    NotFound,
}

impl ValidationFailure {
    /// HTTP status the failure was derived from
    pub fn code(self) -> u16 {
        match self {
            ValidationFailure::InvalidParameters => 400,
            ValidationFailure::Expired => 401,
            ValidationFailure::Forbidden => 403,
            ValidationFailure::NotFound => 404,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, ValidationFailure::Expired)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ValidationFailure::InvalidParameters => "invalid parameters",
            ValidationFailure::Expired => "invalid or expired token",
            ValidationFailure::Forbidden => "forbidden",
            ValidationFailure::NotFound => "invalid path or not found",
        };
        write!(f, "{reason} ({})", self.code())
    }
}

/// Errors from credential and token operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, TLS or timeout failure: no HTTP response was received
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token endpoint returned {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("token validation failed: {0}")]
    TokenValidation(ValidationFailure),

    #[error("token probe returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("client id must be {expected} characters, got {len}")]
    InvalidClientId { len: usize, expected: usize },

    #[error("client secret must be {expected} characters, got {len}")]
    InvalidClientSecret { len: usize, expected: usize },

    #[error("credential parse error: {0}")]
    CredentialParse(String),

    #[error("token parse error: {0}")]
    TokenParse(String),

    #[error("token file not found: {}", .0.display())]
    TokenFileNotFound(PathBuf),

    #[error("key file not found: {}", .0.display())]
    KeyFileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl Error {
    /// The validation failure carried by this error, if any.
    pub fn validation_failure(&self) -> Option<ValidationFailure> {
        match self {
            Error::TokenValidation(failure) => Some(*failure),
            _ => None,
        }
    }
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_codes() {
        assert_eq!(ValidationFailure::InvalidParameters.code(), 400);
        assert_eq!(ValidationFailure::Expired.code(), 401);
        assert_eq!(ValidationFailure::Forbidden.code(), 403);
        assert_eq!(ValidationFailure::NotFound.code(), 404);
    }

    #[test]
    fn only_expired_is_retryable() {
        assert!(ValidationFailure::Expired.is_retryable());
        assert!(!ValidationFailure::InvalidParameters.is_retryable());
        assert!(!ValidationFailure::Forbidden.is_retryable());
        assert!(!ValidationFailure::NotFound.is_retryable());
    }

    #[test]
    fn validation_error_display_includes_code() {
        let err = Error::TokenValidation(ValidationFailure::Expired);
        assert_eq!(
            err.to_string(),
            "token validation failed: invalid or expired token (401)"
        );
        assert_eq!(err.validation_failure(), Some(ValidationFailure::Expired));
    }

    #[test]
    fn length_errors_name_expected_width() {
        let err = Error::InvalidClientId {
            len: 5,
            expected: 32,
        };
        assert_eq!(err.to_string(), "client id must be 32 characters, got 5");
        assert!(err.validation_failure().is_none());
    }
}
