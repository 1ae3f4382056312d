//! HTTP status taxonomy shared by the token and query layers
//!
//! The provider reuses generic 4xx codes for several distinct failures, so
//! callers classify by status first and then look at the error body when a
//! status alone is ambiguous (e.g. `{"message": "invalid q"}` on a 400).

use serde::Deserialize;

/// Classification of a provider response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Any 2xx
    Success,
    /// 400: malformed or rejected parameters
    InvalidParameters,
    /// 401: missing, invalid or expired access token
    Unauthorized,
    /// 403: forbidden (also returned when the provider suspects abuse)
    Forbidden,
    /// 404: unknown path or entity
    NotFound,
    /// Everything else, carrying the raw status
    Other(u16),
}

impl StatusClass {
    pub fn is_success(self) -> bool {
        matches!(self, StatusClass::Success)
    }
}

/// Classify a raw HTTP status code.
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        400 => StatusClass::InvalidParameters,
        401 => StatusClass::Unauthorized,
        403 => StatusClass::Forbidden,
        404 => StatusClass::NotFound,
        other => StatusClass::Other(other),
    }
}

/// Error body returned by the provider on non-2xx responses.
///
/// Both fields are optional: some endpoints only send `error`, some only
/// `message`, and proxies in front of the API may send HTML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, returning `None` when it is not a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Whether the body carries exactly the given message.
    pub fn has_message(&self, expected: &str) -> bool {
        self.message.as_deref() == Some(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_success_range() {
        assert_eq!(classify_status(200), StatusClass::Success);
        assert_eq!(classify_status(204), StatusClass::Success);
        assert!(classify_status(201).is_success());
    }

    #[test]
    fn classify_known_client_errors() {
        assert_eq!(classify_status(400), StatusClass::InvalidParameters);
        assert_eq!(classify_status(401), StatusClass::Unauthorized);
        assert_eq!(classify_status(403), StatusClass::Forbidden);
        assert_eq!(classify_status(404), StatusClass::NotFound);
    }

    #[test]
    fn classify_other_keeps_status() {
        assert_eq!(classify_status(429), StatusClass::Other(429));
        assert_eq!(classify_status(500), StatusClass::Other(500));
        assert!(!classify_status(302).is_success());
    }

    #[test]
    fn error_body_parses_message() {
        let body = ApiErrorBody::parse(r#"{"message":"invalid q","error":"bad_request"}"#).unwrap();
        assert!(body.has_message("invalid q"));
        assert_eq!(body.error.as_deref(), Some("bad_request"));
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body = ApiErrorBody::parse(r#"{"error":"not_found"}"#).unwrap();
        assert!(body.message.is_none());
        assert!(!body.has_message("invalid q"));
    }

    #[test]
    fn non_json_error_body_is_none() {
        assert!(ApiErrorBody::parse("<html>Bad Gateway</html>").is_none());
        assert!(ApiErrorBody::parse("").is_none());
    }
}
