//! Error types for query building and response shaping

/// Errors from building queries, calling the anime endpoints and reading
/// shaped records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("query text must not be empty")]
    EmptyQuery,

    #[error("anime id must be positive, got {0}")]
    InvalidId(i64),

    /// The provider rejected the search text (`{"message": "invalid q"}`)
    #[error("search text rejected by the provider")]
    InvalidQuery,

    #[error("field '{0}' was not requested")]
    FieldNotRequested(String),

    #[error("anime endpoint returned {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection, TLS or timeout failure: no HTTP response was received
    #[error("anime request failed: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result alias for query operations.
pub type Result<T> = std::result::Result<T, Error>;
