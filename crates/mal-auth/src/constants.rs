//! Provider-issued identifier widths and PKCE parameters

/// Length of a client id issued by the provider
pub const CLIENT_ID_LEN: usize = 32;

/// Length of a client secret issued by the provider
pub const CLIENT_SECRET_LEN: usize = 64;

/// Random bytes fed into the verifier before encoding (encodes to 134 chars)
pub const VERIFIER_ENTROPY_BYTES: usize = 100;

/// Verifier length after truncation. PKCE allows 43-128 characters.
pub const VERIFIER_LEN: usize = 128;
