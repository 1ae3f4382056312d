//! PKCE verifier and authorization URL
//!
//! The provider only supports the `plain` challenge method, so the verifier
//! is sent unchanged as `code_challenge` and no `code_challenge_method` is
//! included (the provider defaults to `plain`). The same string is later
//! sent as `code_verifier` during the code exchange.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use common::Endpoints;
use rand::RngExt;

use crate::constants::{VERIFIER_ENTROPY_BYTES, VERIFIER_LEN};

/// Generate a cryptographically random PKCE code verifier.
///
/// 100 random bytes encode to 134 URL-safe base64 characters, which are cut
/// down to the 128-character maximum.
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; VERIFIER_ENTROPY_BYTES];
    rand::rng().fill(&mut bytes);
    let mut verifier = URL_SAFE_NO_PAD.encode(bytes);
    verifier.truncate(VERIFIER_LEN);
    verifier
}

/// Build the URL the user opens to authorize the application.
pub fn build_authorization_url(endpoints: &Endpoints, client_id: &str, challenge: &str) -> String {
    format!(
        "{}?response_type=code&client_id={}&code_challenge={}",
        endpoints.authorize_url(),
        urlencoding::encode(client_id),
        urlencoding::encode(challenge),
    )
}
