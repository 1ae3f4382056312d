//! OAuth token exchange, refresh and validation probe
//!
//! Three provider interactions:
//! 1. Authorization code exchange (first run)
//! 2. Refresh-token exchange (after the probe reports 401)
//! 3. Probe: an authenticated `GET /v2/users/@me`, used only to decide
//!    whether the stored access token still works
//!
//! Both grants POST a form to the token endpoint and authenticate the client
//! with its id and secret in the body.

use common::{Endpoints, Secret, StatusClass, classify_status, telemetry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::credentials::Credential;
use crate::error::{Error, Result, ValidationFailure};

/// Token as returned by the token endpoint and persisted to disk.
///
/// Field order matches the provider response and the token file layout.
/// `expires_in` is kept for reference only; staleness is decided by the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: String,
    /// Seconds until the access token expires, relative to issuance
    pub expires_in: u64,
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
}

/// Exchange an authorization code for a token.
///
/// The verifier must be the same string that was sent as `code_challenge`
/// on the authorization URL.
pub async fn exchange_code(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    credential: &Credential,
    code: &str,
    verifier: &str,
) -> Result<Token> {
    debug!(client_id = credential.client_id(), "exchanging authorization code");
    let response = client
        .post(endpoints.token_url())
        .form(&[
            ("client_id", credential.client_id()),
            ("client_secret", credential.client_secret().expose().as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| {
            telemetry::record_request("token", 0);
            Error::Http(format!("token exchange request failed: {e}"))
        })?;

    read_token_response(response).await
}

/// Exchange a refresh token for a new token.
pub async fn refresh_token(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    credential: &Credential,
    refresh: &str,
) -> Result<Token> {
    debug!(client_id = credential.client_id(), "refreshing access token");
    let response = client
        .post(endpoints.token_url())
        .form(&[
            ("client_id", credential.client_id()),
            ("client_secret", credential.client_secret().expose().as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh),
        ])
        .send()
        .await
        .map_err(|e| {
            telemetry::record_request("token", 0);
            Error::Http(format!("token refresh request failed: {e}"))
        })?;

    read_token_response(response).await
}

async fn read_token_response(response: reqwest::Response) -> Result<Token> {
    let status = response.status();
    telemetry::record_request("token", status.as_u16());

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::TokenExchange {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Token>()
        .await
        .map_err(|e| Error::InvalidTokenResponse(e.to_string()))
}

/// Probe the provider with an access token.
///
/// 2xx means the token is usable. 400/401/403/404 map to a
/// `TokenValidation` failure; any other status is `UnexpectedStatus`.
pub async fn probe(client: &reqwest::Client, endpoints: &Endpoints, access_token: &str) -> Result<()> {
    let response = client
        .get(endpoints.probe_url())
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| {
            telemetry::record_request("users_me", 0);
            Error::Http(format!("token probe request failed: {e}"))
        })?;

    let status = response.status().as_u16();
    telemetry::record_request("users_me", status);

    let failure = match classify_status(status) {
        StatusClass::Success => return Ok(()),
        StatusClass::InvalidParameters => ValidationFailure::InvalidParameters,
        StatusClass::Unauthorized => ValidationFailure::Expired,
        StatusClass::Forbidden => ValidationFailure::Forbidden,
        StatusClass::NotFound => ValidationFailure::NotFound,
        StatusClass::Other(status) => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::UnexpectedStatus { status, body });
        }
    };

    debug!(status, %failure, "token probe rejected access token");
    Err(Error::TokenValidation(failure))
}
