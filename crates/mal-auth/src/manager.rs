//! Token lifecycle
//!
//! `TokenManager::acquire_token` walks a small state machine:
//!
//! ```text
//! NoToken --file read--> Loaded --probe 2xx--> Validated
//!    |                      |
//!    | file missing         +--probe 401--> Refreshing --2xx--> Validated
//!    v                                          |
//! authorization-code exchange --> Validated     +--non-2xx--> Failed(original 401)
//! ```
//!
//! A freshly exchanged token is trusted without a probe. Exactly one refresh
//! is attempted per acquisition; there is no retry loop and no backoff.
//! Transport failures at any step end in `Failed` with the transport error.

use common::{Endpoints, telemetry};
use tracing::{debug, info, warn};

use crate::credentials::Credential;
use crate::error::{Error, Result, ValidationFailure};
use crate::pkce::{build_authorization_url, generate_verifier};
use crate::store::TokenStore;
use crate::token::{self, Token};

/// States of a token acquisition.
#[derive(Debug)]
pub enum TokenState {
    /// Nothing read yet
    NoToken,
    /// Token read from disk, not yet probed
    Loaded(Token),
    /// Probe returned 401; `cause` is reported if the refresh is rejected
    Refreshing { stale: Token, cause: Error },
    /// Usable token
    Validated(Token),
    /// Terminal failure
    Failed(Error),
}

impl TokenState {
    fn name(&self) -> &'static str {
        match self {
            TokenState::NoToken => "no_token",
            TokenState::Loaded(_) => "loaded",
            TokenState::Refreshing { .. } => "refreshing",
            TokenState::Validated(_) => "validated",
            TokenState::Failed(_) => "failed",
        }
    }
}

/// Owns token acquisition, refresh and persistence for one credential.
///
/// Not safe to run concurrently against the same token file: refreshes are
/// not locked, and the last writer wins.
pub struct TokenManager {
    client: reqwest::Client,
    endpoints: Endpoints,
    store: TokenStore,
}

impl TokenManager {
    pub fn new(client: reqwest::Client, endpoints: Endpoints, store: TokenStore) -> Self {
        Self {
            client,
            endpoints,
            store,
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Return a validated token, authorizing or refreshing as needed.
    ///
    /// `authorize` is only called when no usable token file exists. It
    /// receives the authorization URL and must return the code the provider
    /// issued after the user approved access.
    pub async fn acquire_token<F>(&self, credential: &Credential, authorize: F) -> Result<Token>
    where
        F: FnOnce(&str) -> std::io::Result<String>,
    {
        let mut authorize = Some(authorize);
        let mut state = TokenState::NoToken;

        loop {
            state = match state {
                TokenState::NoToken => match self.store.load().await {
                    Ok(token) => TokenState::Loaded(token),
                    Err(Error::TokenFileNotFound(path)) => {
                        info!(path = %path.display(), "no stored token, starting authorization");
                        self.authorize_step(credential, authorize.take()).await
                    }
                    Err(Error::TokenParse(msg)) => {
                        warn!(error = %msg, "stored token unreadable, starting authorization");
                        self.authorize_step(credential, authorize.take()).await
                    }
                    Err(e) => TokenState::Failed(e),
                },
                TokenState::Loaded(token) => match self.validate(token.access_token.expose()).await {
                    Ok(()) => TokenState::Validated(token),
                    Err(Error::TokenValidation(ValidationFailure::Expired)) => TokenState::Refreshing {
                        stale: token,
                        cause: Error::TokenValidation(ValidationFailure::Expired),
                    },
                    Err(e) => TokenState::Failed(e),
                },
                TokenState::Refreshing { stale, cause } => {
                    match self.refresh(credential, stale.refresh_token.expose()).await {
                        Ok(fresh) => TokenState::Validated(fresh),
                        Err(e @ (Error::TokenExchange { .. } | Error::InvalidTokenResponse(_))) => {
                            warn!(error = %e, "refresh rejected, reporting original validation failure");
                            TokenState::Failed(cause)
                        }
                        Err(e) => TokenState::Failed(e),
                    }
                }
                TokenState::Validated(token) => return Ok(token),
                TokenState::Failed(e) => return Err(e),
            };
            debug!(state = state.name(), "token state transition");
        }
    }

    async fn authorize_step<F>(&self, credential: &Credential, authorize: Option<F>) -> TokenState
    where
        F: FnOnce(&str) -> std::io::Result<String>,
    {
        let Some(authorize) = authorize else {
            return TokenState::Failed(Error::Prompt("authorization already attempted".into()));
        };

        let verifier = generate_verifier();
        let url = build_authorization_url(&self.endpoints, credential.client_id(), &verifier);
        let code = match authorize(&url) {
            Ok(code) => code.trim().to_owned(),
            Err(e) => {
                return TokenState::Failed(Error::Prompt(format!("reading authorization code: {e}")));
            }
        };

        match self.exchange_authorization_code(credential, &verifier, &code).await {
            Ok(token) => TokenState::Validated(token),
            Err(e) => TokenState::Failed(e),
        }
    }

    /// Exchange an authorization code and persist the resulting token.
    pub async fn exchange_authorization_code(
        &self,
        credential: &Credential,
        verifier: &str,
        code: &str,
    ) -> Result<Token> {
        let token = token::exchange_code(&self.client, &self.endpoints, credential, code, verifier).await?;
        info!("token generated from authorization code");
        self.store.save(&token).await?;
        Ok(token)
    }

    /// Exchange a refresh token and persist the resulting token.
    pub async fn refresh(&self, credential: &Credential, refresh_token: &str) -> Result<Token> {
        let token = match token::refresh_token(&self.client, &self.endpoints, credential, refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                telemetry::record_refresh(match e {
                    Error::TokenExchange { .. } => "rejected",
                    _ => "error",
                });
                return Err(e);
            }
        };
        telemetry::record_refresh("success");
        info!("access token refreshed");
        self.store.save(&token).await?;
        Ok(token)
    }

    /// Probe the provider with an access token.
    pub async fn validate(&self, access_token: &str) -> Result<()> {
        token::probe(&self.client, &self.endpoints, access_token).await
    }
}
