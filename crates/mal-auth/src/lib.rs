//! MyAnimeList OAuth authentication library
//!
//! Client credential storage, plain-PKCE authorization, token exchange and
//! refresh, and a probe-driven token lifecycle. The crate has no dependency
//! on the query layer or the CLI and can be tested on its own.
//!
//! Token flow:
//! 1. Client id/secret loaded via `credentials::CredentialStore::load_or_prompt()`
//! 2. `manager::TokenManager::acquire_token()` reads the token file
//! 3. Missing file: `pkce::generate_verifier()` + `pkce::build_authorization_url()`,
//!    the caller returns the code, then `token::exchange_code()`
//! 4. Stored token: `token::probe()`; a 401 triggers one `token::refresh_token()`
//! 5. Every new token is written via `store::TokenStore::save()`

pub mod constants;
pub mod credentials;
pub mod error;
pub mod manager;
pub mod pkce;
pub mod store;
pub mod token;

pub use constants::*;
pub use credentials::{Credential, CredentialStore};
pub use error::{Error, Result, ValidationFailure};
pub use manager::{TokenManager, TokenState};
pub use pkce::{build_authorization_url, generate_verifier};
pub use store::TokenStore;
pub use token::{Token, exchange_code, probe, refresh_token};
