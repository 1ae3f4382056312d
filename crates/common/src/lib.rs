//! Common types for the anime catalogue client

mod endpoints;
mod error;
mod secret;
mod status;
pub mod telemetry;

pub use endpoints::{
    DEFAULT_API_BASE, DEFAULT_METADATA_DIR, DEFAULT_OAUTH_BASE, Endpoints, StoragePaths,
};
pub use error::{Error, Result};
pub use secret::Secret;
pub use status::{ApiErrorBody, StatusClass, classify_status};
