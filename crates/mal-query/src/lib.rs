//! Anime search and detail queries
//!
//! Builds validated queries against per-endpoint field allow-lists, sends
//! them with an access token from `mal-auth`, and shapes the JSON responses
//! into records that only expose the requested fields.
//!
//! Flow:
//! 1. `ListQuery::build()` / `DetailQuery::build()` normalize raw input and
//!    collect `Diagnostic`s for anything they had to drop or clamp
//! 2. `AnimeClient::search()` / `AnimeClient::fetch_detail()` call the provider
//! 3. Each node becomes a `ShapedRecord`; searches return a `ResultPage`

pub mod client;
pub mod error;
pub mod fields;
pub mod page;
pub mod query;
pub mod record;

pub use client::AnimeClient;
pub use error::{Error, Result};
pub use fields::{Diagnostic, FieldPolicy, FieldSelection};
pub use page::{Paging, ResultPage};
pub use query::{DetailQuery, ListQuery, MAX_LIMIT};
pub use record::ShapedRecord;
