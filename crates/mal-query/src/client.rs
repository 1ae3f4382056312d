//! Anime endpoint client
//!
//! Sends validated queries with the caller's access token and shapes the
//! responses. Token freshness is the caller's concern: a 401 here is an
//! ordinary `Http` error.

use common::{ApiErrorBody, Endpoints, classify_status, telemetry};
use mal_auth::Token;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::page::{Paging, ResultPage};
use crate::query::{DetailQuery, ListQuery};
use crate::record::ShapedRecord;

/// Message the search endpoint sends for text it refuses to search for
const INVALID_Q_MESSAGE: &str = "invalid q";

#[derive(Deserialize)]
struct RawListPage {
    data: Vec<RawEntry>,
    #[serde(default)]
    paging: Paging,
}

#[derive(Deserialize)]
struct RawEntry {
    node: Value,
}

/// Client for the search and single-anime endpoints.
#[derive(Debug, Clone)]
pub struct AnimeClient {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl AnimeClient {
    pub fn new(client: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Run a search and shape every returned node.
    pub async fn search(&self, query: &ListQuery, token: &Token) -> Result<ResultPage> {
        let url = format!("{}?{}", self.endpoints.anime_url(), query.query_string());
        debug!(q = query.query_text(), limit = query.limit(), offset = query.offset(), "searching anime");

        let (status, body) = self.get("anime_list", &url, token).await?;
        if !classify_status(status).is_success() {
            if ApiErrorBody::parse(&body).is_some_and(|b| b.has_message(INVALID_Q_MESSAGE)) {
                return Err(Error::InvalidQuery);
            }
            return Err(Error::Http { status, body });
        }

        let raw: RawListPage = serde_json::from_str(&body)
            .map_err(|e| Error::MalformedResponse(format!("parsing search response: {e}")))?;
        let records = raw
            .data
            .into_iter()
            .map(|entry| ShapedRecord::from_node(entry.node, query.fields()))
            .collect::<Result<Vec<_>>>()?;

        debug!(count = records.len(), has_next = raw.paging.next.is_some(), "search complete");
        Ok(ResultPage {
            query: query.clone(),
            records,
            paging: raw.paging,
        })
    }

    /// Fetch a single anime. The whole response body is the node.
    pub async fn fetch_detail(&self, query: &DetailQuery, token: &Token) -> Result<ShapedRecord> {
        let url = format!(
            "{}?{}",
            self.endpoints.anime_detail_url(query.id()),
            query.query_string()
        );
        debug!(id = query.id(), "fetching anime details");

        let (status, body) = self.get("anime_detail", &url, token).await?;
        if !classify_status(status).is_success() {
            return Err(Error::Http { status, body });
        }

        let node: Value = serde_json::from_str(&body)
            .map_err(|e| Error::MalformedResponse(format!("parsing anime {}: {e}", query.id())))?;
        ShapedRecord::from_node(node, query.fields())
    }

    async fn get(&self, endpoint: &'static str, url: &str, token: &Token) -> Result<(u16, String)> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token.access_token.expose())
            .send()
            .await
            .map_err(|e| {
                telemetry::record_request(endpoint, 0);
                Error::Transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        telemetry::record_request(endpoint, status);

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("reading response body: {e}")))?;
        Ok((status, body))
    }
}
