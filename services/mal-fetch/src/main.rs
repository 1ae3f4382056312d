//! mal-fetch
//!
//! Thin command-line front end over `mal-auth` and `mal-query`:
//! 1. Loads configuration and validates the query arguments
//! 2. Loads client credentials (prompting on first run)
//! 3. Acquires a validated access token, authorizing or refreshing as needed
//! 4. Runs the search or detail query and prints the shaped records as JSON

mod cli;
mod config;
mod metrics;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use mal_auth::{Credential, CredentialStore, Token, TokenManager, TokenStore};
use mal_query::{AnimeClient, DetailQuery, FieldPolicy, ListQuery};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Cli, Commands};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let prometheus = if cli.print_metrics {
        Some(metrics::install_recorder()?)
    } else {
        None
    };

    let result = run(cli).await;

    if let Some(handle) = prometheus {
        metrics::print(&handle);
    }
    result
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

/// A command whose arguments have been validated.
enum Request {
    Search(ListQuery),
    Anime(DetailQuery),
    Token,
}

impl Request {
    /// Build queries from raw arguments. Runs before any credential or
    /// network work so invalid input fails without side effects.
    fn from_command(command: Commands) -> Result<Self> {
        Ok(match command {
            Commands::Search {
                query,
                limit,
                offset,
                fields,
            } => Request::Search(ListQuery::build(
                &query,
                limit,
                offset,
                fields.as_slice(),
                &FieldPolicy::anime_list(),
            )?),
            Commands::Anime { id, fields } => Request::Anime(DetailQuery::build(
                id,
                fields.as_slice(),
                &FieldPolicy::anime_details(),
            )?),
            Commands::Token => Request::Token,
        })
    }
}

async fn run(cli: Cli) -> Result<()> {
    let location = Config::resolve_path(cli.config.as_deref());
    debug!(path = %location.path.display(), explicit = location.explicit, "loading configuration");
    let config = Config::load_resolved(&location)
        .with_context(|| format!("failed to load config from {}", location.path.display()))?;

    let request = Request::from_command(cli.command)?;

    let endpoints = config.endpoints()?;
    let paths = config.storage_paths();
    let http = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .context("failed to build HTTP client")?;

    let credential = load_credential(&config).await?;

    let manager = TokenManager::new(http.clone(), endpoints.clone(), TokenStore::new(paths.token_file()));
    let token = manager
        .acquire_token(&credential, prompt::read_authorization_code)
        .await
        .context("failed to obtain a valid access token")?;
    info!("access token ready");

    let client = AnimeClient::new(http, endpoints);

    match request {
        Request::Search(query) => {
            let page = client.search(&query, &token).await.context("search failed")?;
            print_json(&page)
        }
        Request::Anime(query) => {
            let record = client
                .fetch_detail(&query, &token)
                .await
                .with_context(|| format!("fetching anime {} failed", query.id()))?;
            print_json(&record)
        }
        Request::Token => print_json(&TokenSummary::from(&token)),
    }
}

/// Environment credentials win over the key file; the key file is created
/// interactively when missing.
async fn load_credential(config: &Config) -> Result<Credential> {
    if let Some((id, secret)) = &config.client_override {
        debug!("using client credentials from environment");
        return Credential::new(id.as_str(), secret.expose().as_str())
            .context("invalid client credentials in MAL_CLIENT_ID / MAL_CLIENT_SECRET");
    }

    let store = CredentialStore::new(config.storage_paths().key_file());
    store
        .load_or_prompt(prompt::read_credentials)
        .await
        .with_context(|| format!("failed to load client credentials from {}", store.path().display()))
}

/// Token metadata safe to print.
#[derive(Serialize)]
struct TokenSummary<'a> {
    token_type: &'a str,
    expires_in: u64,
}

impl<'a> From<&'a Token> for TokenSummary<'a> {
    fn from(token: &'a Token) -> Self {
        Self {
            token_type: &token.token_type,
            expires_in: token.expires_in,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Config, key file and a stored token all pointing at `server`, so a
    /// run that got past argument validation would validate the token remotely.
    async fn provisioned_workspace(server: &MockServer) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let meta = dir.path().join("_api");
        let config_path = dir.path().join("mal-fetch.toml");
        std::fs::write(
            &config_path,
            format!(
                "[api]\noauth_base = \"{uri}/v1/oauth2\"\napi_base = \"{uri}\"\n\n[storage]\nmetadata_dir = \"{}\"\n",
                meta.display(),
                uri = server.uri(),
            ),
        )
        .unwrap();

        let paths = common::StoragePaths::new(&meta);
        CredentialStore::new(paths.key_file())
            .save(&Credential::new("k".repeat(32), "v".repeat(64)).unwrap())
            .await
            .unwrap();
        let token: Token = serde_json::from_value(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 2678400,
            "access_token": "at_stored",
            "refresh_token": "rt_stored"
        }))
        .unwrap();
        TokenStore::new(paths.token_file()).save(&token).await.unwrap();

        (dir, config_path)
    }

    async fn run_offline(args: &[&str]) -> (anyhow::Error, usize) {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let (_dir, config_path) = provisioned_workspace(&server).await;

        let config_arg = config_path.display().to_string();
        let mut argv = vec!["mal-fetch", "--config", config_arg.as_str()];
        argv.extend_from_slice(args);

        let err = run(Cli::try_parse_from(argv).unwrap()).await.unwrap_err();
        let requests = server.received_requests().await.unwrap().len();
        (err, requests)
    }

    #[tokio::test]
    async fn non_positive_anime_id_fails_without_requests() {
        let (err, requests) = run_offline(&["anime", "0"]).await;
        assert!(
            format!("{err:#}").contains("anime id must be positive, got 0"),
            "got: {err:#}"
        );
        assert_eq!(requests, 0, "no provider call may precede id validation");
    }

    #[tokio::test]
    async fn empty_search_fails_without_requests() {
        let (err, requests) = run_offline(&["search", ""]).await;
        assert!(format!("{err:#}").contains("query text must not be empty"), "got: {err:#}");
        assert_eq!(requests, 0, "no provider call may precede query validation");
    }

    #[test]
    fn token_summary_omits_secrets() {
        let token: Token = serde_json::from_value(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 2678400,
            "access_token": "at_secret",
            "refresh_token": "rt_secret"
        }))
        .unwrap();

        let json = serde_json::to_string(&TokenSummary::from(&token)).unwrap();
        assert_eq!(json, r#"{"token_type":"Bearer","expires_in":2678400}"#);
    }

    #[tokio::test]
    async fn env_credentials_are_length_checked() {
        let config = Config {
            client_override: Some(("short".into(), "s".repeat(64).into())),
            ..Config::default()
        };
        let err = load_credential(&config).await.unwrap_err();
        assert!(format!("{err:#}").contains("client id must be 32 characters"), "got: {err:#}");
    }

    #[tokio::test]
    async fn stored_key_file_is_used_without_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.metadata_dir = dir.path().to_path_buf();

        let credential = Credential::new("k".repeat(32), "v".repeat(64)).unwrap();
        CredentialStore::new(config.storage_paths().key_file())
            .save(&credential)
            .await
            .unwrap();

        let loaded = load_credential(&config).await.unwrap();
        assert_eq!(loaded.client_id(), "k".repeat(32));
    }
}
