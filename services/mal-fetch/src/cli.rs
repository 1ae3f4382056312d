//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Search and fetch anime from MyAnimeList.
#[derive(Parser, Debug)]
#[command(name = "mal-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (overrides MAL_FETCH_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Print request counters to stderr before exiting
    #[arg(long, global = true)]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search anime by title
    Search {
        /// Search text
        query: String,

        /// Results per page, 1-100 (other values fall back to 100)
        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        limit: i64,

        /// Results to skip (negative values fall back to 0)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// Extra fields, comma separated
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Fetch a single anime by id
    Anime {
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Extra fields, comma separated
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Obtain a valid access token and print its metadata
    Token,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_defaults() {
        let cli = Cli::try_parse_from(["mal-fetch", "search", "one piece"]).unwrap();
        match cli.command {
            Commands::Search {
                query,
                limit,
                offset,
                fields,
            } => {
                assert_eq!(query, "one piece");
                assert_eq!(limit, 100);
                assert_eq!(offset, 0);
                assert!(fields.is_empty());
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn search_accepts_out_of_range_values_and_field_list() {
        let cli = Cli::try_parse_from([
            "mal-fetch",
            "-vv",
            "search",
            "naruto",
            "--limit",
            "500",
            "--offset",
            "-5",
            "--fields",
            "synopsis,mean",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Search {
                limit,
                offset,
                fields,
                ..
            } => {
                assert_eq!(limit, 500);
                assert_eq!(offset, -5);
                assert_eq!(fields, ["synopsis", "mean"]);
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mal-fetch",
            "anime",
            "21",
            "--config",
            "/tmp/mal.toml",
            "--json-logs",
            "--print-metrics",
        ])
        .unwrap();
        assert!(cli.json_logs);
        assert!(cli.print_metrics);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mal.toml")));
        assert!(matches!(cli.command, Commands::Anime { id: 21, .. }));
    }

    #[test]
    fn token_command_parses() {
        let cli = Cli::try_parse_from(["mal-fetch", "token"]).unwrap();
        assert!(matches!(cli.command, Commands::Token));
    }
}
