//! Startup configuration from command-line flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use headlines_core::StaleResultPolicy;
use headlines_engine::ClientSettings;
use log::LevelFilter;
use news_logging::LogDestination;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "headlines", version, about = "Top headlines in your terminal")]
pub struct Cli {
    /// Base URL of the headline API, e.g. https://newsapi.org/v2
    #[arg(long, env = "NEWS_API_BASE_URL")]
    pub api_base_url: Option<String>,

    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory holding saved articles.
    #[arg(long, env = "HEADLINES_DATA_DIR", default_value = "headlines_data")]
    pub data_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Give up on a headline request after this many seconds.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// What to do with a result that arrives after a newer request was made.
    #[arg(long, value_enum, default_value_t = StaleResults::Discard)]
    pub stale_results: StaleResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StaleResults {
    Discard,
    Apply,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("NEWS_API_BASE_URL is not set (use --api-base-url or the environment)")]
    MissingBaseUrl,
    #[error("NEWS_API_KEY is not set (use --api-key or the environment)")]
    MissingApiKey,
    #[error("invalid API base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub data_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    pub stale_policy: StaleResultPolicy,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let base_url = non_empty(cli.api_base_url).ok_or(ConfigError::MissingBaseUrl)?;
        let api_key = non_empty(cli.api_key).ok_or(ConfigError::MissingApiKey)?;

        let parsed = url::Url::parse(&base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url,
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        let mut client = ClientSettings::new(base_url, api_key);
        client.request_timeout = match cli.request_timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            client,
            data_dir: cli.data_dir,
            log_destination: match cli.log {
                LogTarget::File => LogDestination::File,
                LogTarget::Terminal => LogDestination::Terminal,
                LogTarget::Both => LogDestination::Both,
            },
            log_level: cli.log_level,
            stale_policy: match cli.stale_results {
                StaleResults::Discard => StaleResultPolicy::Discard,
                StaleResults::Apply => StaleResultPolicy::Apply,
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
