use crate::error::ConfigError;
use clap::Parser;
use confique::Config;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub mod headers;

pub use headers::{HeaderSet, parse_header_string};

/// Defaults read from the environment and an optional `settings.toml`.
/// Command line flags take precedence over these.
#[derive(Debug, Config)]
pub struct ReplayConfig {
    #[config(env = "PROM_REPLAY_URL")]
    pub url: Option<String>,

    #[config(env = "PROM_REPLAY_WRITE_TIMEOUT", default = "5m")]
    pub write_timeout: String,

    #[config(env = "PROM_REPLAY_REQUEST_SPAN", default = "1m")]
    pub request_span: String,

    #[config(env = "PROM_REPLAY_CONCURRENCY", default = 1)]
    pub concurrency: usize,

    // Enough to read the next file while the previous one is still being sent
    #[config(env = "PROM_REPLAY_QUEUE_CAPACITY", default = 20)]
    pub queue_capacity: usize,

    #[config(env = "PROM_REPLAY_HEADERS", default = "")]
    pub headers: String,
}

impl ReplayConfig {
    pub fn load() -> Result<ReplayConfig, ConfigError> {
        let c = ReplayConfig::builder()
            .env()
            .file("settings.toml")
            .load()?;

        Ok(c)
    }
}

/// Replays promdump JSON files to a Prometheus remote write endpoint.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// URL for remote write endpoint
    #[arg(long)]
    pub url: Option<String>,

    /// Write timeout of a single request, for example "30s" or "5m"
    #[arg(long, value_name = "DURATION")]
    pub write_timeout: Option<String>,

    /// Maximum duration that one request can span in terms of samples it contains
    #[arg(long, value_name = "DURATION")]
    pub request_span: Option<String>,

    /// Number of concurrent writers
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Number of requests buffered between the file reader and the writers
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Additional HTTP headers. Pairs are separated by "," and split by ":",
    /// for example "X-Scope-OrgID:1234,X-Org-Id:1234"
    #[arg(long)]
    pub headers: Option<String>,

    /// promdump JSON files, replayed in order
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Validated settings of one run. Immutable once built.
#[derive(Debug, Clone)]
pub struct ReplaySettings {
    pub url: Url,
    pub write_timeout: Duration,
    pub request_span: Duration,
    pub concurrency: usize,
    pub queue_capacity: usize,
    pub headers: HeaderSet,
    pub files: Vec<PathBuf>,
}

pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_REQUEST_SPAN: Duration = Duration::from_secs(60);
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;

impl ReplaySettings {
    /// Settings with default tuning, mostly for embedding and tests.
    pub fn new(url: &str, files: Vec<PathBuf>) -> Result<Self, ConfigError> {
        let settings = Self {
            url: parse_url(url)?,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            request_span: DEFAULT_REQUEST_SPAN,
            concurrency: DEFAULT_CONCURRENCY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            headers: HeaderSet::default(),
            files,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Merges command line flags over the loaded configuration.
    pub fn resolve(cli: Cli, config: ReplayConfig) -> Result<Self, ConfigError> {
        let url = cli.url.or(config.url).ok_or(ConfigError::MissingUrl)?;
        let write_timeout = parse_duration(
            "write timeout",
            cli.write_timeout.as_deref().unwrap_or(&config.write_timeout),
        )?;
        let request_span = parse_duration(
            "request span",
            cli.request_span.as_deref().unwrap_or(&config.request_span),
        )?;
        let headers =
            HeaderSet::from_header_string(cli.headers.as_deref().unwrap_or(&config.headers))?;

        let settings = Self {
            url: parse_url(&url)?,
            write_timeout,
            request_span,
            concurrency: cli.concurrency.unwrap_or(config.concurrency),
            queue_capacity: cli.queue_capacity.unwrap_or(config.queue_capacity),
            headers,
            files: cli.files,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.is_empty() {
            return Err(ConfigError::NoInputFiles);
        }
        if self.request_span.as_millis() == 0 {
            return Err(ConfigError::InvalidSpan(self.request_span));
        }
        if self.write_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroCount {
                field: "concurrency",
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCount {
                field: "queue capacity",
            });
        }
        Ok(())
    }
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingUrl);
    }
    Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        source,
    })
}
