use reqwest::StatusCode;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors detected while assembling the run configuration, before any work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Please specify --url")]
    MissingUrl,

    #[error("Invalid remote write URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Please specify at least one input file as a command line argument")]
    NoInputFiles,

    #[error("Invalid duration for {field}: '{value}': {source}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("Request span must be at least one millisecond, got {0:?}")]
    InvalidSpan(Duration),

    #[error("Write timeout must be greater than zero")]
    InvalidTimeout,

    #[error("{field} must be greater than zero")]
    ZeroCount { field: &'static str },

    #[error("Invalid header format: {0}")]
    InvalidHeader(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] confique::Error),
}

/// Errors raised while reading and decoding one input file.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Decoding task for {path} failed: {details}")]
    Task { path: PathBuf, details: String },
}

/// Errors raised while sending one batch to the remote write endpoint.
#[derive(Error, Debug)]
pub enum TransmissionError {
    #[error("Failed to encode write request: {0}")]
    Encode(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to remote write endpoint failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request to remote write endpoint timed out after {0:?}")]
    Timeout(Duration),

    #[error("server returned HTTP status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Outcome of a failed replay run.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Transmission(#[from] TransmissionError),

    /// The queue refused a batch because the pipeline was already shutting down.
    #[error("Transmission pipeline aborted")]
    Aborted,
}
