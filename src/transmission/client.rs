use crate::config::{HeaderSet, ReplaySettings};
use crate::error::TransmissionError;
use crate::parsing::prometheus::encode_write_request;
use crate::parsing::prometheus::remote_write_models::WriteRequest;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Only the beginning of an error response ends up in the error message.
const MAX_ERROR_BODY_BYTES: usize = 2048;

/// Where and how to send requests. Shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct RemoteWriteTarget {
    pub url: Url,
    pub headers: HeaderSet,
    pub write_timeout: Duration,
}

impl RemoteWriteTarget {
    pub fn from_settings(settings: &ReplaySettings) -> Self {
        Self {
            url: settings.url.clone(),
            headers: settings.headers.clone(),
            write_timeout: settings.write_timeout,
        }
    }
}

/// Sends write requests to one remote write endpoint.
///
/// Each worker builds its own client, connection pooling stays private to it.
pub struct RemoteWriteClient {
    http: reqwest::Client,
    target: Arc<RemoteWriteTarget>,
}

impl RemoteWriteClient {
    pub fn new(target: Arc<RemoteWriteTarget>) -> Result<Self, TransmissionError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(TransmissionError::Client)?;
        Ok(Self { http, target })
    }

    /// Encodes and POSTs one request. The deadline covers sending the request
    /// and reading the response.
    pub async fn write(&self, request: &WriteRequest) -> Result<(), TransmissionError> {
        let body = encode_write_request(request)?;
        let write_timeout = self.target.write_timeout;

        tokio::time::timeout(write_timeout, self.post(body))
            .await
            .map_err(|_| TransmissionError::Timeout(write_timeout))?
    }

    async fn post(&self, body: Vec<u8>) -> Result<(), TransmissionError> {
        let response = self
            .http
            .post(self.target.url.clone())
            .headers(self.target.headers.as_map().clone())
            .body(body)
            .send()
            .await
            .map_err(TransmissionError::Network)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // 5xx responses would be the retryable ones, but nothing is retried:
        // every non 2xx status ends the run.
        Err(TransmissionError::Status {
            status,
            body: first_line(response).await,
        })
    }
}

async fn first_line(mut response: reqwest::Response) -> String {
    let mut buffer = Vec::new();
    while buffer.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => buffer.extend_from_slice(&chunk),
            _ => break,
        }
    }
    buffer.truncate(MAX_ERROR_BODY_BYTES);

    String::from_utf8_lossy(&buffer)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}
