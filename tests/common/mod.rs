#![allow(dead_code)]

pub mod fixtures;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use prom_replay::parsing::prometheus::parse_remote_write_request;
use prom_replay::parsing::prometheus::remote_write_models::WriteRequest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Decides the status of the n-th request (0-based) received by the mock.
pub type StatusPolicy = Arc<dyn Fn(usize) -> StatusCode + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub headers: HeaderMap,
    pub request: WriteRequest,
}

#[derive(Clone)]
struct ReceiverState {
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    counter: Arc<AtomicUsize>,
    policy: StatusPolicy,
    delay: Duration,
}

/// Remote write endpoint listening on a random local port.
pub struct MockReceiver {
    pub url: String,
    state: ReceiverState,
    server: JoinHandle<()>,
}

impl MockReceiver {
    /// Accepts everything with 204 No Content.
    pub async fn start() -> Self {
        Self::with_policy(Arc::new(|_| StatusCode::NO_CONTENT), Duration::ZERO).await
    }

    /// Answers `status` to the request with index `failing`, 204 to the others.
    pub async fn failing_at(failing: usize, status: StatusCode) -> Self {
        Self::with_policy(
            Arc::new(move |index| {
                if index == failing {
                    status
                } else {
                    StatusCode::NO_CONTENT
                }
            }),
            Duration::ZERO,
        )
        .await
    }

    /// Waits `delay` before answering each request.
    pub async fn slow(delay: Duration) -> Self {
        Self::with_policy(Arc::new(|_| StatusCode::NO_CONTENT), delay).await
    }

    pub async fn with_policy(policy: StatusPolicy, delay: Duration) -> Self {
        let state = ReceiverState {
            received: Arc::new(Mutex::new(Vec::new())),
            counter: Arc::new(AtomicUsize::new(0)),
            policy,
            delay,
        };

        let app = Router::new()
            .route("/api/v1/write", post(remote_write))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/api/v1/write", address),
            state,
            server,
        }
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.state.received.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.counter.load(Ordering::SeqCst)
    }
}

impl Drop for MockReceiver {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn remote_write(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let index = state.counter.fetch_add(1, Ordering::SeqCst);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let request = match parse_remote_write_request(&body) {
        Ok(request) => request,
        Err(_) => return (StatusCode::BAD_REQUEST, "undecodable body\n"),
    };
    state
        .received
        .lock()
        .unwrap()
        .push(ReceivedRequest { headers, request });

    let status = (state.policy)(index);
    if status.is_success() {
        (status, "")
    } else {
        (status, "mock failure\nsecond line")
    }
}

/// Label value of `name` in a received time series.
pub fn label<'a>(
    series: &'a prom_replay::parsing::prometheus::remote_write_models::TimeSeries,
    name: &str,
) -> Option<&'a str> {
    series
        .labels
        .iter()
        .find(|l| l.name == name)
        .map(|l| l.value.as_str())
}
