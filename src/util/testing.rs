//! Test support: logging setup and a recording transport

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{ApiRequest, ApiResponse, Transport};
use crate::infrastructure::TransportError;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Transport that records every request and replays queued responses in order.
///
/// Once the queue is exhausted every request gets `204 No Content`.
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<ApiResponse>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a JSON body.
    pub fn respond_json(&self, status: u16, body: Value) -> &Self {
        self.respond(status, &body.to_string())
    }

    /// Queue a response with a raw body.
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(ApiResponse {
                status,
                body: body.to_string(),
            });
        }
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let queued = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front());
        Ok(queued.unwrap_or(ApiResponse {
            status: 204,
            body: String::new(),
        }))
    }
}

/// Container wired to a fresh mock transport, plus a handle on the mock.
pub fn mock_container() -> (ServiceContainer, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let container = ServiceContainer::with_deps(Settings::default(), transport.clone());
    (container, transport)
}
