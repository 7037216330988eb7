//! I/O boundary traits for testability
//!
//! The transport trait abstracts the HTTP exchange with the Neutron server,
//! allowing commands to be tested against a recording mock.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult, TransportError};

/// API version prefix of every request path.
pub const API_VERSION_PREFIX: &str = "/v2.0";

/// Response format suffix appended to every request path.
pub const FORMAT_SUFFIX: &str = ".json";

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP verbs used by the Neutron API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// One request against the API, relative to the versioned endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Resource path without version prefix or format suffix, e.g. `/tunnelzones/abc`
    pub path: String,
    /// Query parameters; keys may repeat
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response: status code and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP exchange abstraction.
pub trait Transport: Send + Sync {
    /// Send one request and return the response, whatever its status.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Blocking reqwest transport.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a client from settings: timeout, TLS options and auth header.
    pub fn new(settings: &Settings) -> InfraResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &settings.token {
            let value = HeaderValue::from_str(token).map_err(|_| InfraError::HttpClient {
                message: "token contains characters not allowed in a header".to_string(),
            })?;
            headers.insert("X-Auth-Token", value);
        }

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(settings.insecure);

        if let Some(ca_cert) = &settings.ca_cert {
            let pem = std::fs::read(ca_cert)
                .map_err(|e| InfraError::io(format!("read CA bundle {}", ca_cert.display()), e))?;
            let cert =
                reqwest::Certificate::from_pem(&pem).map_err(|e| InfraError::HttpClient {
                    message: format!("invalid CA bundle {}: {e}", ca_cert.display()),
                })?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder.build().map_err(|e| InfraError::HttpClient {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: settings.endpoint_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for a request path.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}{}{}{}",
            self.base_url, API_VERSION_PREFIX, path, FORMAT_SUFFIX
        )
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            trace!("request body: {}", body);
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| TransportError::from_reqwest(&url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::from_reqwest(&url, e))?;
        debug!("{} {} -> {}", request.method, url, status);
        trace!("response body: {}", body);

        Ok(ApiResponse { status, body })
    }
}
