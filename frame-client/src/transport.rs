//! HTTP GET capability used by the backend client
//!
//! The client only needs "GET this URL, give me status and body, later".
//! [`ReqwestTransport`] is the production implementation; tests script their
//! own.

use reqwest::{StatusCode, Url};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Raw reply from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    pub fn with_status(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure before any usable response arrived (DNS, connect, TLS, timeout)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::new(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            TransportError::new(format!("Connection failed: {}", err))
        } else {
            TransportError::new(format!("Request failed: {}", err))
        }
    }
}

/// Asynchronous HTTP GET
pub trait Transport {
    fn get(&self, url: &Url) -> impl Future<Output = Result<HttpResponse, TransportError>>;
}

impl<T: Transport> Transport for Rc<T> {
    fn get(&self, url: &Url) -> impl Future<Output = Result<HttpResponse, TransportError>> {
        (**self).get(url)
    }
}

/// Settings for the reqwest-backed transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("PhotoFrame/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Transport backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::new(format!("Client build failed: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        log::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
