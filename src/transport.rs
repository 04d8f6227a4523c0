//! HTTP transport used by the query client
//!
//! The client only needs "POST these bytes with these headers, give me the
//! status and body back". [`UreqTransport`] does that with a sync ureq agent,
//! no async runtime needed. Tests plug in their own [`Transport`].

use crate::error::{CypherError, CypherResult};
use std::time::Duration;

/// A single outgoing POST request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Value of the first header with this name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw answer from the server, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossy
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can POST a request and hand back the response
///
/// Implementations report connection-level failures as
/// [`CypherError::Transport`] and return every status they receive,
/// 4xx/5xx included. Status handling belongs to the caller.
pub trait Transport: Send + Sync {
    fn post(&self, request: &HttpRequest) -> CypherResult<HttpResponse>;
}

/// Blocking transport backed by a `ureq::Agent`
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

fn make_agent(timeout: Option<Duration>) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // statuses are classified by the client
        .timeout_global(timeout)
        .build()
        .new_agent()
}

impl UreqTransport {
    /// Transport with ureq's default (unbounded) timeouts
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            agent: make_agent(timeout),
            timeout,
        }
    }

    /// Whole-request timeout the agent was built with
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn post(&self, request: &HttpRequest) -> CypherResult<HttpResponse> {
        let transport_error = |e: ureq::Error| CypherError::Transport {
            url: request.url.clone(),
            message: e.to_string(),
        };

        let mut req = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            req = req.header(*name, value);
        }

        let response = req.send(&request.body[..]).map_err(transport_error)?;
        let status = response.status().as_u16();
        // ureq caps read_to_vec at 10 MiB unless told otherwise
        let body = response
            .into_body()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(transport_error)?;

        Ok(HttpResponse { status, body })
    }
}
