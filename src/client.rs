//! The query client
//!
//! Stores what is needed to authenticate with the server and sends Cypher
//! queries to it. [`QueryClient::send_query`] returns rows,
//! [`QueryClient::ask_graph`] returns the nodes/relationships answer used for
//! force-directed (d3js-style) displays.
//!
//! Don't use [`QueryClient::send_query`] with queries that return nodes,
//! relationships or paths. Those cells are not interpreted and come back as
//! raw JSON. Return `ID(n)`, `LABELS(n)` or properties instead.

use crate::config::ConnectionConfig;
use crate::error::{CypherError, CypherResult};
use crate::request::{GraphQuery, Params, RowQuery};
use crate::response::{self, GraphResponse, Row};
use crate::transport::{HttpRequest, HttpResponse, Transport, UreqTransport};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

const QUERY_PATH: &str = "/db/data/cypher";
const GRAPH_PATH: &str = "/db/data/transaction/commit";
const JSON: &str = "application/json";

/// `Basic <base64(username:password)>`
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
}

/// Sends Cypher queries to one server with fixed credentials
///
/// Immutable once built; every call is one blocking POST.
pub struct QueryClient<T = UreqTransport> {
    auth_header: String,
    query_url: String,
    graph_url: String,
    transport: T,
}

impl QueryClient<UreqTransport> {
    /// Client over plain ureq with the transport's default timeouts
    ///
    /// No network I/O happens here.
    ///
    /// ```rust,no_run
    /// use cypher_http::{Params, QueryClient};
    ///
    /// let client = QueryClient::new("localhost:7474", "neo4j", "neo4j", false);
    /// let rows = client.send_query("MATCH (n) RETURN ID(n) AS id LIMIT 25", &Params::new())?;
    /// # Ok::<(), cypher_http::CypherError>(())
    /// ```
    pub fn new(host_port: &str, username: &str, password: &str, secure: bool) -> Self {
        Self::with_transport(host_port, username, password, secure, UreqTransport::new())
    }

    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self::with_transport(
            &config.host_port,
            &config.username,
            &config.password,
            config.secure,
            UreqTransport::with_timeout(config.timeout()),
        )
    }

    /// Reshape a column/row answer, see [`response::format_query_response`]
    pub fn format_query_response(response: &Value) -> CypherResult<Vec<Row>> {
        response::format_query_response(response)
    }
}

impl<T: Transport> QueryClient<T> {
    pub fn with_transport(
        host_port: &str,
        username: &str,
        password: &str,
        secure: bool,
        transport: T,
    ) -> Self {
        let scheme = if secure { "https" } else { "http" };
        Self {
            auth_header: basic_auth_header(username, password),
            query_url: format!("{}://{}{}", scheme, host_port, QUERY_PATH),
            graph_url: format!("{}://{}{}", scheme, host_port, GRAPH_PATH),
            transport,
        }
    }

    pub fn auth_header(&self) -> &str {
        &self.auth_header
    }

    /// Endpoint used by [`QueryClient::send_query`]
    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    /// Endpoint used by [`QueryClient::ask_graph`]
    pub fn graph_url(&self) -> &str {
        &self.graph_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a Cypher query and return one map per result row
    ///
    /// Values should go through `params` (`$name` in the query) rather
    /// than being pasted into the query text.
    pub fn send_query(&self, query: &str, params: &Params) -> CypherResult<Vec<Row>> {
        let body = self.post_json(&self.query_url, &RowQuery { query, params })?;
        let rows = response::format_query_response(&body)?;
        debug!("Query returned {} rows", rows.len());
        Ok(rows)
    }

    /// Send a Cypher query asking for graph-shaped results
    ///
    /// The answer (`results` and `errors`) is returned as the server sent
    /// it. Statement errors reported in `errors` are data, not failures.
    pub fn ask_graph(&self, query: &str, params: &Params) -> CypherResult<GraphResponse> {
        let body = self.post_json(&self.graph_url, &GraphQuery::new(query, params))?;
        response::into_graph_response(body)
    }

    fn post_json<B: Serialize>(&self, url: &str, body: &B) -> CypherResult<Value> {
        let request = HttpRequest {
            url: url.to_string(),
            headers: vec![
                ("Content-Type", JSON.to_string()),
                ("Accept", JSON.to_string()),
                ("Authorization", self.auth_header.clone()),
            ],
            body: serde_json::to_vec(body).map_err(CypherError::Encode)?,
        };

        debug!("POST {} ({} bytes)", url, request.body.len());
        let response = self.transport.post(&request)?;
        debug!("{} answered HTTP {}", url, response.status);
        parse_body(url, response)
    }
}

fn parse_body(url: &str, response: HttpResponse) -> CypherResult<Value> {
    if !response.is_success() {
        return Err(CypherError::Status {
            url: url.to_string(),
            status: response.status,
            body: response.text(),
        });
    }
    serde_json::from_slice(&response.body).map_err(CypherError::Parse)
}

impl<T> fmt::Debug for QueryClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("query_url", &self.query_url)
            .field("graph_url", &self.graph_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl Transport for Unreachable {
        fn post(&self, request: &HttpRequest) -> CypherResult<HttpResponse> {
            Err(CypherError::Transport {
                url: request.url.clone(),
                message: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn test_from_config_passes_timeout_and_credentials() {
        let config = ConnectionConfig {
            host_port: "db.internal:7473".to_string(),
            username: "reader".to_string(),
            password: "s3cret".to_string(),
            secure: true,
            timeout_secs: Some(30),
        };
        let client = QueryClient::from_config(&config);
        assert_eq!(
            client.transport().timeout(),
            Some(std::time::Duration::from_secs(30))
        );
        assert_eq!(client.auth_header(), "Basic cmVhZGVyOnMzY3JldA==");
        assert_eq!(client.query_url(), "https://db.internal:7473/db/data/cypher");

        let untimed = QueryClient::from_config(&ConnectionConfig::default());
        assert_eq!(untimed.transport().timeout(), None);
    }

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(basic_auth_header("neo4j", "neo4j"), "Basic bmVvNGo6bmVvNGo=");
        assert_eq!(basic_auth_header("", ""), "Basic Og==");
    }

    #[test]
    fn test_plain_http_urls() {
        let client = QueryClient::with_transport("localhost:7474", "neo4j", "neo4j", false, Unreachable);
        assert_eq!(client.query_url(), "http://localhost:7474/db/data/cypher");
        assert_eq!(
            client.graph_url(),
            "http://localhost:7474/db/data/transaction/commit"
        );
    }

    #[test]
    fn test_secure_urls() {
        let client = QueryClient::with_transport("db.example:7473", "u", "p", true, Unreachable);
        assert_eq!(client.query_url(), "https://db.example:7473/db/data/cypher");
        assert_eq!(
            client.graph_url(),
            "https://db.example:7473/db/data/transaction/commit"
        );
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client = QueryClient::with_transport("localhost:7474", "neo4j", "secret", false, Unreachable);
        let shown = format!("{:?}", client);
        assert!(!shown.contains(client.auth_header()));
        assert!(shown.contains("localhost:7474"));
    }

    #[test]
    fn test_transport_error_propagates() {
        let client = QueryClient::with_transport("localhost:7474", "neo4j", "neo4j", false, Unreachable);
        let err = client.send_query("RETURN 1", &Params::new()).unwrap_err();
        assert!(matches!(err, CypherError::Transport { .. }));
        let err = client.ask_graph("RETURN 1", &Params::new()).unwrap_err();
        assert!(matches!(err, CypherError::Transport { .. }));
    }

    #[test]
    fn test_non_success_status_is_an_error() {
        let response = HttpResponse {
            status: 401,
            body: b"{\"errors\":[\"unauthorized\"]}".to_vec(),
        };
        let err = parse_body("http://localhost:7474/db/data/cypher", response).unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("unauthorized"));
    }

    #[test]
    fn test_non_json_body_is_parse_error() {
        let response = HttpResponse {
            status: 200,
            body: b"<html>nope</html>".to_vec(),
        };
        let err = parse_body("http://localhost:7474/db/data/cypher", response).unwrap_err();
        assert!(matches!(err, CypherError::Parse(_)));
    }
}
