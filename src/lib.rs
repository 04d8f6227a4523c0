//! # cypher-http
//!
//! Send Cypher queries to a Neo4j server over its HTTP endpoints.
//!
//! Tell the client your host and credentials first:
//!
//! ```rust,no_run
//! use cypher_http::{Params, QueryClient};
//! use serde_json::json;
//!
//! let client = QueryClient::new("localhost:7474", "neo4j", "neo4j", false);
//!
//! // One map per row, keys in column order
//! let rows = client.send_query("MATCH (n) RETURN ID(n) AS id LIMIT 25", &Params::new())?;
//!
//! // With parameters
//! let params = Params::from([("p".to_string(), json!("test"))]);
//! let rows = client.send_query("MATCH (n {name: $p}) RETURN ID(n) AS id", &params)?;
//!
//! // Nodes and relationships for a force-directed display
//! let graph = client.ask_graph("MATCH path = (n)-[r]->(m) RETURN path", &Params::new())?;
//! # Ok::<(), cypher_http::CypherError>(())
//! ```
//!
//! Row queries should not return nodes, relationships or paths: those cells
//! are passed through as raw JSON. Pass `secure = true` to talk https.

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{basic_auth_header, QueryClient};
pub use config::ConnectionConfig;
pub use error::{CypherError, CypherResult};
pub use request::{protect, Params};
pub use response::{format_query_response, GraphResponse, Row, RowResponse};
pub use transport::{HttpRequest, HttpResponse, Transport, UreqTransport};
