//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cypher_http::{protect, ConnectionConfig, Params, QueryClient};
use serde_json::Value;
use std::path::PathBuf;

/// Parse a `NAME=VALUE` query parameter
///
/// The value is read as JSON when it parses (`42`, `true`, `[1,2]`,
/// `"quoted"`), otherwise it is taken as a plain string.
fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("'{}' is not of the form NAME=VALUE", s))?;
    if name.is_empty() {
        return Err(format!("'{}' has an empty parameter name", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

/// cypher-http - query a Neo4j server over HTTP
///
/// Connection settings come from ~/.config/cypher-http/config.toml, then
/// NEO4J_HOST / NEO4J_USERNAME / NEO4J_PASSWORD / NEO4J_SECURE /
/// NEO4J_TIMEOUT_SECS, then the flags below.
#[derive(Parser, Debug)]
#[command(name = "cypher-http")]
#[command(
    version,
    about = "Run Cypher queries against a Neo4j HTTP endpoint",
    after_help = "\
Examples:
  cypher-http query 'MATCH (n) RETURN ID(n) AS id LIMIT 25'
  cypher-http query 'MATCH (n {name: $p}) RETURN ID(n) AS id' -p p=test
  cypher-http --secure --host db.example:7473 graph 'MATCH path = (n)-[r]->(m) RETURN path'
  cypher-http protect \"O'Brien\""
)]
pub struct Cli {
    /// Config file (default: ~/.config/cypher-http/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server address as host:port
    #[arg(long, global = true)]
    pub host: Option<String>,

    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Use https
    #[arg(long, global = true)]
    pub secure: bool,

    /// Use plain http even if the config asks for https
    #[arg(long, global = true, conflicts_with = "secure")]
    pub no_secure: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a query and print its rows as a JSON array
    Query {
        /// Cypher query text
        cypher: String,

        /// Query parameter NAME=VALUE (repeatable)
        #[arg(long = "param", short = 'p', value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },

    /// Run a query and print the graph (nodes/relationships) answer
    Graph {
        /// Cypher query text
        cypher: String,

        /// Query parameter NAME=VALUE (repeatable)
        #[arg(long = "param", short = 'p', value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },

    /// Escape single quotes for use inside a Cypher string literal
    Protect { text: String },
}

impl Cli {
    /// Loaded config with command-line overrides applied
    fn connection(&self) -> Result<ConnectionConfig> {
        let mut config = ConnectionConfig::load(self.config.as_deref())
            .context("Failed to load connection config")?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ConnectionConfig) {
        if let Some(host) = &self.host {
            config.host_port = host.clone();
        }
        if let Some(username) = &self.username {
            config.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if self.secure {
            config.secure = true;
        } else if self.no_secure {
            config.secure = false;
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let output = match &cli.command {
        Commands::Protect { text } => {
            println!("{}", protect(text));
            return Ok(());
        }
        Commands::Query { cypher, params } => {
            let client = QueryClient::from_config(&cli.connection()?);
            let rows = client
                .send_query(cypher, &to_params(params))
                .with_context(|| format!("Query against {} failed", client.query_url()))?;
            serde_json::to_string_pretty(&rows)?
        }
        Commands::Graph { cypher, params } => {
            let client = QueryClient::from_config(&cli.connection()?);
            let graph = client
                .ask_graph(cypher, &to_params(params))
                .with_context(|| format!("Graph query against {} failed", client.graph_url()))?;
            serde_json::to_string_pretty(&graph)?
        }
    };
    println!("{}", output);
    Ok(())
}

fn to_params(pairs: &[(String, Value)]) -> Params {
    pairs.iter().cloned().collect()
}
