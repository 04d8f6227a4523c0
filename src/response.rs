//! Reshaping of server responses
//!
//! The cypher endpoint answers with parallel `columns` and `data` arrays.
//! Callers want one map per row, so [`format_query_response`] zips them.
//! Graph responses are handed back as-is.

use crate::error::{CypherError, CypherResult};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One result row: column name to cell, in column order
pub type Row = IndexMap<String, Value>;

/// Unmodified answer of the transactional endpoint (`results`, `errors`)
pub type GraphResponse = Map<String, Value>;

/// Column/row answer of the cypher endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowResponse {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl RowResponse {
    /// Zip every row with the column names
    ///
    /// A row whose length differs from the column count is rejected rather
    /// than truncated or padded.
    pub fn into_rows(self) -> CypherResult<Vec<Row>> {
        let width = self.columns.len();
        if let Some((index, line)) = self
            .data
            .iter()
            .enumerate()
            .find(|(_, line)| line.len() != width)
        {
            return Err(CypherError::MalformedResponse(format!(
                "row {} has {} cells but there are {} columns",
                index,
                line.len(),
                width
            )));
        }

        let rows = self
            .data
            .into_iter()
            .map(|line| self.columns.iter().cloned().zip(line).collect())
            .collect();
        Ok(rows)
    }
}

/// Formats the response received from the cypher endpoint
///
/// Pure: the input is only read, and the same input always gives the same
/// rows. Node, relationship and path cells are not interpreted, they come
/// out as whatever JSON the server sent.
pub fn format_query_response(response: &Value) -> CypherResult<Vec<Row>> {
    RowResponse::deserialize(response)
        .map_err(|e| CypherError::MalformedResponse(e.to_string()))?
        .into_rows()
}

/// Check that a graph answer is a JSON object and hand it back untouched
pub(crate) fn into_graph_response(response: Value) -> CypherResult<GraphResponse> {
    match response {
        Value::Object(map) => Ok(map),
        other => Err(CypherError::MalformedResponse(format!(
            "expected a JSON object from the transaction endpoint, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
