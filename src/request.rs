//! JSON request bodies for the two server endpoints

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Named query parameters, sent in insertion order
pub type Params = IndexMap<String, Value>;

/// Body of a POST to `/db/data/cypher`
#[derive(Debug, Serialize)]
pub struct RowQuery<'a> {
    pub query: &'a str,
    pub params: &'a Params,
}

/// Body of a POST to `/db/data/transaction/commit`
#[derive(Debug, Serialize)]
pub struct GraphQuery<'a> {
    pub statements: [GraphStatement<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatement<'a> {
    pub statement: &'a str,
    pub parameters: &'a Params,
    pub result_data_contents: [&'static str; 1],
}

impl<'a> GraphQuery<'a> {
    pub fn new(statement: &'a str, parameters: &'a Params) -> Self {
        Self {
            statements: [GraphStatement {
                statement,
                parameters,
                result_data_contents: ["graph"],
            }],
        }
    }
}

/// Escape single quotes so `text` can sit inside a `'...'` Cypher literal
///
/// This is a weak guard against injection. Pass values through [`Params`]
/// instead whenever possible.
pub fn protect(text: &str) -> String {
    text.replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_protect_escapes_single_quotes() {
        assert_eq!(protect("O'Brien"), r"O\'Brien");
        assert_eq!(protect("''"), r"\'\'");
        assert_eq!(protect("no quotes \"here\""), "no quotes \"here\"");
        assert_eq!(protect(""), "");
    }

    #[test]
    fn test_row_query_shape() {
        let params = Params::from([("name".to_string(), json!("Alice"))]);
        let body = serde_json::to_value(RowQuery {
            query: "MATCH (n {name: $name}) RETURN ID(n) AS id",
            params: &params,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "query": "MATCH (n {name: $name}) RETURN ID(n) AS id",
                "params": {"name": "Alice"}
            })
        );
    }

    #[test]
    fn test_graph_query_shape() {
        let params = Params::new();
        let body = serde_json::to_value(GraphQuery::new("MATCH p = ()-->() RETURN p", &params))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "statements": [{
                    "statement": "MATCH p = ()-->() RETURN p",
                    "parameters": {},
                    "resultDataContents": ["graph"]
                }]
            })
        );
    }

    #[test]
    fn test_params_keep_insertion_order() {
        let mut params = Params::new();
        params.insert("zeta".to_string(), json!(1));
        params.insert("alpha".to_string(), json!([true, null]));
        let text = serde_json::to_string(&RowQuery {
            query: "RETURN 1",
            params: &params,
        })
        .unwrap();
        assert_eq!(
            text,
            r#"{"query":"RETURN 1","params":{"zeta":1,"alpha":[true,null]}}"#
        );
    }
}
