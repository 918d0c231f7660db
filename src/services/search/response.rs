//! Search response decoding.
//!
//! The service has answered in two shapes over time:
//!
//! - legacy: `results` is an array of semantic hits and tabular rows come in
//!   a sibling `structured_results` array of `{data, score}` records;
//! - nested: `results` is an object `{semantic, structured}` where
//!   `structured` is one `{columns, rows}` table, an array of them, or null.
//!
//! Both decode into the same [`SearchResults`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{MemicError, MemicResult, ResponseError};
use crate::types::{
    ColumnInfo, ResultsContainer, RoutingInfo, SearchResult, SearchResults, StructuredResult,
};

#[derive(Deserialize)]
struct LegacyStructuredRow {
    #[serde(default)]
    data: Map<String, Value>,
}

fn unexpected(message: impl Into<String>) -> MemicError {
    MemicError::Response(ResponseError::UnexpectedFormat {
        message: message.into(),
    })
}

fn decode<T: DeserializeOwned>(what: &str, value: Value) -> MemicResult<T> {
    serde_json::from_value(value).map_err(|e| {
        MemicError::Response(ResponseError::Deserialization {
            message: format!("{}: {}", what, e),
        })
    })
}

/// Column type reported for a JSON value in legacy rows.
fn infer_column_type(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "text",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "numeric",
        Value::Bool(_) => "boolean",
        _ => "json",
    }
}

/// Folds legacy `{data, score}` rows into one table.
///
/// Columns follow first-seen key order; a column's type comes from the first
/// non-null value seen for it. Row scores are not carried over.
fn fold_legacy_rows(rows: Vec<LegacyStructuredRow>) -> StructuredResult {
    let mut columns: Vec<ColumnInfo> = Vec::new();
    let mut typed: Vec<bool> = Vec::new();

    for row in &rows {
        for (key, value) in &row.data {
            match columns.iter().position(|c| &c.name == key) {
                Some(i) => {
                    if !typed[i] && !value.is_null() {
                        columns[i].column_type = infer_column_type(value).to_string();
                        typed[i] = true;
                    }
                }
                None => {
                    columns.push(ColumnInfo {
                        name: key.clone(),
                        column_type: infer_column_type(value).to_string(),
                        description: None,
                    });
                    typed.push(!value.is_null());
                }
            }
        }
    }

    StructuredResult {
        columns,
        rows: rows.into_iter().map(|row| row.data).collect(),
    }
}

fn parse_legacy(hits: Value, structured: Option<Value>) -> MemicResult<ResultsContainer> {
    let semantic: Vec<SearchResult> = decode("results", hits)?;

    let structured = match structured {
        None | Some(Value::Null) => Vec::new(),
        Some(value @ Value::Array(_)) => {
            let rows: Vec<LegacyStructuredRow> = decode("structured_results", value)?;
            if rows.is_empty() {
                Vec::new()
            } else {
                vec![fold_legacy_rows(rows)]
            }
        }
        Some(other) => {
            return Err(unexpected(format!(
                "structured_results must be an array, got {}",
                json_type(&other)
            )))
        }
    };

    Ok(ResultsContainer { semantic, structured })
}

fn parse_nested(mut container: Map<String, Value>) -> MemicResult<ResultsContainer> {
    let semantic = match container.remove("semantic") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => decode("results.semantic", value)?,
    };

    let structured = match container.remove("structured") {
        None | Some(Value::Null) => Vec::new(),
        Some(value @ Value::Object(_)) => vec![decode("results.structured", value)?],
        Some(value @ Value::Array(_)) => decode("results.structured", value)?,
        Some(other) => {
            return Err(unexpected(format!(
                "results.structured must be an object or array, got {}",
                json_type(&other)
            )))
        }
    };

    Ok(ResultsContainer { semantic, structured })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decodes a search response body in either wire shape.
///
/// `fallback_query` is used when the body does not echo the query.
pub fn parse_search_response(body: &[u8], fallback_query: &str) -> MemicResult<SearchResults> {
    let value: Value = serde_json::from_slice(body)?;
    let mut root = match value {
        Value::Object(map) => map,
        other => {
            return Err(unexpected(format!(
                "search response must be an object, got {}",
                json_type(&other)
            )))
        }
    };

    let results = match root.remove("results") {
        None | Some(Value::Null) => ResultsContainer::default(),
        Some(hits @ Value::Array(_)) => parse_legacy(hits, root.remove("structured_results"))?,
        Some(Value::Object(container)) => parse_nested(container)?,
        Some(other) => {
            return Err(unexpected(format!(
                "results must be an array or object, got {}",
                json_type(&other)
            )))
        }
    };

    let routing: Option<RoutingInfo> = match root.remove("routing") {
        None | Some(Value::Null) => None,
        Some(value) => Some(decode("routing", value)?),
    };

    let query = match root.remove("query") {
        Some(Value::String(query)) => query,
        _ => fallback_query.to_string(),
    };

    let total_results = match root.get("total_results") {
        None | Some(Value::Null) => results.semantic.len() as u64,
        Some(value) => value
            .as_u64()
            .ok_or_else(|| unexpected("total_results must be a non-negative integer"))?,
    };

    let search_time_ms = match root.get("search_time_ms") {
        None | Some(Value::Null) => 0.0,
        Some(value) => value
            .as_f64()
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .ok_or_else(|| unexpected("search_time_ms must be a non-negative number"))?,
    };

    Ok(SearchResults {
        query,
        results,
        routing,
        total_results,
        search_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::load_fixture;
    use crate::types::SearchRoute;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: Value) -> MemicResult<SearchResults> {
        parse_search_response(value.to_string().as_bytes(), "sent query")
    }

    #[test]
    fn test_legacy_and_nested_shapes_agree() {
        let legacy = parse_search_response(load_fixture("search/legacy_response.json").as_bytes(), "q").unwrap();
        let nested = parse_search_response(load_fixture("search/nested_response.json").as_bytes(), "q").unwrap();

        assert_eq!(legacy.results.semantic, nested.results.semantic);
        assert_eq!(legacy.results.structured, nested.results.structured);
        assert_eq!(legacy.total_results, nested.total_results);
    }

    #[test]
    fn test_legacy_columns_are_inferred_in_first_seen_order() {
        let results = parse(json!({
            "results": [],
            "structured_results": [
                {"data": {"region": "EU", "revenue": 10, "margin": null}, "score": 0.9},
                {"data": {"region": "US", "margin": 0.25, "active": true, "tags": ["a"]}, "score": 0.8}
            ]
        }))
        .unwrap();

        let table = &results.structured()[0];
        let columns: Vec<(&str, &str)> = table
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.column_type.as_str()))
            .collect();
        assert_eq!(
            columns,
            vec![
                ("region", "text"),
                ("revenue", "integer"),
                ("margin", "numeric"),
                ("active", "boolean"),
                ("tags", "json"),
            ]
        );
        assert_eq!(table.len(), 2);
        assert!(table.columns.iter().all(|c| c.description.is_none()));
        assert!(results.has_structured());
        assert!(!results.has_documents());
    }

    #[test]
    fn test_nested_structured_accepts_object_array_or_null() {
        let table = json!({"columns": [{"name": "n", "type": "integer"}], "rows": [{"n": 1}]});

        let single = parse(json!({"results": {"semantic": [], "structured": table}})).unwrap();
        let many = parse(json!({"results": {"semantic": [], "structured": [table, table]}})).unwrap();
        let none = parse(json!({"results": {"semantic": [], "structured": null}})).unwrap();

        assert_eq!(single.structured().len(), 1);
        assert_eq!(many.structured().len(), 2);
        assert!(none.structured().is_empty());
    }

    #[test]
    fn test_absent_results_is_empty() {
        let results = parse(json!({})).unwrap();
        assert!(results.is_empty());
        assert!(results.structured().is_empty());
        assert_eq!(results.query, "sent query");
        assert_eq!(results.total_results, 0);
        assert_eq!(results.search_time_ms, 0.0);
        assert!(results.routing.is_none());
    }

    #[test]
    fn test_defaults_follow_semantic_count() {
        let results = parse(json!({
            "results": {"semantic": [
                {"file_id": 7, "content": "A", "score": 0.91},
                {"file_id": "f2", "content": "B", "score": 0.75}
            ]}
        }))
        .unwrap();

        assert_eq!(results.total_results, 2);
        assert_eq!(results[0].file_id, "7");
        assert_eq!(results[0].chunk_id, "");
        assert_eq!(results[1].score, 0.75);
    }

    #[test]
    fn test_large_search_time_does_not_panic() {
        let results = parse_search_response(br#"{"results": [], "search_time_ms": 1e300}"#, "q").unwrap();
        assert_eq!(results.search_time(), std::time::Duration::MAX);
    }

    #[test]
    fn test_negative_search_time_is_response_error() {
        let err = parse_search_response(br#"{"results": [], "search_time_ms": -5}"#, "q").unwrap_err();
        assert!(matches!(err, MemicError::Response(ResponseError::UnexpectedFormat { .. })));
    }

    #[test]
    fn test_routing_is_parsed() {
        let results = parse(json!({
            "query": "revenue by region",
            "results": {"semantic": [], "structured": null},
            "routing": {
                "route": "structured",
                "reasoning": "aggregate question",
                "connector_id": 12,
                "sql_generated": "SELECT region, SUM(revenue) FROM sales GROUP BY region"
            }
        }))
        .unwrap();

        let routing = results.routing.unwrap();
        assert_eq!(routing.route, SearchRoute::Structured);
        assert_eq!(routing.connector_id.as_deref(), Some("12"));
        assert!(routing.sql_generated.unwrap().starts_with("SELECT"));
        assert_eq!(results.query, "revenue by region");
    }

    #[test]
    fn test_wrong_results_type_is_response_error() {
        for body in [json!({"results": "nope"}), json!({"results": 3}), json!([])] {
            let err = parse(body).unwrap_err();
            assert!(matches!(err, MemicError::Response(_)), "got {:?}", err);
        }
    }

    #[test]
    fn test_missing_required_hit_field_is_response_error() {
        let err = parse(json!({"results": [{"file_id": "f1", "score": 0.9}]})).unwrap_err();
        assert!(matches!(err, MemicError::Response(ResponseError::Deserialization { .. })));

        let err = parse(json!({"results": {"structured": {"columns": [{"name": "n"}], "rows": []}}})).unwrap_err();
        assert!(matches!(err, MemicError::Response(ResponseError::Deserialization { .. })));
    }

    #[test]
    fn test_malformed_json_is_response_error() {
        let err = parse_search_response(b"{not json", "q").unwrap_err();
        assert!(matches!(err, MemicError::Response(ResponseError::Deserialization { .. })));
    }
}
