//! Search request and result types for the Memic API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Index;
use std::time::Duration;

use super::common;
use super::filters::MetadataFilters;

/// Default number of results requested.
pub const DEFAULT_TOP_K: u32 = 10;

/// Default similarity threshold.
pub const DEFAULT_MIN_SCORE: f64 = 0.7;

/// Caller-facing search options.
///
/// # Example
///
/// ```
/// use integrations_memic::types::{MetadataFilters, SearchOptions};
///
/// let options = SearchOptions::new()
///     .project_id("proj-1")
///     .top_k(5)
///     .filters(MetadataFilters::new().category("education"));
/// assert_eq!(options.top_k, 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Limit the search to one project.
    pub project_id: Option<String>,
    /// Limit the search to these files.
    pub file_ids: Vec<String>,
    /// Number of results to return (default: 10).
    pub top_k: u32,
    /// Minimum similarity score in [0, 1] (default: 0.7).
    pub min_score: f64,
    /// Metadata filters.
    pub filters: Option<MetadataFilters>,
}

impl SearchOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit to a project.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Limit to specific files.
    pub fn file_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Set the number of results.
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the similarity threshold.
    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Set metadata filters.
    pub fn filters(mut self, filters: MetadataFilters) -> Self {
        self.filters = Some(filters);
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            project_id: None,
            file_ids: Vec::new(),
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
            filters: None,
        }
    }
}

/// Validated wire request for the search endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Number of results.
    pub top_k: u32,
    /// Similarity threshold.
    pub min_score: f64,
    /// Project scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// File scope.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,
    /// Metadata filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_filters: Option<MetadataFilters>,
}

/// One semantic hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Chunk identifier.
    #[serde(default, deserialize_with = "common::id_or_default")]
    pub chunk_id: String,
    /// Source file identifier.
    #[serde(deserialize_with = "common::id")]
    pub file_id: String,
    /// Source file display name.
    #[serde(default, deserialize_with = "common::null_as_default")]
    pub file_name: String,
    /// Text excerpt.
    pub content: String,
    /// Relevance score as reported by the service.
    pub score: f64,
    /// Position of the chunk within the file.
    #[serde(default, deserialize_with = "common::null_as_default")]
    pub chunk_index: u64,
    /// Page the chunk belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// First page spanned by the chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_page: Option<u32>,
    /// Last page spanned by the chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<u32>,
    /// Owning project.
    #[serde(default, deserialize_with = "common::optional_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Reference ID of the source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Category of the source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Document type of the source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    /// Layout boxes of the chunk, as sent by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_boxes: Option<Value>,
}

/// Metadata for one column of a structured result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared data type (e.g. `varchar`, `integer`).
    #[serde(rename = "type")]
    pub column_type: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tabular result with schema metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuredResult {
    /// Column metadata, in order.
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    /// Rows as key/value records, in order.
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
}

impl StructuredResult {
    /// True if any row exists.
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Map<String, Value>> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a StructuredResult {
    type Item = &'a Map<String, Value>;
    type IntoIter = std::slice::Iter<'a, Map<String, Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Semantic and structured results side by side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultsContainer {
    /// Semantic (document) hits.
    #[serde(default)]
    pub semantic: Vec<SearchResult>,
    /// Structured (tabular) results.
    #[serde(default)]
    pub structured: Vec<StructuredResult>,
}

/// Source a query was answered from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchRoute {
    /// Document vector search.
    Semantic,
    /// Database connector.
    Structured,
    /// Both.
    Hybrid,
    /// A route this client does not know about.
    #[serde(other)]
    Unknown,
}

/// How the service routed the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingInfo {
    /// Route taken.
    pub route: SearchRoute,
    /// Explanation of the routing decision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Database connector ID for structured routes.
    #[serde(default, deserialize_with = "common::optional_id", skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<String>,
    /// Database connector name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_name: Option<String>,
    /// Query generated against the structured source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_generated: Option<String>,
    /// Explanation of the generated query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_explanation: Option<String>,
}

/// Response of a search call.
///
/// Iterating yields the semantic hits only; use [`SearchResults::structured`]
/// for tabular data.
///
/// # Example
///
/// ```
/// use integrations_memic::services::search::parse_search_response;
///
/// let body = br#"{"results": {"semantic": [
///     {"file_id": "f1", "file_name": "a.pdf", "content": "A", "score": 0.9}
/// ]}}"#;
/// let results = parse_search_response(body, "q").unwrap();
/// let contents: Vec<&str> = results.iter().map(|r| r.content.as_str()).collect();
/// assert_eq!(contents, ["A"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchResults {
    /// Query as echoed by the service.
    pub query: String,
    /// Result halves.
    pub results: ResultsContainer,
    /// Routing decision, when the service classified the query.
    pub routing: Option<RoutingInfo>,
    /// Total number of results reported by the service.
    pub total_results: u64,
    /// Server-side search duration in milliseconds.
    pub search_time_ms: f64,
}

impl SearchResults {
    /// Semantic hits.
    pub fn semantic(&self) -> &[SearchResult] {
        &self.results.semantic
    }

    /// Structured results.
    pub fn structured(&self) -> &[StructuredResult] {
        &self.results.structured
    }

    /// Iterates over semantic hits.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.semantic.iter()
    }

    /// Number of semantic hits.
    pub fn len(&self) -> usize {
        self.results.semantic.len()
    }

    /// True when there are no semantic hits.
    pub fn is_empty(&self) -> bool {
        self.results.semantic.is_empty()
    }

    /// True if any semantic hit exists.
    pub fn has_documents(&self) -> bool {
        !self.results.semantic.is_empty()
    }

    /// True if any structured result carries rows.
    pub fn has_structured(&self) -> bool {
        self.results.structured.iter().any(StructuredResult::has_data)
    }

    /// Server-side search duration, saturating at `Duration::MAX`.
    pub fn search_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.search_time_ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
    }
}

impl Index<usize> for SearchResults {
    type Output = SearchResult;

    fn index(&self, index: usize) -> &Self::Output {
        &self.results.semantic[index]
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.semantic.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(content: &str, score: f64) -> SearchResult {
        SearchResult {
            chunk_id: String::new(),
            file_id: "f1".to_string(),
            file_name: "a.pdf".to_string(),
            content: content.to_string(),
            score,
            chunk_index: 0,
            page_number: None,
            start_page: None,
            end_page: None,
            project_id: None,
            reference_id: None,
            category: None,
            document_type: None,
            bounding_boxes: None,
        }
    }

    #[test]
    fn test_iteration_is_restartable() {
        let results = SearchResults {
            query: "q".to_string(),
            results: ResultsContainer {
                semantic: vec![hit("A", 0.9), hit("B", 0.8)],
                structured: Vec::new(),
            },
            ..Default::default()
        };

        let first: Vec<_> = results.iter().map(|r| r.content.clone()).collect();
        let second: Vec<_> = (&results).into_iter().map(|r| r.content.clone()).collect();
        assert_eq!(first, vec!["A", "B"]);
        assert_eq!(first, second);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].score, 0.8);
        assert!(results.has_documents());
        assert!(!results.has_structured());
    }

    #[test]
    fn test_has_structured_requires_rows() {
        let mut results = SearchResults::default();
        results.results.structured.push(StructuredResult::default());
        assert!(!results.has_structured());

        let mut row = Map::new();
        row.insert("revenue".to_string(), Value::from(10));
        results.results.structured[0].rows.push(row);
        assert!(results.has_structured());
    }

    #[test]
    fn test_search_time() {
        let results = SearchResults {
            search_time_ms: 125.5,
            ..Default::default()
        };
        assert_eq!(results.search_time(), Duration::from_micros(125_500));
    }

    #[test]
    fn test_search_time_saturates() {
        let results = SearchResults {
            search_time_ms: 1e300,
            ..Default::default()
        };
        assert_eq!(results.search_time(), Duration::MAX);

        let results = SearchResults {
            search_time_ms: f64::NAN,
            ..Default::default()
        };
        assert_eq!(results.search_time(), Duration::ZERO);
    }

    #[test]
    fn test_unknown_route() {
        let routing: RoutingInfo = serde_json::from_str(r#"{"route": "graph"}"#).unwrap();
        assert_eq!(routing.route, SearchRoute::Unknown);
    }

    #[test]
    fn test_search_request_omits_empty_scopes() {
        let request = SearchRequest {
            query: "q".to_string(),
            top_k: 10,
            min_score: 0.7,
            project_id: None,
            file_ids: Vec::new(),
            metadata_filters: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"query": "q", "top_k": 10, "min_score": 0.7}));
    }
}
