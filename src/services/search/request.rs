//! Search request validation and wire building.

use crate::error::{MemicError, MemicResult, ValidationDetail};
use crate::types::{SearchOptions, SearchRequest};

/// Validates `query` and `options` and builds the wire request.
///
/// Nothing invalid reaches the service: an empty query, `top_k == 0`, a
/// `min_score` outside `[0, 1]` and invalid filters all fail here.
///
/// # Example
///
/// ```
/// use integrations_memic::services::search::build_search_request;
/// use integrations_memic::types::SearchOptions;
///
/// let request = build_search_request("key findings", &SearchOptions::new()).unwrap();
/// assert_eq!(request.top_k, 10);
/// assert!(build_search_request("   ", &SearchOptions::new()).is_err());
/// ```
pub fn build_search_request(query: &str, options: &SearchOptions) -> MemicResult<SearchRequest> {
    let mut details = Vec::new();

    if query.trim().is_empty() {
        details.push(ValidationDetail::new("query", "must not be empty"));
    }

    if options.top_k == 0 {
        details.push(ValidationDetail::new("top_k", "must be greater than zero"));
    }

    if !(0.0..=1.0).contains(&options.min_score) {
        details.push(ValidationDetail::new(
            "min_score",
            format!("must be between 0 and 1, got {}", options.min_score),
        ));
    }

    if let Some(project_id) = &options.project_id {
        if project_id.trim().is_empty() {
            details.push(ValidationDetail::new("project_id", "must not be empty when set"));
        }
    }

    if options.file_ids.iter().any(|id| id.trim().is_empty()) {
        details.push(ValidationDetail::new("file_ids", "must not contain empty identifiers"));
    }

    if let Some(filters) = &options.filters {
        if let Err(MemicError::Request(crate::error::RequestError::Validation { details: inner, .. })) =
            filters.validate()
        {
            details.extend(inner.into_iter().map(|d| {
                ValidationDetail::new(format!("filters.{}", d.field), d.description)
            }));
        }
    }

    if !details.is_empty() {
        return Err(MemicError::validation("Invalid search request", details));
    }

    Ok(SearchRequest {
        query: query.to_string(),
        top_k: options.top_k,
        min_score: options.min_score,
        project_id: options.project_id.clone(),
        file_ids: options.file_ids.clone(),
        metadata_filters: options.filters.clone().filter(|f| !f.is_empty()),
    })
}
