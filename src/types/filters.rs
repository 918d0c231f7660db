//! Metadata filters narrowing a search.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{MemicError, MemicResult, ValidationDetail};

/// Inclusive page-number range.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRange {
    /// Lowest page, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<u32>,
    /// Highest page, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<u32>,
}

impl PageRange {
    /// Range with both bounds.
    pub fn between(gte: u32, lte: u32) -> Self {
        Self {
            gte: Some(gte),
            lte: Some(lte),
        }
    }

    /// Range with only a lower bound.
    pub fn from_page(gte: u32) -> Self {
        Self { gte: Some(gte), lte: None }
    }

    /// Range with only an upper bound.
    pub fn up_to(lte: u32) -> Self {
        Self { gte: None, lte: Some(lte) }
    }

    fn collect_violations(&self, details: &mut Vec<ValidationDetail>) {
        if self.gte == Some(0) {
            details.push(ValidationDetail::new("page_range.gte", "must be >= 1"));
        }
        if self.lte == Some(0) {
            details.push(ValidationDetail::new("page_range.lte", "must be >= 1"));
        }
        if let (Some(gte), Some(lte)) = (self.gte, self.lte) {
            if gte > lte {
                details.push(ValidationDetail::new(
                    "page_range",
                    format!("gte ({}) must not exceed lte ({})", gte, lte),
                ));
            }
        }
    }
}

/// Filters applied to chunk metadata.
///
/// Fields combine with AND. `reference_ids` and `page_numbers` match any of
/// their members. Empty sets and blank strings are left off the wire.
///
/// # Example
///
/// ```
/// use integrations_memic::types::{MetadataFilters, PageRange};
///
/// let filters = MetadataFilters::new()
///     .reference_id("TG_G1_Math")
///     .page_range(PageRange::between(1, 50));
/// assert!(filters.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataFilters {
    /// Single client-provided reference ID.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub reference_id: Option<String>,
    /// Any of these reference IDs.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub reference_ids: BTreeSet<String>,
    /// Exact page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// Any of these page numbers.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub page_numbers: BTreeSet<u32>,
    /// Inclusive page range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_range: Option<PageRange>,
    /// Category.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub category: Option<String>,
    /// Document type.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub document_type: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl MetadataFilters {
    /// Empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by a single reference ID.
    pub fn reference_id(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Filter by any of several reference IDs.
    pub fn reference_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Filter by an exact page.
    pub fn page_number(mut self, page: u32) -> Self {
        self.page_number = Some(page);
        self
    }

    /// Filter by any of several pages.
    pub fn page_numbers<I: IntoIterator<Item = u32>>(mut self, pages: I) -> Self {
        self.page_numbers.extend(pages);
        self
    }

    /// Filter by an inclusive page range.
    pub fn page_range(mut self, range: PageRange) -> Self {
        self.page_range = Some(range);
        self
    }

    /// Filter by category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter by document type.
    pub fn document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    /// True when no constraint would be sent.
    pub fn is_empty(&self) -> bool {
        is_blank(&self.reference_id)
            && self.reference_ids.is_empty()
            && self.page_number.is_none()
            && self.page_numbers.is_empty()
            && self.page_range.is_none()
            && is_blank(&self.category)
            && is_blank(&self.document_type)
    }

    /// Checks page numbers are >= 1 and the page range is not inverted.
    pub fn validate(&self) -> MemicResult<()> {
        let mut details = Vec::new();

        if self.page_number == Some(0) {
            details.push(ValidationDetail::new("page_number", "must be >= 1"));
        }
        if self.page_numbers.contains(&0) {
            details.push(ValidationDetail::new("page_numbers", "all pages must be >= 1"));
        }
        if let Some(range) = &self.page_range {
            range.collect_violations(&mut details);
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(MemicError::validation("Invalid metadata filters", details))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filters_serialize_to_empty_object() {
        let filters = MetadataFilters::new();
        assert!(filters.is_empty());
        assert_eq!(serde_json::to_value(&filters).unwrap(), json!({}));
    }

    #[test]
    fn test_filters_wire_format() {
        let filters = MetadataFilters::new()
            .reference_id("TG_G1_Math")
            .page_range(PageRange::between(1, 50))
            .category("education");

        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({
                "reference_id": "TG_G1_Math",
                "page_range": {"gte": 1, "lte": 50},
                "category": "education"
            })
        );
    }

    #[test]
    fn test_blank_strings_are_omitted() {
        let filters = MetadataFilters::new().reference_id("").document_type("");
        assert!(filters.is_empty());
        assert_eq!(serde_json::to_value(&filters).unwrap(), json!({}));
    }

    #[test]
    fn test_open_page_range_keeps_single_bound() {
        let filters = MetadataFilters::new().page_range(PageRange::from_page(3));
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({"page_range": {"gte": 3}})
        );
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_or_sets_are_order_independent() {
        let a = MetadataFilters::new()
            .reference_ids(["b", "a", "c"])
            .page_numbers([9, 2, 2, 4]);
        let b = MetadataFilters::new()
            .reference_ids(["c", "b", "a"])
            .page_numbers([4, 9, 2]);

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );

        let echo = json!({"reference_ids": ["a", "c", "b"], "page_numbers": [2, 9, 4]});
        let parsed: MetadataFilters = serde_json::from_value(echo).unwrap();
        assert_eq!(parsed, a);
    }

    #[test]
    fn test_inverted_page_range_fails_validation() {
        let filters = MetadataFilters::new().page_range(PageRange::between(10, 2));
        let err = filters.validate().unwrap_err();
        match err {
            MemicError::Request(crate::error::RequestError::Validation { details, .. }) => {
                assert!(details.iter().any(|d| d.field == "page_range"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_bounds_are_valid() {
        let filters = MetadataFilters::new().page_range(PageRange::between(7, 7));
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_zero_pages_fail_validation() {
        assert!(MetadataFilters::new().page_number(0).validate().is_err());
        assert!(MetadataFilters::new().page_numbers([1, 0]).validate().is_err());
        assert!(MetadataFilters::new().page_range(PageRange::up_to(0)).validate().is_err());
    }
}
