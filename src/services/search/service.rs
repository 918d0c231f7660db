//! Search service implementation for the Memic API.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::request::build_search_request;
use super::response::parse_search_response;
use super::SearchService;
use crate::auth::AuthManager;
use crate::config::MemicConfig;
use crate::error::MemicResult;
use crate::observability::{create_noop_stack, Logger, SpanStatus, Tracer};
use crate::transport::{endpoints, HttpMethod, HttpTransport, RequestBuilder, ResponseParser};
use crate::types::{SearchOptions, SearchResults};

/// Implementation of the Search service.
pub struct SearchServiceImpl {
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    logger: Arc<dyn Logger>,
    tracer: Arc<dyn Tracer>,
}

impl SearchServiceImpl {
    /// Create a new search service instance.
    pub fn new(
        config: Arc<MemicConfig>,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        let (logger, tracer) = create_noop_stack("memic.search");
        Self {
            transport,
            request_builder: RequestBuilder::new(
                config.base_url.clone(),
                config.user_agent.clone(),
                auth_manager,
            ),
            logger,
            tracer,
        }
    }

    /// Replace the logger and tracer.
    pub fn with_observability(mut self, logger: Arc<dyn Logger>, tracer: Arc<dyn Tracer>) -> Self {
        self.logger = logger;
        self.tracer = tracer;
        self
    }

    async fn execute(&self, query: &str, options: &SearchOptions) -> MemicResult<SearchResults> {
        let body = build_search_request(query, options)?;

        let request = self.request_builder.build_request(
            HttpMethod::Post,
            endpoints::SEARCH,
            &[],
            Some(&body),
        )?;
        let response = self.transport.send(request).await?;
        let response = ResponseParser::ensure_success(response)?;

        parse_search_response(&response.body, query)
    }
}

#[async_trait]
impl SearchService for SearchServiceImpl {
    async fn search(&self, query: &str, options: SearchOptions) -> MemicResult<SearchResults> {
        let mut span = self.tracer.start_span("memic.search");
        span.set_attribute("top_k", &options.top_k.to_string());
        if let Some(project_id) = &options.project_id {
            span.set_attribute("project_id", project_id);
        }

        let result = self.execute(query, &options).await;

        match &result {
            Ok(results) => self.logger.debug(
                "Search completed",
                json!({
                    "semantic": results.semantic().len(),
                    "structured": results.structured().len(),
                    "total_results": results.total_results,
                    "search_time_ms": results.search_time_ms,
                }),
            ),
            Err(err) => self.logger.warn("Search failed", json!({"error": err.to_string()})),
        }

        span.set_status(SpanStatus::from_result(&result));
        span.end();
        result
    }
}
