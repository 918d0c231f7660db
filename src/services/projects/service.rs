//! Projects service implementation for the Memic API.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use super::ProjectsService;
use crate::auth::AuthManager;
use crate::config::MemicConfig;
use crate::error::{MemicError, MemicResult, ResponseError};
use crate::observability::{create_noop_stack, Logger, SpanStatus, Tracer};
use crate::transport::{endpoints, HttpMethod, HttpTransport, RequestBuilder, ResponseParser};
use crate::types::{ApiKeyContext, Project};

/// Implementation of the Projects service.
pub struct ProjectsServiceImpl {
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    logger: Arc<dyn Logger>,
    tracer: Arc<dyn Tracer>,
}

impl ProjectsServiceImpl {
    /// Create a new projects service instance.
    pub fn new(
        config: Arc<MemicConfig>,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        let (logger, tracer) = create_noop_stack("memic.projects");
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

    async fn get(&self, path: &str) -> MemicResult<Value> {
        let request = self
            .request_builder
            .build_request::<()>(HttpMethod::Get, path, &[], None)?;
        let response = self.transport.send(request).await?;
        ResponseParser::parse_response(response)
    }

    async fn fetch_projects(&self) -> MemicResult<Vec<Project>> {
        // Older deployments wrap the list as {"projects": [...]}.
        let projects = match self.get(endpoints::PROJECTS).await? {
            Value::Object(mut map) => map.remove("projects").unwrap_or(Value::Null),
            other => other,
        };

        match projects {
            list @ Value::Array(_) => Ok(serde_json::from_value(list)?),
            _ => Err(MemicError::Response(ResponseError::UnexpectedFormat {
                message: "expected a list of projects".to_string(),
            })),
        }
    }
}

#[async_trait]
impl ProjectsService for ProjectsServiceImpl {
    async fn list(&self) -> MemicResult<Vec<Project>> {
        let mut span = self.tracer.start_span("memic.projects.list");
        let result = self.fetch_projects().await;

        match &result {
            Ok(projects) => {
                span.set_attribute("count", &projects.len().to_string());
                self.logger.debug("Projects listed", json!({"count": projects.len()}));
            }
            Err(err) => self.logger.warn("Listing projects failed", json!({"error": err.to_string()})),
        }

        span.set_status(SpanStatus::from_result(&result));
        span.end();
        result
    }

    async fn context(&self) -> MemicResult<ApiKeyContext> {
        let mut span = self.tracer.start_span("memic.projects.context");
        let result = match self.get(endpoints::ME).await {
            Ok(body) => serde_json::from_value::<ApiKeyContext>(body).map_err(MemicError::from),
            Err(err) => Err(err),
        };

        if let Ok(context) = &result {
            span.set_attribute("organization_id", &context.organization_id);
        }

        span.set_status(SpanStatus::from_result(&result));
        span.end();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockAuthManager, MockHttpTransport};
    use crate::observability::{DefaultLogger, Span};
    use secrecy::SecretString;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTracer {
        spans: Arc<Mutex<Vec<(String, Option<bool>)>>>,
    }

    struct RecordingSpan {
        name: String,
        ok: Option<bool>,
        spans: Arc<Mutex<Vec<(String, Option<bool>)>>>,
    }

    impl Tracer for RecordingTracer {
        fn start_span(&self, name: &str) -> Box<dyn Span> {
            Box::new(RecordingSpan {
                name: name.to_string(),
                ok: None,
                spans: Arc::clone(&self.spans),
            })
        }
    }

    impl Span for RecordingSpan {
        fn set_attribute(&mut self, _key: &str, _value: &str) {}
        fn set_status(&mut self, status: SpanStatus) {
            self.ok = Some(matches!(status, SpanStatus::Ok));
        }
        fn add_event(&mut self, _name: &str, _attributes: Option<HashMap<String, String>>) {}
        fn end(self: Box<Self>) {
            self.spans.lock().unwrap().push((self.name, self.ok));
        }
    }

    fn service(transport: Arc<MockHttpTransport>) -> ProjectsServiceImpl {
        let config = MemicConfig::builder()
            .api_key(SecretString::new("mk_test".into()))
            .build()
            .unwrap();
        ProjectsServiceImpl::new(Arc::new(config), transport, Arc::new(MockAuthManager::new("mk_test")))
    }

    #[tokio::test]
    async fn test_list_accepts_wrapped_list() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(200, r#"{"projects": [{"id": 1, "name": "Docs"}]}"#);

        let projects = service(transport).list().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "1");
    }

    #[tokio::test]
    async fn test_list_rejects_other_shapes() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(200, r#"{"items": []}"#);

        let err = service(transport).list().await.unwrap_err();
        assert!(matches!(err, MemicError::Response(_)));
    }

    #[tokio::test]
    async fn test_operations_record_spans() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(200, r#"[{"id": "p1", "name": "Docs"}]"#);
        transport.enqueue_json_response(401, r#"{"detail": "Invalid API key"}"#);
        let tracer = RecordingTracer::default();
        let spans = Arc::clone(&tracer.spans);
        let service = service(transport)
            .with_observability(Arc::new(DefaultLogger::new("test")), Arc::new(tracer));

        service.list().await.unwrap();
        service.context().await.unwrap_err();

        let spans = spans.lock().unwrap();
        assert_eq!(
            *spans,
            vec![
                ("memic.projects.list".to_string(), Some(true)),
                ("memic.projects.context".to_string(), Some(false)),
            ]
        );
    }
}
