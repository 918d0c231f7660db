//! Span tracking for the Memic API client.
//!
//! Provides trait-based tracing with span management and attribute tracking.

use std::collections::HashMap;
use std::time::Instant;

/// Tracer trait for creating spans.
pub trait Tracer: Send + Sync {
    /// Start a new span with the given name (e.g. `memic.files.upload`).
    fn start_span(&self, name: &str) -> Box<dyn Span>;
}

/// A traced operation.
///
/// Spans carry attributes and are marked with a status on completion.
pub trait Span: Send {
    /// Set an attribute on the span.
    fn set_attribute(&mut self, key: &str, value: &str);

    /// Set the span status.
    fn set_status(&mut self, status: SpanStatus);

    /// Record an event on the span.
    fn add_event(&mut self, name: &str, attributes: Option<HashMap<String, String>>);

    /// End the span and record its duration.
    fn end(self: Box<Self>);
}

/// Status of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanStatus {
    /// Operation completed successfully.
    Ok,
    /// Operation failed with an error message.
    Error(String),
}

impl SpanStatus {
    /// Status derived from an operation result.
    pub fn from_result<T, E: std::fmt::Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => SpanStatus::Ok,
            Err(err) => SpanStatus::Error(err.to_string()),
        }
    }
}

/// Tracer emitting span lifecycle events through the `tracing` crate.
pub struct TracingTracer {
    service_name: String,
}

impl TracingTracer {
    /// Create a new tracer for `service_name`.
    pub fn new(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
        }
    }
}

impl Tracer for TracingTracer {
    fn start_span(&self, name: &str) -> Box<dyn Span> {
        tracing::debug!(service = %self.service_name, span_name = %name, "Span started");

        Box::new(TracingSpan {
            name: name.to_string(),
            service_name: self.service_name.clone(),
            start: Instant::now(),
            attributes: HashMap::new(),
            event_count: 0,
            status: None,
        })
    }
}

/// Span implementation using the `tracing` crate.
pub struct TracingSpan {
    name: String,
    service_name: String,
    start: Instant,
    attributes: HashMap<String, String>,
    event_count: usize,
    status: Option<SpanStatus>,
}

impl TracingSpan {
    /// Attribute recorded under `key`, if any.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl Span for TracingSpan {
    fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    fn set_status(&mut self, status: SpanStatus) {
        if let SpanStatus::Error(msg) = &status {
            tracing::warn!(span_name = %self.name, error = %msg, "Span failed");
        }
        self.status = Some(status);
    }

    fn add_event(&mut self, name: &str, attributes: Option<HashMap<String, String>>) {
        tracing::debug!(
            span_name = %self.name,
            event_name = %name,
            event_attributes = ?attributes.unwrap_or_default(),
            "Span event recorded"
        );
        self.event_count += 1;
    }

    fn end(self: Box<Self>) {
        let status = match &self.status {
            Some(SpanStatus::Ok) => "ok",
            Some(SpanStatus::Error(_)) => "error",
            None => "unset",
        };

        tracing::debug!(
            service = %self.service_name,
            span_name = %self.name,
            duration_ms = self.start.elapsed().as_millis() as u64,
            status = status,
            attributes = ?self.attributes,
            event_count = self.event_count,
            "Span ended"
        );
    }
}

/// No-op tracer for environments where tracing is disabled.
pub struct DefaultTracer {
    _prefix: String,
}

impl DefaultTracer {
    /// Creates a new no-op tracer.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            _prefix: prefix.into(),
        }
    }
}

impl Tracer for DefaultTracer {
    fn start_span(&self, _name: &str) -> Box<dyn Span> {
        Box::new(NoOpSpan)
    }
}

struct NoOpSpan;

impl Span for NoOpSpan {
    fn set_attribute(&mut self, _key: &str, _value: &str) {}
    fn set_status(&mut self, _status: SpanStatus) {}
    fn add_event(&mut self, _name: &str, _attributes: Option<HashMap<String, String>>) {}
    fn end(self: Box<Self>) {}
}
