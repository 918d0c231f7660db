//! Observability layer for the Memic API client.
//!
//! Provides trait-based abstractions for:
//! - **Logging**: Structured logging with sensitive data redaction
//! - **Tracing**: Spans with attributes around each public operation
//!
//! # Examples
//!
//! ```rust
//! use integrations_memic::observability::{Logger, StructuredLogger, Tracer, TracingTracer, SpanStatus};
//! use integrations_memic::config::LogLevel;
//! use serde_json::json;
//!
//! let logger = StructuredLogger::new("memic.search").with_level(LogLevel::Debug);
//! logger.info("Search started", json!({"top_k": 10}));
//!
//! let tracer = TracingTracer::new("memic");
//! let mut span = tracer.start_span("memic.search");
//! span.set_attribute("top_k", "10");
//! span.set_status(SpanStatus::Ok);
//! span.end();
//! ```

pub mod logging;
pub mod tracing;

use std::sync::Arc;

use crate::config::LogLevel;

pub use self::logging::{redact_sensitive_fields, DefaultLogger, Logger, StructuredLogger, REDACTED};
pub use self::tracing::{DefaultTracer, Span, SpanStatus, Tracer, TracingSpan, TracingTracer};

/// Create the default observability stack.
///
/// Returns a (logger, tracer) pair emitting through the `tracing` crate.
pub fn create_default_stack(service_name: &str, level: LogLevel) -> (Arc<dyn Logger>, Arc<dyn Tracer>) {
    let logger = Arc::new(StructuredLogger::new(service_name).with_level(level));
    let tracer = Arc::new(TracingTracer::new(service_name));
    (logger, tracer)
}

/// Create a no-op observability stack.
pub fn create_noop_stack(service_name: &str) -> (Arc<dyn Logger>, Arc<dyn Tracer>) {
    let logger = Arc::new(DefaultLogger::new(service_name));
    let tracer = Arc::new(DefaultTracer::new(service_name));
    (logger, tracer)
}
