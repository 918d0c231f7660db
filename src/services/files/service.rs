//! Files service implementation for the Memic API.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use url::Url;

use super::polling::poll_until_ready;
use super::validation::{inspect_local_file, validate_identifier, validate_poll_config, LocalFile};
use super::FilesService;
use crate::auth::AuthManager;
use crate::config::MemicConfig;
use crate::error::{MemicError, MemicResult, RequestError, ResponseError};
use crate::observability::{create_noop_stack, Logger, Span, SpanStatus, Tracer};
use crate::transport::{endpoints, HttpMethod, HttpRequest, HttpTransport, RequestBuilder, ResponseParser};
use crate::types::{
    ConfirmUploadRequest, File, InitUploadRequest, InitUploadResponse, PollConfig, UploadOptions,
};

/// Implementation of the Files service.
pub struct FilesServiceImpl {
    config: Arc<MemicConfig>,
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    logger: Arc<dyn Logger>,
    tracer: Arc<dyn Tracer>,
}

impl FilesServiceImpl {
    /// Create a new files service instance.
    pub fn new(
        config: Arc<MemicConfig>,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        let request_builder = RequestBuilder::new(
            config.base_url.clone(),
            config.user_agent.clone(),
            auth_manager,
        );
        let (logger, tracer) = create_noop_stack("memic.files");

        Self {
            config,
            transport,
            request_builder,
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

    /// Step 1: ask the service for a presigned upload target.
    async fn initiate(
        &self,
        project_id: &str,
        local: &LocalFile,
        options: &UploadOptions,
    ) -> MemicResult<InitUploadResponse> {
        let body = InitUploadRequest {
            project_id: project_id.to_string(),
            filename: local.filename.clone(),
            size: local.size,
            mime_type: local.mime_type.clone(),
            reference_id: options.reference_id.clone(),
            metadata: options.metadata.clone().filter(|m| !m.is_empty()),
        };

        let request = self.request_builder.build_request(
            HttpMethod::Post,
            &endpoints::init_upload(),
            &[],
            Some(&body),
        )?;
        let response = self.transport.send(request).await?;
        ResponseParser::parse_response(response)
    }

    /// Step 2: PUT the bytes to the presigned target.
    ///
    /// The target authorizes through its own URL, so no API key is sent.
    async fn transfer(&self, target: &InitUploadResponse, path: &Path, mime_type: &str) -> MemicResult<()> {
        let url = Url::parse(&target.upload_url).map_err(|e| {
            MemicError::Response(ResponseError::UnexpectedFormat {
                message: format!("invalid upload_url: {}", e),
            })
        })?;

        let content = tokio::fs::read(path).await.map_err(|e| RequestError::LocalFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), mime_type.to_string());

        let request = HttpRequest {
            method: HttpMethod::Put,
            url: url.to_string(),
            headers,
            body: Some(Bytes::from(content)),
            timeout: Some(self.config.upload_timeout),
        };

        let response = self.transport.send(request).await?;
        ResponseParser::parse_empty(response)
    }

    /// Step 3: tell the service the bytes are in place.
    async fn confirm(&self, project_id: &str, file_id: &str) -> MemicResult<File> {
        let body = ConfirmUploadRequest {
            project_id: project_id.to_string(),
        };

        let request = self.request_builder.build_request(
            HttpMethod::Post,
            &endpoints::confirm_upload(file_id),
            &[],
            Some(&body),
        )?;
        let response = self.transport.send(request).await?;
        ResponseParser::parse_response(response)
    }

    async fn upload_inner(
        &self,
        project_id: &str,
        path: &Path,
        options: &UploadOptions,
        span: &mut dyn Span,
    ) -> MemicResult<File> {
        validate_identifier("project_id", project_id)?;
        if options.wait_for_ready {
            validate_poll_config(&options.poll)?;
        }
        let local = inspect_local_file(path).await?;

        span.set_attribute("project_id", project_id);
        span.set_attribute("mime_type", &local.mime_type);
        span.set_attribute("size", &local.size.to_string());

        let target = self.initiate(project_id, &local, options).await?;
        span.set_attribute("file_id", &target.file_id);
        span.add_event("upload.initiated", None);
        self.logger.debug(
            "Upload initiated",
            json!({
                "file_id": target.file_id,
                "filename": local.filename,
                "size": local.size,
                "expires_in": target.expires_in,
            }),
        );

        self.transfer(&target, path, &local.mime_type).await?;
        span.add_event("upload.transferred", None);
        self.logger.debug("Upload transferred", json!({"file_id": target.file_id}));

        let file = self.confirm(project_id, &target.file_id).await?;
        span.add_event("upload.confirmed", None);
        self.logger.info(
            "Upload confirmed",
            json!({"file_id": file.id, "status": file.status.as_str()}),
        );

        if !options.wait_for_ready {
            return Ok(file);
        }

        self.poll(project_id, &file.id, options.poll).await
    }

    async fn poll(&self, project_id: &str, file_id: &str, poll: PollConfig) -> MemicResult<File> {
        poll_until_ready(file_id, poll, self.logger.as_ref(), || {
            self.get_status(project_id, file_id)
        })
        .await
    }
}

#[async_trait]
impl FilesService for FilesServiceImpl {
    async fn upload(&self, project_id: &str, path: &Path, options: UploadOptions) -> MemicResult<File> {
        let mut span = self.tracer.start_span("memic.files.upload");
        let result = self.upload_inner(project_id, path, &options, span.as_mut()).await;
        span.set_status(SpanStatus::from_result(&result));
        span.end();
        result
    }

    async fn get_status(&self, project_id: &str, file_id: &str) -> MemicResult<File> {
        validate_identifier("project_id", project_id)?;
        validate_identifier("file_id", file_id)?;

        let request = self.request_builder.build_request::<()>(
            HttpMethod::Get,
            &endpoints::file_status(file_id),
            &[("project_id", project_id)],
            None,
        )?;
        let response = self.transport.send(request).await?;
        ResponseParser::parse_response(response)
    }

    async fn wait_for_ready(&self, project_id: &str, file_id: &str, poll: PollConfig) -> MemicResult<File> {
        let mut span = self.tracer.start_span("memic.files.wait_for_ready");
        span.set_attribute("file_id", file_id);

        let result = match validate_identifier("project_id", project_id)
            .and_then(|_| validate_identifier("file_id", file_id))
            .and_then(|_| validate_poll_config(&poll))
        {
            Ok(()) => self.poll(project_id, file_id, poll).await,
            Err(err) => Err(err),
        };

        span.set_status(SpanStatus::from_result(&result));
        span.end();
        result
    }

    async fn delete(&self, project_id: &str, file_id: &str) -> MemicResult<()> {
        validate_identifier("project_id", project_id)?;
        validate_identifier("file_id", file_id)?;

        let request = self.request_builder.build_request::<()>(
            HttpMethod::Delete,
            &endpoints::file(file_id),
            &[("project_id", project_id)],
            None,
        )?;
        let response = self.transport.send(request).await?;
        ResponseParser::parse_empty(response)?;

        self.logger.info("File deleted", json!({"file_id": file_id}));
        Ok(())
    }
}
