//! FLUX provider implementation
//!
//! Orchestrates one request end-to-end: translate, submit, poll, then stream
//! the resolved image back in the OpenAI response envelope with a
//! pre-computed content length. Every request owns its state; nothing is
//! shared between concurrent requests beyond the client's connection pool.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{error, info};

use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::provider::{ImageProvider, ImageStream};
use crate::core::types::image::{ImageEditRequest, ImageGenerationRequest};

use super::config::{FluxConfig, FluxEndpoint, JobProtocol};
use super::poll::poll_for_result;
use super::stream::{envelope_length, json_prefix, probe_source_length, stream_image};
use super::types::{FluxEditBody, FluxGenerationBody, JobHandle, ReadyResult, SubmitResponse};

pub(crate) const PROVIDER: &str = "bfl";

/// Classify a transport-level reqwest failure.
pub(crate) fn transport_error(e: reqwest::Error) -> ProviderError {
    ProviderError::network(PROVIDER, e.to_string())
}

/// Image generation backend for the Black Forest Labs FLUX API.
#[derive(Debug, Clone)]
pub struct FluxProvider {
    config: FluxConfig,
    client: reqwest::Client,
}

impl FluxProvider {
    /// Create a provider for the given configuration
    pub fn new(config: FluxConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a provider targeting `endpoint`, configured from environment
    /// variables
    pub fn from_env(endpoint: FluxEndpoint) -> Self {
        Self::new(FluxConfig::from_env(endpoint))
    }

    pub fn config(&self) -> &FluxConfig {
        &self.config
    }

    /// Submit a translated request and obtain the opaque job reference.
    async fn submit<B: Serialize>(
        &self,
        api_key: &str,
        body: &B,
    ) -> Result<JobHandle, ProviderError> {
        let url = self.config.submit_url()?;

        let response = self
            .client
            .post(url)
            .header("x-key", api_key)
            .header("Accept", self.config.endpoint.accept)
            .json(body)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        // Submission success is strictly 200; a 201/202 is not part of the
        // protocol and gets the same upstream-error classification
        if status != StatusCode::OK {
            let raw = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %raw, "FLUX submission failed");
            return Err(ProviderError::api_error(
                PROVIDER,
                status.as_u16(),
                format!("Error from FLUX call: {raw}"),
            ));
        }

        let payload: SubmitResponse = response.json().await.map_err(|e| {
            ProviderError::response_parsing(PROVIDER, format!("Invalid submit response: {e}"))
        })?;

        match self.config.endpoint.protocol {
            JobProtocol::PollingUrl => payload
                .polling_url
                .map(JobHandle::PollingUrl)
                .ok_or_else(|| {
                    ProviderError::response_parsing(PROVIDER, "No polling_url returned from FLUX")
                }),
            JobProtocol::JobId { .. } => payload.id.map(JobHandle::JobId).ok_or_else(|| {
                ProviderError::response_parsing(PROVIDER, "No job id returned from FLUX")
            }),
        }
    }

    /// Assemble the streamed response for a resolved job.
    ///
    /// The content length is computed from a header-only probe before the
    /// body stream emits its first byte, so the caller can set the
    /// `Content-Length` header ahead of the body.
    async fn respond(&self, ready: ReadyResult) -> Result<ImageStream, ProviderError> {
        let escaped_prompt = serde_json::to_string(&ready.revised_prompt)
            .map_err(|e| ProviderError::serialization(PROVIDER, e.to_string()))?;
        let prefix = json_prefix(chrono::Utc::now().timestamp());

        let source_len = probe_source_length(&self.client, &ready.sample_url).await?;
        let content_length = envelope_length(source_len, &prefix, &escaped_prompt);

        let body = stream_image(&self.client, &ready.sample_url, prefix, escaped_prompt).await?;

        Ok(ImageStream {
            content_length,
            body,
        })
    }
}

#[async_trait]
impl ImageProvider for FluxProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageStream, ProviderError> {
        let api_key = self.config.api_key()?;

        let body = FluxGenerationBody::from_request(&request, &self.config.endpoint);
        info!(
            endpoint = self.config.endpoint.path,
            requested = ?request.size,
            width = ?body.width,
            height = ?body.height,
            aspect_ratio = ?body.aspect_ratio,
            "FLUX image generation"
        );

        let handle = self.submit(api_key, &body).await?;
        let ready = poll_for_result(&self.client, &self.config, api_key, handle).await?;
        self.respond(ready).await
    }

    async fn edit_image(&self, request: ImageEditRequest) -> Result<ImageStream, ProviderError> {
        let api_key = self.config.api_key()?;

        let body = FluxEditBody::from_request(&request)?;
        info!(
            endpoint = self.config.endpoint.path,
            input_bytes = request.image.len(),
            "FLUX image edit"
        );

        let handle = self.submit(api_key, &body).await?;
        let ready = poll_for_result(&self.client, &self.config, api_key, handle).await?;
        self.respond(ready).await
    }
}
