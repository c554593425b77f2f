//! BFL provider configuration
//!
//! Endpoint presets and the per-request budgets. The endpoint (and with it
//! the submission body shape and job protocol generation) is selected by
//! static configuration, never inferred from upstream responses at runtime.

use std::time::Duration;

use url::Url;

use crate::core::providers::unified_provider::ProviderError;

use super::dimensions::{FLUX_PIXEL_CONSTRAINTS, ProviderConstraints};
use super::provider::PROVIDER;
use super::types::JobHandle;

/// How an endpoint expresses the output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMode {
    /// Explicit width/height fields, subject to [`ProviderConstraints`]
    Pixels,
    /// An aspect-ratio string, ratio terms unconstrained
    AspectRatio,
}

/// Which job-reference generation an endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobProtocol {
    /// Submission returns a fully-qualified `polling_url` to poll directly
    PollingUrl,
    /// Submission returns a bare `id`, polled at a fixed provider path with
    /// the id as a query parameter
    JobId { poll_path: &'static str },
}

/// A concrete FLUX endpoint the adapter can be pointed at.
#[derive(Debug, Clone, Copy)]
pub struct FluxEndpoint {
    pub path: &'static str,
    pub accept: &'static str,
    pub size_mode: SizeMode,
    pub protocol: JobProtocol,
    pub constraints: ProviderConstraints,
}

impl FluxEndpoint {
    /// FLUX 1.1 Pro text-to-image, pixel dimensions, polling-URL protocol.
    pub const FLUX_PRO_1_1: FluxEndpoint = FluxEndpoint {
        path: "v1/flux-pro-1.1",
        accept: "image/*",
        size_mode: SizeMode::Pixels,
        protocol: JobProtocol::PollingUrl,
        constraints: FLUX_PIXEL_CONSTRAINTS,
    };

    /// FLUX.1 Kontext Pro, aspect-ratio sizing, polling-URL protocol.
    /// Serves both generation and edit submissions.
    pub const FLUX_KONTEXT_PRO: FluxEndpoint = FluxEndpoint {
        path: "v1/flux-kontext-pro",
        accept: "application/json",
        size_mode: SizeMode::AspectRatio,
        protocol: JobProtocol::PollingUrl,
        constraints: FLUX_PIXEL_CONSTRAINTS,
    };

    /// FLUX 1.1 Pro against the legacy deployment that returns a bare job id
    /// and polls through `v1/get_result`.
    pub const FLUX_PRO_1_1_LEGACY: FluxEndpoint = FluxEndpoint {
        path: "v1/flux-pro-1.1",
        accept: "image/*",
        size_mode: SizeMode::Pixels,
        protocol: JobProtocol::JobId {
            poll_path: "v1/get_result",
        },
        constraints: FLUX_PIXEL_CONSTRAINTS,
    };
}

/// Retry/deadline budgets for the poll loop.
///
/// Three independent budgets can each terminate the operation first: the
/// call-level timeout on every request, the cumulative deadline, and the
/// task-not-found retry bound.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Sleep between polls while the job is pending
    pub interval: Duration,
    /// Overall wall-clock deadline for the whole loop
    pub deadline: Duration,
    /// Consecutive-independent bound on `Task not found` responses
    pub max_not_found: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            deadline: Duration::from_secs(240),
            max_not_found: 5,
        }
    }
}

/// BFL provider configuration.
#[derive(Debug, Clone)]
pub struct FluxConfig {
    /// API key sent as the `x-key` header
    pub api_key: Option<String>,
    /// API base URL
    pub api_base: String,
    /// Call-level timeout applied to submit and poll requests
    pub request_timeout: Duration,
    /// Endpoint this adapter instance targets
    pub endpoint: FluxEndpoint,
    /// Poll loop budgets
    pub poll: PollPolicy,
}

pub const DEFAULT_API_BASE: &str = "https://api.bfl.ai/";

impl FluxConfig {
    pub fn new(endpoint: FluxEndpoint) -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(600),
            endpoint,
            poll: PollPolicy::default(),
        }
    }

    /// Create configuration from environment variables
    pub fn from_env(endpoint: FluxEndpoint) -> Self {
        let mut config = Self::new(endpoint);

        if let Ok(api_key) = std::env::var("BFL_API_KEY") {
            config.api_key = Some(api_key);
        }

        if let Ok(api_base) = std::env::var("BFL_API_BASE") {
            config.api_base = api_base;
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.as_deref().unwrap_or("").is_empty() {
            return Err("BFL API key is not set".to_string());
        }
        Url::parse(&self.api_base).map_err(|e| format!("Invalid API base URL: {e}"))?;
        Ok(())
    }

    /// Get the API key, as a fatal configuration error when absent.
    ///
    /// Checked per call so a missing key is reported before any network
    /// traffic is issued on behalf of the request.
    pub fn api_key(&self) -> Result<&str, ProviderError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ProviderError::configuration(
                PROVIDER,
                "BFL API key is not set",
            )),
        }
    }

    /// Build the submission URL for the configured endpoint
    pub fn submit_url(&self) -> Result<Url, ProviderError> {
        self.join(self.endpoint.path)
    }

    /// Build the polling URL for a job handle.
    ///
    /// Polling-URL handles are used verbatim; job-id handles are combined
    /// with the endpoint's fixed poll path.
    pub fn poll_url(&self, handle: &JobHandle) -> Result<Url, ProviderError> {
        match handle {
            JobHandle::PollingUrl(raw) => Url::parse(raw).map_err(|e| {
                ProviderError::response_parsing(PROVIDER, format!("Invalid polling_url: {e}"))
            }),
            JobHandle::JobId(id) => {
                let JobProtocol::JobId { poll_path } = self.endpoint.protocol else {
                    return Err(ProviderError::response_parsing(
                        PROVIDER,
                        "Job id handle on a polling-url endpoint",
                    ));
                };
                let mut url = self.join(poll_path)?;
                url.query_pairs_mut().append_pair("id", id);
                Ok(url)
            }
        }
    }

    fn join(&self, path: &str) -> Result<Url, ProviderError> {
        let base = Url::parse(&self.api_base).map_err(|e| {
            ProviderError::configuration(PROVIDER, format!("Invalid API base URL: {e}"))
        })?;
        base.join(path).map_err(|e| {
            ProviderError::configuration(PROVIDER, format!("Invalid endpoint path: {e}"))
        })
    }
}
