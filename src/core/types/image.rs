//! Image generation request and response types
//!
//! OpenAI-compatible shapes as the routing layer hands them to a backend
//! adapter, already authenticated and routed.

use serde::{Deserialize, Serialize};

/// Image generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    /// Image description prompt
    pub prompt: String,
    /// Model name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Image size, either dimensions ("1024x1024") or an aspect ratio ("16:9")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Number of images to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// Response format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    /// User ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ImageGenerationRequest {
    /// Minimal request with just a prompt and an optional size
    pub fn new(prompt: impl Into<String>, size: Option<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            size,
            n: None,
            response_format: None,
            user: None,
        }
    }
}

/// Image edit request
///
/// The routing layer parses the multipart form; optional numeric fields
/// arrive as raw form strings and are validated by the adapter.
#[derive(Debug, Clone)]
pub struct ImageEditRequest {
    /// Input image bytes from the multipart `image` field
    pub image: Vec<u8>,
    /// Image description prompt
    pub prompt: String,
    /// Optional seed form field, not yet parsed
    pub seed: Option<String>,
    /// Optional safety tolerance form field, not yet parsed
    pub safety_tolerance: Option<String>,
}

/// Image data entry in an OpenAI-style response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// Buffered OpenAI-style image response
///
/// Streaming adapters emit this document piecewise instead; see the envelope
/// construction in the provider's stream module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub created: i64,
    pub data: Vec<ImageData>,
}
