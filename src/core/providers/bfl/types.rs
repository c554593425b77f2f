//! BFL wire types
//!
//! Submission bodies, the opaque job reference, and the poll response shape
//! of the Black Forest Labs API.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::image::{ImageEditRequest, ImageGenerationRequest};

use super::config::{FluxEndpoint, SizeMode};
use super::dimensions::{resolve_aspect_ratio, resolve_pixels};
use super::provider::PROVIDER;

/// Generation submission body for the pixel-based endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct FluxGenerationBody {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    pub prompt_upsampling: bool,
}

impl FluxGenerationBody {
    /// Build the submission body for a generation request, reconciling the
    /// client size string with the endpoint's size mode.
    pub fn from_request(request: &ImageGenerationRequest, endpoint: &FluxEndpoint) -> Self {
        // An absent size resolves to each mode's square default
        let size = request.size.as_deref().unwrap_or("");
        let mut body = Self {
            prompt: request.prompt.clone(),
            width: None,
            height: None,
            aspect_ratio: None,
            prompt_upsampling: true,
        };
        match endpoint.size_mode {
            SizeMode::Pixels => {
                let (width, height) = resolve_pixels(size, endpoint.constraints);
                body.width = Some(width);
                body.height = Some(height);
            }
            SizeMode::AspectRatio => {
                body.aspect_ratio = Some(resolve_aspect_ratio(size));
            }
        }
        body
    }
}

/// Edit submission body for the Kontext endpoints.
///
/// `aspect_ratio` is deliberately serialized as an explicit `null`: the
/// upstream infers the ratio from the input image.
#[derive(Debug, Clone, Serialize)]
pub struct FluxEditBody {
    pub prompt: String,
    pub input_image: String,
    pub aspect_ratio: Option<String>,
    pub output_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_tolerance: Option<i64>,
}

impl FluxEditBody {
    /// Build the submission body for an edit request.
    ///
    /// Fails fast with a client-error classification when no image is
    /// attached. Non-numeric `seed`/`safety_tolerance` form values are
    /// dropped, never an error.
    pub fn from_request(request: &ImageEditRequest) -> Result<Self, ProviderError> {
        if request.image.is_empty() {
            return Err(ProviderError::invalid_request(
                PROVIDER,
                "Missing required 'image' parameter",
            ));
        }

        Ok(Self {
            prompt: request.prompt.clone(),
            input_image: STANDARD.encode(&request.image),
            aspect_ratio: None,
            output_format: "png",
            seed: request.seed.as_deref().and_then(parse_form_int),
            safety_tolerance: request.safety_tolerance.as_deref().and_then(parse_form_int),
        })
    }
}

fn parse_form_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Opaque reference to an in-flight upstream job.
///
/// Generation A endpoints return a fully-qualified polling URL; generation B
/// endpoints return a bare id to combine with a fixed poll path.
#[derive(Debug, Clone)]
pub enum JobHandle {
    PollingUrl(String),
    JobId(String),
}

/// Successful submission response, either generation.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub polling_url: Option<String>,
    pub id: Option<String>,
}

/// One poll response from the upstream.
#[derive(Debug, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub status: String,
    pub result: Option<PollResult>,
}

#[derive(Debug, Deserialize)]
pub struct PollResult {
    pub sample: Option<String>,
    pub prompt: Option<String>,
}

/// Terminal outcome of a ready job.
///
/// The upstream may omit the revised prompt; `None` serializes as a JSON
/// `null` in the response envelope.
#[derive(Debug, Clone)]
pub struct ReadyResult {
    pub sample_url: String,
    pub revised_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_body_pixel_mode() {
        let request = ImageGenerationRequest::new("a cat", Some("16:9".to_string()));
        let body = FluxGenerationBody::from_request(&request, &FluxEndpoint::FLUX_PRO_1_1);
        assert_eq!(body.width, Some(1440));
        assert_eq!(body.height, Some(800));
        assert!(body.aspect_ratio.is_none());
        assert!(body.prompt_upsampling);

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("aspect_ratio").is_none());
    }

    #[test]
    fn test_generation_body_ratio_mode() {
        let request = ImageGenerationRequest::new("a cat", Some("1024x768".to_string()));
        let body = FluxGenerationBody::from_request(&request, &FluxEndpoint::FLUX_KONTEXT_PRO);
        assert_eq!(body.aspect_ratio.as_deref(), Some("4:3"));
        assert!(body.width.is_none());
    }

    #[test]
    fn test_generation_body_defaults_to_square() {
        let request = ImageGenerationRequest::new("a cat", None);
        let body = FluxGenerationBody::from_request(&request, &FluxEndpoint::FLUX_KONTEXT_PRO);
        assert_eq!(body.aspect_ratio.as_deref(), Some("1:1"));

        let body = FluxGenerationBody::from_request(&request, &FluxEndpoint::FLUX_PRO_1_1);
        assert_eq!(body.width, Some(1024));
        assert_eq!(body.height, Some(1024));
    }

    #[test]
    fn test_edit_body_requires_image() {
        let request = ImageEditRequest {
            image: Vec::new(),
            prompt: "add a hat".to_string(),
            seed: None,
            safety_tolerance: None,
        };
        let err = FluxEditBody::from_request(&request).unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_edit_body_drops_invalid_numeric_fields() {
        let request = ImageEditRequest {
            image: vec![1, 2, 3],
            prompt: "add a hat".to_string(),
            seed: Some("not-a-number".to_string()),
            safety_tolerance: Some("2".to_string()),
        };
        let body = FluxEditBody::from_request(&request).unwrap();
        assert_eq!(body.seed, None);
        assert_eq!(body.safety_tolerance, Some(2));
        assert_eq!(body.input_image, STANDARD.encode([1u8, 2, 3]));

        // The null aspect_ratio must survive serialization
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("aspect_ratio").unwrap().is_null());
        assert!(json.get("seed").is_none());
    }
}
