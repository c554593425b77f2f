//! # flux-gateway
//!
//! Backend adapter that lets an OpenAI-compatible gateway serve image
//! generation through the Black Forest Labs FLUX API. Inbound requests keep
//! the OpenAI shape; the adapter reconciles the requested size with FLUX
//! constraints, drives the asynchronous submit-then-poll job protocol, and
//! re-streams the finished image as an OpenAI response with its
//! `Content-Length` known before the first body byte.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flux_gateway::{FluxEndpoint, FluxProvider, ImageGenerationRequest, ImageProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads BFL_API_KEY (and optionally BFL_API_BASE) from the environment
//!     let provider = FluxProvider::from_env(FluxEndpoint::FLUX_PRO_1_1);
//!
//!     let request = ImageGenerationRequest::new("a cat astronaut", Some("16:9".into()));
//!     let response = provider.generate_image(request).await?;
//!
//!     // response.content_length goes in the Content-Length header;
//!     // response.body is the streamed JSON document.
//!     println!("streaming {} bytes", response.content_length);
//!     Ok(())
//! }
//! ```
//!
//! The HTTP server in front of this adapter, secret loading, and tracing
//! subscriber setup are the embedding application's concern.

pub mod core;

pub use crate::core::providers::bfl::{
    FluxConfig, FluxEndpoint, FluxProvider, JobHandle, JobProtocol, PollPolicy,
};
pub use crate::core::providers::unified_provider::ProviderError;
pub use crate::core::traits::provider::{ImageProvider, ImageStream};
pub use crate::core::types::image::{
    ImageData, ImageEditRequest, ImageGenerationRequest, ImageResponse,
};
