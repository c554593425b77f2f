//! Core image provider trait definitions

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::image::{ImageEditRequest, ImageGenerationRequest};

/// A streamed OpenAI-style image response.
///
/// `content_length` is the exact number of bytes `body` will yield, computed
/// before the first byte is emitted so the routing layer can set the
/// `Content-Length` header ahead of the body.
pub struct ImageStream {
    pub content_length: u64,
    pub body: Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>,
}

impl std::fmt::Debug for ImageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStream")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Capability interface for image generation backends.
///
/// Each call owns its request end-to-end; implementations hold no mutable
/// state shared between concurrent requests. Dropping the returned future or
/// stream abandons any in-flight upstream calls.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Provider name for logging and error attribution
    fn name(&self) -> &'static str;

    /// Generate an image from a text prompt
    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageStream, ProviderError>;

    /// Edit an input image guided by a text prompt
    async fn edit_image(&self, request: ImageEditRequest) -> Result<ImageStream, ProviderError>;
}
