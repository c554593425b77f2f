//! Result streaming and length pre-computation
//!
//! The adapter re-streams the upstream image as an OpenAI-style JSON
//! document without ever buffering the image: three envelope fragments
//! bracket a base64 payload that is encoded on the fly. The encoder keeps a
//! 0–2 byte carry across transport chunks so base64 groups stay aligned and
//! padding appears exactly once, at the true end of the payload, no matter
//! how the transport segments the bytes.

use std::pin::Pin;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use futures::Stream;
use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::CONTENT_LENGTH;
use tracing::error;

use crate::core::providers::unified_provider::ProviderError;

use super::provider::{PROVIDER, transport_error};

pub(crate) const JSON_MID: &str = "\", \"revised_prompt\": ";
pub(crate) const JSON_SUFFIX: &str = "\n        }\n    ]\n}\n";

/// Opening envelope fragment, up to and including the `b64_json` quote.
///
/// The creation timestamp is captured once per request, when the job has
/// resolved and the response is about to be assembled.
pub(crate) fn json_prefix(created: i64) -> String {
    format!("{{\n    \"created\": {created},\n    \"data\": [\n        {{\n            \"b64_json\": \"")
}

/// Streaming base64 encoder with group alignment across chunk boundaries.
///
/// Only complete 3-byte groups are encoded per chunk; 0–2 trailing bytes are
/// retained for the next arrival. Memory use is bounded by the transport
/// chunk size regardless of image size.
#[derive(Debug, Default)]
pub(crate) struct Base64Carry {
    carry: [u8; 2],
    len: usize,
}

impl Base64Carry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Encode every complete 3-byte group available, retaining the rest.
    pub(crate) fn encode_chunk(&mut self, chunk: &[u8]) -> String {
        let total = self.len + chunk.len();
        let complete = total - total % 3;
        if complete == 0 {
            // Not even one group yet; everything becomes carry
            self.carry[self.len..total].copy_from_slice(chunk);
            self.len = total;
            return String::new();
        }

        let mut groups = Vec::with_capacity(complete);
        groups.extend_from_slice(&self.carry[..self.len]);
        groups.extend_from_slice(&chunk[..complete - self.len]);

        let rest = &chunk[complete - self.len..];
        self.carry[..rest.len()].copy_from_slice(rest);
        self.len = rest.len();

        STANDARD.encode(&groups)
    }

    /// Encode the final partial group, with padding, if any bytes remain.
    pub(crate) fn finish(self) -> String {
        STANDARD.encode(&self.carry[..self.len])
    }
}

/// Length of `L` source bytes after base64 encoding, padding included.
pub(crate) fn base64_encoded_len(source_len: u64) -> u64 {
    4 * (source_len / 3) + if source_len % 3 != 0 { 4 } else { 0 }
}

/// Exact byte count of the full streamed response for a source image of
/// `source_len` bytes, computable before the image body is known.
pub(crate) fn envelope_length(source_len: u64, prefix: &str, escaped_prompt: &str) -> u64 {
    prefix.len() as u64
        + base64_encoded_len(source_len)
        + JSON_MID.len() as u64
        + escaped_prompt.len() as u64
        + JSON_SUFFIX.len() as u64
}

/// Probe the source URL for its byte length via a header-only request.
pub(crate) async fn probe_source_length(
    client: &reqwest::Client,
    url: &str,
) -> Result<u64, ProviderError> {
    let response = client.head(url).send().await.map_err(transport_error)?;
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or_else(|| {
            ProviderError::size_unknown(
                PROVIDER,
                "Source image reports no Content-Length for encoding",
            )
        })
}

/// Open the source download and wrap it in the streamed response envelope.
///
/// The download is opened (and its status checked) before the stream is
/// returned, so a failed fetch surfaces as an error rather than a broken
/// body. Dropping the stream closes the upstream connection.
pub(crate) async fn stream_image(
    client: &reqwest::Client,
    url: &str,
    prefix: String,
    escaped_prompt: String,
) -> Result<Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>, ProviderError> {
    let response = client.get(url).send().await.map_err(transport_error)?;

    let status = response.status();
    if status != StatusCode::OK {
        error!(status = status.as_u16(), "Failed to download generated image");
        return Err(ProviderError::download_failed(PROVIDER, status.as_u16()));
    }

    let stream = async_stream::stream! {
        yield Ok(Bytes::from(prefix));

        let mut carry = Base64Carry::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => {
                    let encoded = carry.encode_chunk(&chunk);
                    if !encoded.is_empty() {
                        yield Ok(Bytes::from(encoded));
                    }
                }
                Err(e) => {
                    error!("Source download interrupted: {e}");
                    yield Err(ProviderError::streaming_error(
                        PROVIDER,
                        format!("Source download interrupted: {e}"),
                    ));
                    return;
                }
            }
        }

        let tail = carry.finish();
        if !tail.is_empty() {
            yield Ok(Bytes::from(tail));
        }

        yield Ok(Bytes::from_static(JSON_MID.as_bytes()));
        yield Ok(Bytes::from(escaped_prompt));
        yield Ok(Bytes::from_static(JSON_SUFFIX.as_bytes()));
    };

    Ok(Box::pin(stream))
}
