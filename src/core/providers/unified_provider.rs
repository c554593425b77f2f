//! Unified Provider Error Handling
//!
//! Single error type for every backend adapter in the gateway. The routing
//! layer maps each variant to an HTTP status with [`ProviderError::http_status`]
//! and decides retry behavior with [`ProviderError::is_retryable`].
//!
//! | Variant | Purpose | HTTP Status | Retryable |
//! |------|------|------------|--------|
//! | Configuration | Missing/invalid credentials | 500 | No |
//! | InvalidRequest | Client request rejected before any network call | 400 | No |
//! | Network | Connect/timeout establishing an upstream call | 504 | Yes |
//! | ApiError | Non-200 from the upstream provider | 502 | Depends on status |
//! | ResponseParsing | Malformed or unexpected success payload | 502 | No |
//! | ContentFiltered | Upstream refused the content on policy grounds | 422 | No |
//! | TaskNotFound | Job lookup retry budget exhausted | 502 | No |
//! | PollTimeout | Cumulative polling deadline exceeded | 504 | Yes |
//! | DownloadFailed | Source image fetch returned non-200 | 502 | Yes |
//! | SizeUnknown | Source image length could not be determined | 500 | No |
//! | Streaming | Transport failure mid-body | 502 | Yes |
//! | Serialization | Request/response (de)serialization failure | 500 | No |

/// Unified provider error type shared by all backend adapters.
///
/// Retryable conditions that the adapter handles internally (`Pending`
/// statuses, `Task not found` within budget, HTTP 202) never surface as a
/// value of this type; every variant here is terminal for its request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    /// Upstream answered with a non-success status code.
    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// A 200 response that does not carry the fields the protocol promises.
    #[error("Failed to parse {provider} response: {message}")]
    ResponseParsing {
        provider: &'static str,
        message: String,
    },

    /// Upstream moderation rejected the request. Surfaced distinctly so the
    /// caller can react differently from a generic upstream failure.
    #[error("Content filtered by {provider}: {reason}")]
    ContentFiltered {
        provider: &'static str,
        reason: String,
    },

    /// The job vanished upstream and stayed gone for the whole retry budget.
    #[error("Task not found on {provider} after {attempts} retries")]
    TaskNotFound {
        provider: &'static str,
        attempts: u32,
    },

    /// The overall polling deadline elapsed while the job was still running.
    #[error("Polling {provider} timed out after {elapsed_secs}s")]
    PollTimeout {
        provider: &'static str,
        elapsed_secs: u64,
    },

    #[error("Failed to download result from {provider} (status {status})")]
    DownloadFailed {
        provider: &'static str,
        status: u16,
    },

    #[error("Unable to determine result size for {provider}: {message}")]
    SizeUnknown {
        provider: &'static str,
        message: String,
    },

    /// Transport failure after the response body started flowing.
    #[error("Streaming error for {provider}: {message}")]
    Streaming {
        provider: &'static str,
        message: String,
    },

    #[error("Serialization error for {provider}: {message}")]
    Serialization {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Create configuration error
    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    /// Create invalid request error
    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    /// Create API error with status code
    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Create response parsing error
    pub fn response_parsing(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider,
            message: message.into(),
        }
    }

    /// Create content filtered error
    pub fn content_filtered(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            provider,
            reason: reason.into(),
        }
    }

    /// Create task not found error
    pub fn task_not_found(provider: &'static str, attempts: u32) -> Self {
        Self::TaskNotFound { provider, attempts }
    }

    /// Create poll timeout error
    pub fn poll_timeout(provider: &'static str, elapsed_secs: u64) -> Self {
        Self::PollTimeout {
            provider,
            elapsed_secs,
        }
    }

    /// Create download failure error
    pub fn download_failed(provider: &'static str, status: u16) -> Self {
        Self::DownloadFailed { provider, status }
    }

    /// Create size unknown error
    pub fn size_unknown(provider: &'static str, message: impl Into<String>) -> Self {
        Self::SizeUnknown {
            provider,
            message: message.into(),
        }
    }

    /// Create streaming error
    pub fn streaming_error(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Streaming {
            provider,
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Serialization {
            provider,
            message: message.into(),
        }
    }

    /// Get the provider name that caused this error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Configuration { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::Network { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::ResponseParsing { provider, .. }
            | Self::ContentFiltered { provider, .. }
            | Self::TaskNotFound { provider, .. }
            | Self::PollTimeout { provider, .. }
            | Self::DownloadFailed { provider, .. }
            | Self::SizeUnknown { provider, .. }
            | Self::Streaming { provider, .. }
            | Self::Serialization { provider, .. } => provider,
        }
    }

    /// Check if a fresh attempt of the whole request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. }
            | Self::PollTimeout { .. }
            | Self::DownloadFailed { .. }
            | Self::Streaming { .. } => true,

            Self::ApiError { status, .. } => matches!(*status, 429 | 500..=599),

            Self::Configuration { .. }
            | Self::InvalidRequest { .. }
            | Self::ResponseParsing { .. }
            | Self::ContentFiltered { .. }
            | Self::TaskNotFound { .. }
            | Self::SizeUnknown { .. }
            | Self::Serialization { .. } => false,
        }
    }

    /// Get the HTTP status code the gateway should answer the caller with
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Configuration { .. } => 500,
            Self::InvalidRequest { .. } => 400,
            Self::Network { .. } => 504,
            Self::ApiError { .. } => 502,
            Self::ResponseParsing { .. } => 502,
            Self::ContentFiltered { .. } => 422,
            Self::TaskNotFound { .. } => 502,
            Self::PollTimeout { .. } => 504,
            Self::DownloadFailed { .. } => 502,
            Self::SizeUnknown { .. } => 500,
            Self::Streaming { .. } => 502,
            Self::Serialization { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ProviderError::configuration("bfl", "no key").http_status(), 500);
        assert_eq!(ProviderError::invalid_request("bfl", "no image").http_status(), 400);
        assert_eq!(ProviderError::network("bfl", "refused").http_status(), 504);
        assert_eq!(ProviderError::api_error("bfl", 503, "down").http_status(), 502);
        assert_eq!(ProviderError::content_filtered("bfl", "moderated").http_status(), 422);
        assert_eq!(ProviderError::task_not_found("bfl", 5).http_status(), 502);
        assert_eq!(ProviderError::poll_timeout("bfl", 240).http_status(), 504);
    }

    #[test]
    fn test_retryability() {
        assert!(ProviderError::network("bfl", "refused").is_retryable());
        assert!(ProviderError::poll_timeout("bfl", 240).is_retryable());
        assert!(ProviderError::api_error("bfl", 500, "boom").is_retryable());
        assert!(!ProviderError::api_error("bfl", 422, "bad").is_retryable());
        assert!(!ProviderError::content_filtered("bfl", "moderated").is_retryable());
        assert!(!ProviderError::task_not_found("bfl", 5).is_retryable());
    }

    #[test]
    fn test_provider_accessor() {
        assert_eq!(ProviderError::size_unknown("bfl", "no header").provider(), "bfl");
    }
}
