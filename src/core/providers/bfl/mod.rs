//! Black Forest Labs FLUX provider
//!
//! Adapts OpenAI-style image generation and edit requests to the FLUX
//! submit-then-poll API and re-streams the result as an OpenAI response.

pub mod config;
pub mod dimensions;
pub mod poll;
pub mod provider;
pub mod stream;
pub mod types;

pub use config::{FluxConfig, FluxEndpoint, JobProtocol, PollPolicy, SizeMode};
pub use dimensions::{FLUX_PIXEL_CONSTRAINTS, ProviderConstraints};
pub use provider::FluxProvider;
pub use types::{JobHandle, ReadyResult};
