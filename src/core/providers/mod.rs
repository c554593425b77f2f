//! Backend provider implementations

pub mod bfl;
pub mod unified_provider;

pub use bfl::FluxProvider;
pub use unified_provider::ProviderError;
