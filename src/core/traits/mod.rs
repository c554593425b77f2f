//! Core traits module
//!
//! Contains the abstract interfaces backends implement

pub mod provider;

pub use provider::{ImageProvider, ImageStream};
