//! Core type definition module
//!
//! Contains the request and response data structures shared across backends

pub mod image;

pub use image::{ImageData, ImageEditRequest, ImageGenerationRequest, ImageResponse};
