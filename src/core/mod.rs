//! Core functionality for the gateway adapter
//!
//! This module contains the core business logic and data structures.

pub mod providers;
pub mod traits;
pub mod types;
