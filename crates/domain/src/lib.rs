//! # Predcache Domain
//!
//! Domain types, errors and configuration for the prediction cache.
//!
//! This crate contains:
//! - Prediction request/result types and request shapes
//! - Domain error types and Result definitions
//! - Configuration structures and their defaults
//!
//! ## Architecture
//! - No dependencies on other predcache crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
