//! Observability setup
//!
//! Structured logging goes through `tracing`. This module installs the
//! subscriber once per process.

pub mod logging;

pub use logging::init_tracing;
