//! Clients for external services the caches sit in front of

pub mod ml_service;

pub use ml_service::MlServiceClient;
