//! Domain types and models

pub mod prediction;
pub mod request;

pub use prediction::{PredictionRequest, PredictionResult};
pub use request::RequestShape;
