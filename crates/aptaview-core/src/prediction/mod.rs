//! Structure prediction models and gateway.

pub mod gateway;
pub mod model;

pub use gateway::PredictionsGateway;
pub use model::{Bppm, ContextProbabilities, MfePrediction};
