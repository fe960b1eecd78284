//! Predictions gateway trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::prediction::model::{Bppm, ContextProbabilities, MfePrediction};

/// An abstract gateway for per-sequence structure predictions.
#[async_trait]
pub trait PredictionsGateway: Send + Sync {
    /// Minimum free energy structure of `sequence`.
    async fn mfe(&self, sequence: &str) -> Result<MfePrediction>;

    /// Base pair probability matrix of `sequence`.
    async fn bppm(&self, sequence: &str) -> Result<Bppm>;

    /// Structural context probabilities of `sequence`.
    async fn context_probabilities(&self, sequence: &str) -> Result<ContextProbabilities>;
}
