//! HTTP implementation of the predictions gateway.
//!
//! All three endpoints take the sequence as a query parameter and run
//! the prediction synchronously on the backend.

use std::sync::Arc;

use async_trait::async_trait;

use aptaview_core::error::{AptaError, Result};
use aptaview_core::prediction::{Bppm, ContextProbabilities, MfePrediction, PredictionsGateway};

use crate::backend::Backend;

pub struct HttpPredictionsGateway {
    backend: Arc<Backend>,
}

impl HttpPredictionsGateway {
    pub fn new(backend: Arc<Backend>) -> Self {
        Self { backend }
    }

    async fn predict<T>(&self, endpoint: &str, sequence: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.backend.api_url(&format!("predictions/{endpoint}")).await?;
        let response = self
            .backend
            .client()
            .get(&url)
            .query(&[("sequence", sequence)])
            .send()
            .await
            .map_err(|e| AptaError::http(format!("cannot fetch {endpoint} prediction: {e}")))?;
        self.backend.json(response).await
    }
}

#[async_trait]
impl PredictionsGateway for HttpPredictionsGateway {
    async fn mfe(&self, sequence: &str) -> Result<MfePrediction> {
        self.predict("mfe", sequence).await
    }

    async fn bppm(&self, sequence: &str) -> Result<Bppm> {
        self.predict("bppm", sequence).await
    }

    async fn context_probabilities(&self, sequence: &str) -> Result<ContextProbabilities> {
        self.predict("context-probabilities", sequence).await
    }
}
