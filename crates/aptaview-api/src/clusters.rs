//! HTTP implementation of the clusters gateway.

use std::sync::Arc;

use async_trait::async_trait;

use aptaview_core::cluster::{AptaClusterConfiguration, ClusterAnalysis, ClustersGateway};
use aptaview_core::error::{AptaError, Result};

use crate::backend::Backend;

pub struct HttpClustersGateway {
    backend: Arc<Backend>,
}

impl HttpClustersGateway {
    pub fn new(backend: Arc<Backend>) -> Self {
        Self { backend }
    }

    async fn clusters_url(&self, experiment_id: &str) -> Result<String> {
        self.backend
            .api_url(&format!("experiments/{experiment_id}/clusters"))
            .await
    }
}

#[async_trait]
impl ClustersGateway for HttpClustersGateway {
    async fn list(&self, experiment_id: &str) -> Result<Vec<ClusterAnalysis>> {
        let url = self.clusters_url(experiment_id).await?;
        let response = self
            .backend
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| AptaError::http(format!("cannot list cluster analyses: {e}")))?;
        self.backend.json(response).await
    }

    async fn get(&self, experiment_id: &str, analysis_id: &str) -> Result<ClusterAnalysis> {
        let url = format!("{}/{}", self.clusters_url(experiment_id).await?, analysis_id);
        let response = self
            .backend
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| AptaError::http(format!("cannot fetch cluster analysis: {e}")))?;
        self.backend.json(response).await
    }

    async fn create(
        &self,
        experiment_id: &str,
        config: &AptaClusterConfiguration,
    ) -> Result<ClusterAnalysis> {
        config.validate()?;
        let url = self.clusters_url(experiment_id).await?;
        tracing::info!(
            "Starting clustering for experiment {} (lsh dimension {})",
            experiment_id,
            config.lsh_dimension
        );

        let response = self
            .backend
            .client()
            .post(&url)
            .json(config)
            .send()
            .await
            .map_err(|e| AptaError::http(format!("cannot start clustering: {e}")))?;
        self.backend.json(response).await
    }
}
