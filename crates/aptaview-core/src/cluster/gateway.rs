//! Clusters gateway trait.

use async_trait::async_trait;

use crate::cluster::model::{AptaClusterConfiguration, ClusterAnalysis};
use crate::error::Result;

/// An abstract gateway for cluster analyses of one experiment.
#[async_trait]
pub trait ClustersGateway: Send + Sync {
    /// Lists all analyses run for the experiment, in backend order.
    async fn list(&self, experiment_id: &str) -> Result<Vec<ClusterAnalysis>>;

    /// Fetches one analysis by id.
    async fn get(&self, experiment_id: &str, analysis_id: &str) -> Result<ClusterAnalysis>;

    /// Submits a clustering run and returns the completed analysis.
    async fn create(
        &self,
        experiment_id: &str,
        config: &AptaClusterConfiguration,
    ) -> Result<ClusterAnalysis>;
}
