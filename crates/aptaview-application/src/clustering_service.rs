//! Cluster analysis state for one experiment at a time.

use std::sync::Arc;

use tokio::sync::RwLock;

use aptaview_core::cluster::{
    AptaClusterConfiguration, ClusterAnalysis, ClustersGateway, active_analysis,
    sort_newest_first,
};
use aptaview_core::error::Result;

#[derive(Default)]
struct ClusteringState {
    experiment_id: Option<String>,
    /// Kept sorted newest first.
    analyses: Vec<ClusterAnalysis>,
    loaded: bool,
    selected_analysis: Option<String>,
    selected_cluster: Option<u64>,
}

/// Caches the cluster analyses of the experiment under inspection and
/// tracks which analysis and cluster are selected.
///
/// The displayed analysis is the explicit selection while it still
/// exists, otherwise the newest one. Running a new analysis reloads
/// the list but leaves the selection alone.
pub struct ClusteringService {
    gateway: Arc<dyn ClustersGateway>,
    state: RwLock<ClusteringState>,
}

impl ClusteringService {
    pub fn new(gateway: Arc<dyn ClustersGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(ClusteringState::default()),
        }
    }

    /// Fetches the experiment's analyses, newest first.
    ///
    /// Switching to a different experiment drops the previous
    /// selections.
    pub async fn load(&self, experiment_id: &str) -> Result<()> {
        let mut analyses = self.gateway.list(experiment_id).await?;
        sort_newest_first(&mut analyses);
        tracing::debug!(
            "Loaded {} cluster analyses for experiment {}",
            analyses.len(),
            experiment_id
        );

        let mut state = self.state.write().await;
        if state.experiment_id.as_deref() != Some(experiment_id) {
            state.selected_analysis = None;
            state.selected_cluster = None;
        }
        state.experiment_id = Some(experiment_id.to_string());
        state.analyses = analyses;
        state.loaded = true;
        Ok(())
    }

    pub async fn ensure_loaded(&self, experiment_id: &str) -> Result<()> {
        {
            let state = self.state.read().await;
            if state.loaded && state.experiment_id.as_deref() == Some(experiment_id) {
                return Ok(());
            }
        }
        self.load(experiment_id).await
    }

    /// All analyses of the current experiment, newest first.
    pub async fn analyses(&self) -> Vec<ClusterAnalysis> {
        self.state.read().await.analyses.clone()
    }

    /// The analysis to display, if any exist.
    pub async fn active(&self) -> Option<ClusterAnalysis> {
        let state = self.state.read().await;
        active_analysis(&state.analyses, state.selected_analysis.as_deref()).cloned()
    }

    /// Selects an analysis and resets the cluster selection.
    pub async fn select_analysis(&self, analysis_id: &str) {
        let mut state = self.state.write().await;
        state.selected_analysis = Some(analysis_id.to_string());
        state.selected_cluster = None;
    }

    pub async fn select_cluster(&self, cluster_id: Option<u64>) {
        self.state.write().await.selected_cluster = cluster_id;
    }

    pub async fn selected_cluster(&self) -> Option<u64> {
        self.state.read().await.selected_cluster
    }

    /// Submits a clustering run and reloads the analysis list.
    ///
    /// On failure the error is logged and returned; the cached list
    /// keeps its last loaded state.
    pub async fn run(
        &self,
        experiment_id: &str,
        config: &AptaClusterConfiguration,
    ) -> Result<ClusterAnalysis> {
        let analysis = match self.gateway.create(experiment_id, config).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::error!("Failed to run clustering: {}", e);
                return Err(e);
            }
        };

        self.load(experiment_id).await?;
        Ok(analysis)
    }
}
