//! Composition root: every service is constructed once here and
//! passed down explicitly.

use std::sync::Arc;

use anyhow::Result;

use aptaview_api::{Backend, HttpClustersGateway, HttpExperimentsGateway, HttpPredictionsGateway};
use aptaview_application::{ClusteringService, ExperimentStore};
use aptaview_core::prediction::PredictionsGateway;
use aptaview_infrastructure::{AptaviewPaths, SettingsService};

/// Wired application services shared by all subcommands.
pub struct AppContext {
    pub settings: Arc<SettingsService>,
    pub experiments: Arc<HttpExperimentsGateway>,
    pub predictions: Arc<dyn PredictionsGateway>,
    pub store: ExperimentStore,
    pub clustering: ClusteringService,
}

impl AppContext {
    /// Builds the full service graph over the persisted settings.
    pub fn init() -> Result<Self> {
        let settings = Arc::new(SettingsService::new(AptaviewPaths::settings_file()?));
        let backend = Arc::new(Backend::new(settings.clone()));

        let experiments = Arc::new(HttpExperimentsGateway::new(backend.clone()));
        let clusters = Arc::new(HttpClustersGateway::new(backend.clone()));
        let predictions = Arc::new(HttpPredictionsGateway::new(backend));

        let store = ExperimentStore::new(experiments.clone());
        let clustering = ClusteringService::new(clusters);

        Ok(Self {
            settings,
            experiments,
            predictions,
            store,
            clustering,
        })
    }
}
