//! Experiments gateway trait.
//!
//! Defines the interface to the backend's experiment endpoints,
//! decoupling the application layer from the HTTP client.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::experiment::create::CreateExperiment;
use crate::experiment::model::ExperimentSummary;
use crate::report::ExperimentReport;

/// Upload progress observer; called with a 0-100 percentage.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// An abstract gateway for experiment CRUD against the backend.
///
/// Implementations live in the API layer; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait ExperimentsGateway: Send + Sync {
    /// Lists all experiment summaries.
    async fn list(&self) -> Result<Vec<ExperimentSummary>>;

    /// Fetches the full report for one experiment.
    ///
    /// # Returns
    ///
    /// - `Ok(report)`: the experiment's report
    /// - `Err(AptaError::Api { status: 404, .. })`: unknown id
    async fn report(&self, id: &str) -> Result<ExperimentReport>;

    /// Creates an experiment, uploading its read files in one
    /// multipart request, and returns the created experiment's report.
    ///
    /// `progress` is invoked with 0-100 while the upload advances.
    async fn create(
        &self,
        spec: &CreateExperiment,
        progress: Option<ProgressCallback>,
    ) -> Result<ExperimentReport>;

    /// Deletes an experiment.
    async fn delete(&self, id: &str) -> Result<()>;
}
