//! HTTP implementation of the experiments gateway.
//!
//! Creation sends one multipart request: a `data` part with the JSON
//! payload, then one part per read file named
//! `forwardFiles[{roundName}]` or `reverseFiles[{roundName}]`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use aptaview_core::error::{AptaError, Result};
use aptaview_core::experiment::{
    CreateExperiment, ExperimentSummary, ExperimentsGateway, ProgressCallback,
};
use aptaview_core::report::ExperimentReport;

use crate::backend::Backend;

pub struct HttpExperimentsGateway {
    backend: Arc<Backend>,
}

impl HttpExperimentsGateway {
    pub fn new(backend: Arc<Backend>) -> Self {
        Self { backend }
    }

    async fn experiments_url(&self) -> Result<String> {
        self.backend.api_url("experiments").await
    }

    /// Loads one read file into a multipart part, reporting its size.
    async fn file_part(path: &Path) -> Result<(Part, u64)> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AptaError::io(format!("cannot read upload file {}: {}", path.display(), e))
        })?;
        let size = bytes.len() as u64;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("reads")
            .to_string();
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| AptaError::internal(format!("invalid mime type '{mime}': {e}")))?;
        Ok((part, size))
    }
}

fn report_progress(progress: &Option<ProgressCallback>, loaded: u64, total: u64) {
    if let Some(callback) = progress {
        let percent = if total == 0 {
            100
        } else {
            ((loaded.saturating_mul(100)) / total).min(100) as u8
        };
        callback(percent);
    }
}

#[async_trait]
impl ExperimentsGateway for HttpExperimentsGateway {
    async fn list(&self) -> Result<Vec<ExperimentSummary>> {
        let url = self.experiments_url().await?;
        let response = self
            .backend
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| AptaError::http(format!("cannot list experiments: {e}")))?;
        self.backend.json(response).await
    }

    async fn report(&self, id: &str) -> Result<ExperimentReport> {
        let url = format!("{}/{}", self.experiments_url().await?, id);
        let response = self
            .backend
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| AptaError::http(format!("cannot fetch experiment {id}: {e}")))?;
        self.backend.json(response).await
    }

    async fn create(
        &self,
        spec: &CreateExperiment,
        progress: Option<ProgressCallback>,
    ) -> Result<ExperimentReport> {
        let url = self.experiments_url().await?;

        let data = serde_json::to_string(spec)?;
        let data_part = Part::text(data)
            .mime_str("application/json")
            .map_err(|e| AptaError::internal(format!("invalid mime type: {e}")))?;
        let mut form = Form::new().part("data", data_part);

        let mut total: u64 = 0;
        for cycle in &spec.selection_cycles {
            total += tokio::fs::metadata(&cycle.files.forward)
                .await
                .map(|m| m.len())
                .unwrap_or(0);
            if let Some(reverse) = &cycle.files.reverse {
                total += tokio::fs::metadata(reverse).await.map(|m| m.len()).unwrap_or(0);
            }
        }

        let mut loaded: u64 = 0;
        report_progress(&progress, 0, total.max(1));

        for cycle in &spec.selection_cycles {
            let (part, size) = Self::file_part(&cycle.files.forward).await?;
            form = form.part(format!("forwardFiles[{}]", cycle.round_name), part);
            loaded += size;
            report_progress(&progress, loaded, total);

            if let Some(reverse) = &cycle.files.reverse {
                let (part, size) = Self::file_part(reverse).await?;
                form = form.part(format!("reverseFiles[{}]", cycle.round_name), part);
                loaded += size;
                report_progress(&progress, loaded, total);
            }
        }

        tracing::info!("Uploading experiment '{}' ({} bytes of reads)", spec.name, total);
        let response = self
            .backend
            .client()
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AptaError::http(format!("cannot create experiment: {e}")))?;

        let report = self.backend.json(response).await?;
        report_progress(&progress, 1, 1);
        Ok(report)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = format!("{}/{}", self.experiments_url().await?, id);
        let response = self
            .backend
            .client()
            .delete(&url)
            .send()
            .await
            .map_err(|e| AptaError::http(format!("cannot delete experiment {id}: {e}")))?;
        self.backend.succeed(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn progress_is_bytes_weighted_and_capped() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
        let progress = Some(callback);

        report_progress(&progress, 0, 200);
        report_progress(&progress, 50, 200);
        report_progress(&progress, 200, 200);
        report_progress(&progress, 300, 200);
        report_progress(&progress, 5, 0);

        assert_eq!(*seen.lock().unwrap(), vec![0, 25, 100, 100, 100]);
    }

    #[test]
    fn missing_callback_is_a_no_op() {
        report_progress(&None, 10, 100);
    }
}
