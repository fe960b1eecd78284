//! Cached experiment list with filtering, selection and CRUD
//! pass-through.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future;
use tokio::sync::RwLock;

use aptaview_core::error::Result;
use aptaview_core::experiment::{
    CreateExperiment, ExperimentFilter, ExperimentSummary, ExperimentsGateway, ProgressCallback,
    filter_experiments,
};
use aptaview_core::report::ExperimentReport;

#[derive(Default)]
struct StoreState {
    experiments: Vec<ExperimentSummary>,
    loaded: bool,
    filter: ExperimentFilter,
    selected: BTreeSet<String>,
}

/// Holds the fetched experiment list and the criteria applied to it.
///
/// The cache only changes through [`reload`](Self::reload); filter and
/// selection are local state layered over it. All views are snapshots,
/// not live references.
pub struct ExperimentStore {
    gateway: Arc<dyn ExperimentsGateway>,
    state: RwLock<StoreState>,
}

impl ExperimentStore {
    pub fn new(gateway: Arc<dyn ExperimentsGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Fetches the list from the backend and replaces the cache.
    pub async fn reload(&self) -> Result<()> {
        let experiments = self.gateway.list().await?;
        tracing::debug!("Loaded {} experiments", experiments.len());

        let mut state = self.state.write().await;
        state.experiments = experiments;
        state.loaded = true;
        Ok(())
    }

    /// Fetches the list only when it was never loaded.
    pub async fn ensure_loaded(&self) -> Result<()> {
        if self.state.read().await.loaded {
            return Ok(());
        }
        self.reload().await
    }

    /// The unfiltered cached list.
    pub async fn all(&self) -> Vec<ExperimentSummary> {
        self.state.read().await.experiments.clone()
    }

    /// The cached list with the current filter and sort applied.
    pub async fn filtered(&self) -> Vec<ExperimentSummary> {
        let state = self.state.read().await;
        filter_experiments(&state.experiments, &state.filter, Utc::now())
    }

    pub async fn filter(&self) -> ExperimentFilter {
        self.state.read().await.filter.clone()
    }

    pub async fn set_filter(&self, filter: ExperimentFilter) {
        self.state.write().await.filter = filter;
    }

    pub async fn reset_filter(&self) {
        self.state.write().await.filter = ExperimentFilter::default();
    }

    /// Adds or removes one id from the selection.
    pub async fn toggle_selection(&self, id: &str) {
        let mut state = self.state.write().await;
        if !state.selected.remove(id) {
            state.selected.insert(id.to_string());
        }
    }

    pub async fn select_all(&self, ids: impl IntoIterator<Item = String>) {
        self.state.write().await.selected.extend(ids);
    }

    pub async fn clear_selection(&self) {
        self.state.write().await.selected.clear();
    }

    pub async fn selected(&self) -> BTreeSet<String> {
        self.state.read().await.selected.clone()
    }

    pub async fn is_selected(&self, id: &str) -> bool {
        self.state.read().await.selected.contains(id)
    }

    /// Deletes one experiment, then reloads the list.
    ///
    /// On failure the error is logged and returned; the cache keeps
    /// its last successfully loaded state.
    pub async fn delete(&self, id: &str) -> Result<()> {
        if let Err(e) = self.gateway.delete(id).await {
            tracing::error!("Failed to delete experiment {}: {}", id, e);
            return Err(e);
        }
        self.state.write().await.selected.remove(id);
        self.reload().await
    }

    /// Deletes every selected experiment concurrently.
    ///
    /// The selection is cleared and the list reloaded afterwards even
    /// when some deletes failed; the first failure is returned.
    pub async fn delete_selected(&self) -> Result<()> {
        let ids: Vec<String> = {
            let state = self.state.read().await;
            state.selected.iter().cloned().collect()
        };
        if ids.is_empty() {
            return Ok(());
        }

        let results = future::join_all(ids.iter().map(|id| self.gateway.delete(id))).await;
        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            tracing::error!(
                "Failed to delete {} of {} selected experiments",
                failures,
                ids.len()
            );
        }

        self.state.write().await.selected.clear();
        let reloaded = self.reload().await;

        if let Some(first) = results.into_iter().find_map(Result::err) {
            return Err(first);
        }
        reloaded
    }

    /// Whether `name` is free, compared case-insensitively against the
    /// cache. `ignore_id` exempts one experiment, for renames.
    pub async fn is_name_available(&self, name: &str, ignore_id: Option<&str>) -> bool {
        let wanted = name.to_lowercase();
        !self.state.read().await.experiments.iter().any(|exp| {
            exp.name.to_lowercase() == wanted && Some(exp.id.as_str()) != ignore_id
        })
    }

    /// Validates the creation payload, uploads it with its read files,
    /// and reloads the list on success.
    pub async fn create(
        &self,
        spec: &CreateExperiment,
        progress: Option<ProgressCallback>,
    ) -> Result<ExperimentReport> {
        spec.ensure_valid()?;

        let report = self.gateway.create(spec, progress).await?;
        tracing::info!("Created experiment '{}'", spec.name);
        self.reload().await?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use uuid::Uuid;

    use aptaview_core::error::AptaError;
    use aptaview_core::experiment::{
        CreateCycle, CycleFiles, ExperimentStatus, FileFormat, Primers, RandomizedRegion,
        ReadType, Sequencing,
    };

    use super::*;

    struct FakeGateway {
        experiments: Mutex<Vec<ExperimentSummary>>,
        failing_deletes: BTreeSet<String>,
        list_calls: AtomicUsize,
        create_calls: AtomicUsize,
    }

    impl FakeGateway {
        fn with(names: &[&str]) -> Self {
            let experiments = names
                .iter()
                .enumerate()
                .map(|(i, name)| ExperimentSummary {
                    id: format!("id-{name}"),
                    name: name.to_string(),
                    description: None,
                    status: ExperimentStatus::Completed,
                    created_at: chrono::Utc
                        .with_ymd_and_hms(2024, 6, 1 + i as u32, 12, 0, 0)
                        .unwrap(),
                })
                .collect();
            Self {
                experiments: Mutex::new(experiments),
                failing_deletes: BTreeSet::new(),
                list_calls: AtomicUsize::new(0),
                create_calls: AtomicUsize::new(0),
            }
        }

        fn failing_on(mut self, id: &str) -> Self {
            self.failing_deletes.insert(id.to_string());
            self
        }
    }

    #[async_trait]
    impl ExperimentsGateway for FakeGateway {
        async fn list(&self) -> Result<Vec<ExperimentSummary>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.experiments.lock().unwrap().clone())
        }

        async fn report(&self, id: &str) -> Result<ExperimentReport> {
            let _ = id;
            Ok(ExperimentReport::default())
        }

        async fn create(
            &self,
            spec: &CreateExperiment,
            progress: Option<ProgressCallback>,
        ) -> Result<ExperimentReport> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(callback) = progress {
                callback(100);
            }
            self.experiments.lock().unwrap().push(ExperimentSummary {
                id: Uuid::new_v4().to_string(),
                name: spec.name.clone(),
                description: None,
                status: ExperimentStatus::Running,
                created_at: chrono::Utc::now(),
            });
            Ok(ExperimentReport::default())
        }

        async fn delete(&self, id: &str) -> Result<()> {
            if self.failing_deletes.contains(id) {
                return Err(AptaError::api(500, "backend refused"));
            }
            self.experiments.lock().unwrap().retain(|exp| exp.id != id);
            Ok(())
        }
    }

    fn store_over(gateway: FakeGateway) -> (Arc<FakeGateway>, ExperimentStore) {
        let gateway = Arc::new(gateway);
        let store = ExperimentStore::new(gateway.clone());
        (gateway, store)
    }

    fn creation_spec(name: &str) -> CreateExperiment {
        CreateExperiment {
            name: name.to_string(),
            description: String::new(),
            sequencing: Sequencing {
                is_demultiplexed: true,
                read_type: ReadType::SingleEnd,
                file_format: FileFormat::Fastq,
                primers: Primers {
                    five_prime: "GGGAGGACGAUGCGG".to_string(),
                    three_prime: None,
                },
                randomized_region: RandomizedRegion::Exact { exact_length: 40 },
            },
            selection_cycles: vec![CreateCycle {
                round_number: 1,
                round_name: "r1".to_string(),
                is_control: false,
                is_counter_selection: false,
                files: CycleFiles {
                    forward: PathBuf::from("/data/r1.fastq"),
                    reverse: None,
                },
            }],
        }
    }

    #[tokio::test]
    async fn ensure_loaded_fetches_only_once() {
        let (gateway, store) = store_over(FakeGateway::with(&["a", "b"]));

        store.ensure_loaded().await.unwrap();
        store.ensure_loaded().await.unwrap();

        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.all().await.len(), 2);
    }

    #[tokio::test]
    async fn filtered_applies_search_over_the_cache() {
        let (_, store) = store_over(FakeGateway::with(&["Thrombin", "Control"]));
        store.reload().await.unwrap();

        store
            .set_filter(ExperimentFilter {
                search: "throm".to_string(),
                ..Default::default()
            })
            .await;

        let names: Vec<String> = store.filtered().await.into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Thrombin".to_string()]);

        store.reset_filter().await;
        assert_eq!(store.filtered().await.len(), 2);
    }

    #[tokio::test]
    async fn delete_reloads_and_drops_the_row() {
        let (gateway, store) = store_over(FakeGateway::with(&["a", "b"]));
        store.reload().await.unwrap();
        store.toggle_selection("id-a").await;

        store.delete("id-a").await.unwrap();

        assert!(store.all().await.iter().all(|e| e.id != "id-a"));
        assert!(!store.is_selected("id-a").await);
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_cache() {
        let (gateway, store) = store_over(FakeGateway::with(&["a"]).failing_on("id-a"));
        store.reload().await.unwrap();

        let result = store.delete("id-a").await;
        assert!(result.is_err());
        assert_eq!(store.all().await.len(), 1);
        // Only the initial load hit the gateway.
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn delete_selected_reloads_even_on_partial_failure() {
        let (gateway, store) = store_over(FakeGateway::with(&["a", "b", "c"]).failing_on("id-b"));
        store.reload().await.unwrap();
        store
            .select_all(["id-a".to_string(), "id-b".to_string()])
            .await;

        let result = store.delete_selected().await;
        assert!(result.is_err());

        // The failing one survives, the other is gone, selection reset.
        let ids: Vec<String> = store.all().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["id-b".to_string(), "id-c".to_string()]);
        assert!(store.selected().await.is_empty());
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn delete_selected_without_selection_is_a_no_op() {
        let (gateway, store) = store_over(FakeGateway::with(&["a"]));
        store.reload().await.unwrap();

        store.delete_selected().await.unwrap();
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn name_availability_is_case_insensitive() {
        let (_, store) = store_over(FakeGateway::with(&["Thrombin"]));
        store.reload().await.unwrap();

        assert!(!store.is_name_available("THROMBIN", None).await);
        assert!(store.is_name_available("THROMBIN", Some("id-Thrombin")).await);
        assert!(store.is_name_available("fresh", None).await);
    }

    #[tokio::test]
    async fn create_validates_before_calling_the_gateway() {
        let (gateway, store) = store_over(FakeGateway::with(&[]));
        store.reload().await.unwrap();

        let mut invalid = creation_spec("x");
        invalid.name = "  ".to_string();
        assert!(store.create(&invalid, None).await.is_err());
        assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 0);

        store.create(&creation_spec("SELEX 9"), None).await.unwrap();
        assert_eq!(gateway.create_calls.load(Ordering::SeqCst), 1);
        assert!(store.all().await.iter().any(|e| e.name == "SELEX 9"));
    }

    #[tokio::test]
    async fn create_forwards_the_progress_callback() {
        let (_, store) = store_over(FakeGateway::with(&[]));
        store.reload().await.unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));

        store
            .create(&creation_spec("SELEX 10"), Some(callback))
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }
}
