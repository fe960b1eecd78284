//! Application services over the gateway traits: the cached
//! experiment list and per-experiment clustering state.

pub mod clustering_service;
pub mod experiment_store;

pub use crate::clustering_service::ClusteringService;
pub use crate::experiment_store::ExperimentStore;
