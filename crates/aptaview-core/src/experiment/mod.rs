pub mod create;
pub mod filter;
pub mod gateway;
pub mod model;

pub use create::{
    CreateCycle, CreateExperiment, CycleFiles, Primers, RandomizedRegion, Sequencing,
    ValidationIssue,
};
pub use filter::{DateRange, ExperimentFilter, ListSort, StatusFilter, filter_experiments};
pub use gateway::{ExperimentsGateway, ProgressCallback};
pub use model::{ExperimentStatus, ExperimentSummary, FileFormat, ReadType};
