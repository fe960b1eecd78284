pub mod model;

pub use model::{
    Accumulator, BASE_A, BASE_C, BASE_G, BASE_T, BASES, Bounds, ExperimentDetails,
    ExperimentReport, GeneralInformation, PositionBaseCounts, ReportMetadata, SelectionCycle,
    SequenceImportStatistics, SizedPositionBaseCounts,
};
