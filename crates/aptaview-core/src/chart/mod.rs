//! Chart transforms.
//!
//! Every transform is a pure function from report data to a
//! [`ChartSpec`]; missing or empty inputs yield `ChartSpec::empty()`
//! instead of an error.

pub mod family;
pub mod overview;
pub mod sequencing;
pub mod spec;
pub mod structure;

pub use family::{cluster_mutation_rates_chart, cluster_sequence_logo_chart};
pub use overview::{
    CycleStats, SINGLETON_CUTOFF_MAX, SINGLETON_CUTOFF_MIN, selection_cycle_stats,
    selection_cycles_chart,
};
pub use sequencing::{
    BaseComposition, CycleImportStats, DistributionSource, base_composition_summary,
    cycle_import_stats, nucleotide_distribution_chart, randomized_region_sizes_chart,
};
pub use spec::{
    Axis, AxisScale, AxisUnit, ChartSpec, HeatmapCell, Series, SeriesData, SeriesKind,
    StackSegment, ValueRange,
};
pub use structure::{bppm_heatmap_chart, context_probability_chart};
