//! Overview charts: composition of the positive selection cycles.

use serde::Serialize;

use crate::chart::spec::{Axis, ChartSpec, Series};
use crate::report::{ExperimentReport, SelectionCycle};

pub const SINGLETON_CUTOFF_MIN: u64 = 1;
pub const SINGLETON_CUTOFF_MAX: u64 = 100_000_000;

/// Composition percentages of one positive selection cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub label: String,
    /// unique / total reads, in percent.
    pub unique_pct: f64,
    /// Share of distinct aptamers at or below the cutoff.
    pub singleton_pct: f64,
    /// Share of distinct aptamers above the cutoff.
    pub enriched_pct: f64,
}

/// Stats for every positive cycle (neither control nor counter
/// selection), ascending by round.
///
/// An aptamer whose read count exceeds the cutoff counts as enriched,
/// the rest as singletons; both shares are over `unique_size`. The
/// cutoff is clamped to `1..=100_000_000`. Zero denominators yield
/// 0.0.
pub fn selection_cycle_stats(report: &ExperimentReport, singleton_cutoff: u64) -> Vec<CycleStats> {
    let cutoff = singleton_cutoff.clamp(SINGLETON_CUTOFF_MIN, SINGLETON_CUTOFF_MAX);

    let mut cycles: Vec<&SelectionCycle> = report
        .selection_cycles
        .iter()
        .filter(|cycle| cycle.is_positive())
        .collect();
    cycles.sort_by_key(|cycle| cycle.round);

    cycles
        .into_iter()
        .map(|cycle| cycle_stats(cycle, cutoff))
        .collect()
}

fn cycle_stats(cycle: &SelectionCycle, cutoff: u64) -> CycleStats {
    let over_unique = |n: u64| {
        if cycle.unique_size == 0 {
            0.0
        } else {
            n as f64 / cycle.unique_size as f64 * 100.0
        }
    };

    let enriched = cycle.counts.values().filter(|&&count| count > cutoff).count() as u64;
    let singletons = cycle.counts.len() as u64 - enriched;

    let unique_pct = if cycle.total_size == 0 {
        0.0
    } else {
        cycle.unique_size as f64 / cycle.total_size as f64 * 100.0
    };

    CycleStats {
        label: format!("Round {} ({})", cycle.round, cycle.name),
        unique_pct,
        singleton_pct: over_unique(singletons),
        enriched_pct: over_unique(enriched),
    }
}

/// The "Positive Selection Cycles" grouped bar chart.
pub fn selection_cycles_chart(report: &ExperimentReport, singleton_cutoff: u64) -> ChartSpec {
    let stats = selection_cycle_stats(report, singleton_cutoff);
    if stats.is_empty() {
        return ChartSpec::empty();
    }

    let labels = stats.iter().map(|s| s.label.clone()).collect();
    let column = |f: fn(&CycleStats) -> f64| -> Vec<f64> { stats.iter().map(f).collect() };

    ChartSpec {
        title: Some("Positive Selection Cycles".to_string()),
        x_axis: Axis::with_categories("Cycle Number/Name", labels),
        y_axis: Axis {
            min: Some(0.0),
            max: Some(100.0),
            ..Axis::labeled("Percentage")
        },
        series: vec![
            Series::bar("Singletons", Some("#f26c22"), column(|s| s.singleton_pct)),
            Series::bar("Enriched Species", Some("#f9a825"), column(|s| s.enriched_pct)),
            Series::bar("Unique Fraction", Some("#43a047"), column(|s| s.unique_pct)),
        ],
        value_range: None,
    }
}
