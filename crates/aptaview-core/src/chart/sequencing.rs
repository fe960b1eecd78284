//! Sequencing data charts: region size distribution and per-position
//! nucleotide composition.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chart::spec::{Axis, AxisScale, AxisUnit, ChartSpec, Series};
use crate::report::{BASE_A, BASE_C, BASE_G, BASE_T, BASES};
use crate::report::{ExperimentReport, ReportMetadata, SelectionCycle};

/// Which nucleotide distribution a chart draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionSource {
    /// Raw forward reads of the selected cycle.
    Forward,
    /// Raw reverse reads; absent for single-end experiments.
    Reverse,
    /// Accepted reads of one randomized-region size bucket.
    Accepted { region_size: u32 },
}

/// Bar chart of how many accepted reads fall into each
/// randomized-region size, summed across all cycles.
///
/// Per size bucket the read total is the sum of base counts at
/// position 0. The x axis covers the dense range `0..=max_size + 4`;
/// sizes without reads plot 0. `Percentage` divides by the grand
/// total.
pub fn randomized_region_sizes_chart(
    metadata: &ReportMetadata,
    unit: AxisUnit,
    scale: AxisScale,
) -> ChartSpec {
    let mut totals: BTreeMap<u32, u64> = BTreeMap::new();
    let mut total: u64 = 0;

    for by_size in metadata.nucleotide_distribution_accepted.values() {
        for (&size, positions) in by_size {
            let Some(position_zero) = positions.get(&0) else {
                continue;
            };
            let sum: u64 = position_zero.values().sum();
            *totals.entry(size).or_insert(0) += sum;
            total += sum;
        }
    }

    let Some((&max_size, _)) = totals.last_key_value() else {
        return ChartSpec::empty();
    };

    let percentage = unit == AxisUnit::Percentage && total > 0;
    let sizes: Vec<u32> = (0..=max_size + 4).collect();
    let values: Vec<f64> = sizes
        .iter()
        .map(|size| {
            let raw = totals.get(size).copied().unwrap_or(0) as f64;
            if percentage {
                raw / total as f64 * 100.0
            } else {
                raw
            }
        })
        .collect();

    let y_label = match unit {
        AxisUnit::Count => "Frequency of Occurrence",
        AxisUnit::Percentage => "Percentage of Occurrence",
    };

    ChartSpec {
        title: None,
        x_axis: Axis::with_categories(
            "Randomized Region Size",
            sizes.iter().map(|s| s.to_string()).collect(),
        ),
        y_axis: Axis {
            scale,
            ..Axis::labeled(y_label)
        },
        series: vec![Series::bar(
            "Randomized Region Sizes in the Aptamer Pool",
            None,
            values,
        )],
        value_range: None,
    }
}

/// Four A/C/G/T line series over read position for one cycle.
///
/// `Percentage` divides each count by the cycle's `total_size`. A
/// missing distribution yields the empty spec; so does a present but
/// empty reverse distribution, which means the experiment had no
/// paired-end data.
pub fn nucleotide_distribution_chart(
    metadata: &ReportMetadata,
    cycle: &SelectionCycle,
    source: DistributionSource,
    unit: AxisUnit,
) -> ChartSpec {
    let (title, distribution) = match source {
        DistributionSource::Forward => (
            "Forward Reads Nucleotide Distribution (raw)".to_string(),
            metadata.nucleotide_distribution_forward.get(&cycle.name),
        ),
        DistributionSource::Reverse => (
            "Reverse Reads Nucleotide Distribution (raw)".to_string(),
            metadata
                .nucleotide_distribution_reverse
                .get(&cycle.name)
                .filter(|d| !d.is_empty()),
        ),
        DistributionSource::Accepted { region_size } => (
            format!("Randomized Region Nucleotide Distribution (filtered, {region_size} nt)"),
            metadata
                .nucleotide_distribution_accepted
                .get(&cycle.name)
                .and_then(|by_size| by_size.get(&region_size)),
        ),
    };
    let Some(distribution) = distribution else {
        return ChartSpec::empty();
    };

    let positions: Vec<u32> = distribution.keys().copied().collect();
    let series: Vec<Series> = BASES
        .iter()
        .map(|&(code, base)| {
            let values = positions
                .iter()
                .map(|pos| {
                    let raw = distribution[pos].get(&code).copied().unwrap_or(0) as f64;
                    match unit {
                        AxisUnit::Count => raw,
                        AxisUnit::Percentage if cycle.total_size > 0 => {
                            raw / cycle.total_size as f64 * 100.0
                        }
                        AxisUnit::Percentage => 0.0,
                    }
                })
                .collect();
            Series::line(base.to_string(), values)
        })
        .collect();

    let y_label = match unit {
        AxisUnit::Count => "Frequency",
        AxisUnit::Percentage => "Percentage",
    };

    ChartSpec {
        title: Some(title),
        x_axis: Axis::with_categories(
            "Nucleotide Index",
            positions.iter().map(|p| p.to_string()).collect(),
        ),
        y_axis: Axis::labeled(y_label),
        series,
        value_range: None,
    }
}

/// Read totals for one cycle, derived from the importer's quality
/// accumulators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleImportStats {
    pub round: u32,
    pub name: String,
    /// Forward reads seen by the importer, taken from the position-0
    /// accumulator.
    pub forward_reads: u64,
    /// Reads accepted into the cycle's pool.
    pub accepted_reads: u64,
    /// accepted / forward, in percent. 0 when nothing was read.
    pub acceptance_rate: f64,
}

/// Per-cycle import totals in round order.
pub fn cycle_import_stats(report: &ExperimentReport) -> Vec<CycleImportStats> {
    let mut cycles: Vec<&SelectionCycle> = report.selection_cycles.iter().collect();
    cycles.sort_by_key(|cycle| cycle.round);

    cycles
        .into_iter()
        .map(|cycle| {
            let forward_reads = report
                .metadata
                .quality_scores_forward
                .get(&cycle.name)
                .and_then(|by_pos| by_pos.get(&0))
                .map(|acc| acc.count)
                .unwrap_or(0);
            let acceptance_rate = if forward_reads == 0 {
                0.0
            } else {
                cycle.total_size as f64 / forward_reads as f64 * 100.0
            };
            CycleImportStats {
                round: cycle.round,
                name: cycle.name.clone(),
                forward_reads,
                accepted_reads: cycle.total_size,
                acceptance_rate,
            }
        })
        .collect()
}

/// Overall base percentages of a cycle's accepted pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BaseComposition {
    pub a: f64,
    pub c: f64,
    pub g: f64,
    pub t: f64,
}

/// Sums the accepted distribution of `cycle_name` across all region
/// sizes and positions, then expresses each base as a percentage.
/// Unknown cycles and empty pools come back all zero.
pub fn base_composition_summary(metadata: &ReportMetadata, cycle_name: &str) -> BaseComposition {
    let mut counts: BTreeMap<u8, u64> = BTreeMap::new();
    let mut total: u64 = 0;

    if let Some(by_size) = metadata.nucleotide_distribution_accepted.get(cycle_name) {
        for positions in by_size.values() {
            for bases in positions.values() {
                for (&code, &count) in bases {
                    *counts.entry(code).or_insert(0) += count;
                    total += count;
                }
            }
        }
    }

    if total == 0 {
        return BaseComposition::default();
    }

    let pct = |code: u8| counts.get(&code).copied().unwrap_or(0) as f64 / total as f64 * 100.0;
    BaseComposition {
        a: pct(BASE_A),
        c: pct(BASE_C),
        g: pct(BASE_G),
        t: pct(BASE_T),
    }
}
