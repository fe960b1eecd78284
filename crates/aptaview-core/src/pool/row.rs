//! Materialization of aptamer pool rows from a report.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::report::{Bounds, ExperimentReport};

/// Derived metrics for one aptamer in one selection round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleMetrics {
    pub count: u64,
    pub frequency: f64,
    pub cpm: f64,
}

/// One row of the aptamer pool table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AptamerRow {
    pub id: u64,
    pub sequence: String,
    pub bounds: Option<Bounds>,
    /// Round -> metrics. Rounds that never observed this aptamer have
    /// no entry.
    pub cycles: BTreeMap<u32, CycleMetrics>,
}

impl AptamerRow {
    /// The randomized region of the sequence, when bounds are present
    /// and within range.
    pub fn randomized_region(&self) -> Option<&str> {
        let bounds = self.bounds?;
        let start = bounds.start_index as usize;
        let end = bounds.end_index as usize;
        if start > end {
            return None;
        }
        self.sequence.get(start..end)
    }

    /// Metrics for a round, if the aptamer was observed in it.
    pub fn metrics(&self, round: u32) -> Option<&CycleMetrics> {
        self.cycles.get(&round)
    }
}

/// Builds one row per `id_to_aptamer` entry, ascending by id.
///
/// Bounds are joined from `id_to_bounds` and may be absent. Frequency
/// and CPM come from each cycle's own total.
pub fn aptamer_rows(report: &ExperimentReport) -> Vec<AptamerRow> {
    report
        .id_to_aptamer
        .iter()
        .map(|(&id, sequence)| {
            let cycles = report
                .selection_cycles
                .iter()
                .filter_map(|cycle| {
                    cycle.counts.get(&id).map(|&count| {
                        let metrics = CycleMetrics {
                            count,
                            frequency: cycle.frequency(count),
                            cpm: cycle.cpm(count),
                        };
                        (cycle.round, metrics)
                    })
                })
                .collect();

            AptamerRow {
                id,
                sequence: sequence.clone(),
                bounds: report.id_to_bounds.get(&id).copied(),
                cycles,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SelectionCycle;

    fn report() -> ExperimentReport {
        let mut report = ExperimentReport::default();
        report.id_to_aptamer.insert(3, "ACGTACGT".to_string());
        report.id_to_aptamer.insert(7, "TTTTACGT".to_string());
        report.id_to_bounds.insert(
            3,
            Bounds {
                start_index: 2,
                end_index: 6,
            },
        );
        report.selection_cycles.push(SelectionCycle {
            name: "r1".to_string(),
            round: 1,
            total_size: 100,
            unique_size: 2,
            counts: [(3, 25), (7, 75)].into_iter().collect(),
            ..Default::default()
        });
        report.selection_cycles.push(SelectionCycle {
            name: "r2".to_string(),
            round: 2,
            total_size: 50,
            unique_size: 1,
            counts: [(3, 50)].into_iter().collect(),
            ..Default::default()
        });
        report
    }

    #[test]
    fn one_row_per_aptamer_ascending_by_id() {
        let rows = aptamer_rows(&report());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 3);
        assert_eq!(rows[1].id, 7);
    }

    #[test]
    fn metrics_are_exact() {
        let rows = aptamer_rows(&report());
        let metrics = rows[0].metrics(1).unwrap();
        assert_eq!(metrics.count, 25);
        assert_eq!(metrics.frequency, 0.25);
        assert_eq!(metrics.cpm, 250_000.0);
    }

    #[test]
    fn sparse_counts_leave_no_entry() {
        let rows = aptamer_rows(&report());
        // id 7 was not observed in round 2.
        assert!(rows[1].metrics(2).is_none());
        assert!(rows[0].metrics(2).is_some());
    }

    #[test]
    fn randomized_region_slices_by_bounds() {
        let rows = aptamer_rows(&report());
        assert_eq!(rows[0].randomized_region(), Some("GTAC"));
        assert_eq!(rows[1].randomized_region(), None);
    }

    #[test]
    fn out_of_range_bounds_yield_none() {
        let row = AptamerRow {
            id: 1,
            sequence: "ACGT".to_string(),
            bounds: Some(Bounds {
                start_index: 2,
                end_index: 9,
            }),
            cycles: BTreeMap::new(),
        };
        assert_eq!(row.randomized_region(), None);
    }
}
