//! Wire model for the per-experiment report served by the backend.
//!
//! Field names follow the backend's camelCase JSON. Integer-keyed JSON
//! objects (aptamer ids, positions, ASCII base codes) deserialize into
//! `BTreeMap` so iteration order is always ascending.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// position -> base (ASCII code) -> read count
pub type PositionBaseCounts = BTreeMap<u32, BTreeMap<u8, u64>>;

/// randomized-region size -> position -> base -> read count
pub type SizedPositionBaseCounts = BTreeMap<u32, PositionBaseCounts>;

/// ASCII codes of the four bases as they appear as JSON map keys.
pub const BASE_A: u8 = 65;
pub const BASE_C: u8 = 67;
pub const BASE_G: u8 = 71;
pub const BASE_T: u8 = 84;

/// The four bases in display order.
pub const BASES: [(u8, char); 4] = [
    (BASE_A, 'A'),
    (BASE_C, 'C'),
    (BASE_G, 'G'),
    (BASE_T, 'T'),
];

/// Full report for one experiment: details, per-cycle data and the
/// aptamer pool maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentReport {
    #[serde(default)]
    pub experiment_details: ExperimentDetails,
    #[serde(rename = "selectionCycleResponse", default)]
    pub selection_cycles: Vec<SelectionCycle>,
    #[serde(default)]
    pub metadata: ReportMetadata,
    /// Aptamer id -> full sequence (primers included).
    #[serde(default)]
    pub id_to_aptamer: BTreeMap<u64, String>,
    /// Aptamer id -> randomized-region window within the sequence.
    #[serde(default)]
    pub id_to_bounds: BTreeMap<u64, Bounds>,
}

impl ExperimentReport {
    /// The reference cycle used for cluster aggregation and the family
    /// charts: always the first reported selection cycle.
    pub fn reference_cycle(&self) -> Option<&SelectionCycle> {
        self.selection_cycles.first()
    }

    /// Distinct randomized-region sizes present in the accepted
    /// distribution, across all cycles, ascending.
    pub fn randomized_region_sizes(&self) -> Vec<u32> {
        let mut sizes: Vec<u32> = self
            .metadata
            .nucleotide_distribution_accepted
            .values()
            .flat_map(|by_size| by_size.keys().copied())
            .collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentDetails {
    #[serde(default)]
    pub general_information: GeneralInformation,
    /// Cycle name -> percentage of reads attributed to that cycle.
    #[serde(default)]
    pub selection_cycle_percentages: BTreeMap<String, f64>,
    #[serde(default)]
    pub sequence_import_statistics: SequenceImportStatistics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInformation {
    pub aptamer_size: u32,
    pub description: String,
    pub five_prime_primer: String,
    pub name: String,
    pub three_prime_primer: String,
}

/// Import pipeline counters reported by the backend parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceImportStatistics {
    pub contig_assembly_failure: u64,
    pub five_prime_error: u64,
    pub invalid_alphabet: u64,
    pub invalid_cycle: u64,
    pub three_prime_error: u64,
    pub total_accepted_reads: u64,
    pub total_primer_overlaps: u64,
    pub total_processed_reads: u64,
}

impl SequenceImportStatistics {
    /// Accepted reads as a percentage of processed reads.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_processed_reads == 0 {
            return 0.0;
        }
        self.total_accepted_reads as f64 / self.total_processed_reads as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Cycle name -> read position -> quality score accumulator.
    #[serde(default)]
    pub quality_scores_forward: BTreeMap<String, BTreeMap<u32, Accumulator>>,
    #[serde(default)]
    pub quality_scores_reverse: BTreeMap<String, BTreeMap<u32, Accumulator>>,
    /// Cycle name -> position -> base -> count, over raw reads.
    #[serde(default)]
    pub nucleotide_distribution_forward: BTreeMap<String, PositionBaseCounts>,
    #[serde(default)]
    pub nucleotide_distribution_reverse: BTreeMap<String, PositionBaseCounts>,
    /// Cycle name -> region size -> position -> base -> count, over
    /// reads accepted into the pool.
    #[serde(default)]
    pub nucleotide_distribution_accepted: BTreeMap<String, SizedPositionBaseCounts>,
}

/// One round of selection with its per-aptamer read counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCycle {
    pub name: String,
    pub round: u32,
    pub is_control_selection: bool,
    pub is_counter_selection: bool,
    #[serde(default)]
    pub barcode5_prime: Option<String>,
    #[serde(default)]
    pub barcode3_prime: Option<String>,
    pub total_size: u64,
    pub unique_size: u64,
    /// Aptamer id -> read count observed in this round.
    #[serde(default)]
    pub counts: BTreeMap<u64, u64>,
}

impl SelectionCycle {
    /// Neither a control nor a counter selection.
    pub fn is_positive(&self) -> bool {
        !self.is_control_selection && !self.is_counter_selection
    }

    /// Fraction of the round's total reads for a given count.
    pub fn frequency(&self, count: u64) -> f64 {
        if self.total_size == 0 {
            return 0.0;
        }
        count as f64 / self.total_size as f64
    }

    /// Counts per million for a given count.
    pub fn cpm(&self, count: u64) -> f64 {
        self.frequency(count) * 1_000_000.0
    }
}

/// Start (inclusive) and end (exclusive) of an aptamer's randomized
/// region within its full sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub start_index: u32,
    pub end_index: u32,
}

impl Bounds {
    pub fn len(&self) -> u32 {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Streaming statistics accumulator as serialized by the backend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accumulator {
    pub count: u64,
    pub mean: f64,
    pub stddev: f64,
    pub variance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_report() {
        let json = r#"{
            "experimentDetails": {
                "generalInformation": {
                    "aptamerSize": 40,
                    "description": "test run",
                    "fivePrimePrimer": "GGGAT",
                    "name": "exp",
                    "threePrimePrimer": "TTACG"
                },
                "selectionCyclePercentages": { "r1": 100.0 },
                "sequenceImportStatistics": {
                    "contigAssemblyFailure": 0,
                    "fivePrimeError": 2,
                    "invalidAlphabet": 1,
                    "invalidCycle": 0,
                    "threePrimeError": 3,
                    "totalAcceptedReads": 94,
                    "totalPrimerOverlaps": 0,
                    "totalProcessedReads": 100
                }
            },
            "selectionCycleResponse": [{
                "name": "r1",
                "round": 1,
                "isControlSelection": false,
                "isCounterSelection": false,
                "barcode5Prime": null,
                "barcode3Prime": null,
                "totalSize": 100,
                "uniqueSize": 10,
                "counts": { "7": 25, "3": 75 }
            }],
            "metadata": {
                "qualityScoresForward": {},
                "qualityScoresReverse": {},
                "nucleotideDistributionForward": {
                    "r1": { "0": { "65": 4, "84": 6 } }
                },
                "nucleotideDistributionReverse": {},
                "nucleotideDistributionAccepted": {
                    "r1": { "20": { "0": { "65": 10 } } }
                }
            },
            "idToAptamer": { "3": "ACGT", "7": "TTTT" },
            "idToBounds": { "3": { "startIndex": 1, "endIndex": 3 } }
        }"#;

        let report: ExperimentReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.id_to_aptamer.len(), 2);
        assert_eq!(report.id_to_aptamer[&3], "ACGT");
        assert_eq!(report.id_to_bounds[&3].len(), 2);
        assert_eq!(report.selection_cycles[0].counts[&7], 25);
        assert_eq!(
            report.metadata.nucleotide_distribution_forward["r1"][&0][&BASE_T],
            6
        );
        assert_eq!(
            report
                .experiment_details
                .sequence_import_statistics
                .total_processed_reads,
            100
        );
        assert_eq!(report.randomized_region_sizes(), vec![20]);
    }

    #[test]
    fn frequency_and_cpm() {
        let cycle = SelectionCycle {
            total_size: 200,
            ..Default::default()
        };
        assert_eq!(cycle.frequency(50), 0.25);
        assert_eq!(cycle.cpm(50), 250_000.0);
    }

    #[test]
    fn zero_total_yields_zero_frequency() {
        let cycle = SelectionCycle::default();
        assert_eq!(cycle.frequency(10), 0.0);
        assert_eq!(cycle.cpm(10), 0.0);
    }

    #[test]
    fn acceptance_rate_guards_zero() {
        let stats = SequenceImportStatistics::default();
        assert_eq!(stats.acceptance_rate(), 0.0);

        let stats = SequenceImportStatistics {
            total_accepted_reads: 94,
            total_processed_reads: 100,
            ..Default::default()
        };
        assert_eq!(stats.acceptance_rate(), 94.0);
    }

    #[test]
    fn tolerates_missing_optional_sections() {
        let report: ExperimentReport = serde_json::from_str(r#"{}"#).unwrap();
        assert!(report.selection_cycles.is_empty());
        assert!(report.id_to_aptamer.is_empty());
        assert!(report.reference_cycle().is_none());
    }
}
