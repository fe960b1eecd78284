//! Family analysis charts: sequence logo and mutation rates of one
//! cluster's members.

use crate::chart::spec::{Axis, ChartSpec, Series};
use crate::pool::AptamerRow;
use crate::report::{BASES, SelectionCycle};

/// Weighted per-position base profile of a cluster, aligned on the
/// seed's randomized window.
struct BaseProfile {
    window: usize,
    /// `counts[pos][base_index]`, weighted by reference counts.
    counts: Vec<[f64; 4]>,
    total_weight: f64,
}

fn base_index(byte: u8) -> Option<usize> {
    BASES.iter().position(|&(code, _)| code == byte)
}

/// The member with the highest reference-cycle count; first wins on
/// ties.
fn seed_row<'a>(members: &'a [AptamerRow], reference: &SelectionCycle) -> Option<&'a AptamerRow> {
    let mut seed: Option<&AptamerRow> = None;
    let mut best = 0;
    for row in members {
        let count = reference.counts.get(&row.id).copied().unwrap_or(0);
        if seed.is_none() || count > best {
            seed = Some(row);
            best = count;
        }
    }
    seed
}

/// Accumulates reference-weighted base counts over all members whose
/// randomized window is as long as the seed's. With `only_mutations`,
/// a member's base contributes only where it differs from the seed.
fn base_profile(
    members: &[AptamerRow],
    reference: &SelectionCycle,
    only_mutations: bool,
) -> Option<BaseProfile> {
    let seed = seed_row(members, reference)?;
    let seed_region = seed.randomized_region()?.as_bytes().to_vec();
    let window = seed_region.len();
    if window == 0 {
        return None;
    }

    let mut counts = vec![[0.0; 4]; window];
    let mut total_weight = 0.0;

    for row in members {
        let Some(region) = row.randomized_region() else {
            continue;
        };
        if region.len() != window {
            continue;
        }
        let weight = reference.counts.get(&row.id).copied().unwrap_or(0) as f64;
        total_weight += weight;

        for (pos, byte) in region.bytes().enumerate() {
            if only_mutations && byte == seed_region[pos] {
                continue;
            }
            if let Some(index) = base_index(byte) {
                counts[pos][index] += weight;
            }
        }
    }

    if total_weight <= 0.0 {
        return None;
    }
    Some(BaseProfile {
        window,
        counts,
        total_weight,
    })
}

fn stacked_base_series(frequencies: &[[f64; 4]]) -> Vec<Series> {
    BASES
        .iter()
        .enumerate()
        .map(|(index, &(_, base))| {
            Series::stacked_bar(
                base.to_string(),
                None,
                frequencies.iter().map(|column| column[index]).collect(),
            )
        })
        .collect()
}

fn position_axis(window: usize) -> Axis {
    Axis::with_categories(
        "Sequence Position",
        (1..=window).map(|p| p.to_string()).collect(),
    )
}

/// Sequence logo of one cluster.
///
/// Per position and base, the members' reference counts accumulate,
/// normalized first by the summed weights and then by the chart-wide
/// maximum so the tallest base reaches 1.0. Empty when the cluster
/// has no members with a usable window or no reference reads.
pub fn cluster_sequence_logo_chart(
    members: &[AptamerRow],
    reference: Option<&SelectionCycle>,
) -> ChartSpec {
    let Some(reference) = reference else {
        return ChartSpec::empty();
    };
    let Some(profile) = base_profile(members, reference, false) else {
        return ChartSpec::empty();
    };

    let mut frequencies = profile.counts;
    for column in &mut frequencies {
        for value in column {
            *value /= profile.total_weight;
        }
    }
    let max = frequencies
        .iter()
        .flat_map(|column| column.iter().copied())
        .fold(0.0, f64::max);
    if max <= 0.0 {
        return ChartSpec::empty();
    }
    for column in &mut frequencies {
        for value in column {
            *value /= max;
        }
    }

    ChartSpec {
        title: Some("Cluster Sequence Logo".to_string()),
        x_axis: position_axis(profile.window),
        y_axis: Axis {
            min: Some(0.0),
            ..Axis::labeled("Relative Frequency")
        },
        series: stacked_base_series(&frequencies),
        value_range: None,
    }
}

/// Mutation rates of one cluster relative to its seed.
///
/// Same accumulation as the logo but only where a member's base
/// differs from the seed's, normalized by the summed weights alone.
pub fn cluster_mutation_rates_chart(
    members: &[AptamerRow],
    reference: Option<&SelectionCycle>,
) -> ChartSpec {
    let Some(reference) = reference else {
        return ChartSpec::empty();
    };
    let Some(profile) = base_profile(members, reference, true) else {
        return ChartSpec::empty();
    };

    let mut rates = profile.counts;
    for column in &mut rates {
        for value in column {
            *value /= profile.total_weight;
        }
    }

    ChartSpec {
        title: Some("Cluster Mutation Rates".to_string()),
        x_axis: position_axis(profile.window),
        y_axis: Axis {
            min: Some(0.0),
            max: Some(1.0),
            ..Axis::labeled("Mutation Rate")
        },
        series: stacked_base_series(&rates),
        value_range: None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::chart::spec::SeriesData;
    use crate::report::Bounds;

    fn member(id: u64, sequence: &str, bounds: Option<(u32, u32)>) -> AptamerRow {
        AptamerRow {
            id,
            sequence: sequence.to_string(),
            bounds: bounds.map(|(start_index, end_index)| Bounds {
                start_index,
                end_index,
            }),
            cycles: BTreeMap::new(),
        }
    }

    fn reference(counts: &[(u64, u64)]) -> SelectionCycle {
        SelectionCycle {
            name: "r1".to_string(),
            round: 1,
            total_size: counts.iter().map(|&(_, c)| c).sum(),
            unique_size: counts.len() as u64,
            counts: counts.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn series_values(chart: &ChartSpec, name: &str) -> Vec<f64> {
        let series = chart.series.iter().find(|s| s.name == name).unwrap();
        match &series.data {
            SeriesData::Values(v) => v.clone(),
            other => panic!("expected values, got {other:?}"),
        }
    }

    #[test]
    fn seed_is_first_highest_count_member() {
        let members = vec![
            member(1, "AAAA", Some((0, 4))),
            member(2, "CCCC", Some((0, 4))),
            member(3, "GGGG", Some((0, 4))),
        ];
        // Members 1 and 3 tie; the first wins.
        let reference = reference(&[(1, 10), (2, 3), (3, 10)]);
        assert_eq!(seed_row(&members, &reference).unwrap().id, 1);
    }

    #[test]
    fn logo_normalizes_by_weight_then_chart_maximum() {
        // Seed "ACGT" with weight 3, variant "ACGA" with weight 1.
        // Positions 0-2 agree (frequency 1.0), position 3 splits
        // 0.75 T / 0.25 A. The chart max is already 1.0.
        let members = vec![
            member(1, "ACGT", Some((0, 4))),
            member(2, "ACGA", Some((0, 4))),
        ];
        let chart = cluster_sequence_logo_chart(&members, Some(&reference(&[(1, 3), (2, 1)])));

        assert_eq!(chart.title.as_deref(), Some("Cluster Sequence Logo"));
        assert_eq!(chart.x_axis.categories, vec!["1", "2", "3", "4"]);
        assert_eq!(series_values(&chart, "A"), vec![1.0, 0.0, 0.0, 0.25]);
        assert_eq!(series_values(&chart, "T"), vec![0.0, 0.0, 0.0, 0.75]);
    }

    #[test]
    fn logo_scales_up_when_no_base_is_unanimous() {
        // Two members disagreeing everywhere: every frequency is 0.5,
        // so the chart-wide maximum rescales them all to 1.0.
        let members = vec![
            member(1, "AAAA", Some((0, 4))),
            member(2, "CCCC", Some((0, 4))),
        ];
        let chart = cluster_sequence_logo_chart(&members, Some(&reference(&[(1, 5), (2, 5)])));
        assert_eq!(series_values(&chart, "A"), vec![1.0; 4]);
        assert_eq!(series_values(&chart, "C"), vec![1.0; 4]);
        assert_eq!(series_values(&chart, "G"), vec![0.0; 4]);
    }

    #[test]
    fn members_with_other_window_lengths_are_excluded() {
        let members = vec![
            member(1, "ACGT", Some((0, 4))),
            member(2, "ACGA", Some((0, 4))),
            // Window of length 3; skipped, weight not counted.
            member(3, "TTTT", Some((0, 3))),
            // No bounds at all.
            member(4, "GGGG", None),
        ];
        let reference = reference(&[(1, 30), (2, 10), (3, 20)]);

        // The seed's window (4) governs the axis even though member 3
        // carries weight.
        let logo = cluster_sequence_logo_chart(&members, Some(&reference));
        assert_eq!(logo.x_axis.categories, vec!["1", "2", "3", "4"]);

        // Mutation rate divides by the included weight only (30 + 10,
        // not 60): the variant A accounts for a quarter.
        let rates = cluster_mutation_rates_chart(&members, Some(&reference));
        assert_eq!(series_values(&rates, "A"), vec![0.0, 0.0, 0.0, 0.25]);
    }

    #[test]
    fn mutation_rates_count_only_differences_from_seed() {
        let members = vec![
            member(1, "ACGT", Some((0, 4))),
            member(2, "ACGA", Some((0, 4))),
        ];
        let chart = cluster_mutation_rates_chart(&members, Some(&reference(&[(1, 3), (2, 1)])));

        assert_eq!(chart.title.as_deref(), Some("Cluster Mutation Rates"));
        // Only the A at position 4 deviates: weight 1 of 4 total.
        assert_eq!(series_values(&chart, "A"), vec![0.0, 0.0, 0.0, 0.25]);
        assert_eq!(series_values(&chart, "T"), vec![0.0; 4]);
        assert_eq!(series_values(&chart, "C"), vec![0.0; 4]);
    }

    #[test]
    fn empty_inputs_yield_empty_charts() {
        let reference = reference(&[(1, 1)]);
        assert!(cluster_sequence_logo_chart(&[], Some(&reference)).is_empty());
        assert!(cluster_mutation_rates_chart(&[], Some(&reference)).is_empty());

        let members = vec![member(1, "ACGT", Some((0, 4)))];
        assert!(cluster_sequence_logo_chart(&members, None).is_empty());

        // All weights zero: nothing to normalize by.
        let unseen = SelectionCycle {
            name: "r1".to_string(),
            round: 1,
            ..Default::default()
        };
        assert!(cluster_sequence_logo_chart(&members, Some(&unseen)).is_empty());
    }
}
