//! Secondary structure charts: base pair probability heatmap and the
//! context probability stack.

use std::cmp::Ordering;

use crate::chart::spec::{
    Axis, ChartSpec, HeatmapCell, Series, SeriesData, SeriesKind, StackSegment, ValueRange,
};
use crate::prediction::{Bppm, ContextProbabilities};

/// Heatmap of the upper-triangle base pair probability matrix.
///
/// Matrix row `i`, offset `j` maps to the cell `(i + 1 + j, i)`. Both
/// axes carry the sequence's characters; the y axis renders inverted
/// so the diagonal runs top-left to bottom-right. Values map 0..1
/// onto white..black.
pub fn bppm_heatmap_chart(sequence: &str, bppm: &Bppm) -> ChartSpec {
    if sequence.is_empty() || bppm.is_empty() {
        return ChartSpec::empty();
    }

    let chars: Vec<String> = sequence.chars().map(|c| c.to_string()).collect();
    let cells: Vec<HeatmapCell> = bppm
        .matrix
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &value)| HeatmapCell {
                x: i + 1 + j,
                y: i,
                value,
            })
        })
        .collect();

    ChartSpec {
        title: None,
        x_axis: Axis {
            categories: chars.clone(),
            ..Axis::default()
        },
        y_axis: Axis {
            categories: chars,
            inverse: true,
            ..Axis::default()
        },
        series: vec![Series {
            name: "BPPM".to_string(),
            color: None,
            kind: SeriesKind::Heatmap,
            data: SeriesData::Cells(cells),
        }],
        value_range: Some(ValueRange {
            min: 0.0,
            max: 1.0,
            low_color: "#ffffff".to_string(),
            high_color: "#000000".to_string(),
        }),
    }
}

const CONTEXT_SERIES: [(&str, &str); 6] = [
    ("Paired", "#c8c8c8"),
    ("Hairpin", "#ff7070"),
    ("Bulge", "#fa9600"),
    ("Internal", "#a0a0ff"),
    ("Multi", "#00ffff"),
    ("Dangling", "#ffc0cb"),
];

/// Stacked per-position probabilities of the six structural contexts.
///
/// At each position the six values stack in ascending order, smallest
/// at the baseline, each segment's `start` the running sum of the
/// smaller ones. Vectors shorter than the longest pad with 0. Ties
/// keep the fixed series order.
pub fn context_probability_chart(sequence: &str, context: &ContextProbabilities) -> ChartSpec {
    let n = context.position_count();
    if sequence.is_empty() || n == 0 {
        return ChartSpec::empty();
    }

    let vectors: [&[f64]; 6] = [
        &context.paired,
        &context.hairpin,
        &context.bulge,
        &context.internal,
        &context.multi,
        &context.dangling,
    ];

    let mut segments: [Vec<StackSegment>; 6] = Default::default();
    for position in 0..n {
        let mut stack: Vec<(usize, f64)> = vectors
            .iter()
            .enumerate()
            .map(|(index, values)| (index, values.get(position).copied().unwrap_or(0.0)))
            .collect();
        stack.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let mut start = 0.0;
        for (index, height) in stack {
            segments[index].push(StackSegment {
                position,
                start,
                height,
            });
            start += height;
        }
    }

    let series = CONTEXT_SERIES
        .iter()
        .zip(segments)
        .map(|(&(name, color), segments)| Series::stacked_segments(name, Some(color), segments))
        .collect();

    ChartSpec {
        title: None,
        x_axis: Axis::with_categories(
            "Sequence Position",
            (1..=n).map(|p| p.to_string()).collect(),
        ),
        y_axis: Axis {
            min: Some(0.0),
            max: Some(1.0),
            ..Axis::labeled("Probability")
        },
        series,
        value_range: None,
    }
}
