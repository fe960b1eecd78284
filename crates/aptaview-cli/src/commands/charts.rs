//! Chart spec output. Every subcommand prints a renderer-neutral
//! `ChartSpec` as JSON.

use anyhow::{Result, bail};
use clap::{Subcommand, ValueEnum};

use aptaview_core::chart::{
    AxisScale, AxisUnit, DistributionSource, bppm_heatmap_chart, cluster_mutation_rates_chart,
    cluster_sequence_logo_chart, context_probability_chart, nucleotide_distribution_chart,
    randomized_region_sizes_chart, selection_cycles_chart,
};
use aptaview_core::cluster::{cluster_table_rows, members_of};
use aptaview_core::experiment::ExperimentsGateway;
use aptaview_core::pool::aptamer_rows;

use crate::commands::clusters::load_analysis;
use crate::commands::print_chart;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum ChartAction {
    /// Composition of the positive selection cycles
    Cycles {
        /// Experiment id
        experiment: String,
        /// Read count above which an aptamer counts as enriched
        #[arg(long, default_value_t = 1)]
        cutoff: u64,
    },
    /// Randomized region size distribution of the accepted pool
    RegionSizes {
        /// Experiment id
        experiment: String,
        /// Plot percentages of the total instead of raw counts
        #[arg(long)]
        percentage: bool,
        /// Logarithmic value axis
        #[arg(long)]
        log: bool,
    },
    /// Per-position nucleotide distribution of one selection cycle
    Nucleotides {
        /// Experiment id
        experiment: String,
        /// Cycle name, as reported by the backend
        #[arg(long)]
        cycle: String,
        /// Which reads to draw from
        #[arg(long, value_enum, default_value_t = SourceArg::Forward)]
        source: SourceArg,
        /// Randomized region size bucket; required with --source accepted
        #[arg(long)]
        region_size: Option<u32>,
        /// Plot percentages of the cycle total instead of raw counts
        #[arg(long)]
        percentage: bool,
    },
    /// Sequence logo of one cluster
    Logo {
        /// Experiment id
        experiment: String,
        /// Cluster id within the analysis
        cluster: u64,
        /// Analysis id; defaults to the newest analysis
        #[arg(long)]
        analysis: Option<String>,
    },
    /// Per-position mutation rates of one cluster against its seed
    Mutations {
        /// Experiment id
        experiment: String,
        /// Cluster id within the analysis
        cluster: u64,
        /// Analysis id; defaults to the newest analysis
        #[arg(long)]
        analysis: Option<String>,
    },
    /// Base pair probability heatmap of a sequence
    Bppm { sequence: String },
    /// Structural context probabilities of a sequence
    Context { sequence: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Forward,
    Reverse,
    Accepted,
}

pub async fn run(ctx: &AppContext, action: ChartAction) -> Result<()> {
    match action {
        ChartAction::Cycles { experiment, cutoff } => {
            let report = ctx.experiments.report(&experiment).await?;
            print_chart(&selection_cycles_chart(&report, cutoff))
        }
        ChartAction::RegionSizes {
            experiment,
            percentage,
            log,
        } => {
            let report = ctx.experiments.report(&experiment).await?;
            let scale = if log {
                AxisScale::Logarithmic
            } else {
                AxisScale::Linear
            };
            print_chart(&randomized_region_sizes_chart(
                &report.metadata,
                unit(percentage),
                scale,
            ))
        }
        ChartAction::Nucleotides {
            experiment,
            cycle,
            source,
            region_size,
            percentage,
        } => {
            let report = ctx.experiments.report(&experiment).await?;
            let Some(selected) = report.selection_cycles.iter().find(|c| c.name == cycle) else {
                let names: Vec<&str> = report
                    .selection_cycles
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                bail!("unknown cycle '{cycle}'; available: {}", names.join(", "));
            };
            let source = match source {
                SourceArg::Forward => DistributionSource::Forward,
                SourceArg::Reverse => DistributionSource::Reverse,
                SourceArg::Accepted => match region_size {
                    Some(region_size) => DistributionSource::Accepted { region_size },
                    None => bail!("--source accepted needs --region-size"),
                },
            };
            print_chart(&nucleotide_distribution_chart(
                &report.metadata,
                selected,
                source,
                unit(percentage),
            ))
        }
        ChartAction::Logo {
            experiment,
            cluster,
            analysis,
        } => {
            let (report, members) = family_members(ctx, &experiment, cluster, analysis).await?;
            print_chart(&cluster_sequence_logo_chart(
                &members,
                report.reference_cycle(),
            ))
        }
        ChartAction::Mutations {
            experiment,
            cluster,
            analysis,
        } => {
            let (report, members) = family_members(ctx, &experiment, cluster, analysis).await?;
            print_chart(&cluster_mutation_rates_chart(
                &members,
                report.reference_cycle(),
            ))
        }
        ChartAction::Bppm { sequence } => {
            let bppm = ctx.predictions.bppm(&sequence).await?;
            print_chart(&bppm_heatmap_chart(&sequence, &bppm))
        }
        ChartAction::Context { sequence } => {
            let context = ctx.predictions.context_probabilities(&sequence).await?;
            print_chart(&context_probability_chart(&sequence, &context))
        }
    }
}

fn unit(percentage: bool) -> AxisUnit {
    if percentage {
        AxisUnit::Percentage
    } else {
        AxisUnit::Count
    }
}

/// Resolves one cluster's member pool rows for the family charts.
async fn family_members(
    ctx: &AppContext,
    experiment: &str,
    cluster: u64,
    analysis_id: Option<String>,
) -> Result<(
    aptaview_core::report::ExperimentReport,
    Vec<aptaview_core::pool::AptamerRow>,
)> {
    let (report, analysis) = load_analysis(ctx, experiment, analysis_id).await?;
    let table = cluster_table_rows(&analysis, report.reference_cycle());
    let Some(cluster_row) = table.iter().find(|row| row.cluster_id == cluster) else {
        bail!("analysis {} has no cluster {}", analysis.id, cluster);
    };
    let pool = aptamer_rows(&report);
    let members = members_of(&pool, cluster_row);
    Ok((report, members))
}
