//! Cluster analysis commands: running AptaCluster and browsing the
//! aptamer family table.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use aptaview_core::cluster::{
    AptaClusterConfiguration, CLUSTER_PAGE_SIZE, ClusterSort, ClusterSortColumn,
    cluster_table_rows, members_of,
};
use aptaview_core::experiment::ExperimentsGateway;
use aptaview_core::pool::{PageRequest, SortDirection, aptamer_rows};

use crate::commands::print_json;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum ClustersAction {
    /// List the analyses run for an experiment, newest first
    List {
        /// Experiment id
        experiment: String,
    },
    /// Run AptaCluster on an experiment
    Run(RunArgs),
    /// Show the aggregated family table of an analysis
    Table(TableArgs),
    /// List the member aptamers of one cluster
    Members {
        /// Experiment id
        experiment: String,
        /// Cluster id within the analysis
        cluster: u64,
        /// Analysis id; defaults to the newest analysis
        #[arg(long)]
        analysis: Option<String>,
        /// Print the members as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Experiment id
    experiment: String,
    /// Randomized region size the clustering operates on
    #[arg(long)]
    region_size: u32,
    /// LSH dimension; defaults to 75% of the region size
    #[arg(long)]
    lsh_dimension: Option<u32>,
    /// LSH iterations
    #[arg(long)]
    lsh_iterations: Option<u32>,
    /// Maximum edit distance within a cluster
    #[arg(long)]
    edit_distance: Option<u32>,
    /// k-mer size of the similarity stage
    #[arg(long)]
    kmer_size: Option<u32>,
    /// Iterations used to estimate the k-mer cutoff
    #[arg(long)]
    kmer_cutoff_iterations: Option<u32>,
}

#[derive(Args)]
pub struct TableArgs {
    /// Experiment id
    experiment: String,
    /// Analysis id; defaults to the newest analysis
    #[arg(long)]
    analysis: Option<String>,
    /// Sort column: id, size or diversity
    #[arg(long, default_value = "size")]
    sort: ClusterSortColumn,
    /// Sort direction: asc or desc
    #[arg(long, default_value = "desc")]
    direction: SortDirection,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: usize,
    /// Rows per page
    #[arg(long, default_value_t = CLUSTER_PAGE_SIZE)]
    page_size: usize,
    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(ctx: &AppContext, action: ClustersAction) -> Result<()> {
    match action {
        ClustersAction::List { experiment } => list(ctx, &experiment).await,
        ClustersAction::Run(args) => run_clustering(ctx, args).await,
        ClustersAction::Table(args) => table(ctx, args).await,
        ClustersAction::Members {
            experiment,
            cluster,
            analysis,
            json,
        } => members(ctx, &experiment, cluster, analysis, json).await,
    }
}

async fn list(ctx: &AppContext, experiment: &str) -> Result<()> {
    ctx.clustering.load(experiment).await?;
    let analyses = ctx.clustering.analyses().await;
    if analyses.is_empty() {
        println!("No cluster analyses yet.");
        return Ok(());
    }

    for analysis in &analyses {
        let created = analysis
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<36}  {}  region {:>3} nt  {} aptamers in {} ms",
            analysis.id,
            created,
            analysis.request_config.randomized_region_size,
            analysis.aptamer_to_cluster.len(),
            analysis.duration_ms
        );
    }
    Ok(())
}

async fn run_clustering(ctx: &AppContext, args: RunArgs) -> Result<()> {
    let mut config = AptaClusterConfiguration::for_region_size(args.region_size);
    if let Some(dimension) = args.lsh_dimension {
        config.lsh_dimension = dimension;
    }
    if let Some(iterations) = args.lsh_iterations {
        config.lsh_iterations = iterations;
    }
    if let Some(distance) = args.edit_distance {
        config.edit_distance = distance;
    }
    if let Some(size) = args.kmer_size {
        config.kmer_size = size;
    }
    if let Some(iterations) = args.kmer_cutoff_iterations {
        config.kmer_cutoff_iterations = iterations;
    }
    config.validate()?;

    let analysis = ctx.clustering.run(&args.experiment, &config).await?;
    let clusters: std::collections::BTreeSet<u64> =
        analysis.aptamer_to_cluster.values().copied().collect();
    println!(
        "✅ Analysis {} assigned {} aptamers to {} clusters in {} ms",
        analysis.id,
        analysis.aptamer_to_cluster.len(),
        clusters.len(),
        analysis.duration_ms
    );
    Ok(())
}

async fn table(ctx: &AppContext, args: TableArgs) -> Result<()> {
    let (report, analysis) = load_analysis(ctx, &args.experiment, args.analysis).await?;

    let mut rows = cluster_table_rows(&analysis, report.reference_cycle());
    ClusterSort {
        column: args.sort,
        direction: args.direction,
    }
    .apply(&mut rows);
    let page = PageRequest::new(args.page, args.page_size.max(1)).paginate(&rows);

    if args.json {
        return print_json(&page);
    }

    println!(
        "Analysis {}: page {}/{} ({} clusters)",
        analysis.id,
        page.index + 1,
        page.total_pages.max(1),
        page.total_items
    );
    println!("{:>10} {:>12} {:>10}", "Cluster", "Size", "Diversity");
    for row in &page.items {
        println!("{:>10} {:>12} {:>10}", row.cluster_id, row.size, row.diversity);
    }
    Ok(())
}

async fn members(
    ctx: &AppContext,
    experiment: &str,
    cluster: u64,
    analysis_id: Option<String>,
    json: bool,
) -> Result<()> {
    let (report, analysis) = load_analysis(ctx, experiment, analysis_id).await?;

    let table = cluster_table_rows(&analysis, report.reference_cycle());
    let Some(cluster_row) = table.iter().find(|row| row.cluster_id == cluster) else {
        bail!("analysis {} has no cluster {}", analysis.id, cluster);
    };

    let pool = aptamer_rows(&report);
    let members = members_of(&pool, cluster_row);
    if json {
        return print_json(&members);
    }

    let reference_round = report.reference_cycle().map(|c| c.round);
    println!(
        "Cluster {} of analysis {}: {} members, size {}",
        cluster, analysis.id, cluster_row.diversity, cluster_row.size
    );
    for member in &members {
        let count = reference_round
            .and_then(|round| member.metrics(round))
            .map(|metrics| metrics.count.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>8}  {:>10}  {}", member.id, count, member.sequence);
    }
    Ok(())
}

/// Fetches the report and resolves the analysis to use: the explicit
/// one when given, otherwise the newest.
pub(crate) async fn load_analysis(
    ctx: &AppContext,
    experiment: &str,
    analysis_id: Option<String>,
) -> Result<(
    aptaview_core::report::ExperimentReport,
    aptaview_core::cluster::ClusterAnalysis,
)> {
    let report = ctx.experiments.report(experiment).await?;
    ctx.clustering.ensure_loaded(experiment).await?;
    if let Some(id) = analysis_id {
        ctx.clustering.select_analysis(&id).await;
    }
    let Some(analysis) = ctx.clustering.active().await else {
        bail!("experiment {experiment} has no cluster analysis; run `aptaview clusters run` first");
    };
    Ok((report, analysis))
}
