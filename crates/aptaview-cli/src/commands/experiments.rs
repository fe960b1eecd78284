//! Experiment list and lifecycle commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use serde::Deserialize;

use aptaview_core::chart::{cycle_import_stats, selection_cycle_stats};
use aptaview_core::experiment::{
    CreateCycle, CreateExperiment, CycleFiles, DateRange, ExperimentFilter, ExperimentStatus,
    ExperimentsGateway, FileFormat, ListSort, Primers, ProgressCallback, RandomizedRegion,
    ReadType, Sequencing, StatusFilter,
};

use crate::commands::print_json;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum ExperimentsAction {
    /// List experiments known to the backend
    List(ListArgs),
    /// Show one experiment's report summary
    Show {
        /// Experiment id
        id: String,
        /// Read count above which an aptamer counts as enriched
        #[arg(long, default_value_t = 1)]
        cutoff: u64,
    },
    /// Create an experiment from a TOML manifest, uploading its read files
    Create {
        /// Path to the manifest; read file paths resolve relative to it
        manifest: PathBuf,
    },
    /// Delete experiments by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Substring matched against name or description
    #[arg(long, default_value = "")]
    search: String,
    /// Keep only experiments with this status
    #[arg(long)]
    status: Option<ExperimentStatus>,
    /// Creation window in days: all, 7, 30 or 90
    #[arg(long, default_value = "all")]
    days: DateRange,
    /// Sort key: name or created-at
    #[arg(long, default_value = "created-at")]
    sort: ListSort,
    /// Print the list as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(ctx: &AppContext, action: ExperimentsAction) -> Result<()> {
    match action {
        ExperimentsAction::List(args) => list(ctx, args).await,
        ExperimentsAction::Show { id, cutoff } => show(ctx, &id, cutoff).await,
        ExperimentsAction::Create { manifest } => create(ctx, &manifest).await,
        ExperimentsAction::Delete { ids } => delete(ctx, ids).await,
    }
}

async fn list(ctx: &AppContext, args: ListArgs) -> Result<()> {
    ctx.store.ensure_loaded().await?;
    ctx.store
        .set_filter(ExperimentFilter {
            search: args.search,
            status: args.status.map_or(StatusFilter::All, StatusFilter::Only),
            date_range: args.days,
            sort: args.sort,
        })
        .await;

    let experiments = ctx.store.filtered().await;
    if args.json {
        return print_json(&experiments);
    }

    if experiments.is_empty() {
        println!("No experiments match.");
        return Ok(());
    }
    for exp in &experiments {
        println!(
            "{:<36}  {:>9}  {}  {}",
            exp.id,
            exp.status.to_string(),
            exp.created_at.format("%Y-%m-%d %H:%M"),
            exp.name
        );
    }
    Ok(())
}

async fn show(ctx: &AppContext, id: &str, cutoff: u64) -> Result<()> {
    let report = ctx.experiments.report(id).await?;
    let info = &report.experiment_details.general_information;
    let import = &report.experiment_details.sequence_import_statistics;

    println!("Experiment: {}", info.name);
    if !info.description.is_empty() {
        println!("  {}", info.description);
    }
    println!("  aptamer size:  {} nt", info.aptamer_size);
    println!("  5' primer:     {}", info.five_prime_primer);
    println!("  3' primer:     {}", info.three_prime_primer);
    println!("  aptamers:      {}", report.id_to_aptamer.len());
    println!();
    println!(
        "Import: {} of {} reads accepted ({:.1}%)",
        import.total_accepted_reads,
        import.total_processed_reads,
        import.acceptance_rate()
    );

    let per_cycle = cycle_import_stats(&report);
    if !per_cycle.is_empty() {
        println!();
        println!("{:<6} {:<16} {:>12} {:>12} {:>9}", "Round", "Cycle", "Forward", "Accepted", "Rate");
        for stats in &per_cycle {
            println!(
                "{:<6} {:<16} {:>12} {:>12} {:>8.1}%",
                stats.round, stats.name, stats.forward_reads, stats.accepted_reads,
                stats.acceptance_rate
            );
        }
    }

    let cycle_stats = selection_cycle_stats(&report, cutoff);
    if !cycle_stats.is_empty() {
        println!();
        println!(
            "{:<24} {:>10} {:>10} {:>10}",
            "Positive cycle", "Singleton", "Enriched", "Unique"
        );
        for stats in &cycle_stats {
            println!(
                "{:<24} {:>9.1}% {:>9.1}% {:>9.1}%",
                stats.label, stats.singleton_pct, stats.enriched_pct, stats.unique_pct
            );
        }
    }
    Ok(())
}

async fn create(ctx: &AppContext, manifest_path: &Path) -> Result<()> {
    let spec = load_manifest(manifest_path)?;

    ctx.store.ensure_loaded().await?;
    if !ctx.store.is_name_available(&spec.name, None).await {
        bail!("an experiment named '{}' already exists", spec.name);
    }

    let progress: ProgressCallback = Arc::new(|percent| {
        print!("\rUploading... {percent:>3}%");
        let _ = std::io::stdout().flush();
    });

    let report = ctx.store.create(&spec, Some(progress)).await?;
    println!();
    println!(
        "✅ Created '{}' with {} selection cycles and {} aptamers",
        spec.name,
        report.selection_cycles.len(),
        report.id_to_aptamer.len()
    );
    Ok(())
}

async fn delete(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let count = ids.len();
    ctx.store.select_all(ids).await;
    ctx.store.delete_selected().await?;
    println!("Deleted {count} experiment(s)");
    Ok(())
}

/// On-disk creation manifest.
///
/// ```toml
/// name = "SELEX 12"
/// description = "Thrombin binders"
///
/// [sequencing]
/// read_type = "paired-end"
/// file_format = "fastq"
/// five_prime_primer = "GGGAGGACGAUGCGG"
/// three_prime_primer = "CAGACGACUCGCCCGA"
/// randomized_region = { type = "exact", length = 40 }
///
/// [[cycle]]
/// round = 1
/// name = "R1"
/// forward = "reads/r1_fwd.fastq.gz"
/// reverse = "reads/r1_rev.fastq.gz"
/// ```
#[derive(Deserialize)]
struct Manifest {
    name: String,
    #[serde(default)]
    description: String,
    sequencing: ManifestSequencing,
    #[serde(rename = "cycle")]
    cycles: Vec<ManifestCycle>,
}

#[derive(Deserialize)]
struct ManifestSequencing {
    #[serde(default = "default_true")]
    demultiplexed: bool,
    read_type: ReadType,
    file_format: FileFormat,
    five_prime_primer: String,
    #[serde(default)]
    three_prime_primer: Option<String>,
    randomized_region: ManifestRegion,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ManifestRegion {
    Exact { length: u32 },
    Range { min: u32, max: u32 },
}

#[derive(Deserialize)]
struct ManifestCycle {
    round: u32,
    name: String,
    #[serde(default)]
    control: bool,
    #[serde(default)]
    counter_selection: bool,
    forward: PathBuf,
    #[serde(default)]
    reverse: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

/// Reads a manifest and resolves its read file paths relative to the
/// manifest's directory.
fn load_manifest(path: &Path) -> Result<CreateExperiment> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read manifest {}", path.display()))?;
    let manifest: Manifest = toml::from_str(&text)
        .with_context(|| format!("cannot parse manifest {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };

    Ok(CreateExperiment {
        name: manifest.name,
        description: manifest.description,
        sequencing: Sequencing {
            is_demultiplexed: manifest.sequencing.demultiplexed,
            read_type: manifest.sequencing.read_type,
            file_format: manifest.sequencing.file_format,
            primers: Primers {
                five_prime: manifest.sequencing.five_prime_primer,
                three_prime: manifest.sequencing.three_prime_primer,
            },
            randomized_region: match manifest.sequencing.randomized_region {
                ManifestRegion::Exact { length } => RandomizedRegion::Exact {
                    exact_length: length,
                },
                ManifestRegion::Range { min, max } => RandomizedRegion::Range { min, max },
            },
        },
        selection_cycles: manifest
            .cycles
            .into_iter()
            .map(|cycle| CreateCycle {
                round_number: cycle.round,
                round_name: cycle.name,
                is_control: cycle.control,
                is_counter_selection: cycle.counter_selection,
                files: CycleFiles {
                    forward: resolve(cycle.forward),
                    reverse: cycle.reverse.map(resolve),
                },
            })
            .collect(),
    })
}
