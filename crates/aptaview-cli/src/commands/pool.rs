//! Aptamer pool table queries.

use anyhow::Result;
use clap::Args;

use aptaview_core::experiment::ExperimentsGateway;
use aptaview_core::pool::{
    PageRequest, PoolFilter, PoolQuery, PoolSort, SortColumn, SortDirection, aptamer_rows,
};

use crate::commands::print_json;
use crate::context::AppContext;

#[derive(Args)]
pub struct PoolArgs {
    /// Experiment id
    experiment: String,
    /// Search text; matched as a case-insensitive substring of the
    /// sequence, or with --ids as a comma-separated id list
    #[arg(long, default_value = "")]
    query: String,
    /// Read the query as a comma-separated id list
    #[arg(long)]
    ids: bool,
    /// Sort column: id, sequence, cycle-<round>-count or
    /// cycle-<round>-frequency
    #[arg(long)]
    sort: Option<SortColumn>,
    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    direction: SortDirection,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: usize,
    /// Rows per page (minimum 1)
    #[arg(long, default_value_t = 10)]
    page_size: usize,
    /// Show raw read counts instead of CPM
    #[arg(long)]
    raw_counts: bool,
    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(ctx: &AppContext, args: PoolArgs) -> Result<()> {
    let report = ctx.experiments.report(&args.experiment).await?;
    let rows = aptamer_rows(&report);
    tracing::debug!("Materialized {} pool rows", rows.len());

    let query = PoolQuery {
        filter: PoolFilter {
            query: args.query,
            search_ids: args.ids,
        },
        sort: args.sort.map(|column| PoolSort {
            column,
            direction: args.direction,
        }),
        page: PageRequest::new(args.page, args.page_size.max(1)),
        use_cpm: !args.raw_counts,
    };
    let page = query.run(&rows);

    if args.json {
        return print_json(&page);
    }

    println!(
        "Page {}/{} ({} rows match)",
        page.index + 1,
        page.total_pages.max(1),
        page.total_items
    );
    if page.is_empty() {
        return Ok(());
    }

    let rounds: Vec<u32> = report.selection_cycles.iter().map(|c| c.round).collect();
    print!("{:>8}  {:<12}", "ID", "Region");
    for round in &rounds {
        let unit = if args.raw_counts { "count" } else { "cpm" };
        print!("  {:>14}", format!("R{round} {unit}"));
    }
    println!("  Sequence");

    for row in &page.items {
        print!(
            "{:>8}  {:<12}",
            row.id,
            row.randomized_region().unwrap_or("-")
        );
        for round in &rounds {
            match row.metrics(*round) {
                Some(metrics) if args.raw_counts => print!("  {:>14}", metrics.count),
                Some(metrics) => print!("  {:>14.2}", metrics.cpm),
                None => print!("  {:>14}", "-"),
            }
        }
        println!("  {}", row.sequence);
    }
    Ok(())
}
