pub mod charts;
pub mod clusters;
pub mod experiments;
pub mod pool;
pub mod predict;
pub mod settings;

use anyhow::Result;
use serde::Serialize;

use aptaview_core::chart::ChartSpec;

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a chart spec, noting on stderr when there was nothing to
/// chart. The empty spec still goes to stdout so piped consumers see
/// valid JSON either way.
pub fn print_chart(spec: &ChartSpec) -> Result<()> {
    if spec.is_empty() {
        eprintln!("(no data to chart)");
    }
    print_json(spec)
}
