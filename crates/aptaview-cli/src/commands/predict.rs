//! Raw structure prediction output.
//!
//! `chart bppm` and `chart context` render the same payloads as chart
//! specs; these commands expose the backend's data untransformed.

use anyhow::Result;
use clap::Subcommand;

use crate::commands::print_json;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum PredictAction {
    /// Minimum free energy structure in dot-bracket notation
    Mfe { sequence: String },
    /// Base pair probability matrix as JSON
    Bppm { sequence: String },
    /// Structural context probabilities as JSON
    Context { sequence: String },
}

pub async fn run(ctx: &AppContext, action: PredictAction) -> Result<()> {
    match action {
        PredictAction::Mfe { sequence } => {
            let prediction = ctx.predictions.mfe(&sequence).await?;
            println!("{sequence}");
            println!("{}", prediction.structure);
            println!("MFE: {:.2} kcal/mol", prediction.mfe);
            Ok(())
        }
        PredictAction::Bppm { sequence } => {
            let bppm = ctx.predictions.bppm(&sequence).await?;
            print_json(&bppm)
        }
        PredictAction::Context { sequence } => {
            let context = ctx.predictions.context_probabilities(&sequence).await?;
            print_json(&context)
        }
    }
}
