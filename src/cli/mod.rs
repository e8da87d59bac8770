// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   1. `train`  — full experiment: train, pick best on dev,
//                 evaluate, list test mistakes
//   2. `report` — list a saved model's mistakes on any corpus

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ReportArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "word-rnn-lm",
    version,
    about = "Train a word-level LSTM/GRU/RNN language model and inspect its mistakes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case; this layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)  => run_train(args),
            Commands::Report(args) => run_report(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on '{}'", args.train_file);

    let summary = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete after {} epochs. Best dev accuracy {:.4} at epoch {}.",
        summary.history.len(), summary.best_val_acc, summary.best_epoch
    );
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<()> {
    use crate::application::report_use_case::ReportUseCase;

    let use_case = ReportUseCase::new(
        args.checkpoint_dir,
        args.corpus,
        args.backend,
        args.top,
    );
    let wrong = use_case.execute()?;
    tracing::info!("{} mispredictions reported", wrong.len());
    Ok(())
}
