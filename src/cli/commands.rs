// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `report`.
// Every hyperparameter defaults to the experiment's original
// constant, so a bare `train` reproduces the reference run.

use clap::{Args, Subcommand};

use crate::application::{
    report_use_case::DEFAULT_TOP_CONFUSIONS,
    train_use_case::{ComputeBackend, TrainConfig},
};
use crate::ml::model::RecurrentKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a language model, evaluate it, and list its test-set mistakes
    Train(TrainArgs),

    /// List the best checkpoint's mistakes on a corpus file
    Report(ReportArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Vocabulary file: whitespace-separated words, ids assigned in order from 1
    #[arg(long, default_value = "data/bobsue.voc.txt")]
    pub vocab_file: String,

    /// Training corpus, one sentence per line
    #[arg(long, default_value = "data/bobsue.lm.train.txt")]
    pub train_file: String,

    /// Dev corpus used to pick the best epoch
    #[arg(long, default_value = "data/bobsue.lm.dev.txt")]
    pub val_file: String,

    /// Test corpus for the reported accuracy and mistakes
    #[arg(long, default_value = "data/bobsue.lm.test.txt")]
    pub test_file: String,

    /// Directory for the checkpoint, tokenizer, config, and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Predictions per sentence; longer sentences are truncated
    #[arg(long, default_value_t = 20)]
    pub max_len: usize,

    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 200)]
    pub embedding_dim: usize,

    #[arg(long, default_value_t = 200)]
    pub hidden_dim: usize,

    /// Recurrent cell
    #[arg(long, value_enum, ignore_case = true, default_value_t = RecurrentKind::Lstm)]
    pub mode: RecurrentKind,

    /// Maximum global gradient norm
    #[arg(long, default_value_t = 5.0)]
    pub grad_clip: f64,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Learning-rate factor applied after each epoch that does not improve dev accuracy
    #[arg(long, default_value_t = 0.5)]
    pub lr_decay: f64,

    /// Print loss and accuracy every N training batches
    #[arg(long, default_value_t = 20)]
    pub log_every: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = ComputeBackend::Wgpu)]
    pub backend: ComputeBackend,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            vocab_file:     a.vocab_file,
            train_file:     a.train_file,
            val_file:       a.val_file,
            test_file:      a.test_file,
            checkpoint_dir: a.checkpoint_dir,
            max_len:        a.max_len,
            batch_size:     a.batch_size,
            embedding_dim:  a.embedding_dim,
            hidden_dim:     a.hidden_dim,
            mode:           a.mode,
            grad_clip:      a.grad_clip,
            epochs:         a.epochs,
            lr:             a.lr,
            lr_decay:       a.lr_decay,
            log_every:      a.log_every,
            seed:           a.seed,
            backend:        a.backend,
        }
    }
}

/// All arguments for the `report` command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Corpus to score, one sentence per line
    #[arg(long)]
    pub corpus: String,

    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Override the backend recorded at training time
    #[arg(long, value_enum)]
    pub backend: Option<ComputeBackend>,

    /// How many of the most frequent confusions to summarise
    #[arg(long, default_value_t = DEFAULT_TOP_CONFUSIONS)]
    pub top: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["word-rnn-lm", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let from_cli: TrainConfig = args.into();
        let default = TrainConfig::default();

        assert_eq!(
            serde_json::to_value(&from_cli).unwrap(),
            serde_json::to_value(&default).unwrap(),
        );
    }

    #[test]
    fn test_mode_flag_is_case_insensitive() {
        let cli = Cli::try_parse_from(["word-rnn-lm", "train", "--mode", "GRU"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(args.mode, RecurrentKind::Gru);
    }

    #[test]
    fn test_report_requires_corpus() {
        assert!(Cli::try_parse_from(["word-rnn-lm", "report"]).is_err());
        let cli = Cli::try_parse_from([
            "word-rnn-lm", "report", "--corpus", "dev.txt", "--backend", "ndarray",
        ]).unwrap();
        let Commands::Report(args) = cli.command else { panic!("expected report") };
        assert_eq!(args.backend, Some(ComputeBackend::Ndarray));
        assert_eq!(args.top, DEFAULT_TOP_CONFUSIONS);
    }
}
