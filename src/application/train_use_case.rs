// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the whole experiment in order:
//
//   Step 1: Build vocabulary from the vocab file      (Layer 4 + 3)
//   Step 2: Save it as a word-level tokenizer          (Layer 6)
//   Step 3: Encode train / dev / test sentences        (Layer 4)
//   Step 4: Save config                                (Layer 6)
//   Step 5: Train, keeping the best model on dev       (Layer 5)
//   Step 6: Reload the best model, list test mistakes  (Layer 5)

use anyhow::{ensure, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::application::report_use_case::{print_report, score_best_model, DEFAULT_TOP_CONFUSIONS};
use crate::data::{
    dataset::{LmDataset, LmSample},
    encoder::encode_sentences,
    loader::{read_vocabulary_words, TextFileLoader},
};
use crate::domain::{traits::CorpusSource, vocabulary::Vocabulary};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    tokenizer_store::TokenizerStore,
};
use crate::ml::{
    model::RecurrentKind,
    trainer::{train, DataSplits, TrainingSummary},
};

/// Which Burn backend runs the tensors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ComputeBackend {
    /// GPU through wgpu
    #[default]
    Wgpu,
    /// CPU through ndarray
    Ndarray,
}

// ─── Training Configuration ──────────────────────────────────────────────────
// Serialisable so the report command can rebuild the same model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub vocab_file:     String,
    pub train_file:     String,
    pub val_file:       String,
    pub test_file:      String,
    pub checkpoint_dir: String,
    pub max_len:        usize,
    pub batch_size:     usize,
    pub embedding_dim:  usize,
    pub hidden_dim:     usize,
    pub mode:           RecurrentKind,
    pub grad_clip:      f64,
    pub epochs:         usize,
    pub lr:             f64,
    pub lr_decay:       f64,
    pub log_every:      usize,
    pub seed:           u64,
    pub backend:        ComputeBackend,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            vocab_file:     "data/bobsue.voc.txt".to_string(),
            train_file:     "data/bobsue.lm.train.txt".to_string(),
            val_file:       "data/bobsue.lm.dev.txt".to_string(),
            test_file:      "data/bobsue.lm.test.txt".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            max_len:        20,
            batch_size:     128,
            embedding_dim:  200,
            hidden_dim:     200,
            mode:           RecurrentKind::Lstm,
            grad_clip:      5.0,
            epochs:         10,
            lr:             1e-3,
            lr_decay:       0.5,
            log_every:      20,
            seed:           42,
            backend:        ComputeBackend::Wgpu,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_len > 0,       "max_len must be at least 1");
        ensure!(self.batch_size > 0,    "batch_size must be at least 1");
        ensure!(self.epochs > 0,        "epochs must be at least 1");
        ensure!(self.embedding_dim > 0, "embedding_dim must be at least 1");
        ensure!(self.hidden_dim > 0,    "hidden_dim must be at least 1");
        ensure!(self.log_every > 0,     "log_every must be at least 1");
        ensure!(self.lr > 0.0,          "lr must be positive, got {}", self.lr);
        ensure!(self.grad_clip > 0.0,   "grad_clip must be positive, got {}", self.grad_clip);
        ensure!(
            self.lr_decay > 0.0 && self.lr_decay <= 1.0,
            "lr_decay must be in (0, 1], got {}", self.lr_decay
        );
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainingSummary> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Vocabulary ────────────────────────────────────────────────
        let vocab = Vocabulary::from_words(read_vocabulary_words(&cfg.vocab_file)?)?;
        tracing::info!("Vocabulary: {} ids (including <PAD> and <UNK>)", vocab.len());

        // ── Step 2: Tokenizer ─────────────────────────────────────────────────
        let tokenizer = TokenizerStore::new(&cfg.checkpoint_dir).build_and_save(&vocab)?;

        // ── Step 3: Encode the three splits ───────────────────────────────────
        let train_samples = encode_split("train", &cfg.train_file, &tokenizer, &vocab, cfg.max_len)?;
        let val_samples   = encode_split("dev",   &cfg.val_file,   &tokenizer, &vocab, cfg.max_len)?;
        let test_samples  = encode_split("test",  &cfg.test_file,  &tokenizer, &vocab, cfg.max_len)?;

        // ── Step 4: Save config for the report command ────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        tracing::info!("Per-epoch metrics → '{}'", metrics.csv_path().display());

        let splits = DataSplits {
            train: LmDataset::new(train_samples),
            val:   LmDataset::new(val_samples),
            test:  LmDataset::new(test_samples.clone()),
        };

        // ── Steps 5–6 on the chosen backend ───────────────────────────────────
        match cfg.backend {
            ComputeBackend::Wgpu => self.run::<Autodiff<Wgpu>>(
                splits, test_samples, &vocab, &ckpt_manager, &metrics, WgpuDevice::default(),
            ),
            ComputeBackend::Ndarray => self.run::<Autodiff<NdArray>>(
                splits, test_samples, &vocab, &ckpt_manager, &metrics, NdArrayDevice::default(),
            ),
        }
    }

    fn run<B: AutodiffBackend>(
        &self,
        splits:       DataSplits,
        test_samples: Vec<LmSample>,
        vocab:        &Vocabulary,
        ckpt_manager: &CheckpointManager,
        metrics:      &MetricsLogger,
        device:       B::Device,
    ) -> Result<TrainingSummary> {
        let cfg = &self.config;
        tracing::info!("Training {} on the {:?} backend", cfg.mode, cfg.backend);

        let summary = train::<B>(cfg, splits, vocab, ckpt_manager, metrics, device.clone())?;

        let wrong = score_best_model::<B::InnerBackend>(cfg, vocab, ckpt_manager, test_samples, &device)?;
        print_report(&wrong, DEFAULT_TOP_CONFUSIONS);

        Ok(summary)
    }
}

/// Read and encode one corpus file, logging what was lost on the way.
pub(crate) fn encode_split(
    name:      &str,
    path:      &str,
    tokenizer: &Tokenizer,
    vocab:     &Vocabulary,
    max_len:   usize,
) -> Result<Vec<LmSample>> {
    let sentences = TextFileLoader::new(path).sentences()?;
    let encoded   = encode_sentences(&sentences, tokenizer, vocab, max_len)?;

    tracing::info!(
        "{name}: {} sentences → {} samples ({} truncated, {} dropped, {} OOV words)",
        sentences.len(),
        encoded.samples.len(),
        encoded.truncated,
        encoded.dropped,
        encoded.out_of_vocabulary,
    );
    Ok(encoded.samples)
}
