// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the best model using Burn's CompactRecorder.
//
// What gets saved:
//   1. lm-<mode>-best.mpk.gz — weights with the best dev accuracy
//   2. train_config.json     — hyperparameters used to build the model
//
// The config is needed to rebuild a model with the exact same
// shapes before the weights can be loaded into it.
//
//   checkpoints/
//     lm-lstm-best.mpk.gz
//     train_config.json
//     tokenizer.json     (written by TokenizerStore)
//     metrics.csv        (written by MetricsLogger)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{LanguageModel, RecurrentKind};

/// Manages saving and loading of the best checkpoint.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if needed.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Path without extension — the recorder appends `.mpk.gz`
    fn best_model_path(&self, kind: RecurrentKind) -> PathBuf {
        self.dir.join(format!("lm-{}-best", kind.to_string().to_lowercase()))
    }

    /// Overwrite the best checkpoint with `model`'s weights.
    pub fn save_best<B: Backend>(
        &self,
        model: &LanguageModel<B>,
        kind:  RecurrentKind,
    ) -> Result<()> {
        let path = self.best_model_path(kind);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        tracing::debug!("Saved best model to '{}'", path.display());
        Ok(())
    }

    /// Load the best checkpoint into a freshly built model of the same shape.
    pub fn load_best<B: Backend>(
        &self,
        model:  LanguageModel<B>,
        kind:   RecurrentKind,
        device: &B::Device,
    ) -> Result<LanguageModel<B>> {
        let path = self.best_model_path(kind);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        tracing::info!("Loaded best model from '{}'", path.display());
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'report'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }
}
