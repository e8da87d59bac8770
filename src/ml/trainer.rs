// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop with Adam, gradient-norm clipping, and
// best-on-dev checkpointing.
//
// Per epoch:
//   1. one pass over the training batches (shuffled, fixed seed)
//   2. dev accuracy on the inner backend via model.valid()
//      - first epoch or new best → save checkpoint
//      - otherwise             → lr *= lr_decay
//   3. test accuracy, logged for reference only
//   4. one CSV row in metrics.csv
//
// Key Burn insight:
//   - Training runs on B (Autodiff<...>) for gradients
//   - model.valid() returns the model on B::InnerBackend
//   - Dev/test batchers must also use B::InnerBackend

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    grad_clipping::GradientClippingConfig,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::LmBatcher, dataset::LmDataset};
use crate::domain::vocabulary::Vocabulary;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{
    evaluator::evaluate,
    loss::{masked_accuracy, masked_nll_loss},
    model::{LanguageModel, LanguageModelConfig},
};

/// The three corpus splits, already encoded.
pub struct DataSplits {
    pub train: LmDataset,
    pub val:   LmDataset,
    pub test:  LmDataset,
}

#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub best_epoch:   usize,
    pub best_val_acc: f64,
    pub history:      Vec<EpochMetrics>,
}

pub fn train<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    splits:       DataSplits,
    vocab:        &Vocabulary,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       B::Device,
) -> Result<TrainingSummary> {
    ensure!(splits.train.sample_count() > 0, "training split has no usable sentences");

    B::seed(cfg.seed);
    let pad_id = vocab.pad_id();
    tracing::info!(
        "Training on {} sentences / {} targets, validating on {} / {}",
        splits.train.sample_count(), splits.train.target_count(),
        splits.val.sample_count(),   splits.val.target_count(),
    );

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = LanguageModelConfig::new(
        vocab.len(), cfg.embedding_dim, cfg.hidden_dim, cfg.mode,
    );
    let mut model: LanguageModel<B> = model_cfg.init(&device);
    print_parameters(&model);

    // ── Adam + gradient-norm clipping ─────────────────────────────────────────
    let optim_cfg = AdamConfig::new()
        .with_grad_clipping(Some(GradientClippingConfig::Norm(cfg.grad_clip as f32)));
    let mut optim = optim_cfg.init::<B, LanguageModel<B>>();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(LmBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(splits.train);

    let val_loader = DataLoaderBuilder::new(LmBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(splits.val);

    let test_loader = DataLoaderBuilder::new(LmBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(splits.test);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut lr          = cfg.lr;
    let mut best: Option<(usize, f64)> = None;
    let mut history     = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        println!("{:*^51}", format!("epoch:{epoch}"));

        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut acc_list = Vec::new();

        for (i, batch) in train_loader.iter().enumerate() {
            let [batch_size, seq_len] = batch.targets.dims();
            let targets = batch.targets.reshape([batch_size * seq_len]);

            let logits = model.forward(batch.inputs);
            let acc    = masked_accuracy(logits.clone(), targets.clone(), pad_id);
            let loss   = masked_nll_loss(logits, targets, pad_id);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val;
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);

            let acc = acc.ratio();
            acc_list.extend(acc);

            if i % cfg.log_every == 0 {
                println!(
                    "epoch:{} item:{} loss:{:.4} acc:{:.4}",
                    epoch, i, loss_val, acc.unwrap_or(0.0),
                );
            }
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let train_acc  = mean(&acc_list);
        println!("Epoch:{} avg acc:{:.4}", epoch, train_acc);

        // ── Dev: checkpoint on improvement, decay otherwise ───────────────────
        let model_valid = model.valid();
        let val_acc     = evaluate(&model_valid, val_loader.as_ref(), pad_id);

        let improved = best.map_or(true, |(_, best_acc)| val_acc > best_acc);
        let epoch_lr = lr;
        if improved {
            println!("Best model, val Accuracy: {:.4}", val_acc);
            ckpt_manager.save_best(&model_valid, cfg.mode)?;
            best = Some((epoch, val_acc));
        } else {
            println!("Current val Accuracy: {:.4}", val_acc);
            lr *= cfg.lr_decay;
            tracing::info!("Dev accuracy did not improve, learning rate now {:.2e}", lr);
        }

        // ── Test ──────────────────────────────────────────────────────────────
        let test_acc = evaluate(&model_valid, test_loader.as_ref(), pad_id);
        println!("Test data accuracy: {:.4}", test_acc);

        let row = EpochMetrics {
            epoch, train_loss, train_acc, val_acc, test_acc,
            lr:   epoch_lr,
            best: improved,
        };
        metrics.log(&row)?;
        history.push(row);
    }

    let (best_epoch, best_val_acc) = best.unwrap_or((0, 0.0));
    tracing::info!(
        "Training complete! Best dev accuracy {:.4} at epoch {}",
        best_val_acc, best_epoch
    );

    Ok(TrainingSummary { best_epoch, best_val_acc, history })
}

fn print_parameters<B: Backend>(model: &LanguageModel<B>) {
    for (name, shape) in model.parameter_shapes() {
        println!("{:>14} : {:?}", name, shape);
    }
    for (component, count) in model.parameter_summary() {
        tracing::debug!("{component}: {count} params");
    }
    println!("Total Num. of params: {}", model.num_params());
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};

    use crate::data::dataset::LmSample;
    use crate::ml::model::RecurrentKind;

    type B = Autodiff<NdArray>;

    fn scratch_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join("word_rnn_lm_trainer_tests").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        dir.to_string_lossy().into_owned()
    }

    /// "a b c a b c ..." repeated: each word has exactly one successor.
    fn cyclic_samples(n: usize) -> Vec<LmSample> {
        (0..n)
            .map(|k| {
                let start = (k % 3) as u32;
                let ids: Vec<u32> = (0..7).map(|i| 1 + (start + i) % 3).collect();
                LmSample {
                    input_ids:  ids[..6].to_vec(),
                    target_ids: ids[1..].to_vec(),
                }
            })
            .collect()
    }

    fn config(dir: &str, mode: RecurrentKind, epochs: usize) -> TrainConfig {
        TrainConfig {
            checkpoint_dir: dir.to_string(),
            max_len:        6,
            batch_size:     4,
            embedding_dim:  8,
            hidden_dim:     16,
            epochs,
            lr:             0.05,
            mode,
            log_every:      100,
            ..TrainConfig::default()
        }
    }

    fn run(name: &str, mode: RecurrentKind, epochs: usize, lr_decay: f64) -> TrainingSummary {
        let dir    = scratch_dir(name);
        let cfg    = TrainConfig { lr_decay, ..config(&dir, mode, epochs) };
        let vocab  = Vocabulary::from_words(["a", "b", "c"]).unwrap();
        let ckpt   = CheckpointManager::new(dir.clone()).unwrap();
        let logger = MetricsLogger::new(dir).unwrap();
        let splits = DataSplits {
            train: LmDataset::new(cyclic_samples(12)),
            val:   LmDataset::new(cyclic_samples(3)),
            test:  LmDataset::new(cyclic_samples(3)),
        };
        train::<B>(&cfg, splits, &vocab, &ckpt, &logger, Default::default()).unwrap()
    }

    #[test]
    fn test_learns_a_deterministic_sequence() {
        // no decay, so a slow start cannot stall the run
        let summary = run("learns", RecurrentKind::Lstm, 30, 1.0);
        assert!(summary.best_val_acc > 0.9, "best = {}", summary.best_val_acc);

        let first = summary.history.first().unwrap().train_loss;
        let last  = summary.history.last().unwrap().train_loss;
        assert!(last < first, "loss went from {first} to {last}");
    }

    #[test]
    fn test_lr_decays_only_after_non_improving_epochs() {
        let summary = run("decay", RecurrentKind::Rnn, 6, 0.5);
        assert!(summary.history[0].best);

        for pair in summary.history.windows(2) {
            let expected = if pair[0].best { pair[0].lr } else { pair[0].lr * 0.5 };
            assert!((pair[1].lr - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_best_checkpoint_and_metrics_are_written() {
        let dir = scratch_dir("files");
        let cfg = config(&dir, RecurrentKind::Gru, 2);
        let vocab  = Vocabulary::from_words(["a", "b", "c"]).unwrap();
        let ckpt   = CheckpointManager::new(dir.clone()).unwrap();
        let logger = MetricsLogger::new(dir.clone()).unwrap();
        let splits = DataSplits {
            train: LmDataset::new(cyclic_samples(5)),
            val:   LmDataset::new(cyclic_samples(2)),
            test:  LmDataset::new(cyclic_samples(2)),
        };
        train::<B>(&cfg, splits, &vocab, &ckpt, &logger, Default::default()).unwrap();

        let dir = std::path::Path::new(&dir);
        assert!(dir.join("lm-gru-best.mpk.gz").exists());
        let csv = std::fs::read_to_string(dir.join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_empty_training_split_is_rejected() {
        let dir = scratch_dir("empty");
        let cfg = config(&dir, RecurrentKind::Rnn, 1);
        let vocab  = Vocabulary::from_words(["a"]).unwrap();
        let ckpt   = CheckpointManager::new(dir.clone()).unwrap();
        let logger = MetricsLogger::new(dir).unwrap();
        let splits = DataSplits {
            train: LmDataset::new(Vec::new()),
            val:   LmDataset::new(Vec::new()),
            test:  LmDataset::new(Vec::new()),
        };
        assert!(train::<B>(&cfg, splits, &vocab, &ckpt, &logger, Default::default()).is_err());
    }
}
