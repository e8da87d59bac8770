// ============================================================
// Layer 2 — Report Use Case
// ============================================================
// Re-runs the misprediction report from saved artifacts:
//   1. train_config.json → model shape, max_len, backend
//   2. tokenizer.json    → the same word ids as training
//   3. lm-<mode>-best    → the best weights
// then lists every wrong next-word guess on a corpus file.

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    data::dataloader::DataLoaderBuilder,
    prelude::*,
};

use crate::application::train_use_case::{encode_split, ComputeBackend, TrainConfig};
use crate::data::{batcher::LmBatcher, dataset::{LmDataset, LmSample}};
use crate::domain::{
    prediction::{confusion_counts, Misprediction},
    vocabulary::Vocabulary,
};
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::{
    evaluator::{evaluate, incorrect_predictions},
    model::{LanguageModel, LanguageModelConfig},
};

pub const DEFAULT_TOP_CONFUSIONS: usize = 10;

pub struct ReportUseCase {
    checkpoint_dir: String,
    corpus_file:    String,
    backend:        Option<ComputeBackend>,
    top:            usize,
}

impl ReportUseCase {
    pub fn new(
        checkpoint_dir: String,
        corpus_file:    String,
        backend:        Option<ComputeBackend>,
        top:            usize,
    ) -> Self {
        Self { checkpoint_dir, corpus_file, backend, top }
    }

    pub fn execute(&self) -> Result<Vec<Misprediction>> {
        let ckpt_manager = CheckpointManager::new(&self.checkpoint_dir)?;
        let cfg          = ckpt_manager.load_config()?;
        let tokenizer    = TokenizerStore::new(&self.checkpoint_dir).load()?;
        let vocab        = TokenizerStore::vocabulary(&tokenizer)?;

        let samples = encode_split("report", &self.corpus_file, &tokenizer, &vocab, cfg.max_len)?;

        let wrong = match self.backend.unwrap_or(cfg.backend) {
            ComputeBackend::Wgpu => score_best_model::<Wgpu>(
                &cfg, &vocab, &ckpt_manager, samples, &WgpuDevice::default(),
            )?,
            ComputeBackend::Ndarray => score_best_model::<NdArray>(
                &cfg, &vocab, &ckpt_manager, samples, &NdArrayDevice::default(),
            )?,
        };

        print_report(&wrong, self.top);
        Ok(wrong)
    }
}

/// Load the best checkpoint and collect its mistakes on `samples`.
pub(crate) fn score_best_model<B: Backend>(
    cfg:          &TrainConfig,
    vocab:        &Vocabulary,
    ckpt_manager: &CheckpointManager,
    samples:      Vec<LmSample>,
    device:       &B::Device,
) -> Result<Vec<Misprediction>> {
    let model_cfg = LanguageModelConfig::new(vocab.len(), cfg.embedding_dim, cfg.hidden_dim, cfg.mode);
    let model: LanguageModel<B> = model_cfg.init(device);
    let model = ckpt_manager.load_best(model, cfg.mode, device)?;

    let loader = DataLoaderBuilder::new(LmBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .build(LmDataset::new(samples));

    let accuracy = evaluate(&model, loader.as_ref(), vocab.pad_id());
    tracing::info!("Best model accuracy on report corpus: {:.4}", accuracy);

    Ok(incorrect_predictions(&model, loader.as_ref(), vocab))
}

/// Every mistake as `predicted|expected`, then the most common ones.
pub(crate) fn print_report(wrong: &[Misprediction], top: usize) {
    for m in wrong {
        println!("{m}");
    }

    if wrong.is_empty() || top == 0 {
        return;
    }

    println!("\n{} mispredictions; most frequent:", wrong.len());
    for (m, count) in confusion_counts(wrong).into_iter().take(top) {
        println!("{count:>6}  {m}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::application::train_use_case::TrainUseCase;
    use crate::ml::model::RecurrentKind;

    #[test]
    fn test_report_from_saved_artifacts() {
        let root = std::env::temp_dir().join("word_rnn_lm_report_tests");
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();

        let file = |name: &str, text: &str| {
            let p = root.join(name);
            fs::write(&p, text).unwrap();
            p.to_string_lossy().into_owned()
        };
        let corpus = "<s> the cat sat . </s>\n<s> the dog ran . </s>\n";
        let checkpoint_dir = root.join("ckpt").to_string_lossy().into_owned();
        let cfg = TrainConfig {
            vocab_file:     file("voc.txt", "<s> </s> the cat dog sat ran ."),
            train_file:     file("train.txt", corpus),
            val_file:       file("dev.txt", corpus),
            test_file:      file("test.txt", corpus),
            checkpoint_dir: checkpoint_dir.clone(),
            batch_size:     2,
            embedding_dim:  4,
            hidden_dim:     4,
            epochs:         1,
            mode:           RecurrentKind::Rnn,
            backend:        ComputeBackend::Ndarray,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg).execute().unwrap();

        // "bird" is out of vocabulary and must come back as <UNK>
        let report_corpus = file("report.txt", "<s> the bird sat . </s>\n");
        let wrong = ReportUseCase::new(checkpoint_dir, report_corpus, None, 3)
            .execute()
            .unwrap();

        // 5 scored positions at most, none of them padding
        assert!(wrong.len() <= 5);
        let expected = ["the", "<UNK>", "sat", ".", "</s>"];
        for m in &wrong {
            assert!(expected.contains(&m.expected.as_str()), "{m}");
            assert_ne!(m.predicted, m.expected);
        }
    }

    #[test]
    fn test_report_without_training_fails() {
        let dir = std::env::temp_dir().join("word_rnn_lm_report_tests_empty");
        let _ = fs::remove_dir_all(&dir);
        let use_case = ReportUseCase::new(
            dir.to_string_lossy().into_owned(),
            "unused.txt".to_string(),
            Some(ComputeBackend::Ndarray),
            DEFAULT_TOP_CONFUSIONS,
        );
        assert!(use_case.execute().is_err());
    }
}
