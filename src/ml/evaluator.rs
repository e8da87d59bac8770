// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores a model on a data split without touching gradients.
// Callers pass the model from `model.valid()` and a loader on
// the inner (non-autodiff) backend.

use burn::{data::dataloader::DataLoader, prelude::*};

use crate::data::batcher::LmBatch;
use crate::domain::{prediction::Misprediction, vocabulary::Vocabulary};
use crate::ml::{
    loss::{argmax_rows, masked_accuracy},
    model::LanguageModel,
};

/// Mean of the per-batch accuracies.
/// Batches with no real targets are skipped; an empty split scores 0.0.
pub fn evaluate<B: Backend>(
    model:  &LanguageModel<B>,
    loader: &dyn DataLoader<LmBatch<B>>,
    pad_id: u32,
) -> f64 {
    let mut acc_sum = 0.0f64;
    let mut batches = 0usize;

    for batch in loader.iter() {
        let [batch_size, seq_len] = batch.targets.dims();
        let logits  = model.forward(batch.inputs);
        let targets = batch.targets.reshape([batch_size * seq_len]);

        if let Some(acc) = masked_accuracy(logits, targets, pad_id).ratio() {
            acc_sum += acc;
            batches += 1;
        }
    }

    if batches > 0 { acc_sum / batches as f64 } else { 0.0 }
}

/// Every non-padding position where the argmax word differs from the
/// corpus word, in corpus order.
pub fn incorrect_predictions<B: Backend>(
    model:  &LanguageModel<B>,
    loader: &dyn DataLoader<LmBatch<B>>,
    vocab:  &Vocabulary,
) -> Vec<Misprediction> {
    let pad = vocab.pad_id() as i64;
    let mut wrong = Vec::new();

    for batch in loader.iter() {
        let [batch_size, seq_len] = batch.targets.dims();
        let predicted = argmax_rows(model.forward(batch.inputs));
        let targets   = batch.targets.reshape([batch_size * seq_len]);

        let predicted = predicted.into_data();
        let targets   = targets.into_data();

        for (p, t) in predicted.iter::<i64>().zip(targets.iter::<i64>()) {
            if t != pad && p != t {
                wrong.push(Misprediction::new(
                    vocab.word(p as u32),
                    vocab.word(t as u32),
                ));
            }
        }
    }

    wrong
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::NdArray,
        data::dataloader::DataLoaderBuilder,
        module::Param,
    };
    use std::sync::Arc;

    use crate::data::{batcher::LmBatcher, dataset::{LmDataset, LmSample}};
    use crate::ml::model::{LanguageModelConfig, RecurrentKind};

    type B = NdArray;

    /// A model whose output layer always prefers word id `favourite`.
    fn biased_model(vocab_size: usize, favourite: usize) -> LanguageModel<B> {
        let device = Default::default();
        let mut model = LanguageModelConfig::new(vocab_size, 3, 4, RecurrentKind::Rnn)
            .init::<B>(&device);

        let mut bias = vec![0.0f32; vocab_size];
        bias[favourite] = 100.0;
        model.output.weight = Param::from_tensor(Tensor::zeros([4, vocab_size], &device));
        model.output.bias = Some(Param::from_tensor(
            Tensor::<B, 1>::from_floats(bias.as_slice(), &device),
        ));
        model
    }

    fn loader(samples: Vec<LmSample>, batch_size: usize) -> Arc<dyn DataLoader<LmBatch<B>>> {
        DataLoaderBuilder::new(LmBatcher::<B>::new(Default::default()))
            .batch_size(batch_size)
            .build(LmDataset::new(samples))
    }

    fn vocab() -> Vocabulary {
        // ids: <PAD>=0, a=1, b=2, c=3, <UNK>=4
        Vocabulary::from_words(["a", "b", "c"]).unwrap()
    }

    #[test]
    fn test_evaluate_averages_batches() {
        let model = biased_model(5, 2); // always predicts "b"
        let data = loader(vec![
            // batch 1: targets b, b → 1.0
            LmSample { input_ids: vec![1, 2, 0], target_ids: vec![2, 2, 0] },
            // batch 2: targets b, c, a → 1/3
            LmSample { input_ids: vec![1, 2, 3], target_ids: vec![2, 3, 1] },
        ], 1);

        let acc = evaluate(&model, data.as_ref(), 0);
        assert!((acc - (1.0 + 1.0 / 3.0) / 2.0).abs() < 1e-9, "acc = {acc}");
    }

    #[test]
    fn test_evaluate_empty_split() {
        let model = biased_model(5, 1);
        let data  = loader(Vec::new(), 4);
        assert_eq!(evaluate(&model, data.as_ref(), 0), 0.0);
    }

    #[test]
    fn test_incorrect_predictions_skip_padding_and_hits() {
        let model = biased_model(5, 1); // always predicts "a"
        let data = loader(vec![
            LmSample { input_ids: vec![1, 2, 3, 0], target_ids: vec![2, 1, 3, 0] },
        ], 2);

        let wrong = incorrect_predictions(&model, data.as_ref(), &vocab());
        let rendered: Vec<String> = wrong.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a|b", "a|c"]);
    }
}
