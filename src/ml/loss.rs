// ============================================================
// Layer 5 — Padding-aware Loss and Accuracy
// ============================================================
// Every sentence is padded to max_len, so most target positions
// in a batch are <PAD>. Both the loss and the accuracy look only
// at positions whose target id differs from the pad id:
//
//   mask      = targets != pad                         [N]
//   nll       = -log_softmax(logits)[i, targets[i]]    [N]
//   loss      = sum(nll * mask) / sum(mask)
//   accuracy  = sum((argmax(logits) == targets) * mask) / sum(mask)

use burn::{prelude::*, tensor::activation::log_softmax};

/// Correct and scored predictions for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchAccuracy {
    pub correct: usize,
    pub total:   usize,
}

impl BatchAccuracy {
    /// `None` when the batch had no real targets
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct as f64 / self.total as f64)
    }
}

/// logits: [N, vocab], targets: [N] → mean NLL over non-padding targets, shape [1].
pub fn masked_nll_loss<B: Backend>(
    logits:  Tensor<B, 2>,
    targets: Tensor<B, 1, Int>,
    pad_id:  u32,
) -> Tensor<B, 1> {
    let [n] = targets.dims();

    let mask = targets.clone().not_equal_elem(pad_id as i32).float();
    let picked = log_softmax(logits, 1)
        .gather(1, targets.reshape([n, 1]))
        .reshape([n]);

    let total = mask.clone().sum().clamp_min(1.0);
    (picked * mask).sum().neg() / total
}

/// logits: [N, vocab], targets: [N]
pub fn masked_accuracy<B: Backend>(
    logits:  Tensor<B, 2>,
    targets: Tensor<B, 1, Int>,
    pad_id:  u32,
) -> BatchAccuracy {
    let predictions = argmax_rows(logits);
    let mask = targets.clone().not_equal_elem(pad_id as i32).int();

    let correct = predictions.equal(targets).int() * mask.clone();

    BatchAccuracy {
        correct: correct.sum().into_scalar().elem::<i64>() as usize,
        total:   mask.sum().into_scalar().elem::<i64>() as usize,
    }
}

/// logits: [N, vocab] → most likely class per row, shape [N]
pub fn argmax_rows<B: Backend>(logits: Tensor<B, 2>) -> Tensor<B, 1, Int> {
    let [n, _] = logits.dims();
    logits.argmax(1).reshape([n])
}
