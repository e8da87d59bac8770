// ============================================================
// Layer 4 — Language Model Batcher
// ============================================================
// Implements Burn's Batcher trait to stack LmSamples into
// two Int tensors of shape [batch_size, max_len].
//
//   inputs  — the words the model reads
//   targets — the word that should come next at each position
//
// All samples are padded to the same length by the encoder, so
// stacking is a flatten followed by a reshape. The DataLoader
// hands over whatever is left at the end of an epoch as a
// smaller final batch.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::LmSample;

// ─── LmBatch ──────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct LmBatch<B: Backend> {
    /// Input word ids — shape: [batch_size, max_len]
    pub inputs: Tensor<B, 2, Int>,

    /// Next-word ids — shape: [batch_size, max_len], 0 = padding
    pub targets: Tensor<B, 2, Int>,
}

// ─── LmBatcher ────────────────────────────────────────────────────────────────
/// Holds the device so tensors land on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct LmBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> LmBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn stack(&self, rows: Vec<&[u32]>, max_len: usize) -> Tensor<B, 2, Int> {
        let batch_size = rows.len();
        let flat: Vec<i32> = rows
            .into_iter()
            .flat_map(|row| row.iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, max_len])
    }
}

impl<B: Backend> Batcher<LmSample, LmBatch<B>> for LmBatcher<B> {
    fn batch(&self, items: Vec<LmSample>) -> LmBatch<B> {
        let max_len = items[0].input_ids.len();

        let inputs  = self.stack(items.iter().map(|s| s.input_ids.as_slice()).collect(), max_len);
        let targets = self.stack(items.iter().map(|s| s.target_ids.as_slice()).collect(), max_len);

        LmBatch { inputs, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_labels() {
        let batcher = LmBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![
            LmSample { input_ids: vec![1, 3, 4], target_ids: vec![3, 4, 2] },
            LmSample { input_ids: vec![1, 5, 0], target_ids: vec![5, 2, 0] },
        ]);

        assert_eq!(batch.inputs.dims(),  [2, 3]);
        assert_eq!(batch.targets.dims(), [2, 3]);

        // targets come from target_ids, not a second copy of the inputs
        let targets: Vec<i64> = batch.targets.into_data().iter::<i64>().collect();
        assert_eq!(targets, vec![3, 4, 2, 5, 2, 0]);
        let inputs: Vec<i64> = batch.inputs.into_data().iter::<i64>().collect();
        assert_eq!(inputs, vec![1, 3, 4, 1, 5, 0]);
    }
}
