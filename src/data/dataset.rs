use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One sentence shifted into a next-word prediction sample.
/// Both rows have length max_len and share their padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmSample {
    pub input_ids:  Vec<u32>,
    pub target_ids: Vec<u32>,
}

impl LmSample {
    /// Number of real (non-padding) predictions in this sample
    pub fn num_targets(&self) -> usize {
        self.target_ids.iter().filter(|&&id| id != 0).count()
    }
}

pub struct LmDataset {
    samples: Vec<LmSample>,
}

impl LmDataset {
    pub fn new(samples: Vec<LmSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn target_count(&self) -> usize {
        self.samples.iter().map(LmSample::num_targets).sum()
    }
}

impl Dataset<LmSample> for LmDataset {
    fn get(&self, index: usize) -> Option<LmSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_count_ignores_padding() {
        let ds = LmDataset::new(vec![
            LmSample { input_ids: vec![1, 2, 0], target_ids: vec![2, 3, 0] },
            LmSample { input_ids: vec![4, 0, 0], target_ids: vec![5, 0, 0] },
        ]);
        assert_eq!(ds.sample_count(), 2);
        assert_eq!(ds.target_count(), 3);
        assert_eq!(ds.get(1).unwrap().num_targets(), 1);
        assert!(ds.get(2).is_none());
    }
}
