// ============================================================
// Layer 3 — Misprediction Domain Type
// ============================================================
// One position where the model's most likely next word was
// not the word that actually followed in the corpus.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Misprediction {
    /// The argmax word
    pub predicted: String,
    /// The word in the corpus
    pub expected: String,
}

impl Misprediction {
    pub fn new(predicted: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            predicted: predicted.into(),
            expected:  expected.into(),
        }
    }
}

/// Rendered as `predicted|expected`, one per line in the report.
impl fmt::Display for Misprediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.predicted, self.expected)
    }
}

/// Group identical confusions, most frequent first.
/// Ties are ordered by their rendered text so output is stable.
pub fn confusion_counts(mispredictions: &[Misprediction]) -> Vec<(Misprediction, usize)> {
    let mut counts: HashMap<&Misprediction, usize> = HashMap::new();
    for m in mispredictions {
        *counts.entry(m).or_insert(0) += 1;
    }

    let mut ranked: Vec<(Misprediction, usize)> = counts
        .into_iter()
        .map(|(m, n)| (m.clone(), n))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
    });
    ranked
}
