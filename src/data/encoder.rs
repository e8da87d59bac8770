// ============================================================
// Layer 4 — Sentence Encoder
// ============================================================
// Turns each sentence into one next-word prediction sample.
//
// For the sentence  "<s> Bob likes Sue </s>"  with max_len = 6:
//
//   ids      =  [s,  Bob, likes, Sue, /s]
//   input    =  [s,  Bob, likes, Sue, 0, 0]   ← all but the last word
//   target   =  [Bob, likes, Sue, /s, 0, 0]   ← all but the first word
//
// Position i of the target is the word that follows position i
// of the input, and padding (id 0) lines up in both rows. The
// loss and accuracy later ignore every position whose target is 0.

use anyhow::{ensure, Result};
use tokenizers::Tokenizer;

use crate::data::dataset::LmSample;
use crate::domain::vocabulary::{Vocabulary, PAD_ID};

/// Samples plus the bookkeeping worth logging.
#[derive(Debug, Clone, Default)]
pub struct EncodedCorpus {
    pub samples:             Vec<LmSample>,
    /// Sentences longer than max_len + 1 words
    pub truncated:           usize,
    /// Sentences with fewer than two words (nothing to predict)
    pub dropped:             usize,
    /// Words that fell back to <UNK>
    pub out_of_vocabulary:   usize,
}

/// Tokenise and shift every sentence into (input, target) rows of length `max_len`.
pub fn encode_sentences(
    sentences: &[String],
    tokenizer: &Tokenizer,
    vocab:     &Vocabulary,
    max_len:   usize,
) -> Result<EncodedCorpus> {
    ensure!(max_len > 0, "max_len must be at least 1");

    let unk_id  = vocab.unk_id();
    let mut out = EncodedCorpus::default();

    for sentence in sentences {
        let enc = tokenizer
            .encode(sentence.as_str(), false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        // A literal <PAD> in the text is a word, not padding.
        let ids: Vec<u32> = enc
            .get_ids()
            .iter()
            .map(|&id| if id == PAD_ID { unk_id } else { id })
            .collect();

        out.out_of_vocabulary += ids.iter().filter(|&&id| id == unk_id).count();

        if ids.len() < 2 {
            out.dropped += 1;
            continue;
        }
        if ids.len() > max_len + 1 {
            out.truncated += 1;
        }

        out.samples.push(shift_and_pad(&ids, max_len));
    }

    if out.out_of_vocabulary > 0 {
        tracing::warn!(
            "{} corpus words are not in the vocabulary and map to <UNK>",
            out.out_of_vocabulary
        );
    }
    if out.truncated > 0 {
        tracing::warn!("{} sentences truncated to {} predictions", out.truncated, max_len);
    }

    Ok(out)
}

/// `ids` must hold at least two entries.
fn shift_and_pad(ids: &[u32], max_len: usize) -> LmSample {
    let steps = (ids.len() - 1).min(max_len);

    let mut input_ids  = vec![PAD_ID; max_len];
    let mut target_ids = vec![PAD_ID; max_len];
    input_ids[..steps].copy_from_slice(&ids[..steps]);
    target_ids[..steps].copy_from_slice(&ids[1..=steps]);

    LmSample { input_ids, target_ids }
}
