// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Persists the vocabulary as a HuggingFace WordLevel tokenizer.
//
// The tokenizer splits on whitespace only and applies no
// normalisation, so every corpus token maps to exactly the id
// the Vocabulary assigned it; anything else becomes <UNK>.
// The JSON is built by hand and parsed back, which keeps us off
// the trainer APIs that change between tokenizers releases.

use anyhow::{Context, Result};
use std::{path::PathBuf, str::FromStr};
use tokenizers::Tokenizer;

use crate::domain::vocabulary::{Vocabulary, PAD_ID, PAD_TOKEN, UNK_TOKEN};

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    fn path(&self) -> PathBuf {
        self.dir.join("tokenizer.json")
    }

    /// Write the tokenizer for `vocab` to disk and return it.
    pub fn build_and_save(&self, vocab: &Vocabulary) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let json = tokenizer_json(vocab);
        let path = self.path();
        std::fs::write(&path, serde_json::to_string_pretty(&json)?)
            .with_context(|| "Cannot write tokenizer JSON")?;

        tracing::info!(
            "Tokenizer built with {} ids, saved to '{}'",
            vocab.len(),
            path.display()
        );

        self.load()
    }

    /// Load a previously saved tokenizer from JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    /// Recover the id table the tokenizer was built from.
    pub fn vocabulary(tokenizer: &Tokenizer) -> Result<Vocabulary> {
        Vocabulary::from_id_map(&tokenizer.get_vocab(true))
            .context("Tokenizer vocabulary is not a valid word-level table")
    }
}

/// Build the tokenizer in memory without touching disk.
pub fn word_level_tokenizer(vocab: &Vocabulary) -> Result<Tokenizer> {
    let json = tokenizer_json(vocab).to_string();
    Tokenizer::from_str(&json)
        .map_err(|e| anyhow::anyhow!("Cannot build tokenizer: {e}"))
}

fn tokenizer_json(vocab: &Vocabulary) -> serde_json::Value {
    let special = |id: u32, content: &str| serde_json::json!({
        "id": id, "content": content, "single_word": false, "lstrip": false,
        "rstrip": false, "normalized": false, "special": true
    });

    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            special(PAD_ID, PAD_TOKEN),
            special(vocab.unk_id(), UNK_TOKEN),
        ],
        "normalizer": null,
        "pre_tokenizer": {
            "type": "WhitespaceSplit"
        },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab.to_id_map(),
            "unk_token": UNK_TOKEN
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::from_words(["<s>", "</s>", "Bob", "bob", "."]).unwrap()
    }

    #[test]
    fn test_ids_match_vocabulary() {
        let v   = vocab();
        let tok = word_level_tokenizer(&v).unwrap();
        let enc = tok.encode("<s> Bob bob . </s>", false).unwrap();
        let expected: Vec<u32> = ["<s>", "Bob", "bob", ".", "</s>"]
            .iter()
            .map(|w| v.id(w).unwrap())
            .collect();
        assert_eq!(enc.get_ids(), expected.as_slice());
    }

    #[test]
    fn test_unknown_word_maps_to_unk() {
        let v   = vocab();
        let tok = word_level_tokenizer(&v).unwrap();
        let enc = tok.encode("Bob Alice", false).unwrap();
        assert_eq!(enc.get_ids(), &[v.id("Bob").unwrap(), v.unk_id()]);
    }

    #[test]
    fn test_save_load_and_recover_vocabulary() {
        let dir = std::env::temp_dir().join("word_rnn_lm_tokenizer_tests");
        let store = TokenizerStore::new(dir.to_string_lossy().into_owned());
        let v = vocab();

        store.build_and_save(&v).unwrap();
        let tok = store.load().unwrap();
        let recovered = TokenizerStore::vocabulary(&tok).unwrap();

        assert_eq!(recovered.len(), v.len());
        for id in 0..v.len() as u32 {
            assert_eq!(recovered.word(id), v.word(id));
        }
    }
}
