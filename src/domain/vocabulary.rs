// ============================================================
// Layer 3 — Vocabulary Domain Type
// ============================================================
// Two-way mapping between words and integer ids.
//
// Id layout:
//   0         → <PAD>  (fills the tail of every short sentence)
//   1..=n     → vocabulary words, in first-appearance order
//   n + 1     → <UNK>  (corpus words missing from the vocab file)
//
// The embedding table and the output projection both have
// exactly `len()` rows, so ids must stay dense.

use std::collections::HashMap;

use anyhow::{bail, ensure, Result};

pub const PAD_TOKEN: &str = "<PAD>";
pub const UNK_TOKEN: &str = "<UNK>";
pub const PAD_ID: u32 = 0;

#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_to_id: HashMap<String, u32>,
    id_to_word: Vec<String>,
}

impl Vocabulary {
    /// Build from the raw token stream of a vocabulary file.
    /// Repeated words keep the id of their first appearance.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut id_to_word = vec![PAD_TOKEN.to_string()];
        let mut word_to_id = HashMap::new();
        word_to_id.insert(PAD_TOKEN.to_string(), PAD_ID);

        for word in words {
            let word = word.as_ref();
            if word_to_id.contains_key(word) {
                continue;
            }
            word_to_id.insert(word.to_string(), id_to_word.len() as u32);
            id_to_word.push(word.to_string());
        }

        ensure!(id_to_word.len() > 1, "vocabulary has no words");

        if !word_to_id.contains_key(UNK_TOKEN) {
            word_to_id.insert(UNK_TOKEN.to_string(), id_to_word.len() as u32);
            id_to_word.push(UNK_TOKEN.to_string());
        }

        Ok(Self { word_to_id, id_to_word })
    }

    /// Rebuild from a persisted `word -> id` map.
    pub fn from_id_map(map: &HashMap<String, u32>) -> Result<Self> {
        let mut id_to_word = vec![String::new(); map.len()];
        for (word, &id) in map {
            let slot = id_to_word.get_mut(id as usize).ok_or_else(|| {
                anyhow::anyhow!("id {id} for '{word}' is outside 0..{}", map.len())
            })?;
            if !slot.is_empty() {
                bail!("id {id} is assigned to both '{slot}' and '{word}'");
            }
            *slot = word.clone();
        }

        ensure!(
            map.get(PAD_TOKEN) == Some(&PAD_ID),
            "{PAD_TOKEN} must have id {PAD_ID}"
        );
        ensure!(map.contains_key(UNK_TOKEN), "{UNK_TOKEN} is missing");

        Ok(Self { word_to_id: map.clone(), id_to_word })
    }

    pub fn id(&self, word: &str) -> Option<u32> {
        self.word_to_id.get(word).copied()
    }

    /// Ids outside the table render as <UNK>.
    pub fn word(&self, id: u32) -> &str {
        self.id_to_word
            .get(id as usize)
            .map(String::as_str)
            .unwrap_or(UNK_TOKEN)
    }

    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }

    pub fn pad_id(&self) -> u32 {
        PAD_ID
    }

    pub fn unk_id(&self) -> u32 {
        self.word_to_id[UNK_TOKEN]
    }

    pub fn to_id_map(&self) -> HashMap<String, u32> {
        self.word_to_id.clone()
    }
}
