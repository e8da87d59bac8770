// ============================================================
// Layer 4 — Text Loader
// ============================================================
// Reads the plain-text corpus files: one sentence per line,
// words separated by whitespace. The vocabulary file uses the
// same format, so it is read through the same path.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::traits::CorpusSource;

/// Loads one sentence per line from a UTF-8 text file.
/// Implements the CorpusSource trait from Layer 3.
pub struct TextFileLoader {
    path: PathBuf,
}

impl TextFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for TextFileLoader {
    fn sentences(&self) -> Result<Vec<String>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;

        let sentences: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!(
            "Read {} sentences from '{}'",
            sentences.len(),
            self.path.display()
        );
        Ok(sentences)
    }
}

/// Every whitespace-separated token of the vocabulary file, in order.
pub fn read_vocabulary_words(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read vocabulary '{}'", path.display()))?;

    Ok(text.split_whitespace().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("word_rnn_lm_loader_tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_lines_are_trimmed_and_blanks_skipped() {
        let path = scratch_file(
            "corpus.txt",
            "<s> Bob went home . </s>\n\n   <s> Sue stayed . </s>  \r\n",
        );
        let sentences = TextFileLoader::new(&path).sentences().unwrap();
        assert_eq!(
            sentences,
            vec!["<s> Bob went home . </s>", "<s> Sue stayed . </s>"]
        );
    }

    #[test]
    fn test_missing_corpus_is_an_error() {
        let loader = TextFileLoader::new("/definitely/not/here.txt");
        let err = loader.sentences().unwrap_err();
        assert!(err.to_string().contains("Cannot read corpus"));
    }

    #[test]
    fn test_vocabulary_words_in_order() {
        let path = scratch_file("vocab.txt", "<s>\n</s>\nBob\nSue went\n");
        let words = read_vocabulary_words(&path).unwrap();
        assert_eq!(words, vec!["<s>", "</s>", "Bob", "Sue", "went"]);
    }
}
