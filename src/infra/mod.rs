// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
//   checkpoint.rs      — best-model weights (CompactRecorder)
//                        and the TrainConfig as JSON
//
//   tokenizer_store.rs — the vocabulary as a word-level
//                        tokenizers JSON file
//
//   metrics.rs         — per-epoch CSV log

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Word-level tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;
