// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the text files and tensor batches:
//
//   vocab / corpus files
//       │
//       ▼
//   TextFileLoader    → trimmed sentences, one per line
//       │
//       ▼
//   encode_sentences  → shifted, padded (input, target) id rows
//       │
//       ▼
//   LmDataset         → implements Burn's Dataset trait
//       │
//       ▼
//   LmBatcher         → stacks samples into [batch, max_len] tensors

/// Reads corpus and vocabulary text files
pub mod loader;

/// Builds next-word samples from sentences
pub mod encoder;

/// Implements Burn's Dataset trait for LM samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
