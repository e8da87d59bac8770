// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model math lives here:
//
//   model.rs     — embedding → LSTM | GRU | RNN → vocab projection
//   rnn.rs       — the plain Elman cell (Burn ships LSTM and GRU only)
//   loss.rs      — padding-aware NLL loss and accuracy
//   trainer.rs   — epoch loop, Adam, clipping, best-on-dev checkpoint
//   evaluator.rs — split accuracy and the misprediction list

/// Recurrent language model architecture
pub mod model;

/// Elman RNN layer
pub mod rnn;

/// Masked loss and accuracy
pub mod loss;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Accuracy and misprediction scoring on a data split
pub mod evaluator;
