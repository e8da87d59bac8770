// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only structs, enums, and traits

// Word <-> id mapping with <PAD> and <UNK>
pub mod vocabulary;

// A single wrong next-word guess, plus aggregation
pub mod prediction;

// Core abstractions that other layers implement
pub mod traits;
