// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no model math here, and no
// argument parsing (that's Layer 1).

// Train, evaluate, and report on the test split
pub mod train_use_case;

// Misprediction report from a saved checkpoint
pub mod report_use_case;
