// ============================================================
// Layer 3 — Core Traits
// ============================================================
// The application layer reads sentences through CorpusSource,
// so the use cases never depend on where sentences come from.

use anyhow::Result;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that yields one sentence per item.
///
/// Implementations:
///   - TextFileLoader → one sentence per line of a UTF-8 file
pub trait CorpusSource {
    /// Load every non-blank sentence, trimmed, in source order.
    fn sentences(&self) -> Result<Vec<String>>;
}

