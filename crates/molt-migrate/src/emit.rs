// crates/molt-migrate/src/emit.rs
//
// Provenance emitter: renders one pretty-printed JSON document per
// completed action and flushes it before the pipeline advances, so the
// printed prefix is always a valid resumption checkpoint.

use std::io::Write;

use molt_core::{MoltError, ProvenanceEntry};

/// Writes provenance entries to an output stream, one flushed document per
/// completed action. No batching.
pub struct ProvenanceWriter<W: Write> {
    out: W,
}

impl<W: Write> ProvenanceWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Render one entry, terminate it with the platform line separator,
    /// and flush.
    pub fn emit(&mut self, entry: &ProvenanceEntry) -> Result<(), MoltError> {
        let rendered = serde_json::to_string_pretty(entry)?;
        writeln!(self.out, "{}", rendered)?;
        self.out.flush()?;
        Ok(())
    }

    /// Recover the underlying writer (used by tests to inspect output).
    pub fn into_inner(self) -> W {
        self.out
    }
}
