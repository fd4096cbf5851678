use tracing::debug;

use crate::extract::{extract_objects, DEFAULT_RESIDUAL_CAP};

/// Accumulates raw chunks and yields complete objects as they close.
///
/// Owns the residual between reads — callers feed whatever the transport
/// delivered and get back only complete objects.
pub struct ObjectStream {
    buf: String,
    residual_cap: usize,
}

impl ObjectStream {
    /// Create a stream with the default residual cap.
    pub fn new() -> Self {
        Self::with_residual_cap(DEFAULT_RESIDUAL_CAP)
    }

    /// Create a stream with an explicit residual cap.
    pub fn with_residual_cap(residual_cap: usize) -> Self {
        Self {
            buf: String::new(),
            residual_cap,
        }
    }

    /// Append a chunk and extract every object completed by it.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buf.push_str(chunk);
        let (objects, residual) = extract_objects(&self.buf, self.residual_cap);
        if objects.is_empty() && residual.len() < self.buf.len() {
            debug!(
                discarded = self.buf.len() - residual.len(),
                "dropped unframed input beyond residual cap"
            );
        }
        self.buf = residual;
        objects
    }

    /// Discard any buffered partial data. Called on reconnect: bytes from a
    /// previous session must not be stitched onto the new stream.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// The currently buffered, not-yet-framed text.
    pub fn pending(&self) -> &str {
        &self.buf
    }
}

impl Default for ObjectStream {
    fn default() -> Self {
        Self::new()
    }
}
