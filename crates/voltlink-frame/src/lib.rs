//! Streaming JSON object extraction from unframed serial text.
//!
//! The device emits concatenated JSON objects with no length prefix or
//! delimiter, split at arbitrary points by the transport. This crate
//! recovers framing by brace matching:
//! - Quoted spans are opaque (a `{` inside a string never opens an object)
//! - A backslash escapes exactly the next character
//! - A span is complete when brace depth returns to zero
//!
//! No partial reads, no buffer management in user code.

pub mod extract;
pub mod stream;

pub use extract::{extract_objects, DEFAULT_RESIDUAL_CAP};
pub use stream::ObjectStream;
