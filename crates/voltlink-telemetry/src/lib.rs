//! Telemetry packet decoding, logical key catalog and display formatting.
//!
//! Firmware revisions rename wire fields, so every logical key owns an
//! ordered list of acceptable raw names; resolution always prefers the
//! first alias present in the packet. Formatting is unit- and noise-aware
//! and never fails — unexpected value shapes degrade to a raw textual
//! rendering.

pub mod error;
pub mod format;
pub mod keys;
pub mod packet;

pub use error::{Result, TelemetryError};
pub use format::{format_pin, format_value, NOT_APPLICABLE, UNKNOWN};
pub use keys::{PinKey, TelemetryKey};
pub use packet::TelemetryPacket;
