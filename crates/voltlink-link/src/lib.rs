//! Link management for the device connection.
//!
//! This is the "just works" layer: a long-lived loop that opens the
//! transport, recovers framing from whatever arrives, folds decoded
//! telemetry into a shared snapshot, and relays operator commands back —
//! reconnecting forever, because the physical link comes and goes.
//!
//! No error reachable from steady-state operation is fatal; everything is
//! surfaced as a human-readable status string in the snapshot.

pub mod command;
pub mod error;
pub mod manager;
pub mod state;

pub use command::CommandIntent;
pub use error::{LinkError, Result};
pub use manager::{spawn, LinkConfig, LinkHandle, LinkManager};
pub use state::{ConnectionState, Snapshot, StateHandle};
