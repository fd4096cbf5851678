//! Serial transport abstraction for the device link.
//!
//! The physical link is a Bluetooth virtual COM port: frequently absent,
//! prone to partial failure, and silent for long stretches. The traits here
//! draw the seam the link manager reconnects across, and the serial
//! implementation maps read timeouts to "no data" rather than errors so
//! silence never tears the link down.

pub mod discover;
pub mod error;
pub mod serial;
pub mod traits;

pub use discover::{discover_port, list_ports};
pub use error::{Result, TransportError};
pub use serial::{SerialConfig, SerialConnection, SerialConnector, DEFAULT_BAUD};
pub use traits::{Connection, Connector};
