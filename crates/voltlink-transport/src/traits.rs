use crate::error::Result;

/// A connected, byte-oriented link to the device.
///
/// Implementations must use a short read timeout so the link loop can
/// observe its stop flag promptly.
pub trait Connection: Send {
    /// Read whatever bytes are available into `buf`.
    ///
    /// A read timeout with nothing received returns `Ok(0)` — silence is
    /// normal on this link and never an error. `Err` means the connection
    /// is broken and must be reopened.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write a complete message and flush it.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;
}

/// Opens connections to a fixed transport address.
///
/// The link manager calls this every reconnect attempt; availability is
/// expected to be intermittent, so failure is a routine outcome.
pub trait Connector: Send {
    type Conn: Connection;

    /// Attempt to open the transport.
    fn connect(&mut self) -> Result<Self::Conn>;

    /// The address this connector dials, for status messages.
    fn address(&self) -> &str;
}
