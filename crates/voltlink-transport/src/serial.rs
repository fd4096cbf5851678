use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{Connection, Connector};

/// Device-side UART rate; fixed by firmware.
pub const DEFAULT_BAUD: u32 = 115_200;

/// Short read timeout so the link loop stays responsive to its stop flag.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Serial port configuration.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Port address, e.g. "COM3" or "/dev/rfcomm0".
    pub address: String,
    /// Baud rate.
    pub baud: u32,
    /// Per-read timeout.
    pub read_timeout: Duration,
}

impl SerialConfig {
    /// Config for `address` with default baud and read timeout.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            baud: DEFAULT_BAUD,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Opens serial connections at a fixed address.
pub struct SerialConnector {
    config: SerialConfig,
}

impl SerialConnector {
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

impl Connector for SerialConnector {
    type Conn = SerialConnection;

    fn connect(&mut self) -> Result<SerialConnection> {
        debug!(address = %self.config.address, baud = self.config.baud, "opening serial port");
        let port = serialport::new(&self.config.address, self.config.baud)
            .timeout(self.config.read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                address: self.config.address.clone(),
                source,
            })?;
        info!(address = %self.config.address, "serial port open");
        Ok(SerialConnection { port })
    }

    fn address(&self) -> &str {
        &self.config.address
    }
}

/// An open serial connection.
pub struct SerialConnection {
    port: Box<dyn serialport::SerialPort>,
}

impl std::fmt::Debug for SerialConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialConnection").finish_non_exhaustive()
    }
}

impl Connection for SerialConnection {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            // Timeout with no bytes is the steady state between packets.
            Err(err) if err.kind() == ErrorKind::TimedOut => Ok(0),
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(err) if err.kind() == ErrorKind::Interrupted => Ok(0),
            Err(err) => Err(TransportError::Io(err)),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = SerialConfig::new("COM3");
        assert_eq!(config.address, "COM3");
        assert_eq!(config.baud, DEFAULT_BAUD);
        assert_eq!(config.read_timeout, DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn connector_reports_address() {
        let connector = SerialConnector::new(SerialConfig::new("/dev/rfcomm0"));
        assert_eq!(connector.address(), "/dev/rfcomm0");
    }

    #[test]
    fn open_of_missing_port_is_open_error() {
        let mut connector =
            SerialConnector::new(SerialConfig::new("/dev/voltlink-no-such-port"));
        let err = connector.connect().unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
    }
}
