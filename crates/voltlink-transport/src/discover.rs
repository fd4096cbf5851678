use serialport::{SerialPortInfo, SerialPortType};
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};

/// Pick the transport address for the device.
///
/// Scans the available ports and returns the first one that looks like a
/// Bluetooth virtual COM port; when none is found (or enumeration itself
/// fails) the provided fallback is returned. Called once at startup.
pub fn discover_port(fallback: &str) -> String {
    match serialport::available_ports() {
        Ok(ports) => {
            for port in &ports {
                if is_bluetooth(&port.port_type) {
                    info!(address = %port.port_name, "discovered bluetooth serial port");
                    return port.port_name.clone();
                }
            }
            debug!(%fallback, "no bluetooth port found, using fallback");
            fallback.to_string()
        }
        Err(err) => {
            warn!(%err, %fallback, "port enumeration failed, using fallback");
            fallback.to_string()
        }
    }
}

/// Enumerate available serial ports.
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    serialport::available_ports().map_err(TransportError::Discovery)
}

/// Whether a port looks like the Bluetooth virtual COM port the device
/// registers. Some stacks expose it as a USB device whose product string
/// mentions Bluetooth instead of tagging the port type.
pub fn is_bluetooth(port_type: &SerialPortType) -> bool {
    match port_type {
        SerialPortType::BluetoothPort => true,
        SerialPortType::UsbPort(usb) => usb
            .product
            .as_deref()
            .is_some_and(|product| product.to_ascii_lowercase().contains("bluetooth")),
        _ => false,
    }
}
