/// Errors that can occur in serial transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the port (unavailable, busy, or nonexistent).
    #[error("failed to open {address}: {source}")]
    Open {
        address: String,
        source: serialport::Error,
    },

    /// An I/O error occurred on an open connection.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port enumeration failed.
    #[error("port discovery failed: {0}")]
    Discovery(serialport::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
