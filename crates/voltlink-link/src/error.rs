/// Errors that can occur setting up the link.
///
/// Steady-state link failures (open, read, decode, command write) are
/// never raised — they surface as status text in the shared snapshot and
/// the loop recovers on its own.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The link thread could not be spawned.
    #[error("failed to spawn link thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LinkError>;
