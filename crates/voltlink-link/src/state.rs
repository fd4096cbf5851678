use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use voltlink_telemetry::TelemetryPacket;

/// Where the link currently stands. Exactly one state is active; the link
/// loop alone drives transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

/// An atomically-consistent copy of the shared link state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Newest successfully decoded packet, if any yet.
    pub packet: Option<TelemetryPacket>,
    /// Newest raw chunk as received (lossily decoded text).
    pub raw: String,
    /// Human-readable status line; every error surfaces here.
    pub status: String,
    /// Current connection state.
    pub state: ConnectionState,
}

impl Snapshot {
    fn initial() -> Self {
        Self {
            packet: None,
            raw: String::new(),
            status: "waiting for connection".to_string(),
            state: ConnectionState::Disconnected,
        }
    }
}

/// Single point of truth between the link loop and its consumers.
///
/// One writer role (the link loop), any number of reader snapshots. Every
/// mutation updates its fields under a single lock acquisition, and readers
/// take a full copy under the lock and release before rendering — so
/// rendering never blocks the link thread and no torn update is observable.
#[derive(Clone)]
pub struct StateHandle {
    inner: Arc<Mutex<Snapshot>>,
}

impl StateHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Snapshot::initial())),
        }
    }

    /// Full copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    pub(crate) fn publish_state(&self, state: ConnectionState, status: impl Into<String>) {
        let mut guard = self.lock();
        guard.state = state;
        guard.status = status.into();
    }

    pub(crate) fn publish_status(&self, status: impl Into<String>) {
        self.lock().status = status.into();
    }

    pub(crate) fn publish_raw(&self, chunk: &str) {
        self.lock().raw = chunk.to_string();
    }

    pub(crate) fn publish_packet(&self, packet: TelemetryPacket, status: impl Into<String>) {
        let mut guard = self.lock();
        guard.packet = Some(packet);
        guard.status = status.into();
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        // A panic while holding the lock leaves the data merely stale, not
        // invalid; keep serving it rather than propagating the poison.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}
