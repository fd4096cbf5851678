use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};
use voltlink_frame::ObjectStream;
use voltlink_telemetry::{PinKey, TelemetryPacket};
use voltlink_transport::{Connection, Connector};

use crate::command::CommandIntent;
use crate::error::Result;
use crate::state::{ConnectionState, Snapshot, StateHandle};

/// Link loop configuration.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Fixed delay before retrying after a failed open or a broken read.
    pub reconnect_delay: Duration,
    /// Per-iteration read buffer size.
    pub read_buf: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(1),
            read_buf: 512,
        }
    }
}

/// Cloneable handle consumers use to observe the link and issue commands.
#[derive(Clone)]
pub struct LinkHandle {
    state: StateHandle,
    commands: Sender<CommandIntent>,
    stop: Arc<AtomicBool>,
}

impl LinkHandle {
    /// Non-blocking full copy of the shared state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state.snapshot().state
    }

    /// Queue a pin-set command for the link loop to write.
    ///
    /// Best-effort: while disconnected this performs no write and raises no
    /// error. A send failure on the wire is recorded as status text only.
    pub fn send_command(&self, pin: PinKey, value: bool) {
        if !self.connection_state().is_connected() {
            debug!(pin = pin.name(), "dropping command, link not connected");
            return;
        }
        let _ = self.commands.send(CommandIntent::new(pin, value));
    }

    /// Request cooperative shutdown. The loop exits after its current
    /// iteration; worst case one read timeout plus cleanup.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Owns the transport and drives the connect/read/reconnect loop.
pub struct LinkManager<C: Connector> {
    connector: C,
    config: LinkConfig,
    state: StateHandle,
    commands: Receiver<CommandIntent>,
    stop: Arc<AtomicBool>,
}

impl<C: Connector> LinkManager<C> {
    pub fn new(connector: C, config: LinkConfig) -> (Self, LinkHandle) {
        let state = StateHandle::new();
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let handle = LinkHandle {
            state: state.clone(),
            commands: tx,
            stop: stop.clone(),
        };
        let manager = Self {
            connector,
            config,
            state,
            commands: rx,
            stop,
        };
        (manager, handle)
    }

    /// The long-lived loop. Returns only after the stop flag is raised.
    ///
    /// State machine: Disconnected → (open ok) → Connected → (read fails)
    /// → Disconnected, with a fixed backoff before every retry. The outer
    /// reconnect retry is unbounded by design — transport availability is
    /// expected to be intermittent.
    pub fn run(mut self) {
        let mut conn: Option<C::Conn> = None;
        let mut stream = ObjectStream::new();
        let mut buf = vec![0u8; self.config.read_buf.max(1)];

        while !self.stop.load(Ordering::SeqCst) {
            match conn.take() {
                None => {
                    self.discard_commands();
                    conn = self.try_connect(&mut stream);
                }
                Some(mut active) => {
                    if self.service(&mut active, &mut stream, &mut buf) {
                        conn = Some(active);
                    } else {
                        self.state.publish_state(
                            ConnectionState::Disconnected,
                            format!("disconnected from {}", self.connector.address()),
                        );
                        self.sleep_backoff();
                    }
                }
            }
        }

        if conn.is_some() {
            debug!("stop requested, closing transport");
        }
        info!("link loop stopped");
    }

    /// One open attempt. On failure publishes the reason and backs off.
    fn try_connect(&mut self, stream: &mut ObjectStream) -> Option<C::Conn> {
        let address = self.connector.address().to_string();
        self.state
            .publish_state(ConnectionState::Connecting, format!("connecting to {address}"));

        match self.connector.connect() {
            Ok(conn) => {
                // Bytes from a previous session must not leak into this one.
                stream.reset();
                info!(%address, "link connected");
                self.state.publish_state(
                    ConnectionState::Connected,
                    format!("connected to {address}, waiting for data"),
                );
                Some(conn)
            }
            Err(err) => {
                warn!(%address, %err, "connect failed");
                self.state
                    .publish_state(ConnectionState::Error, format!("connect failed: {err}"));
                self.sleep_backoff();
                None
            }
        }
    }

    /// One connected iteration: relay queued commands, then read.
    ///
    /// Returns `false` when the connection is broken and must be reopened.
    fn service(&mut self, conn: &mut C::Conn, stream: &mut ObjectStream, buf: &mut [u8]) -> bool {
        self.relay_commands(conn);

        match conn.read_chunk(buf) {
            // Timeout with no bytes: the steady state between packets.
            Ok(0) => true,
            Ok(n) => {
                self.ingest(&buf[..n], stream);
                true
            }
            Err(err) => {
                warn!(%err, "read failed, reopening transport");
                false
            }
        }
    }

    /// Fold a received chunk into the stream and decode whatever completed.
    ///
    /// Each object is decoded independently in arrival order; the last
    /// successful decode wins and a failed decode never suppresses later
    /// objects or tears the connection down.
    fn ingest(&self, bytes: &[u8], stream: &mut ObjectStream) {
        let chunk = decode_lossy(bytes);
        self.state.publish_raw(&chunk);

        let objects = stream.push(&chunk);
        if objects.is_empty() {
            self.state.publish_status("waiting for a complete object");
            return;
        }

        for object in objects {
            match TelemetryPacket::from_json_str(&object) {
                Ok(packet) => {
                    let status = format!("parsed ok ({} fields)", packet.field_count());
                    debug!(fields = packet.field_count(), "telemetry packet decoded");
                    self.state.publish_packet(packet, status);
                }
                Err(err) => {
                    debug!(%err, "telemetry decode failed");
                    self.state.publish_status(format!("decode error: {err}"));
                }
            }
        }
    }

    /// Write every queued command. A write failure is recorded as status;
    /// the command is dropped and the connection kept (commands are
    /// best-effort, reads decide the connection's fate).
    fn relay_commands(&self, conn: &mut C::Conn) {
        for intent in self.commands.try_iter() {
            debug!(pin = intent.pin.name(), value = intent.value, "sending command");
            if let Err(err) = conn.write_all(&intent.encode()) {
                warn!(%err, "command write failed");
                self.state
                    .publish_status(format!("command send failed: {err}"));
            }
        }
    }

    /// Commands queued while disconnected are discarded, not buffered.
    fn discard_commands(&self) {
        let discarded = self.commands.try_iter().count();
        if discarded > 0 {
            debug!(discarded, "discarded commands queued while disconnected");
        }
    }

    fn sleep_backoff(&self) {
        std::thread::sleep(self.config.reconnect_delay);
    }
}

/// Start the link loop on its own named OS thread.
pub fn spawn<C>(connector: C, config: LinkConfig) -> Result<(LinkHandle, JoinHandle<()>)>
where
    C: Connector + 'static,
{
    let (manager, handle) = LinkManager::new(connector, config);
    let join = std::thread::Builder::new()
        .name("voltlink-link".to_string())
        .spawn(move || manager.run())?;
    Ok((handle, join))
}

/// Lenient text decode: undecodable bytes are dropped, not fatal.
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&ch| ch != char::REPLACEMENT_CHARACTER)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Instant;

    use voltlink_transport::TransportError;

    use super::*;

    /// Scripted read behavior for one fake connection.
    enum Step {
        Data(&'static str),
        Silence,
        Fail,
    }

    struct FakeConn {
        steps: VecDeque<Step>,
        writes: Arc<Mutex<Vec<Vec<u8>>>>,
        fail_writes: bool,
    }

    impl Connection for FakeConn {
        fn read_chunk(&mut self, buf: &mut [u8]) -> voltlink_transport::Result<usize> {
            match self.steps.pop_front() {
                Some(Step::Data(text)) => {
                    let bytes = text.as_bytes();
                    buf[..bytes.len()].copy_from_slice(bytes);
                    Ok(bytes.len())
                }
                Some(Step::Silence) | None => {
                    // Mimic the serial read timeout pace.
                    std::thread::sleep(Duration::from_millis(1));
                    Ok(0)
                }
                Some(Step::Fail) => Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "device went away",
                ))),
            }
        }

        fn write_all(&mut self, data: &[u8]) -> voltlink_transport::Result<()> {
            if self.fail_writes {
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "write refused",
                )));
            }
            self.writes
                .lock()
                .unwrap()
                .push(data.to_vec());
            Ok(())
        }
    }

    /// Each `connect` call pops the next scripted session.
    struct FakeConnector {
        sessions: VecDeque<std::result::Result<Vec<Step>, ()>>,
        writes: Arc<Mutex<Vec<Vec<u8>>>>,
        attempts: Arc<Mutex<usize>>,
        fail_writes: bool,
    }

    impl FakeConnector {
        fn new(sessions: Vec<std::result::Result<Vec<Step>, ()>>) -> Self {
            Self {
                sessions: sessions.into(),
                writes: Arc::new(Mutex::new(Vec::new())),
                attempts: Arc::new(Mutex::new(0)),
                fail_writes: false,
            }
        }
    }

    impl Connector for FakeConnector {
        type Conn = FakeConn;

        fn connect(&mut self) -> voltlink_transport::Result<FakeConn> {
            *self.attempts.lock().unwrap() += 1;
            match self.sessions.pop_front() {
                Some(Ok(steps)) => Ok(FakeConn {
                    steps: steps.into(),
                    writes: self.writes.clone(),
                    fail_writes: self.fail_writes,
                }),
                Some(Err(())) | None => Err(TransportError::Open {
                    address: "FAKE0".to_string(),
                    source: serialport::Error::new(serialport::ErrorKind::NoDevice, "no device"),
                }),
            }
        }

        fn address(&self) -> &str {
            "FAKE0"
        }
    }

    fn test_config() -> LinkConfig {
        LinkConfig {
            reconnect_delay: Duration::from_millis(5),
            read_buf: 64,
        }
    }

    fn start(connector: FakeConnector) -> (LinkHandle, JoinHandle<()>) {
        spawn(connector, test_config()).expect("link thread should spawn")
    }

    fn wait_for(handle: &LinkHandle, what: &str, pred: impl Fn(&Snapshot) -> bool) -> Snapshot {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let snap = handle.snapshot();
            if pred(&snap) {
                return snap;
            }
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {what}; last status: {}",
                snap.status
            );
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    fn finish(handle: LinkHandle, join: JoinHandle<()>) {
        handle.stop();
        join.join().expect("link thread should exit cleanly");
    }

    #[test]
    fn connects_and_publishes_packet_split_across_reads() {
        let connector = FakeConnector::new(vec![Ok(vec![
            Step::Data(r#"{"vbat":12.0"#),
            Step::Data(r#"3,"soc":81.2}"#),
        ])]);
        let (handle, join) = start(connector);

        let snap = wait_for(&handle, "decoded packet", |s| s.packet.is_some());
        assert_eq!(snap.state, ConnectionState::Connected);
        assert_eq!(snap.status, "parsed ok (2 fields)");
        let packet = snap.packet.unwrap();
        assert!(packet.raw("vbat").is_some());

        finish(handle, join);
    }

    #[test]
    fn publishes_raw_chunk_and_waiting_status_for_partial_object() {
        let connector = FakeConnector::new(vec![Ok(vec![Step::Data(r#"{"half":"#)])]);
        let (handle, join) = start(connector);

        let snap = wait_for(&handle, "raw chunk", |s| !s.raw.is_empty());
        assert_eq!(snap.raw, r#"{"half":"#);
        assert_eq!(snap.status, "waiting for a complete object");
        assert!(snap.packet.is_none());

        finish(handle, join);
    }

    #[test]
    fn read_failure_reconnects_and_resumes() {
        let connector = FakeConnector::new(vec![
            Ok(vec![Step::Data(r#"{"soc":10.0}"#), Step::Fail]),
            Ok(vec![Step::Data(r#"{"soc":20.0}"#)]),
        ]);
        let attempts = connector.attempts.clone();
        let (handle, join) = start(connector);

        let snap = wait_for(&handle, "packet from second session", |s| {
            s.packet
                .as_ref()
                .and_then(|p| p.raw("soc"))
                .and_then(|v| v.as_f64())
                == Some(20.0)
        });
        assert_eq!(snap.state, ConnectionState::Connected);
        assert!(*attempts.lock().unwrap() >= 2);

        finish(handle, join);
    }

    #[test]
    fn connect_failure_backs_off_then_succeeds() {
        let connector = FakeConnector::new(vec![
            Err(()),
            Err(()),
            Ok(vec![Step::Data(r#"{"soc":50.0}"#)]),
        ]);
        let attempts = connector.attempts.clone();
        let (handle, join) = start(connector);

        let snap = wait_for(&handle, "eventual connection", |s| s.packet.is_some());
        assert_eq!(snap.state, ConnectionState::Connected);
        assert_eq!(*attempts.lock().unwrap(), 3);

        finish(handle, join);
    }

    #[test]
    fn decode_failure_keeps_loop_alive_and_later_objects_win() {
        let connector = FakeConnector::new(vec![Ok(vec![
            Step::Data(r#"{"soc":10.0}"#),
            Step::Data(r#"{"soc":}{"soc":30.0}"#),
        ])]);
        let (handle, join) = start(connector);

        let snap = wait_for(&handle, "last good packet", |s| {
            s.packet
                .as_ref()
                .and_then(|p| p.raw("soc"))
                .and_then(|v| v.as_f64())
                == Some(30.0)
        });
        assert_eq!(snap.state, ConnectionState::Connected);

        finish(handle, join);
    }

    #[test]
    fn command_is_written_as_one_json_line() {
        let connector = FakeConnector::new(vec![Ok(vec![])]);
        let writes = connector.writes.clone();
        let (handle, join) = start(connector);

        wait_for(&handle, "connection", |s| s.state.is_connected());
        handle.send_command(PinKey::EnCharge, true);

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if !writes.lock().unwrap().is_empty() {
                break;
            }
            assert!(Instant::now() < deadline, "command was never written");
            std::thread::sleep(Duration::from_millis(2));
        }
        let written = writes.lock().unwrap();
        assert_eq!(
            String::from_utf8(written[0].clone()).unwrap(),
            "{\"cmd\":\"set\",\"pin\":\"en_charge\",\"val\":1}\n"
        );

        finish(handle, join);
    }

    #[test]
    fn send_while_disconnected_is_a_noop() {
        let connector = FakeConnector::new(vec![]);
        let writes = connector.writes.clone();
        let (handle, join) = start(connector);

        handle.send_command(PinKey::EnLoadDsg, true);
        std::thread::sleep(Duration::from_millis(30));
        assert!(writes.lock().unwrap().is_empty());

        finish(handle, join);
    }

    #[test]
    fn command_write_failure_is_status_not_teardown() {
        let mut connector = FakeConnector::new(vec![Ok(vec![])]);
        connector.fail_writes = true;
        let (handle, join) = start(connector);

        wait_for(&handle, "connection", |s| s.state.is_connected());
        handle.send_command(PinKey::EnCharge, true);

        let snap = wait_for(&handle, "send failure status", |s| {
            s.status.starts_with("command send failed")
        });
        assert_eq!(snap.state, ConnectionState::Connected);

        finish(handle, join);
    }

    #[test]
    fn stop_flag_exits_promptly() {
        let connector = FakeConnector::new(vec![Ok(vec![])]);
        let (handle, join) = start(connector);
        wait_for(&handle, "connection", |s| s.state.is_connected());

        let started = Instant::now();
        finish(handle, join);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn lossy_decode_drops_undecodable_bytes() {
        assert_eq!(decode_lossy(b"{\"a\":1}"), "{\"a\":1}");
        assert_eq!(decode_lossy(&[0xff, b'{', 0xfe, b'}']), "{}");
    }
}
