use std::time::{Duration, Instant};

use voltlink_link::{spawn, LinkConfig};
use voltlink_telemetry::PinKey;
use voltlink_transport::Connector;

use crate::cmd::watch::connector_for;
use crate::cmd::SetArgs;
use crate::exit::{link_error, CliError, CliResult, SUCCESS, TIMEOUT, USAGE};
use crate::output::OutputFormat;

/// Time left connected after the send so the queued command reaches the wire
/// before the link is torn down.
const LINGER: Duration = Duration::from_millis(200);

pub fn run(args: SetArgs, format: OutputFormat) -> CliResult<i32> {
    let pin = PinKey::from_name(&args.pin).ok_or_else(|| {
        let known: Vec<&str> = PinKey::ALL.iter().map(|p| p.name()).collect();
        CliError::new(
            USAGE,
            format!("unknown pin '{}'; known pins: {}", args.pin, known.join(", ")),
        )
    })?;
    let value = args.value != 0;

    let connector = connector_for(&args.port);
    let address = connector.address().to_string();
    let (handle, join) =
        spawn(connector, LinkConfig::default()).map_err(|err| link_error("link startup failed", err))?;

    // Commands are dropped while disconnected, so wait for the link first.
    let deadline = Instant::now() + Duration::from_millis(args.timeout_ms);
    while !handle.connection_state().is_connected() {
        if Instant::now() >= deadline {
            handle.stop();
            let _ = join.join();
            return Err(CliError::new(
                TIMEOUT,
                format!("device not connected within {} ms: {}", args.timeout_ms, handle.snapshot().status),
            ));
        }
        std::thread::sleep(Duration::from_millis(25));
    }

    handle.send_command(pin, value);
    std::thread::sleep(LINGER);
    handle.stop();
    let _ = join.join();

    // Fire-and-forget wire protocol: success here means the command was
    // handed to a live connection, not that the device acted on it.
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "pin": pin.name(),
                "val": u8::from(value),
                "port": address,
            })
        ),
        _ => println!("set {}={} sent via {}", pin.name(), u8::from(value), address),
    }
    Ok(SUCCESS)
}
