use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use voltlink_link::{spawn, LinkConfig};
use voltlink_transport::{discover_port, SerialConfig, SerialConnector};

use crate::cmd::{PortArgs, WatchArgs};
use crate::exit::{link_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{render_snapshot, OutputFormat};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let connector = connector_for(&args.port);
    let config = LinkConfig {
        reconnect_delay: Duration::from_millis(args.reconnect_ms),
        ..LinkConfig::default()
    };
    let (handle, join) =
        spawn(connector, config).map_err(|err| link_error("link startup failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    // Poll-and-render loop. The link thread owns all I/O; this thread only
    // copies the snapshot, so a slow terminal never stalls the link.
    let interval = Duration::from_millis(args.interval_ms.max(1));
    let mut last = String::new();
    while running.load(Ordering::SeqCst) {
        let rendered = render_snapshot(&handle.snapshot(), format);
        if rendered != last {
            println!("{rendered}");
            last = rendered;
        }
        std::thread::sleep(interval);
    }

    handle.stop();
    join.join()
        .map_err(|_| CliError::new(INTERNAL, "link thread panicked"))?;
    Ok(SUCCESS)
}

pub fn connector_for(args: &PortArgs) -> SerialConnector {
    let address = match &args.port {
        Some(port) => port.clone(),
        None => discover_port(&args.fallback),
    };
    let mut config = SerialConfig::new(address);
    config.baud = args.baud;
    SerialConnector::new(config)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
