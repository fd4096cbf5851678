use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod ports;
pub mod set;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the device and render live telemetry.
    Watch(WatchArgs),
    /// Set one device pin high or low.
    Set(SetArgs),
    /// List serial ports and mark likely device ports.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Set(args) => set::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Transport selection shared by the connecting subcommands.
#[derive(Args, Debug)]
pub struct PortArgs {
    /// Serial port to use. Default: first Bluetooth port found.
    pub port: Option<String>,
    /// Port to fall back to when discovery finds nothing.
    #[arg(long, value_name = "PORT", default_value = "COM3")]
    pub fallback: String,
    /// Baud rate.
    #[arg(long, default_value_t = voltlink_transport::DEFAULT_BAUD)]
    pub baud: u32,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub port: PortArgs,
    /// Refresh interval in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 125)]
    pub interval_ms: u64,
    /// Delay before reconnect attempts, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub reconnect_ms: u64,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Pin name, e.g. en_charge.
    pub pin: String,
    /// Pin level: 0 or 1.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=1))]
    pub value: u8,
    #[command(flatten)]
    pub port: PortArgs,
    /// Maximum time to wait for the link to come up, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    pub timeout_ms: u64,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
