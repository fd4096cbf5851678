use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serialport::SerialPortType;
use voltlink_transport::discover::is_bluetooth;
use voltlink_transport::list_ports;

use crate::cmd::PortsArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct PortOutput {
    name: String,
    kind: &'static str,
    description: Option<String>,
    bluetooth: bool,
}

pub fn run(_args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let ports = list_ports().map_err(|err| transport_error("port enumeration failed", err))?;

    let rows: Vec<PortOutput> = ports
        .iter()
        .map(|port| PortOutput {
            name: port.port_name.clone(),
            kind: kind_name(&port.port_type),
            description: description(&port.port_type),
            bluetooth: is_bluetooth(&port.port_type),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "KIND", "DESCRIPTION", "DEVICE?"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.clone(),
                    row.kind.to_string(),
                    row.description.clone().unwrap_or_default(),
                    if row.bluetooth { "yes" } else { "" }.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                let marker = if row.bluetooth { " (bluetooth)" } else { "" };
                println!("{} [{}]{}", row.name, row.kind, marker);
            }
        }
    }

    Ok(SUCCESS)
}

fn description(port_type: &SerialPortType) -> Option<String> {
    match port_type {
        SerialPortType::UsbPort(usb) => usb.product.clone(),
        _ => None,
    }
}

fn kind_name(port_type: &SerialPortType) -> &'static str {
    match port_type {
        SerialPortType::UsbPort(_) => "usb",
        SerialPortType::BluetoothPort => "bluetooth",
        SerialPortType::PciPort => "pci",
        SerialPortType::Unknown => "unknown",
    }
}
