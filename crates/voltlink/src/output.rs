use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Map;
use voltlink_link::{ConnectionState, Snapshot};
use voltlink_telemetry::{format_pin, format_value, PinKey, TelemetryKey};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SnapshotOutput<'a> {
    state: &'static str,
    status: &'a str,
    telemetry: Map<String, serde_json::Value>,
    pins: Map<String, serde_json::Value>,
    raw: &'a str,
}

pub fn state_name(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Disconnected => "disconnected",
        ConnectionState::Connecting => "connecting",
        ConnectionState::Connected => "connected",
        ConnectionState::Error => "error",
    }
}

/// Render one snapshot for display.
///
/// Every logical key is rendered on every refresh, marker text included, so
/// the reader always sees the full field set rather than whatever the last
/// packet happened to carry.
pub fn render_snapshot(snap: &Snapshot, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let mut telemetry = Map::new();
            for key in TelemetryKey::ALL {
                let rendered = format_value(key, snap.packet.as_ref().and_then(|p| p.resolve(key)));
                telemetry.insert(key.name().to_string(), rendered.into());
            }
            let mut pins = Map::new();
            for pin in PinKey::ALL {
                let rendered = format_pin(snap.packet.as_ref().and_then(|p| p.resolve_pin(pin)));
                pins.insert(pin.name().to_string(), rendered.into());
            }
            let out = SnapshotOutput {
                state: state_name(snap.state),
                status: &snap.status,
                telemetry,
                pins,
                raw: &snap.raw,
            };
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            table.add_row(vec!["State".to_string(), state_name(snap.state).to_string()]);
            table.add_row(vec!["Status".to_string(), snap.status.clone()]);
            for key in TelemetryKey::ALL {
                table.add_row(vec![
                    key.label().to_string(),
                    format_value(key, snap.packet.as_ref().and_then(|p| p.resolve(key))),
                ]);
            }
            for pin in PinKey::ALL {
                table.add_row(vec![
                    pin.label().to_string(),
                    format_pin(snap.packet.as_ref().and_then(|p| p.resolve_pin(pin))),
                ]);
            }
            table.to_string()
        }
        OutputFormat::Pretty => {
            let mut lines = Vec::new();
            lines.push(format!("[{}] {}", state_name(snap.state), snap.status));
            for key in TelemetryKey::ALL {
                lines.push(format!(
                    "{}: {}",
                    key.label(),
                    format_value(key, snap.packet.as_ref().and_then(|p| p.resolve(key)))
                ));
            }
            for pin in PinKey::ALL {
                lines.push(format!(
                    "{}: {}",
                    pin.label(),
                    format_pin(snap.packet.as_ref().and_then(|p| p.resolve_pin(pin)))
                ));
            }
            lines.join("\n")
        }
    }
}
