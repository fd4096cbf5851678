use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, TelemetryError};
use crate::keys::{PinKey, TelemetryKey};

/// One decoded telemetry object.
///
/// No schema is enforced at decode time: arbitrary extra fields are
/// preserved and unknown keys are simply never resolved. Packets are
/// ephemeral — decoded, folded into the shared snapshot, discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TelemetryPacket {
    fields: Map<String, Value>,
}

impl TelemetryPacket {
    /// Decode one complete object string.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(TelemetryError::NotAnObject),
        }
    }

    /// Number of top-level fields (reported in the link status line).
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Raw top-level field access by wire name.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The nested `pins` mapping, or `None` when absent or not a mapping.
    pub fn pins(&self) -> Option<&Map<String, Value>> {
        self.fields.get("pins").and_then(Value::as_object)
    }

    /// Resolve a telemetry key through its alias list (first alias wins).
    pub fn resolve(&self, key: TelemetryKey) -> Option<&Value> {
        key.aliases().iter().find_map(|alias| self.fields.get(*alias))
    }

    /// Resolve a pin key inside the `pins` mapping (first alias wins).
    pub fn resolve_pin(&self, pin: PinKey) -> Option<&Value> {
        let pins = self.pins()?;
        pin.aliases().iter().find_map(|alias| pins.get(*alias))
    }
}
