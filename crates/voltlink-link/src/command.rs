use serde::Serialize;

use voltlink_telemetry::PinKey;

/// One operator-triggered request to set a device pin.
///
/// Commands are fire-and-forget: no identity, no acknowledgment, exactly
/// one outbound write per toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandIntent {
    pub pin: PinKey,
    pub value: bool,
}

/// Host → device wire message: `{"cmd":"set","pin":"en_charge","val":1}`.
#[derive(Serialize)]
struct SetCommand<'a> {
    cmd: &'static str,
    pin: &'a str,
    val: u8,
}

impl CommandIntent {
    pub fn new(pin: PinKey, value: bool) -> Self {
        Self { pin, value }
    }

    /// Encode as one newline-terminated JSON line.
    pub fn encode(&self) -> Vec<u8> {
        let message = SetCommand {
            cmd: "set",
            pin: self.pin.name(),
            val: u8::from(self.value),
        };
        let mut line = serde_json::to_string(&message).unwrap_or_else(|_| "{}".to_string());
        line.push('\n');
        line.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_set_high() {
        let line = CommandIntent::new(PinKey::EnCharge, true).encode();
        assert_eq!(
            String::from_utf8(line).unwrap(),
            "{\"cmd\":\"set\",\"pin\":\"en_charge\",\"val\":1}\n"
        );
    }

    #[test]
    fn encodes_set_low_with_terminator() {
        let line = CommandIntent::new(PinKey::EnLoadDsg, false).encode();
        assert_eq!(
            String::from_utf8(line).unwrap(),
            "{\"cmd\":\"set\",\"pin\":\"en_load_dsg\",\"val\":0}\n"
        );
    }
}
