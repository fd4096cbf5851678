use serde_json::Value;

use crate::keys::TelemetryKey;

/// Marker rendered when a value is absent (or sent as JSON null, which the
/// firmware uses in place of NaN).
pub const UNKNOWN: &str = "--";

/// Marker rendered when a current reading sits inside its sensor's
/// zero-offset noise band — a near-zero number there is misleadingly
/// precise, not a real reading.
pub const NOT_APPLICABLE: &str = "NA";

/// Noise threshold in amps below which the reading is suppressed.
fn noise_limit(key: TelemetryKey) -> Option<f64> {
    match key {
        TelemetryKey::Iload => Some(0.120),
        TelemetryKey::Ichg | TelemetryKey::Idsg => Some(0.218),
        _ => None,
    }
}

/// Render a resolved telemetry value for display.
///
/// Formatting never fails: a value that defeats numeric coercion for a
/// numeric key degrades to its raw textual rendering.
pub fn format_value(key: TelemetryKey, raw: Option<&Value>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN.to_string();
    };
    if raw.is_null() {
        return UNKNOWN.to_string();
    }

    match key {
        TelemetryKey::Vbat => match coerce_f64(raw) {
            Some(v) => format!("{v:.3} V"),
            None => raw_text(raw),
        },
        TelemetryKey::Soc => match coerce_f64(raw) {
            Some(v) => format!("{v:.1} %"),
            None => raw_text(raw),
        },
        TelemetryKey::Iload | TelemetryKey::Ichg | TelemetryKey::Idsg | TelemetryKey::Inet => {
            match coerce_f64(raw) {
                Some(amps) => {
                    if let Some(limit) = noise_limit(key) {
                        if amps.abs() < limit {
                            return NOT_APPLICABLE.to_string();
                        }
                    }
                    if key == TelemetryKey::Inet {
                        format!("{amps:+.3} A")
                    } else {
                        format!("{amps:.3} A")
                    }
                }
                None => raw_text(raw),
            }
        }
        TelemetryKey::Temp => match coerce_f64(raw) {
            Some(v) => format!("{v:.1} C"),
            None => raw_text(raw),
        },
        TelemetryKey::Fcc | TelemetryKey::Rem => match coerce_f64(raw) {
            Some(v) => format!("{v:.0} mAh"),
            None => raw_text(raw),
        },
        TelemetryKey::Ms | TelemetryKey::UiLeftS => match coerce_f64(raw) {
            Some(v) => format!("{}", v as i64),
            None => raw_text(raw),
        },
        TelemetryKey::Chg | TelemetryKey::UiPending => match coerce_f64(raw) {
            Some(v) => bit_text(v),
            None => raw_text(raw),
        },
        TelemetryKey::Stat => raw_text(raw),
    }
}

/// Render a resolved pin value: "1"/"0" from integer truthiness, the
/// unknown marker when absent, raw text otherwise.
pub fn format_pin(raw: Option<&Value>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN.to_string();
    };
    if raw.is_null() {
        return UNKNOWN.to_string();
    }
    match coerce_f64(raw) {
        Some(v) => bit_text(v),
        None => raw_text(raw),
    }
}

/// Truthiness of the integer cast: 0.9 amps of "chg" is still 0.
fn bit_text(v: f64) -> String {
    if v as i64 != 0 { "1" } else { "0" }.to_string()
}

/// Lenient numeric coercion: JSON numbers, numeric strings, and booleans.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Least specific deterministic representation: bare strings unquoted,
/// everything else as compact JSON.
fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
