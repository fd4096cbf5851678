/// Errors that can occur while decoding telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The object text is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The decoded value is valid JSON but not an object.
    #[error("telemetry payload is not a JSON object")]
    NotAnObject,
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
