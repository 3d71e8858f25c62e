use thiserror::Error;

#[derive(Debug, Error)]
pub enum HdbResaleError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Degenerate input in {context}: result is undefined")]
    DegenerateInput { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for HdbResaleError {
    fn from(e: serde_json::Error) -> Self {
        HdbResaleError::SerializationError(e.to_string())
    }
}
