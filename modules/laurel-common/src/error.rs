use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaurelError {
    #[error("Snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    #[error("Unknown condition type: {0}")]
    UnknownConditionType(String),

    #[error("Malformed definition {code}: {reason}")]
    MalformedDefinition { code: String, reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
