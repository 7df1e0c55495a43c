use thiserror::Error;

/// Unified error type for calllog.
#[derive(Error, Debug)]
pub enum CallLogError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CallLogError {
    /// Short machine-readable tag, used as the `kind` field when logging failures.
    pub fn kind(&self) -> &'static str {
        match self {
            CallLogError::Serialize(_) => "serialize",
            CallLogError::Io(_) => "io",
        }
    }
}

