use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable")]
    Unavailable,

    #[error("Write rejected for key {key}")]
    WriteRejected { key: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Quota or privacy-mode failures may clear up; missing storage won't
    pub fn is_recoverable(&self) -> bool {
        match self {
            StorageError::Unavailable => false,
            StorageError::WriteRejected { .. } => true,
            StorageError::Serialization(_) => false,
        }
    }
}
