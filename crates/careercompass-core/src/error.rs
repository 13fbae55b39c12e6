use thiserror::Error;

/// Errors from the durable slot store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize slot value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Errors surfaced by the session manager.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A login or register step failed. The session state is left untouched.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// A handle was used after its `SessionManager` was dropped.
    #[error("Session used outside of a SessionManager - the provider is missing")]
    ProviderMissing,
}

impl From<StorageError> for SessionError {
    fn from(e: StorageError) -> Self {
        SessionError::OperationFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_becomes_operation_failed() {
        let err: SessionError = StorageError::Poisoned.into();
        assert!(matches!(err, SessionError::OperationFailed(ref msg) if msg.contains("poisoned")));
    }

    #[test]
    fn test_provider_missing_names_the_provider() {
        assert!(SessionError::ProviderMissing.to_string().contains("SessionManager"));
    }
}
