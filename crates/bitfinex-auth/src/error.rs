//! Error types for authentication operations

/// Errors that can occur while building an authenticated request
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// A caller-supplied parameter collides with a reserved envelope key
    #[error("Parameter {0:?} collides with a reserved envelope key")]
    ReservedParameter(String),

    /// Failed to serialize the request envelope
    #[error("Payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("BFX_API_KEY".to_string());
        assert!(err.to_string().contains("BFX_API_KEY"));

        let err = AuthError::ReservedParameter("nonce".to_string());
        assert!(err.to_string().contains("nonce"));
    }
}
