//! API credentials for authenticated Bitfinex requests
//!
//! # Security
//!
//! The API secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretString};

use crate::error::{AuthError, AuthResult};

/// API credentials for authenticated requests
///
/// The secret is automatically zeroized when the Credentials are dropped
/// and never appears in Debug output. Credentials are immutable for the
/// lifetime of the client that owns them.
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// API secret (zeroized on drop)
    api_secret: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret
    ///
    /// Bitfinex secrets are opaque UTF-8 strings; they are used verbatim
    /// as the HMAC key, with no decoding step.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Create credentials from environment variables
    ///
    /// Reads `BFX_API_KEY` and `BFX_API_SECRET` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var("BFX_API_KEY")
            .map_err(|_| AuthError::EnvVarNotSet("BFX_API_KEY".to_string()))?;
        let api_secret = std::env::var("BFX_API_SECRET")
            .map_err(|_| AuthError::EnvVarNotSet("BFX_API_SECRET".to_string()))?;

        Ok(Self::new(api_key, api_secret))
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Expose the secret for use as an HMAC key
    ///
    /// Crate-internal so the secret only ever flows into the signing step.
    pub(crate) fn secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates a new SecretString with the same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: SecretString::from(self.api_secret.expose_secret().to_owned()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "api_key",
                &format!("{}...", &self.api_key[..8.min(self.api_key.len())]),
            )
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("test_api_key", "extremely_secret_value");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("extremely_secret_value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_clone_preserves_secret() {
        let creds = Credentials::new("key", "secret");
        let cloned = creds.clone();
        assert_eq!(cloned.api_key(), "key");
        assert_eq!(cloned.secret(), "secret");
    }

    #[test]
    fn test_from_env_missing_var() {
        std::env::remove_var("BFX_API_KEY");
        let result = Credentials::from_env();
        assert!(matches!(result, Err(AuthError::EnvVarNotSet(var)) if var == "BFX_API_KEY"));
    }
}
