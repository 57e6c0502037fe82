//! Error types for REST API operations

use bitfinex_auth::AuthError;

/// Errors that can occur during REST API operations
///
/// Every failure is surfaced to the caller; the client performs no retries
/// and no silent recovery.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Transport could not complete the exchange (network/timeout)
    #[error("Connection failed: {0}")]
    Connection(#[from] reqwest::Error),

    /// Non-2xx HTTP status
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code
        status: u16,
    },

    /// The service reported a structured error payload, possibly under
    /// HTTP 200
    #[error("API error: {0}")]
    Api(String),

    /// A JSON response was expected but the body did not parse or did not
    /// have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Symbol not present in the exchange's tradable catalog; raised
    /// before any network call
    #[error("Unsupported symbol: {0}")]
    UnsupportedSymbol(String),

    /// Invalid request parameters or client configuration
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Signing failed before the request was sent
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = RestError::Http { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_unsupported_symbol_display() {
        let err = RestError::UnsupportedSymbol("dogeusd".to_string());
        assert!(err.to_string().contains("dogeusd"));
    }

    #[test]
    fn test_auth_error_converts() {
        let err: RestError = AuthError::ReservedParameter("nonce".to_string()).into();
        assert!(matches!(err, RestError::Auth(_)));
    }
}
