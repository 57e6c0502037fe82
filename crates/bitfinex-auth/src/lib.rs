//! Authentication primitives for the Bitfinex v1 REST API
//!
//! This crate provides the pieces needed to authenticate a request against
//! Bitfinex's v1 private endpoints: credential storage, a monotonic nonce
//! source, and the signed-payload construction (JSON envelope, base64
//! encoding, HMAC-SHA384 signature).
//!
//! # Example
//!
//! ```
//! use bitfinex_auth::{Credentials, NonceSource, SignedPayload};
//!
//! let creds = Credentials::new("api_key", "api_secret");
//! let mut nonces = NonceSource::new();
//!
//! let payload = SignedPayload::build(
//!     &creds,
//!     "account_infos",
//!     nonces.next(),
//!     serde_json::Map::new(),
//! )?;
//!
//! // payload.headers() yields X-BFX-APIKEY / X-BFX-PAYLOAD / X-BFX-SIGNATURE
//! # Ok::<(), bitfinex_auth::AuthError>(())
//! ```

mod credentials;
mod error;
mod nonce;
mod payload;

pub use credentials::Credentials;
pub use error::{AuthError, AuthResult};
pub use nonce::NonceSource;
pub use payload::{SignedPayload, APIKEY_HEADER, PAYLOAD_HEADER, SIGNATURE_HEADER};
