//! REST API client for the Bitfinex v1 cryptocurrency exchange API
//!
//! This crate provides a typed client for Bitfinex's v1 REST endpoints in
//! two capability tiers:
//!
//! - **Market data** ([`PublicClient`]): ticker, stats, order book, recent
//!   trades, funding book, recent lends. No credentials needed.
//! - **Account & margin funding** ([`TradingClient`]): fee info, balances,
//!   ledger and movement history, past trades, and the margin-funding offer
//!   lifecycle. Requires an API key and secret.
//!
//! # Authentication
//!
//! Private endpoints are signed per Bitfinex's v1 scheme: a JSON envelope
//! (request path, nonce, parameters) is base64-encoded and signed with
//! HMAC-SHA384, and both travel in request headers. The signing pipeline
//! lives in the `bitfinex-auth` crate and is re-exported here.
//!
//! # Bootstrap
//!
//! Constructing a client performs network calls: [`PublicClient::connect`]
//! fetches the tradable-symbol catalog, and [`TradingClient::connect`]
//! additionally verifies the credentials with one authenticated fee-info
//! request. A client value therefore always has a valid symbol catalog and
//! (for trading) working credentials.
//!
//! # Example
//!
//! ```no_run
//! use bitfinex_rest::{Credentials, PublicClient, TradingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let public = PublicClient::connect().await?;
//!     let ticker = public.ticker("btcusd").await?;
//!     println!("BTC/USD mid: {}", ticker.mid);
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let trading = TradingClient::connect(creds).await?;
//!     let balances = trading.balances().await?;
//!     println!("{} wallet entries", balances.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failure model
//!
//! Every failure surfaces as a [`RestError`]: transport failures, non-2xx
//! statuses, error payloads the service returns inside HTTP 200 bodies,
//! unparsable bodies, and symbols missing from the catalog (checked before
//! any request goes out). The client never retries.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod symbols;
pub mod types;

mod response;

// Re-export main types
pub use client::{ClientConfig, PublicClient, TradingClient, DEFAULT_BASE_URL};
pub use error::{RestError, RestResult};
pub use symbols::SymbolSet;

// Re-export the auth surface so consumers need only this crate
pub use bitfinex_auth::{AuthError, Credentials, NonceSource, SignedPayload};

// Re-export endpoint-specific types
pub use types::{
    // Market data
    Ticker, Stats, OrderBook, BookEntry, Trade, FundingBook, FundingBookEntry, Lend,
    // Account
    AccountFees, PairFees, Balance, HistoryEntry, Movement, PastTrade,
    // Margin funding
    Offer, OfferRequest, Credit, TakenFund, FundingDirection,
    // Queries
    HistoryQuery, MovementQuery, PastTradesQuery, Wallet,
};
