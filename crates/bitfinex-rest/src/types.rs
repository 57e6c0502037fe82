//! Types for Bitfinex v1 API requests and responses
//!
//! Monetary fields arrive from the exchange as decimal strings and are kept
//! that way; accessor helpers parse into `rust_decimal::Decimal` where a
//! numeric view is useful.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Market Data Types
// ============================================================================

/// Ticker for a trading pair
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    /// (bid + ask) / 2
    pub mid: String,
    /// Innermost bid
    pub bid: String,
    /// Innermost ask
    pub ask: String,
    /// Price of the last executed order
    pub last_price: String,
    /// Lowest trade price of the last 24 hours
    pub low: String,
    /// Highest trade price of the last 24 hours
    pub high: String,
    /// Trading volume of the last 24 hours
    pub volume: String,
    /// Time the information was valid, decimal Unix seconds
    pub timestamp: String,
}

impl Ticker {
    /// Get the innermost bid as a decimal
    pub fn bid_price(&self) -> Option<Decimal> {
        self.bid.parse().ok()
    }

    /// Get the innermost ask as a decimal
    pub fn ask_price(&self) -> Option<Decimal> {
        self.ask.parse().ok()
    }

    /// Get the mid price as a decimal
    pub fn mid_price(&self) -> Option<Decimal> {
        self.mid.parse().ok()
    }

    /// Get the bid/ask spread
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.ask_price()? - self.bid_price()?)
    }
}

/// One entry of the volume statistics series
#[derive(Debug, Clone, Deserialize)]
pub struct Stats {
    /// Period covered, in days
    pub period: u32,
    /// Volume over the period
    pub volume: String,
}

/// One price level of the order book
#[derive(Debug, Clone, Deserialize)]
pub struct BookEntry {
    /// Price
    pub price: String,
    /// Amount at this level
    pub amount: String,
    /// Timestamp, decimal Unix seconds
    pub timestamp: String,
}

/// Order book snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBook {
    /// Bid levels
    pub bids: Vec<BookEntry>,
    /// Ask levels
    pub asks: Vec<BookEntry>,
}

/// An executed trade
#[derive(Debug, Clone, Deserialize)]
pub struct Trade {
    /// Trade ID
    pub tid: u64,
    /// Time of execution, Unix seconds
    pub timestamp: u64,
    /// Execution price
    pub price: String,
    /// Executed amount
    pub amount: String,
    /// Venue identifier
    pub exchange: String,
    /// "sell" or "buy" (may be empty if undetermined)
    #[serde(rename = "type", default)]
    pub side: String,
}

/// One level of the margin-funding book
#[derive(Debug, Clone, Deserialize)]
pub struct FundingBookEntry {
    /// Rate in percent per 365 days
    pub rate: String,
    /// Amount offered or bid
    pub amount: String,
    /// Funding period in days
    pub period: u32,
    /// Timestamp, decimal Unix seconds
    pub timestamp: String,
    /// "Yes" if at Flash Return Rate, "No" if at a fixed rate
    pub frr: String,
}

/// Margin-funding book snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct FundingBook {
    /// Funding bids
    pub bids: Vec<FundingBookEntry>,
    /// Funding offers
    pub asks: Vec<FundingBookEntry>,
}

/// One entry of the most-recent-lends series
#[derive(Debug, Clone, Deserialize)]
pub struct Lend {
    /// Average fixed rate, percent per 365 days
    pub rate: String,
    /// Total open margin funding in the currency
    pub amount_lent: String,
    /// Open margin funding used in positions
    pub amount_used: String,
    /// Timestamp, Unix seconds
    pub timestamp: u64,
}

// ============================================================================
// Account Types
// ============================================================================

/// Per-pair maker/taker fee schedule entry
#[derive(Debug, Clone, Deserialize)]
pub struct PairFees {
    /// Currency the schedule applies to
    pub pairs: String,
    /// Maker fee in percent
    pub maker_fees: String,
    /// Taker fee in percent
    pub taker_fees: String,
}

/// Account trading-fee information
#[derive(Debug, Clone, Deserialize)]
pub struct AccountFees {
    /// Current maker fee in percent
    pub maker_fees: String,
    /// Current taker fee in percent
    pub taker_fees: String,
    /// Per-pair schedule
    #[serde(default)]
    pub fees: Vec<PairFees>,
}

/// One wallet balance entry
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    /// Wallet the balance sits in (trading, exchange, deposit)
    #[serde(rename = "type")]
    pub wallet: String,
    /// Currency
    pub currency: String,
    /// Total amount
    pub amount: String,
    /// Amount available for use
    pub available: String,
}

/// One balance-ledger entry
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    /// Currency
    pub currency: String,
    /// Positive (credit) or negative (debit)
    pub amount: String,
    /// Wallet balance after this entry
    pub balance: String,
    /// Description, includes the wallet the operation took place in
    pub description: String,
    /// Timestamp, decimal Unix seconds
    pub timestamp: String,
}

/// One deposit/withdrawal movement
#[derive(Debug, Clone, Deserialize)]
pub struct Movement {
    /// Movement ID
    pub id: Option<u64>,
    /// Currency
    pub currency: String,
    /// Method (bitcoin, litecoin, wire, ...)
    pub method: Option<String>,
    /// "DEPOSIT" or "WITHDRAWAL"
    #[serde(rename = "type")]
    pub kind: String,
    /// Absolute value of the movement
    pub amount: String,
    /// Description (txid, destination address, ...)
    pub description: Option<String>,
    /// Status of the movement
    pub status: Option<String>,
    /// Timestamp, decimal Unix seconds
    pub timestamp: String,
}

/// One past trade of the account
#[derive(Debug, Clone, Deserialize)]
pub struct PastTrade {
    /// Execution price
    pub price: String,
    /// Executed amount
    pub amount: String,
    /// Timestamp, decimal Unix seconds
    pub timestamp: String,
    /// "Buy" or "Sell"
    #[serde(rename = "type")]
    pub side: String,
    /// Currency the fee was charged in
    pub fee_currency: Option<String>,
    /// Fee amount (negative)
    pub fee_amount: Option<String>,
    /// Trade ID
    pub tid: Option<u64>,
    /// Order the trade belongs to
    pub order_id: Option<u64>,
}

// ============================================================================
// Margin Funding Types
// ============================================================================

/// Direction of a margin-funding offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingDirection {
    /// Offer funds to margin traders
    Lend,
    /// Ask to borrow funds
    Loan,
}

impl FundingDirection {
    /// Get the API string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lend => "lend",
            Self::Loan => "loan",
        }
    }
}

impl std::fmt::Display for FundingDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request to place a margin-funding offer
#[derive(Debug, Clone)]
pub struct OfferRequest {
    /// Currency to offer or borrow
    pub currency: String,
    /// Amount of the offer
    pub amount: Decimal,
    /// Rate in percent per 365 days
    pub rate: Decimal,
    /// Funding period in days
    pub period: u32,
    /// Lend or loan
    pub direction: FundingDirection,
}

impl OfferRequest {
    /// Create an offer request
    pub fn new(
        currency: impl Into<String>,
        amount: Decimal,
        rate: Decimal,
        period: u32,
        direction: FundingDirection,
    ) -> Self {
        Self {
            currency: currency.into(),
            amount,
            rate,
            period,
            direction,
        }
    }

    /// Create a lend offer
    pub fn lend(currency: impl Into<String>, amount: Decimal, rate: Decimal, period: u32) -> Self {
        Self::new(currency, amount, rate, period, FundingDirection::Lend)
    }

    /// Create a loan demand
    pub fn loan(currency: impl Into<String>, amount: Decimal, rate: Decimal, period: u32) -> Self {
        Self::new(currency, amount, rate, period, FundingDirection::Loan)
    }

    pub(crate) fn to_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("currency".to_string(), Value::String(self.currency.clone()));
        params.insert("amount".to_string(), Value::String(self.amount.to_string()));
        params.insert("rate".to_string(), Value::String(self.rate.to_string()));
        params.insert("period".to_string(), Value::from(self.period));
        params.insert(
            "direction".to_string(),
            Value::String(self.direction.as_str().to_string()),
        );
        params
    }
}

/// A margin-funding offer as reported by the exchange
#[derive(Debug, Clone, Deserialize)]
pub struct Offer {
    /// Offer ID
    pub id: u64,
    /// Currency
    pub currency: String,
    /// Rate in percent per 365 days
    pub rate: String,
    /// Funding period in days
    pub period: u32,
    /// Lend or loan
    pub direction: FundingDirection,
    /// Timestamp, decimal Unix seconds
    pub timestamp: String,
    /// Whether the offer is still on the book
    pub is_live: bool,
    /// Whether the offer was cancelled
    pub is_cancelled: bool,
    /// Amount originally offered
    pub original_amount: String,
    /// Amount not yet taken
    pub remaining_amount: String,
    /// Amount already taken
    pub executed_amount: String,
}

/// An active margin-funding credit (funds lent out)
#[derive(Debug, Clone, Deserialize)]
pub struct Credit {
    /// Credit ID
    pub id: u64,
    /// Currency
    pub currency: String,
    /// Rate in percent per 365 days
    pub rate: String,
    /// Funding period in days
    pub period: u32,
    /// Amount lent
    pub amount: String,
    /// Status (e.g. "ACTIVE")
    pub status: String,
    /// Timestamp, decimal Unix seconds
    pub timestamp: String,
}

/// Margin funds taken and used in an open position
#[derive(Debug, Clone, Deserialize)]
pub struct TakenFund {
    /// Funding ID
    pub id: u64,
    /// Position the funds are backing
    pub position_id: Option<u64>,
    /// Currency
    pub currency: String,
    /// Rate in percent per 365 days
    pub rate: String,
    /// Funding period in days
    pub period: u32,
    /// Amount in use
    pub amount: String,
    /// Timestamp, decimal Unix seconds
    pub timestamp: String,
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Wallet selector for ledger queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wallet {
    /// Margin trading wallet
    Trading,
    /// Exchange wallet
    Exchange,
    /// Deposit (funding) wallet
    Deposit,
}

impl Wallet {
    /// Get the API string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trading => "trading",
            Self::Exchange => "exchange",
            Self::Deposit => "deposit",
        }
    }
}

/// Optional filters for the balance-ledger query
///
/// Absent fields are omitted from the outgoing payload entirely.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Return only entries after this timestamp
    pub since: Option<f64>,
    /// Return only entries before this timestamp
    pub until: Option<f64>,
    /// Maximum number of entries (service default: 500)
    pub limit: Option<u32>,
    /// Restrict to one wallet
    pub wallet: Option<Wallet>,
}

impl HistoryQuery {
    /// Create an empty query (no filters)
    pub fn new() -> Self {
        Self::default()
    }

    /// Only entries after this timestamp
    pub fn with_since(mut self, since: f64) -> Self {
        self.since = Some(since);
        self
    }

    /// Only entries before this timestamp
    pub fn with_until(mut self, until: f64) -> Self {
        self.until = Some(until);
        self
    }

    /// Cap the number of entries returned
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict to one wallet
    pub fn with_wallet(mut self, wallet: Wallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub(crate) fn apply(&self, params: &mut Map<String, Value>) {
        if let Some(since) = self.since {
            params.insert("since".to_string(), Value::from(since));
        }
        if let Some(until) = self.until {
            params.insert("until".to_string(), Value::from(until));
        }
        if let Some(limit) = self.limit {
            params.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(wallet) = self.wallet {
            params.insert("wallet".to_string(), Value::String(wallet.as_str().to_string()));
        }
    }
}

/// Optional filters for the deposit/withdrawal movements query
#[derive(Debug, Clone, Default)]
pub struct MovementQuery {
    /// Restrict to one method (bitcoin, litecoin, wire, ...)
    pub method: Option<String>,
    /// Return only movements after this timestamp
    pub since: Option<f64>,
    /// Return only movements before this timestamp
    pub until: Option<f64>,
    /// Maximum number of movements (service default: 500)
    pub limit: Option<u32>,
}

impl MovementQuery {
    /// Create an empty query (no filters)
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one deposit/withdrawal method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Only movements after this timestamp
    pub fn with_since(mut self, since: f64) -> Self {
        self.since = Some(since);
        self
    }

    /// Only movements before this timestamp
    pub fn with_until(mut self, until: f64) -> Self {
        self.until = Some(until);
        self
    }

    /// Cap the number of movements returned
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn apply(&self, params: &mut Map<String, Value>) {
        if let Some(method) = &self.method {
            params.insert("method".to_string(), Value::String(method.clone()));
        }
        if let Some(since) = self.since {
            params.insert("since".to_string(), Value::from(since));
        }
        if let Some(until) = self.until {
            params.insert("until".to_string(), Value::from(until));
        }
        if let Some(limit) = self.limit {
            params.insert("limit".to_string(), Value::from(limit));
        }
    }
}

/// Optional filters for the past-trades query
#[derive(Debug, Clone, Default)]
pub struct PastTradesQuery {
    /// Return only trades after this timestamp
    pub timestamp: Option<f64>,
    /// Return only trades before this timestamp
    pub until: Option<f64>,
    /// Maximum number of trades (service default: 50)
    pub limit_trades: Option<u32>,
}

impl PastTradesQuery {
    /// Create an empty query (no filters)
    pub fn new() -> Self {
        Self::default()
    }

    /// Only trades after this timestamp
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Only trades before this timestamp
    pub fn with_until(mut self, until: f64) -> Self {
        self.until = Some(until);
        self
    }

    /// Cap the number of trades returned
    pub fn with_limit_trades(mut self, limit_trades: u32) -> Self {
        self.limit_trades = Some(limit_trades);
        self
    }

    pub(crate) fn apply(&self, params: &mut Map<String, Value>) {
        if let Some(timestamp) = self.timestamp {
            params.insert("timestamp".to_string(), Value::from(timestamp));
        }
        if let Some(until) = self.until {
            params.insert("until".to_string(), Value::from(until));
        }
        if let Some(limit_trades) = self.limit_trades {
            params.insert("limit_trades".to_string(), Value::from(limit_trades));
        }
    }
}
