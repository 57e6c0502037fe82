//! Private account endpoints
//!
//! These endpoints require authentication.

use bitfinex_auth::{Credentials, NonceSource, SignedPayload};
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::RestResult;
use crate::response;
use crate::symbols::SymbolSet;
use crate::types::{
    AccountFees, Balance, HistoryEntry, HistoryQuery, Movement, MovementQuery, PastTrade,
    PastTradesQuery,
};

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    http: &'a Client,
    base_url: &'a str,
    credentials: &'a Credentials,
    nonce: &'a Mutex<NonceSource>,
    symbols: &'a SymbolSet,
}

impl<'a> AccountEndpoints<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        credentials: &'a Credentials,
        nonce: &'a Mutex<NonceSource>,
        symbols: &'a SymbolSet,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
            nonce,
            symbols,
        }
    }

    /// Make an authenticated POST request
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: Map<String, Value>,
    ) -> RestResult<T> {
        let nonce = self.nonce.lock().next();
        let signed = SignedPayload::build(self.credentials, path, nonce, params)?;

        let url = format!("{}/{}", self.base_url, path);
        debug!("Making authenticated request to {}", path);

        let mut request = self.http.post(&url).header("Content-Type", "application/json");
        for (name, value) in signed.headers() {
            request = request.header(name, value);
        }

        let response = request.body(signed.body().to_owned()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let value = response::interpret_json(status, &body)?;
        response::decode(value)
    }

    /// Get the account's trading-fee information
    #[instrument(skip(self))]
    pub async fn fees(&self) -> RestResult<Vec<AccountFees>> {
        self.post("account_infos", Map::new()).await
    }

    /// Get all wallet balances
    #[instrument(skip(self))]
    pub async fn balances(&self) -> RestResult<Vec<Balance>> {
        self.post("balances", Map::new()).await
    }

    /// Get balance-ledger entries for a currency
    ///
    /// # Arguments
    /// * `currency` - Currency to look up (e.g. "USD")
    /// * `query` - Optional since/until/limit/wallet filters
    #[instrument(skip(self, query))]
    pub async fn balance_history(
        &self,
        currency: &str,
        query: &HistoryQuery,
    ) -> RestResult<Vec<HistoryEntry>> {
        let mut params = Map::new();
        params.insert("currency".to_string(), Value::String(currency.to_string()));
        query.apply(&mut params);

        debug!("Fetching balance history for {}", currency);

        self.post("history", params).await
    }

    /// Get past deposits and withdrawals for a currency
    ///
    /// # Arguments
    /// * `currency` - Currency to look up
    /// * `query` - Optional method/since/until/limit filters
    #[instrument(skip(self, query))]
    pub async fn movements(
        &self,
        currency: &str,
        query: &MovementQuery,
    ) -> RestResult<Vec<Movement>> {
        let mut params = Map::new();
        params.insert("currency".to_string(), Value::String(currency.to_string()));
        query.apply(&mut params);

        debug!("Fetching movements for {}", currency);

        self.post("history/movements", params).await
    }

    /// Get the account's past trades for a trading pair
    ///
    /// # Arguments
    /// * `symbol` - Trading pair, case-insensitive; validated against the
    ///   catalog before the nonce is drawn
    /// * `query` - Optional timestamp/until/limit filters
    #[instrument(skip(self, query))]
    pub async fn past_trades(
        &self,
        symbol: &str,
        query: &PastTradesQuery,
    ) -> RestResult<Vec<PastTrade>> {
        self.symbols.validate(symbol)?;

        let mut params = Map::new();
        params.insert(
            "symbol".to_string(),
            Value::String(symbol.to_lowercase()),
        );
        query.apply(&mut params);

        debug!("Fetching past trades for {}", symbol);

        self.post("mytrades", params).await
    }
}
