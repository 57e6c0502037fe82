//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::RestResult;
use crate::response;
use crate::symbols::SymbolSet;
use crate::types::{FundingBook, Lend, OrderBook, Stats, Ticker, Trade};

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    http: &'a Client,
    base_url: &'a str,
    symbols: &'a SymbolSet,
}

impl<'a> MarketEndpoints<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, symbols: &'a SymbolSet) -> Self {
        Self {
            http,
            base_url,
            symbols,
        }
    }

    /// Make an unauthenticated GET request
    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> RestResult<T> {
        get_json(self.http, self.base_url, path, params).await
    }

    /// Fetch the tradable-symbol catalog
    ///
    /// Called once during client construction, before a [`SymbolSet`]
    /// exists; a failure here fails construction.
    pub(crate) async fn fetch_symbols(http: &Client, base_url: &str) -> RestResult<SymbolSet> {
        debug!("Fetching symbol catalog");
        let listed: Vec<String> = get_json(http, base_url, "symbols", &[]).await?;
        Ok(SymbolSet::new(listed))
    }

    /// Get the ticker for a trading pair
    ///
    /// # Arguments
    /// * `symbol` - Trading pair (e.g. "btcusd"), case-insensitive
    #[instrument(skip(self))]
    pub async fn ticker(&self, symbol: &str) -> RestResult<Ticker> {
        self.symbols.validate(symbol)?;
        debug!("Fetching ticker for {}", symbol);

        self.get(&format!("pubticker/{}", symbol.to_lowercase()), &[])
            .await
    }

    /// Get volume statistics for a trading pair
    ///
    /// # Arguments
    /// * `symbol` - Trading pair, case-insensitive
    #[instrument(skip(self))]
    pub async fn stats(&self, symbol: &str) -> RestResult<Vec<Stats>> {
        self.symbols.validate(symbol)?;
        debug!("Fetching stats for {}", symbol);

        self.get(&format!("stats/{}", symbol.to_lowercase()), &[]).await
    }

    /// Get the order book for a trading pair
    ///
    /// # Arguments
    /// * `symbol` - Trading pair, case-insensitive
    /// * `limit_bids` - Maximum bid levels to return
    /// * `limit_asks` - Maximum ask levels to return
    /// * `group` - Group entries sharing a price level
    #[instrument(skip(self))]
    pub async fn order_book(
        &self,
        symbol: &str,
        limit_bids: Option<u32>,
        limit_asks: Option<u32>,
        group: Option<bool>,
    ) -> RestResult<OrderBook> {
        self.symbols.validate(symbol)?;

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(limit_bids) = limit_bids {
            params.push(("limit_bids", limit_bids.to_string()));
        }
        if let Some(limit_asks) = limit_asks {
            params.push(("limit_asks", limit_asks.to_string()));
        }
        if let Some(group) = group {
            let flag = if group { "1" } else { "0" };
            params.push(("group", flag.to_string()));
        }

        debug!("Fetching order book for {}", symbol);

        self.get(&format!("book/{}", symbol.to_lowercase()), &params)
            .await
    }

    /// Get the most recent trades for a trading pair
    ///
    /// # Arguments
    /// * `symbol` - Trading pair, case-insensitive
    /// * `timestamp` - Return only trades after this time
    /// * `limit_trades` - Maximum number of trades to return
    #[instrument(skip(self))]
    pub async fn trades(
        &self,
        symbol: &str,
        timestamp: Option<f64>,
        limit_trades: Option<u32>,
    ) -> RestResult<Vec<Trade>> {
        self.symbols.validate(symbol)?;

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(timestamp) = timestamp {
            params.push(("timestamp", timestamp.to_string()));
        }
        if let Some(limit_trades) = limit_trades {
            params.push(("limit_trades", limit_trades.to_string()));
        }

        debug!("Fetching trades for {}", symbol);

        self.get(&format!("trades/{}", symbol.to_lowercase()), &params)
            .await
    }

    /// Get the margin-funding book for a currency
    ///
    /// # Arguments
    /// * `currency` - Currency (e.g. "usd"), case-insensitive; currencies
    ///   are not part of the pair catalog and are passed through unvalidated
    /// * `limit_bids` - Maximum funding bids to return
    /// * `limit_asks` - Maximum funding offers to return
    #[instrument(skip(self))]
    pub async fn funding_book(
        &self,
        currency: &str,
        limit_bids: Option<u32>,
        limit_asks: Option<u32>,
    ) -> RestResult<FundingBook> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(limit_bids) = limit_bids {
            params.push(("limit_bids", limit_bids.to_string()));
        }
        if let Some(limit_asks) = limit_asks {
            params.push(("limit_asks", limit_asks.to_string()));
        }

        debug!("Fetching funding book for {}", currency);

        self.get(&format!("lendbook/{}", currency.to_lowercase()), &params)
            .await
    }

    /// Get the most recent margin lends for a currency
    ///
    /// # Arguments
    /// * `currency` - Currency, case-insensitive
    /// * `timestamp` - Return only lends after this time
    /// * `limit_lends` - Maximum number of entries to return
    #[instrument(skip(self))]
    pub async fn lends(
        &self,
        currency: &str,
        timestamp: Option<f64>,
        limit_lends: Option<u32>,
    ) -> RestResult<Vec<Lend>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(timestamp) = timestamp {
            params.push(("timestamp", timestamp.to_string()));
        }
        if let Some(limit_lends) = limit_lends {
            params.push(("limit_lends", limit_lends.to_string()));
        }

        debug!("Fetching lends for {}", currency);

        self.get(&format!("lends/{}", currency.to_lowercase()), &params)
            .await
    }
}

/// Issue a GET and interpret the response as typed JSON
async fn get_json<T: DeserializeOwned>(
    http: &Client,
    base_url: &str,
    path: &str,
    params: &[(&str, String)],
) -> RestResult<T> {
    let url = format!("{}/{}", base_url, path);

    let mut request = http.get(&url);
    if !params.is_empty() {
        request = request.query(params);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    let value = response::interpret_json(status, &body)?;
    response::decode(value)
}
